//! Interactive kit metadata prompts
//!
//! Answers are taken as plain text, never evaluated.

use std::io::{self, BufRead, Write};

use crate::config::MetadataOverrides;
use crate::kit::KitMetadata;

/// Ask for every metadata field not already set in `known`.
///
/// An empty answer keeps the field empty; an empty kit name later becomes
/// the default name. End of input leaves remaining fields at their
/// defaults.
pub fn prompt_metadata<R: BufRead, W: Write>(
    known: MetadataOverrides,
    input: &mut R,
    output: &mut W,
) -> io::Result<KitMetadata> {
    let defaults = KitMetadata::default();
    let needs_prompt = !known.is_complete();
    if needs_prompt {
        writeln!(output)?;
        writeln!(output, "Please enter the drumkit info:")?;
    }

    let mut ask = |value: Option<String>, question: &str, default: String| -> io::Result<String> {
        match value {
            Some(value) => Ok(value),
            None => Ok(ask_line(input, output, question)?.unwrap_or(default)),
        }
    };

    let metadata = KitMetadata {
        name: ask(known.name, "Please enter the drumkit name: ", String::new())?,
        author: ask(known.author, "Please enter the name of the author: ", defaults.author)?,
        info: ask(known.info, "Please enter any extra info you want to add: ", defaults.info)?,
        license: ask(known.license, "Please enter the drumkit license type: ", defaults.license)?,
    };

    if needs_prompt {
        writeln!(output)?;
    }
    Ok(metadata.with_default_name())
}

/// Read one trimmed answer, `None` at end of input
fn ask_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
