//! Speech-synthesis kits
//!
//! A script file holds one directive per line:
//!
//! ```text
//! Voice 1*"hello you"
//! Voice 2*"hello you, how are you doing?" -s 50 -p 30
//! ```
//!
//! The part before `*` names the instrument, the quoted text is spoken and
//! anything after it is passed to the synthesizer as extra flags. Each valid
//! directive `n` becomes the sample `<n>-1 <name>.wav` next to the script.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};

use crate::error::{KitError, Result};

/// Separates the instrument name from the text in a script line
pub const DIRECTIVE_SEPARATOR: char = '*';

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthDirective {
    /// 1-based position among the valid directives of the script
    pub position: u32,
    pub name: String,
    pub text: String,
    /// Extra synthesizer flags, e.g. `["-s", "50"]`
    pub flags: Vec<String>,
}

impl SynthDirective {
    /// Parse a script line.
    ///
    /// Returns `None` for lines without the separator or without text,
    /// for flags with unbalanced quotes, and for names that would leave the
    /// kit directory once used in a filename.
    pub fn parse(line: &str, position: u32) -> Option<Self> {
        let (name, rest) = line.split_once(DIRECTIVE_SEPARATOR)?;
        let name = name.trim();
        if name.contains(['/', '\\']) || name.contains("..") {
            warn!("instrument name '{}' cannot be used as a file name", name);
            return None;
        }
        let rest = rest.trim();

        let (text, flags) = match rest.strip_prefix('"') {
            Some(quoted) => {
                let (text, flags) = quoted.split_once('"').unwrap_or((quoted, ""));
                (text.to_string(), split_flags(flags)?)
            }
            None => {
                let tokens = split_flags(rest)?;
                let text_len = tokens
                    .iter()
                    .position(|token| token.starts_with('-'))
                    .unwrap_or(tokens.len());
                (tokens[..text_len].join(" "), tokens[text_len..].to_vec())
            }
        };

        if text.trim().is_empty() {
            return None;
        }

        Some(Self {
            position,
            name: name.to_string(),
            text,
            flags,
        })
    }

    /// Sample filename this directive renders to
    pub fn sample_filename(&self) -> String {
        format!("{}-1 {}.wav", self.position, self.name)
    }
}

impl fmt::Display for SynthDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} * \"{}\"", self.name, self.text)?;
        for flag in &self.flags {
            write!(f, " {}", flag)?;
        }
        Ok(())
    }
}

/// Split the rest of a line into words the way a shell would
fn split_flags(flags: &str) -> Option<Vec<String>> {
    shell_words::split(flags)
        .map_err(|e| warn!("cannot split '{}': {}", flags, e))
        .ok()
}

/// Parse every line of a script, numbering valid directives from 1.
///
/// Invalid lines are skipped with a warning.
pub fn parse_script(content: &str) -> Vec<SynthDirective> {
    let mut directives = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let position = directives.len() as u32 + 1;
        match SynthDirective::parse(line, position) {
            Some(directive) => directives.push(directive),
            None => {
                warn!("skipping line {}", line);
                warn!("line format not OK (expected 'name {} \"text\"')", DIRECTIVE_SEPARATOR);
            }
        }
    }

    directives
}

/// Read and parse a script file
pub fn read_script(path: &Path) -> Result<Vec<SynthDirective>> {
    let content = fs::read_to_string(path).map_err(|e| KitError::io(path, e))?;
    Ok(parse_script(&content))
}

/// A text-to-speech backend
pub trait Synthesizer {
    /// Speak the directive through the audio output
    fn speak(&self, directive: &SynthDirective) -> Result<()>;

    /// Render the directive to a WAV file at `output`
    fn render(&self, directive: &SynthDirective, output: &Path) -> Result<()>;
}

/// Runs an espeak-compatible command line synthesizer
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: PathBuf,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `program` on the PATH
    pub fn locate(program: &str) -> Result<Self> {
        let path = which::which(program).map_err(|e| KitError::Synthesis {
            command: program.to_string(),
            reason: e.to_string(),
        })?;
        debug!("using synthesizer {}", path.display());
        Ok(Self::new(path))
    }

    fn command(&self, directive: &SynthDirective) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&directive.flags).arg(&directive.text);
        command
    }

    fn run(&self, mut command: Command) -> Result<()> {
        let description = format!("{:?}", command);
        info!("command {}", description);

        let status = command.status().map_err(|e| KitError::Synthesis {
            command: description.clone(),
            reason: e.to_string(),
        })?;

        if !status.success() {
            return Err(KitError::Synthesis {
                command: description,
                reason: format!(
                    "exit code {}",
                    status
                        .code()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                ),
            });
        }
        Ok(())
    }
}

impl Synthesizer for CommandSynthesizer {
    fn speak(&self, directive: &SynthDirective) -> Result<()> {
        self.run(self.command(directive))
    }

    fn render(&self, directive: &SynthDirective, output: &Path) -> Result<()> {
        let mut command = self.command(directive);
        command.arg("-w").arg(output);
        self.run(command)
    }
}

/// Speak every directive without writing files
pub fn preview(directives: &[SynthDirective], synth: &dyn Synthesizer) -> Result<()> {
    for directive in directives {
        info!("instrument = {}", directive);
        synth.speak(directive)?;
    }
    Ok(())
}

/// Render every directive into `output_dir`, returning the written files
pub fn generate(
    directives: &[SynthDirective],
    synth: &dyn Synthesizer,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(directives.len());

    for directive in directives {
        let filename = output_dir.join(directive.sample_filename());
        info!("filename = {}", filename.display());
        synth.render(directive, &filename)?;
        written.push(filename);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingSynth {
        spoken: RefCell<Vec<String>>,
        rendered: RefCell<Vec<PathBuf>>,
    }

    impl Synthesizer for RecordingSynth {
        fn speak(&self, directive: &SynthDirective) -> Result<()> {
            self.spoken.borrow_mut().push(directive.text.clone());
            Ok(())
        }

        fn render(&self, _directive: &SynthDirective, output: &Path) -> Result<()> {
            fs::write(output, b"RIFF").map_err(|e| KitError::io(output, e))?;
            self.rendered.borrow_mut().push(output.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_parse_quoted_directive_with_flags() {
        let directive =
            SynthDirective::parse(r#"Voice 2*"hello you, how are you doing?" -s 50 -p 30"#, 2)
                .unwrap();
        assert_eq!(directive.name, "Voice 2");
        assert_eq!(directive.text, "hello you, how are you doing?");
        assert_eq!(directive.flags, vec!["-s", "50", "-p", "30"]);
        assert_eq!(directive.sample_filename(), "2-1 Voice 2.wav");
    }

    #[test]
    fn test_parse_unquoted_directive() {
        let directive = SynthDirective::parse("Hat * tss tss -s 120", 1).unwrap();
        assert_eq!(directive.name, "Hat");
        assert_eq!(directive.text, "tss tss");
        assert_eq!(directive.flags, vec!["-s", "120"]);
    }

    #[test]
    fn test_parse_strips_quotes_from_flags() {
        let directive = SynthDirective::parse(r#"Voice*"hi" -v "en-us" -s 50"#, 1).unwrap();
        assert_eq!(directive.flags, vec!["-v", "en-us", "-s", "50"]);

        assert!(SynthDirective::parse(r#"Voice*"hi" -v "en-us"#, 1).is_none());
    }

    #[test]
    fn test_parse_rejects_names_leaving_kit_dir() {
        for line in [r#"a/b*"hi""#, r#"../x*"hi""#, r#"a\b*"hi""#] {
            assert!(SynthDirective::parse(line, 1).is_none(), "{} should be rejected", line);
        }

        let directives = parse_script("../up*\"hi\"\nKick*\"boom\"\n");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].sample_filename(), "1-1 Kick.wav");
    }

    #[test]
    fn test_parse_rejects_lines_without_text() {
        assert!(SynthDirective::parse("no separator here", 1).is_none());
        assert!(SynthDirective::parse("Empty *", 1).is_none());
        assert!(SynthDirective::parse(r#"Empty * "" -s 50"#, 1).is_none());
    }

    #[test]
    fn test_script_numbers_valid_lines_only() {
        let script = "Kick*\"boom\"\nthis line is broken\n\nSnare*\"tak\" -p 80\n";
        let directives = parse_script(script);

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].position, 1);
        assert_eq!(directives[1].position, 2);
        assert_eq!(directives[1].sample_filename(), "2-1 Snare.wav");
    }

    #[test]
    fn test_generate_writes_named_files() {
        let temp = tempdir().unwrap();
        let directives = parse_script("Kick*\"boom\"\nSnare*\"tak\"\n");
        let synth = RecordingSynth::default();

        let written = generate(&directives, &synth, temp.path()).unwrap();
        assert_eq!(
            written,
            vec![temp.path().join("1-1 Kick.wav"), temp.path().join("2-1 Snare.wav")]
        );
        assert!(written.iter().all(|path| path.is_file()));
        assert!(synth.spoken.borrow().is_empty());
    }

    #[test]
    fn test_preview_writes_nothing() {
        let directives = parse_script("Kick*\"boom\"\nSnare*\"tak\"\n");
        let synth = RecordingSynth::default();

        preview(&directives, &synth).unwrap();
        assert_eq!(*synth.spoken.borrow(), vec!["boom", "tak"]);
        assert!(synth.rendered.borrow().is_empty());
    }

    #[test]
    fn test_command_line_shape() {
        let synth = CommandSynthesizer::new("espeak");
        let directive = SynthDirective::parse(r#"Voice*"hi there" -s 50"#, 1).unwrap();
        let mut command = synth.command(&directive);
        command.arg("-w").arg("out.wav");

        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["-s", "50", "hi there", "-w", "out.wav"]);
    }

    #[test]
    fn test_failing_command_reports_synthesis_error() {
        let synth = CommandSynthesizer::new("h2kit-no-such-synthesizer");
        let directive = SynthDirective::parse("Voice*\"hi\"", 1).unwrap();
        let err = synth.speak(&directive).unwrap_err();
        assert_eq!(err.error_code(), "SYNTHESIS_ERROR");
    }
}
