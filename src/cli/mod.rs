//! CLI Module
//!
//! Command-line interface for building Hydrogen drumkits.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

use crate::config::{MetadataOverrides, MissingSamplePolicy, PackOptions, ParsePolicy};

const AFTER_HELP: &str = "\
Sample directory input:
  Sample files (.wav, .flac) must be named '<id>-<layer> <name>.<ext>':
    id    the instrument position in the kit
    layer the velocity layer (lowest number = lowest velocity)
    name  the instrument name
  e.g. '1-1 Kick.wav', '1-2 Kick.wav', '2-1 Snare.wav'

Script input:
  Each line reads 'name * \"text for espeak\" [espeak options]',
  e.g. 'Voice 2*\"hello you, how are you doing?\" -s 50 -p 30'

The kit is written next to the input as '<kit name>.h2drumkit' and can be
imported in Hydrogen via Instrument > Import library > Local File.";

/// Create a Hydrogen drumkit from samples or a speech script
#[derive(Parser, Debug)]
#[command(name = "h2kit")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Cli {
    /// Directory of samples, or a text file of lines for the speech synthesizer
    #[arg(short, long)]
    pub input: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Speak the script lines without generating any files
    #[arg(short, long)]
    pub listen: bool,

    /// Abort on sample filenames that do not follow the naming scheme
    #[arg(long)]
    pub strict: bool,

    /// Leave out samples that disappear before packaging instead of aborting
    #[arg(long)]
    pub skip_missing: bool,

    /// JSON kit file with metadata and options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Kit name
    #[arg(long)]
    pub name: Option<String>,

    /// Kit author
    #[arg(long)]
    pub author: Option<String>,

    /// Extra kit info
    #[arg(long)]
    pub info: Option<String>,

    /// Kit license
    #[arg(long)]
    pub license: Option<String>,

    /// Speech synthesizer program
    #[arg(long)]
    pub synth: Option<String>,
}

impl Cli {
    /// Metadata given on the command line
    pub fn metadata_overrides(&self) -> MetadataOverrides {
        MetadataOverrides {
            name: self.name.clone(),
            author: self.author.clone(),
            info: self.info.clone(),
            license: self.license.clone(),
        }
    }

    /// Apply flags on top of options loaded from a kit file
    pub fn apply_options(&self, mut options: PackOptions) -> PackOptions {
        if self.strict {
            options.parse_policy = ParsePolicy::Strict;
        }
        if self.skip_missing {
            options.missing_samples = MissingSamplePolicy::Skip;
        }
        if let Some(synth) = &self.synth {
            options.synthesizer = synth.clone();
        }
        options
    }
}
