//! h2kit - Hydrogen drumkit builder
//!
//! Turns a directory of samples, or a script of lines for a speech
//! synthesizer, into an `.h2drumkit` archive Hydrogen can import.
//!
//! # Pipeline
//!
//! - `input`: decide between a sample directory and a script
//! - `synth`: render script lines to `<n>-1 <name>.wav` samples
//! - `sample`: parse `<id>-<layer> <name>.<ext>` filenames
//! - `layers`: group samples per instrument, ordered by layer
//! - `kit`: build the `drumkit.xml` description with velocity ranges
//! - `package`: archive the description and samples

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod kit;
pub mod layers;
pub mod package;
pub mod prompt;
pub mod sample;
pub mod session;
pub mod synth;

// Re-export commonly used types
pub use config::{KitConfig, MissingSamplePolicy, PackOptions, ParsePolicy};
pub use error::{KitError, Result};
pub use input::InputKind;
pub use kit::{KitDescription, KitMetadata};
pub use layers::{InstrumentLayerCount, InstrumentLayers};
pub use package::{KitPackager, PackageReport};
pub use sample::SampleRecord;
pub use session::{KitOutcome, KitRequest};
pub use synth::{CommandSynthesizer, SynthDirective, Synthesizer};
