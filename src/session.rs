//! Kit building pipeline
//!
//! A `KitRequest` carries everything one run needs. Each stage returns new
//! data for the next: discover -> parse -> aggregate -> describe -> package.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::{MissingSamplePolicy, PackOptions, ParsePolicy};
use crate::error::{KitError, Result};
use crate::input::InputKind;
use crate::kit::{KitDescription, KitMetadata, KitSummary};
use crate::layers::InstrumentLayers;
use crate::package::{KitPackager, PackageReport};
use crate::sample::{discover_samples, SampleListing, SampleRecord};
use crate::synth::{self, Synthesizer};

/// One kit building run
#[derive(Debug, Clone)]
pub struct KitRequest {
    /// Sample directory or speech script
    pub input: PathBuf,
    pub metadata: KitMetadata,
    pub options: PackOptions,
    /// Speak a script instead of rendering and packaging it
    pub listen: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitOutcome {
    /// Script directives were spoken, nothing was written
    Previewed { directives: usize },
    /// A kit archive was produced
    Packaged(PackageReport),
}

/// Samples of a kit directory after parsing and policy checks
#[derive(Debug, Clone)]
pub struct CollectedSamples {
    pub listing: SampleListing,
    pub layers: InstrumentLayers,
}

impl CollectedSamples {
    /// Sample filenames in archive order
    pub fn files(&self) -> Vec<String> {
        self.layers.records().map(|r| r.filename.clone()).collect()
    }
}

/// Discover and parse the samples of `dir`, applying the parse and
/// missing-sample policies.
///
/// # Errors
/// * `NoSamplesFound` - no usable `.wav`/`.flac` file remains
/// * `ParseError` - a filename is malformed under `ParsePolicy::Strict`
/// * `MissingFile` - a sample vanished under `MissingSamplePolicy::Fail`
pub fn collect_samples(dir: &Path, options: &PackOptions) -> Result<CollectedSamples> {
    let listing = discover_samples(dir)?;
    if listing.is_empty() {
        return Err(KitError::NoSamplesFound {
            path: dir.to_path_buf(),
        });
    }

    let mut records = Vec::with_capacity(listing.len());
    for filename in &listing.files {
        let record = match SampleRecord::parse(filename) {
            Ok(record) => record,
            Err(e) if options.parse_policy == ParsePolicy::Lenient => {
                warn!("{} (skipping)", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let path = dir.join(filename);
        if !path.is_file() {
            match options.missing_samples {
                MissingSamplePolicy::Fail => return Err(KitError::MissingFile { path }),
                MissingSamplePolicy::Skip => {
                    warn!("{} disappeared (skipping)", path.display());
                    continue;
                }
            }
        }

        records.push(record);
    }

    if records.is_empty() {
        return Err(KitError::NoSamplesFound {
            path: dir.to_path_buf(),
        });
    }

    Ok(CollectedSamples {
        listing,
        layers: InstrumentLayers::aggregate(&records),
    })
}

/// Build and package the kit in `dir`
pub fn package_directory(
    dir: &Path,
    metadata: &KitMetadata,
    options: &PackOptions,
) -> Result<PackageReport> {
    metadata.validate()?;
    let samples = collect_samples(dir, options)?;

    KitSummary {
        metadata: metadata.clone(),
        path: dir.to_path_buf(),
        instruments: samples.layers.instrument_count(),
        wav_files: samples.listing.wav_count,
        flac_files: samples.listing.flac_count,
    }
    .log();

    let description = KitDescription::build(metadata, &samples.layers);
    KitPackager::new(dir, &metadata.name, options).package(&description, &samples.files())
}

impl KitRequest {
    pub fn new(input: impl Into<PathBuf>, metadata: KitMetadata) -> Self {
        Self {
            input: input.into(),
            metadata,
            options: PackOptions::default(),
            listen: false,
        }
    }

    pub fn with_options(mut self, options: PackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_listen(mut self, listen: bool) -> Self {
        self.listen = listen;
        self
    }

    /// Run the request. `synth` is only used for script input.
    pub fn run(&self, synth: &dyn Synthesizer) -> Result<KitOutcome> {
        let kind = InputKind::classify(&self.input)?;
        self.run_on(&kind, synth)
    }

    /// Run the request on an already classified input
    pub fn run_on(&self, kind: &InputKind, synth: &dyn Synthesizer) -> Result<KitOutcome> {
        let dir = kind.kit_dir();

        if let InputKind::Script(script) = kind {
            info!("create speech samples from {}", script.display());
            let directives = synth::read_script(script)?;

            if self.listen {
                synth::preview(&directives, synth)?;
                return Ok(KitOutcome::Previewed {
                    directives: directives.len(),
                });
            }
            synth::generate(&directives, synth, &dir)?;
        } else if self.listen {
            warn!("--listen only applies to script input, packaging {}", dir.display());
        }

        package_directory(&dir, &self.metadata, &self.options).map(KitOutcome::Packaged)
    }
}
