//! CLI Command Implementations
//!
//! Glue between the command line, the interactive prompts and the kit
//! pipeline.

use std::io;

use anyhow::Context;
use log::{debug, info};

use crate::cli::Cli;
use crate::config::KitConfig;
use crate::input::InputKind;
use crate::kit::KitMetadata;
use crate::prompt::prompt_metadata;
use crate::session::{KitOutcome, KitRequest};
use crate::synth::CommandSynthesizer;

/// Build the kit described by the command line.
pub fn build_kit(cli: &Cli) -> anyhow::Result<KitOutcome> {
    debug!("input = {}", cli.input.display());

    let config = match &cli.config {
        Some(path) => KitConfig::load(path)?,
        None => KitConfig::default(),
    };
    let options = cli.apply_options(config.options);
    let kind = InputKind::classify(&cli.input)?;

    let metadata = if kind.packages(cli.listen) {
        let known = cli.metadata_overrides().or(config.metadata);
        let stdin = io::stdin();
        prompt_metadata(known, &mut stdin.lock(), &mut io::stdout())
            .context("Could not read the drumkit info")?
    } else {
        KitMetadata::default()
    };

    let synth = match &kind {
        InputKind::Script(_) => CommandSynthesizer::locate(&options.synthesizer)?,
        InputKind::SampleDirectory(_) => CommandSynthesizer::new(&options.synthesizer),
    };

    let request = KitRequest::new(&cli.input, metadata)
        .with_options(options)
        .with_listen(cli.listen);
    let outcome = request.run_on(&kind, &synth)?;

    if let KitOutcome::Packaged(report) = &outcome {
        info!(
            "{} instruments, {} samples, sha256 {}",
            report.instruments, report.samples, report.checksum
        );
    }
    Ok(outcome)
}

/// Final human-readable status line
pub fn status_line(outcome: &KitOutcome) -> String {
    match outcome {
        KitOutcome::Previewed { .. } => "OK".to_string(),
        KitOutcome::Packaged(report) => format!(
            "Your Hydrogen drumkit file is available at {}",
            report.artifact.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageReport;
    use std::path::PathBuf;

    #[test]
    fn test_status_lines() {
        assert_eq!(status_line(&KitOutcome::Previewed { directives: 3 }), "OK");

        let report = PackageReport {
            artifact: PathBuf::from("/kits/Voices.h2drumkit"),
            instruments: 2,
            samples: 2,
            checksum: String::new(),
        };
        assert_eq!(
            status_line(&KitOutcome::Packaged(report)),
            "Your Hydrogen drumkit file is available at /kits/Voices.h2drumkit"
        );
    }
}
