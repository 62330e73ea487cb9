//! Kit packaging
//!
//! Writes the description document next to the samples and bundles it with
//! every sample into a gzip-compressed tar archive:
//!
//! ```text
//! <kit name>/drumkit.xml
//! <kit name>/1-1 Kick.wav
//! <kit name>/...
//! ```
//!
//! The archive is built as `<kit name>.tar` in the source directory and
//! renamed to `<kit name>.h2drumkit` once complete. A failed run leaves no
//! partial archive behind.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::config::PackOptions;
use crate::error::{KitError, Result};
use crate::kit::KitDescription;

/// Result of a successful packaging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// The finished `.h2drumkit` file
    pub artifact: PathBuf,
    /// Instrument blocks in the description, placeholders included
    pub instruments: usize,
    /// Sample files in the archive
    pub samples: usize,
    /// SHA-256 of the artifact, lowercase hex
    pub checksum: String,
}

/// Removes the in-progress archive unless the run completes.
struct PartialArchive {
    path: PathBuf,
    armed: bool,
}

impl PartialArchive {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialArchive {
    fn drop(&mut self) {
        if self.armed && self.path.exists() {
            debug!("removing partial archive {}", self.path.display());
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Packages one kit directory
pub struct KitPackager<'a> {
    source_dir: PathBuf,
    kit_name: String,
    options: &'a PackOptions,
}

impl<'a> KitPackager<'a> {
    pub fn new(source_dir: &Path, kit_name: &str, options: &'a PackOptions) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            kit_name: kit_name.to_string(),
            options,
        }
    }

    /// Path of the description document in the source directory
    pub fn description_path(&self) -> PathBuf {
        self.source_dir.join(&self.options.description_file)
    }

    /// Path of the finished kit
    pub fn artifact_path(&self) -> PathBuf {
        self.source_dir
            .join(format!("{}.{}", self.kit_name, self.options.archive_extension))
    }

    fn tar_path(&self) -> PathBuf {
        self.source_dir.join(format!("{}.tar", self.kit_name))
    }

    fn entry_name(&self, filename: &str) -> String {
        format!("{}/{}", self.kit_name, filename)
    }

    /// Serialize `description` into the source directory.
    ///
    /// # Errors
    /// * `Io` - the directory is not writable
    /// * `MissingFile` - the document is not on disk after writing
    pub fn write_description(&self, description: &KitDescription) -> Result<PathBuf> {
        let path = self.description_path();
        let xml = description.to_xml()?;

        fs::write(&path, xml).map_err(|e| KitError::io(&path, e))?;
        if !path.is_file() {
            return Err(KitError::MissingFile { path });
        }

        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Write the description and archive it with `samples`.
    ///
    /// `samples` are filenames relative to the source directory. Every one
    /// must exist at archive time.
    pub fn package(&self, description: &KitDescription, samples: &[String]) -> Result<PackageReport> {
        let description_path = self.write_description(description)?;

        let tar_path = self.tar_path();
        let mut guard = PartialArchive::new(tar_path.clone());

        let file = File::create(&tar_path).map_err(|e| KitError::io(&tar_path, e))?;
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        self.append(&mut builder, &description_path, &self.options.description_file)?;
        for sample in samples {
            self.append(&mut builder, &self.source_dir.join(sample), sample)?;
        }

        builder
            .into_inner()
            .and_then(GzEncoder::finish)
            .and_then(|file| file.sync_all())
            .map_err(|e| KitError::io(&tar_path, e))?;

        let artifact = self.artifact_path();
        fs::rename(&tar_path, &artifact).map_err(|e| KitError::io(&artifact, e))?;
        guard.disarm();

        let checksum = checksum(&artifact)?;
        info!("Your Hydrogen drumkit file is available at {}", artifact.display());

        Ok(PackageReport {
            artifact,
            instruments: description.instruments().len(),
            samples: samples.len(),
            checksum,
        })
    }

    fn append(
        &self,
        builder: &mut tar::Builder<GzEncoder<File>>,
        path: &Path,
        filename: &str,
    ) -> Result<()> {
        if !path.is_file() {
            return Err(KitError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        debug!("adding {} to archive", filename);
        builder
            .append_path_with_name(path, self.entry_name(filename))
            .map_err(|e| KitError::io(path, e))
    }
}

/// SHA-256 of a file as lowercase hex
pub fn checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| KitError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| KitError::io(path, e))?;

    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect())
}
