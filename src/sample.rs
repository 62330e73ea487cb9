//! Sample discovery and filename parsing
//!
//! Sample files follow the naming scheme `<id>-<layer> <name>.<ext>`:
//! - `id`: the instrument position in the kit (1-based)
//! - `layer`: the velocity layer, lower numbers play at lower velocity
//! - `name`: the display name of the instrument
//!
//! e.g. `2-1 Snare.wav` is the softest layer of instrument 2, "Snare".

use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{KitError, Result};

/// Audio container recognised as a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFormat {
    Wav,
    Flac,
}

impl SampleFormat {
    /// Detect the format from the final extension of a filename (case-insensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        if ext.eq_ignore_ascii_case("wav") {
            Some(SampleFormat::Wav)
        } else if ext.eq_ignore_ascii_case("flac") {
            Some(SampleFormat::Flac)
        } else {
            None
        }
    }
}

/// One parsed sample filename. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Filename relative to the kit source directory
    pub filename: String,
    /// Instrument position in the kit (>= 1)
    pub instrument_id: u32,
    /// Velocity layer (0 = lowest velocity)
    pub layer_id: u32,
    /// Instrument display name, may be empty
    pub display_name: String,
    /// Everything after the first `.` of the filename
    pub extension: String,
}

impl SampleRecord {
    /// Parse a filename of the form `<id>-<layer> <name>.<ext>`
    ///
    /// # Errors
    /// `ParseError` if the extension, the id or the layer is missing, or
    /// if id/layer are not unsigned integers. Instrument id 0 is rejected
    /// because kit positions start at 1.
    pub fn parse(filename: &str) -> Result<Self> {
        let fail = |reason: &str| KitError::ParseError {
            filename: filename.to_string(),
            reason: reason.to_string(),
        };

        let (stem, extension) = filename
            .split_once('.')
            .ok_or_else(|| fail("no file extension"))?;

        let (reference, display_name) = match stem.split_once(' ') {
            Some((reference, name)) => (reference, name.trim()),
            None => (stem, ""),
        };

        let (id, layer) = reference
            .split_once('-')
            .ok_or_else(|| fail("expected '<id>-<layer>' before the name"))?;

        if id.is_empty() {
            return Err(fail("no instrument id supplied"));
        }
        if layer.is_empty() {
            return Err(fail("no instrument layer supplied"));
        }

        let instrument_id: u32 = id
            .parse()
            .map_err(|_| fail(&format!("instrument id '{}' is not a number", id)))?;
        let layer_id: u32 = layer
            .parse()
            .map_err(|_| fail(&format!("layer '{}' is not a number", layer)))?;

        if instrument_id == 0 {
            return Err(fail("instrument ids start at 1"));
        }

        Ok(Self {
            filename: filename.to_string(),
            instrument_id,
            layer_id,
            display_name: display_name.to_string(),
            extension: extension.to_string(),
        })
    }
}

impl fmt::Display for SampleRecord {
    /// Rebuilds the canonical filename
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.instrument_id, self.layer_id)?;
        if !self.display_name.is_empty() {
            write!(f, " {}", self.display_name)?;
        }
        write!(f, ".{}", self.extension)
    }
}

/// Sample files found in a kit directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleListing {
    /// Sample filenames, sorted
    pub files: Vec<String>,
    pub wav_count: usize,
    pub flac_count: usize,
}

impl SampleListing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// List the `.wav` and `.flac` files directly inside `dir`.
///
/// Subdirectories are not descended into. Symlinks are listed without
/// being resolved, unless they point at a directory, so a dangling link
/// reaches the missing-sample policy instead of vanishing here.
pub fn discover_samples(dir: &Path) -> Result<SampleListing> {
    let mut listing = SampleListing::default();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            KitError::io(path, source)
        })?;

        let file_type = entry.file_type();
        if !(file_type.is_file() || file_type.is_symlink()) || entry.path().is_dir() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().to_string();
        debug!("filename : {}", filename);

        match SampleFormat::from_filename(&filename) {
            Some(SampleFormat::Wav) => listing.wav_count += 1,
            Some(SampleFormat::Flac) => listing.flac_count += 1,
            None => continue,
        }
        listing.files.push(filename);
    }

    listing.files.sort();
    Ok(listing)
}
