//! Packaging configuration
//!
//! Options controlling how strict packaging is, plus an optional JSON kit
//! file that supplies metadata and options without interactive prompts:
//!
//! ```json
//! {
//!   "metadata": { "name": "Voices", "author": "me" },
//!   "options": { "parse_policy": "strict", "missing_samples": "skip" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KitError, Result};

/// Default name of the description document inside the kit
pub const DEFAULT_DESCRIPTION_FILE: &str = "drumkit.xml";

/// Default extension of the finished kit archive
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "h2drumkit";

/// Default speech synthesizer program
pub const DEFAULT_SYNTHESIZER: &str = "espeak";

/// What to do with a sample filename that does not follow the naming scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Warn and leave the file out of the kit
    #[default]
    Lenient,
    /// Abort the run
    Strict,
}

/// What to do with a sample that is listed but no longer on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSamplePolicy {
    /// Abort with `MissingFile`
    #[default]
    Fail,
    /// Warn and leave the sample out of the kit
    Skip,
}

/// Options for one packaging run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackOptions {
    pub parse_policy: ParsePolicy,
    pub missing_samples: MissingSamplePolicy,
    pub description_file: String,
    pub archive_extension: String,
    pub synthesizer: String,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            parse_policy: ParsePolicy::default(),
            missing_samples: MissingSamplePolicy::default(),
            description_file: DEFAULT_DESCRIPTION_FILE.to_string(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            synthesizer: DEFAULT_SYNTHESIZER.to_string(),
        }
    }
}

/// Metadata fields as they appear in a kit file; absent fields stay `None`
/// so prompts or defaults can fill them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataOverrides {
    pub name: Option<String>,
    pub author: Option<String>,
    pub info: Option<String>,
    pub license: Option<String>,
}

impl MetadataOverrides {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: MetadataOverrides) -> Self {
        Self {
            name: self.name.or(fallback.name),
            author: self.author.or(fallback.author),
            info: self.info.or(fallback.info),
            license: self.license.or(fallback.license),
        }
    }

    /// True when every field is set
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.author.is_some() && self.info.is_some() && self.license.is_some()
    }
}

/// Contents of a `--config` kit file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KitConfig {
    pub metadata: MetadataOverrides,
    pub options: PackOptions,
}

impl KitConfig {
    /// Load a kit file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KitError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| KitError::io(path, e))?;
        let config: KitConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
