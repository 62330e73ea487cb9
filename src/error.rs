//! Error handling for h2kit
//!
//! Every failure carries the path or filename it concerns, a stable error
//! code and a recovery hint for the final status line.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for h2kit operations
pub type Result<T> = std::result::Result<T, KitError>;

/// Main error type for h2kit operations
#[derive(Error, Debug)]
pub enum KitError {
    // Input Errors
    #[error("The path you entered ({path}) does not exist")]
    InputNotFound { path: PathBuf },

    #[error("ABORTING: no sample files (.wav or .flac) found in {path}")]
    NoSamplesFound { path: PathBuf },

    #[error("Cannot parse sample filename '{filename}': {reason}")]
    ParseError { filename: String, reason: String },

    // File Errors
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} not found", path.display())]
    MissingFile { path: PathBuf },

    // Kit Errors
    #[error("Invalid kit name '{name}': it is used as a folder and file name")]
    InvalidKitName { name: String },

    #[error("Could not serialize kit description: {reason}")]
    Serialization { reason: String },

    // Synthesis Errors
    #[error("Speech synthesis failed ({command}): {reason}")]
    Synthesis { command: String, reason: String },

    // Configuration Errors
    #[error("Invalid kit configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl KitError {
    /// Shorthand for wrapping an `io::Error` with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KitError::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            KitError::InputNotFound { .. } => "INPUT_NOT_FOUND",
            KitError::NoSamplesFound { .. } => "NO_SAMPLES_FOUND",
            KitError::ParseError { .. } => "PARSE_ERROR",
            KitError::Io { .. } => "IO_FAILURE",
            KitError::MissingFile { .. } => "MISSING_FILE",
            KitError::InvalidKitName { .. } => "INVALID_KIT_NAME",
            KitError::Serialization { .. } => "SERIALIZATION_ERROR",
            KitError::Synthesis { .. } => "SYNTHESIS_ERROR",
            KitError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            KitError::InputNotFound { .. } => "Check the path passed with -i/--input",
            KitError::NoSamplesFound { .. } => {
                "Place .wav or .flac files named like '1-1 Kick.wav' in the directory"
            }
            KitError::ParseError { .. } => {
                "Rename the file to '<id>-<layer> <name>.<ext>', e.g. '2-1 Snare.wav'"
            }
            KitError::Io { .. } => "Check that the directory is writable and has free space",
            KitError::MissingFile { .. } => {
                "A sample disappeared while packaging; restore it or use --skip-missing"
            }
            KitError::InvalidKitName { .. } => "Choose a kit name without '/', '\\' or '..'",
            KitError::Synthesis { .. } => {
                "Check that espeak is installed and the script line flags are valid"
            }
            _ => "Check the error details and try again",
        }
    }
}
