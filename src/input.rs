//! Input classification

use std::path::{Path, PathBuf};

use log::info;

use crate::error::{KitError, Result};

/// What the user pointed the tool at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A directory of `<id>-<layer> <name>.<ext>` samples
    SampleDirectory(PathBuf),
    /// A speech-synthesis script
    Script(PathBuf),
}

impl InputKind {
    /// Decide how to treat `path`: files are scripts, directories hold samples.
    pub fn classify(path: &Path) -> Result<Self> {
        if path.is_file() {
            info!("input is a file > assuming this is a speech script");
            Ok(InputKind::Script(path.to_path_buf()))
        } else if path.is_dir() {
            info!("input is path > assuming this dir contains audio files");
            Ok(InputKind::SampleDirectory(path.to_path_buf()))
        } else {
            Err(KitError::InputNotFound {
                path: path.to_path_buf(),
            })
        }
    }

    /// Directory the kit is built in
    pub fn kit_dir(&self) -> PathBuf {
        match self {
            InputKind::SampleDirectory(dir) => dir.clone(),
            InputKind::Script(script) => match script.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }

    /// Whether a run on this input ends with a packaged kit.
    ///
    /// Only a script in preview mode stops early.
    pub fn packages(&self, listen: bool) -> bool {
        !(listen && matches!(self, InputKind::Script(_)))
    }
}
