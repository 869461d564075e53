//! Per-resource working directory
//!
//! Holds the synthesized `main.tf.json` and the `terraform.tfstate` the engine
//! writes next to it.

use std::path::{Path, PathBuf};

use tfbridge_core::document::{CONFIG_FILE, ConfigDocument};

use crate::error::{StateError, StateResult};
use crate::state::TfState;

/// Handle on a resource's working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    /// State file name written by the engine's local backend
    pub const STATE_FILE: &'static str = "terraform.tfstate";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(Self::STATE_FILE)
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Create the directory and its parents if missing
    pub fn ensure(&self) -> StateResult<()> {
        if self.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.root).map_err(|e| {
            StateError::io(
                format!("error creating directory {}", self.root.display()),
                e,
            )
        })
    }

    /// Write the configuration document as `main.tf.json`
    pub fn write_config(&self, document: &ConfigDocument) -> StateResult<()> {
        let content = document
            .to_pretty_json()
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        std::fs::write(self.config_path(), content)
            .map_err(|e| StateError::io("error writing JSON file", e))
    }

    /// Read and parse `terraform.tfstate`
    pub fn read_state(&self) -> StateResult<TfState> {
        let path = self.state_path();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StateError::io(format!("failed to read {}", path.display()), e))?;

        serde_json::from_str(&content)
            .map_err(|e| StateError::InvalidState(format!("Failed to parse state file: {}", e)))
    }

    /// Remove the directory and everything in it
    ///
    /// A directory that is already gone is not an error.
    pub fn remove(&self) -> StateResult<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::io(
                format!("failed to remove {}", self.root.display()),
                e,
            )),
        }
    }
}
