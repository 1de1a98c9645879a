//! Storage configuration and path management for the pet widget.
//!
//! Every file the widget reads or writes is named here, so hosts and tests can
//! relocate the whole data directory with a single root.
//!
//! ```text
//! ~/.pet-widget/
//! ├── baseline.json   # offline decay anchor (FileBaselineStore)
//! ├── live.json       # last snapshot pushed by the game (FileLiveStore)
//! ├── config.toml     # decay intervals and stat bounds (optional)
//! └── logs/           # CLI host logs
//! ```

use std::path::{Path, PathBuf};

use crate::error::{PetError, Result};

const ROOT_DIR_NAME: &str = ".pet-widget";

/// Central configuration for all widget storage paths.
///
/// Production code uses [`StorageConfig::from_home`], which points to `~/.pet-widget/`.
/// Tests use [`StorageConfig::with_root`] for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the default root under the user's home directory.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(PetError::HomeDirNotFound)?;
        Ok(Self {
            root: home.join(ROOT_DIR_NAME),
        })
    }

    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to baseline.json (offline decay anchor).
    pub fn baseline_file(&self) -> PathBuf {
        self.root.join("baseline.json")
    }

    /// Path to live.json (last live snapshot from the game).
    pub fn live_file(&self) -> PathBuf {
        self.root.join("live.json")
    }

    /// Path to config.toml (decay intervals and bounds).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to logs/ directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Creates the root directory if it doesn't exist.
    pub fn ensure_root(&self) -> Result<()> {
        fs_err::create_dir_all(&self.root)
            .map_err(|e| PetError::io(format!("create {}", self.root.display()), e))
    }
}
