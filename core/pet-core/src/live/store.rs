//! File-backed live snapshot store.
//!
//! The file holds one [`PetState`] in the game's JSON shape. Corrupt or empty
//! files read as "no snapshot"; only I/O failures are errors.

use std::path::{Path, PathBuf};

use super::LiveSnapshotStore;
use crate::error::{PetError, Result};
use crate::persist::{read_optional, remove_if_exists, write_atomic};
use crate::types::PetState;

pub struct FileLiveStore {
    file_path: PathBuf,
}

impl FileLiveStore {
    pub fn new(file_path: &Path) -> Self {
        FileLiveStore {
            file_path: file_path.to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl LiveSnapshotStore for FileLiveStore {
    fn get(&self) -> Result<Option<PetState>> {
        let content = match read_optional(&self.file_path)? {
            Some(content) if !content.trim().is_empty() => content,
            _ => return Ok(None),
        };

        match serde_json::from_str::<PetState>(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(
                    path = %self.file_path.display(),
                    error = %e,
                    "Failed to parse live snapshot, treating as absent"
                );
                Ok(None)
            }
        }
    }

    fn put(&self, state: &PetState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| PetError::json("serialize live snapshot", e))?;
        write_atomic(&self.file_path, &content)
    }

    fn clear(&self) -> Result<()> {
        remove_if_exists(&self.file_path)
    }
}
