//! Small file helpers shared by the file-backed stores.
//!
//! Writes go through a temp file in the same directory followed by a rename,
//! so a concurrent reader sees either the old record or the new one, never a
//! partial write.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{PetError, Result};

/// Reads a file, returning `None` when it doesn't exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs_err::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PetError::io(format!("read {}", path.display()), e)),
    }
}

/// Atomically replaces `path` with `content`, creating the parent directory if needed.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs_err::create_dir_all(parent_dir)
        .map_err(|e| PetError::io(format!("create {}", parent_dir.display()), e))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| PetError::io(format!("temp file in {}", parent_dir.display()), e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| PetError::io("write temp file", e))?;
    temp_file
        .flush()
        .map_err(|e| PetError::io("flush temp file", e))?;
    temp_file
        .persist(path)
        .map_err(|e| PetError::io(format!("persist {}", path.display()), e.error))?;

    Ok(())
}

/// Deletes a file. A file that is already gone is not an error.
pub(crate) fn remove_if_exists(path: &Path) -> Result<()> {
    match fs_err::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PetError::io(format!("remove {}", path.display()), e)),
    }
}
