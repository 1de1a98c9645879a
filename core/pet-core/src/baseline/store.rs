//! File-backed baseline store.
//!
//! # File Format
//!
//! Keys match the widget's original key-value layout so older records keep
//! loading. Instants are epoch milliseconds.
//!
//! ```json
//! {
//!   "offline_pet_id": "pet-1",
//!   "offline_pet_name": "Mochi",
//!   "offline_prefab_name": "Pet_CatGrey",
//!   "offline_base_energy": 87,
//!   "offline_base_satiety": 64,
//!   "offline_base_is_bored": false,
//!   "offline_base_timestamp": 1758510136000,
//!   "offline_last_calculation_time": 1758513736000
//! }
//! ```
//!
//! # Defensive Design
//!
//! - Empty file, corrupt JSON, or a record missing any of the three mandatory
//!   keys loads as "no baseline" with a warning.
//! - Unreadable or unwritable files are storage failures and return errors.
//! - Read-modify-write (`update_recomputation_instant`) is serialized by an
//!   in-process mutex. Across processes the last writer wins.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BaselineStore;
use crate::error::{PetError, Result};
use crate::persist::{read_optional, remove_if_exists, write_atomic};
use crate::timestamp;
use crate::types::{BaselineSnapshot, PetState, DEFAULT_PET_NAME, DEFAULT_PREFAB_NAME};

/// The on-disk record. Every key is optional so partial records can be
/// detected instead of failing the parse.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BaselineRecord {
    #[serde(rename = "offline_pet_id", default, skip_serializing_if = "Option::is_none")]
    pet_id: Option<String>,
    #[serde(rename = "offline_pet_name", default, skip_serializing_if = "Option::is_none")]
    pet_name: Option<String>,
    #[serde(rename = "offline_prefab_name", default, skip_serializing_if = "Option::is_none")]
    prefab_name: Option<String>,
    #[serde(rename = "offline_base_energy", default, skip_serializing_if = "Option::is_none")]
    base_energy: Option<i32>,
    #[serde(rename = "offline_base_satiety", default, skip_serializing_if = "Option::is_none")]
    base_satiety: Option<i32>,
    #[serde(rename = "offline_base_is_bored", default, skip_serializing_if = "Option::is_none")]
    base_is_bored: Option<bool>,
    #[serde(
        rename = "offline_base_timestamp",
        default,
        with = "timestamp::millis_opt",
        skip_serializing_if = "Option::is_none"
    )]
    captured_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "offline_last_calculation_time",
        default,
        with = "timestamp::millis_opt",
        skip_serializing_if = "Option::is_none"
    )]
    recomputed_at: Option<DateTime<Utc>>,
}

impl BaselineRecord {
    fn from_snapshot(snapshot: &BaselineSnapshot) -> Self {
        BaselineRecord {
            pet_id: Some(snapshot.pet_id.clone()),
            pet_name: Some(snapshot.pet_name.clone()),
            prefab_name: Some(snapshot.prefab_name.clone()),
            base_energy: Some(snapshot.base_energy),
            base_satiety: Some(snapshot.base_satiety),
            base_is_bored: Some(snapshot.base_is_bored),
            captured_at: Some(snapshot.captured_at),
            recomputed_at: Some(snapshot.recomputed_at),
        }
    }

    /// Builds a snapshot when all mandatory keys are present.
    fn into_snapshot(self) -> Option<BaselineSnapshot> {
        let (captured_at, base_energy, base_satiety) =
            match (self.captured_at, self.base_energy, self.base_satiety) {
                (Some(captured_at), Some(energy), Some(satiety)) => (captured_at, energy, satiety),
                _ => return None,
            };

        Some(BaselineSnapshot {
            pet_id: self.pet_id.unwrap_or_default(),
            pet_name: self.pet_name.unwrap_or_else(|| DEFAULT_PET_NAME.to_string()),
            prefab_name: self
                .prefab_name
                .unwrap_or_else(|| DEFAULT_PREFAB_NAME.to_string()),
            base_energy,
            base_satiety,
            base_is_bored: self.base_is_bored.unwrap_or(false),
            captured_at,
            recomputed_at: self.recomputed_at.unwrap_or(captured_at),
        })
    }
}

pub struct FileBaselineStore {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBaselineStore {
    pub fn new(file_path: &Path) -> Self {
        FileBaselineStore {
            file_path: file_path.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_snapshot(&self) -> Result<Option<BaselineSnapshot>> {
        let content = match read_optional(&self.file_path)? {
            Some(content) => content,
            None => return Ok(None),
        };

        if content.trim().is_empty() {
            tracing::warn!(
                path = %self.file_path.display(),
                "Empty baseline file, treating as absent"
            );
            return Ok(None);
        }

        let record = match serde_json::from_str::<BaselineRecord>(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    path = %self.file_path.display(),
                    error = %e,
                    "Failed to parse baseline file, treating as absent"
                );
                return Ok(None);
            }
        };

        let snapshot = record.into_snapshot();
        if snapshot.is_none() {
            tracing::warn!(
                path = %self.file_path.display(),
                "Partial baseline record, treating as absent"
            );
        }
        Ok(snapshot)
    }

    fn write_snapshot(&self, snapshot: &BaselineSnapshot) -> Result<()> {
        let content = serde_json::to_string_pretty(&BaselineRecord::from_snapshot(snapshot))
            .map_err(|e| PetError::json("serialize baseline", e))?;
        write_atomic(&self.file_path, &content)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| PetError::StorePoisoned("baseline"))
    }
}

impl BaselineStore for FileBaselineStore {
    fn save(&self, state: &PetState, at: DateTime<Utc>) -> Result<()> {
        let _guard = self.lock()?;
        let snapshot = BaselineSnapshot::anchored(state, at);
        self.write_snapshot(&snapshot)?;
        tracing::debug!(
            pet_id = %snapshot.pet_id,
            base_energy = snapshot.base_energy,
            base_satiety = snapshot.base_satiety,
            base_is_bored = snapshot.base_is_bored,
            captured_at = %snapshot.captured_at,
            "Baseline re-anchored"
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<BaselineSnapshot>> {
        self.read_snapshot()
    }

    fn update_recomputation_instant(&self, at: DateTime<Utc>) -> Result<()> {
        let _guard = self.lock()?;
        match self.read_snapshot()? {
            Some(mut snapshot) => {
                snapshot.recomputed_at = at;
                self.write_snapshot(&snapshot)
            }
            None => {
                tracing::debug!("No baseline to update recomputation instant on");
                Ok(())
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock()?;
        remove_if_exists(&self.file_path)
    }
}
