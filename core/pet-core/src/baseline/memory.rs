use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::BaselineStore;
use crate::error::{PetError, Result};
use crate::types::{BaselineSnapshot, PetState};

/// In-process baseline slot. Nothing survives the process.
#[derive(Default)]
pub struct MemoryBaselineStore {
    slot: Mutex<Option<BaselineSnapshot>>,
}

impl MemoryBaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with an arbitrary snapshot, bypassing `save`'s anchoring.
    pub fn with_snapshot(snapshot: BaselineSnapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<BaselineSnapshot>>> {
        self.slot
            .lock()
            .map_err(|_| PetError::StorePoisoned("baseline"))
    }
}

impl BaselineStore for MemoryBaselineStore {
    fn save(&self, state: &PetState, at: DateTime<Utc>) -> Result<()> {
        *self.slot()? = Some(BaselineSnapshot::anchored(state, at));
        Ok(())
    }

    fn load(&self) -> Result<Option<BaselineSnapshot>> {
        Ok(self.slot()?.clone())
    }

    fn update_recomputation_instant(&self, at: DateTime<Utc>) -> Result<()> {
        if let Some(snapshot) = self.slot()?.as_mut() {
            snapshot.recomputed_at = at;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_empty_store_has_no_baseline() {
        assert!(MemoryBaselineStore::new().load().unwrap().is_none());
    }

    #[test]
    fn test_save_update_clear() {
        let store = MemoryBaselineStore::new();
        let state = PetState {
            pet_id: "p".to_string(),
            energy: 12,
            ..PetState::fallback(at(1))
        };

        store.save(&state, at(100)).unwrap();
        store.update_recomputation_instant(at(250)).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.base_energy, 12);
        assert_eq!(loaded.captured_at, at(100));
        assert_eq!(loaded.recomputed_at, at(250));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_update_without_baseline_stays_empty() {
        let store = MemoryBaselineStore::new();
        store.update_recomputation_instant(at(5)).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
