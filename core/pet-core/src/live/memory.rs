use std::sync::Mutex;

use super::LiveSnapshotStore;
use crate::error::{PetError, Result};
use crate::types::PetState;

/// In-process live snapshot slot.
#[derive(Default)]
pub struct MemoryLiveStore {
    slot: Mutex<Option<PetState>>,
}

impl MemoryLiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(state: PetState) -> Self {
        Self {
            slot: Mutex::new(Some(state)),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<PetState>>> {
        self.slot.lock().map_err(|_| PetError::StorePoisoned("live"))
    }
}

impl LiveSnapshotStore for MemoryLiveStore {
    fn get(&self) -> Result<Option<PetState>> {
        Ok(self.slot()?.clone())
    }

    fn put(&self, state: &PetState) -> Result<()> {
        *self.slot()? = Some(state.clone());
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
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_read_your_last_write() {
        let store = MemoryLiveStore::new();
        assert!(store.get().unwrap().is_none());

        let first = PetState::fallback(Utc.timestamp_opt(10, 0).unwrap());
        let second = PetState {
            energy: 1,
            ..first.clone()
        };
        store.put(&first).unwrap();
        store.put(&second).unwrap();
        assert_eq!(store.get().unwrap(), Some(second));

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}
