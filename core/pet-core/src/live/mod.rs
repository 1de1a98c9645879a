//! Live snapshots pushed by the running game.
//!
//! The game is the only writer of live data. The widget reads the last pushed
//! snapshot back when it refreshes, possibly long after the game has exited.
//!
//! # Module Structure
//!
//! - [`store`]: JSON file implementation (`~/.pet-widget/live.json`)
//! - [`memory`]: in-process implementation for tests and embedding hosts
//! - [`payload`]: decoding of the game's push payloads

mod memory;
mod payload;
mod store;

pub use memory::MemoryLiveStore;
pub use payload::{parse_live_payload, WidgetPayload};
pub use store::FileLiveStore;

use crate::error::Result;
use crate::types::PetState;

/// Storage for the most recent live snapshot.
///
/// `get` must observe the last `put` made in the same process. Snapshots are
/// returned as stored; validation is the caller's job.
pub trait LiveSnapshotStore: Send + Sync {
    fn get(&self) -> Result<Option<PetState>>;

    fn put(&self, state: &PetState) -> Result<()>;

    /// Removes the stored snapshot (full data reset).
    fn clear(&self) -> Result<()>;
}
