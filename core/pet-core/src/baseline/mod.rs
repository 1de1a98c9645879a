//! Baseline persistence: the single durable anchor for offline decay.
//!
//! One slot per installation (not per pet). The slot holds the baseline stats,
//! the instant they were captured, and the instant offline decay was last
//! computed from them.
//!
//! # Lifecycle
//!
//! ```text
//! live snapshot wins  → save(state, at)              (overwrite whole record)
//! offline decay runs  → update_recomputation_instant (touch one field)
//! explicit reset      → clear()
//! ```
//!
//! A record is present only when its capture instant, base energy and base
//! satiety are all stored. Anything less loads as `None`.
//!
//! # Module Structure
//!
//! - [`store`]: JSON file implementation (`~/.pet-widget/baseline.json`)
//! - [`memory`]: in-process implementation for tests and embedding hosts

mod memory;
mod store;

pub use memory::MemoryBaselineStore;
pub use store::FileBaselineStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{BaselineSnapshot, PetState};

/// Durable single-slot storage for the offline baseline.
///
/// Implementations must make each call atomic with respect to concurrent
/// readers. Errors are reserved for storage failures; missing or corrupt
/// records load as `None`.
pub trait BaselineStore: Send + Sync {
    /// Overwrites the baseline with `state`'s stats, using `at` as both the
    /// capture and last-recomputation instant.
    fn save(&self, state: &PetState, at: DateTime<Utc>) -> Result<()>;

    fn load(&self) -> Result<Option<BaselineSnapshot>>;

    /// Touches only the last-recomputation instant. No-op without a baseline.
    fn update_recomputation_instant(&self, at: DateTime<Utc>) -> Result<()>;

    fn clear(&self) -> Result<()>;
}
