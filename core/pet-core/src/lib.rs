//! # pet-core
//!
//! Core library for the pet home-screen widget: decides which pet state the
//! widget shows and computes offline stat decay while the game is closed.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Hosts call in on their own triggers.
//! - **Graceful degradation**: Invalid or missing pet data falls back to the
//!   offline baseline, then to a default pet. Only storage failures are errors.
//! - **Pure decay**: Offline stats are a function of the baseline and elapsed
//!   time, so repeated recomputation never compounds.
//! - **FFI-ready**: UniFFI annotations enable Kotlin and Swift bindings.
//!   Prefer additive public API changes; removing or renaming breaks FFI clients.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pet_core::PetWidgetEngine;
//!
//! let engine = PetWidgetEngine::new()?;
//! engine.push_live_update(json_from_game)?;
//! let resolved = engine.resolve()?;
//! ```

// UniFFI scaffolding for Kotlin/Swift bindings
uniffi::setup_scaffolding!();

pub mod baseline;
pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod live;
pub mod reconcile;
pub mod storage;
pub mod timestamp;
pub mod types;

mod persist;

pub use baseline::{BaselineStore, FileBaselineStore, MemoryBaselineStore};
pub use config::{load_widget_config, DecayConfig, StatBounds, WidgetConfig};
pub use decay::DecayModel;
pub use engine::{PetStateFfi, PetWidgetEngine, ReconcileStatusFfi, ResolvedPetFfi};
pub use error::{PetError, PetFfiError, Result};
pub use freshness::FreshnessArbiter;
pub use live::{
    parse_live_payload, FileLiveStore, LiveSnapshotStore, MemoryLiveStore, WidgetPayload,
};
pub use reconcile::{ReconcileStatus, ReconciliationService};
pub use storage::StorageConfig;
pub use types::*;
