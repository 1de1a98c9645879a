//! PetWidgetEngine - the entry point for widget hosts.
//!
//! Hosts (Android app widget, iOS WidgetKit extension, the CLI) call into the
//! engine on their own triggers: a scheduled tick, a tap on "refresh", or a
//! push from the running game. Every call is synchronous and independent; all
//! state lives in the stores under `~/.pet-widget/`.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use pet_core::PetWidgetEngine;
//!
//! let engine = PetWidgetEngine::new()?;
//! let resolved = engine.resolve()?;
//! println!("{} ({})", resolved.state.pet_name, resolved.source);
//! ```

use crate::config::load_widget_config;
use crate::error::PetFfiError;
use crate::reconcile::{ReconcileStatus, ReconciliationService};
use crate::storage::StorageConfig;
use crate::types::{PetState, PetVariant, ResolvedPet, StateSource};

// ═══════════════════════════════════════════════════════════════════════════════
// FFI Records
// ═══════════════════════════════════════════════════════════════════════════════

/// Flat pet state for widget hosts. Instants are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PetStateFfi {
    pub pet_id: String,
    pub pet_name: String,
    pub prefab_name: String,
    pub variant: PetVariant,
    pub energy: i32,
    pub satiety: i32,
    pub is_bored: bool,
    pub purchase_date: String,
    pub age_in_days: i32,
    pub introduction: String,
    pub captured_at_millis: i64,
}

impl From<PetState> for PetStateFfi {
    fn from(state: PetState) -> Self {
        PetStateFfi {
            variant: state.variant(),
            captured_at_millis: state.captured_at.timestamp_millis(),
            pet_id: state.pet_id,
            pet_name: state.pet_name,
            prefab_name: state.prefab_name,
            energy: state.energy,
            satiety: state.satiety,
            is_bored: state.is_bored,
            purchase_date: state.purchase_date,
            age_in_days: state.age_in_days,
            introduction: state.introduction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ResolvedPetFfi {
    pub state: PetStateFfi,
    pub source: StateSource,
}

impl From<ResolvedPet> for ResolvedPetFfi {
    fn from(resolved: ResolvedPet) -> Self {
        ResolvedPetFfi {
            state: resolved.state.into(),
            source: resolved.source,
        }
    }
}

/// Diagnostics for host debug screens.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ReconcileStatusFfi {
    pub source: StateSource,
    pub has_live: bool,
    pub live_valid: bool,
    pub has_baseline: bool,
    pub baseline_valid: bool,
    pub live_age_secs: Option<i64>,
    pub baseline_elapsed_secs: Option<u64>,
    pub recomputation_age_secs: Option<i64>,
}

impl From<ReconcileStatus> for ReconcileStatusFfi {
    fn from(status: ReconcileStatus) -> Self {
        ReconcileStatusFfi {
            source: status.source,
            has_live: status.has_live,
            live_valid: status.live_valid,
            has_baseline: status.has_baseline,
            baseline_valid: status.baseline_valid,
            live_age_secs: status.live_age_secs,
            baseline_elapsed_secs: status.baseline_elapsed_secs,
            recomputation_age_secs: status.recomputation_age_secs,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(uniffi::Object)]
pub struct PetWidgetEngine {
    storage: StorageConfig,
    service: ReconciliationService,
}

impl PetWidgetEngine {
    /// Creates an engine over a custom storage root.
    ///
    /// Used by tests and the CLI `--root` flag. Not exposed to FFI.
    pub fn with_storage(storage: StorageConfig) -> Result<Self, PetFfiError> {
        let config = load_widget_config(&storage.config_file())?;
        let service = ReconciliationService::open(&storage, &config);
        Ok(Self::with_parts(storage, service))
    }

    /// Creates an engine from already-built parts.
    pub fn with_parts(storage: StorageConfig, service: ReconciliationService) -> Self {
        Self { storage, service }
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn service(&self) -> &ReconciliationService {
        &self.service
    }
}

#[uniffi::export]
impl PetWidgetEngine {
    /// Creates an engine over `~/.pet-widget/`.
    #[uniffi::constructor]
    pub fn new() -> Result<Self, PetFfiError> {
        Self::with_storage(StorageConfig::from_home()?)
    }

    /// Path of the data directory as a string.
    pub fn data_dir(&self) -> String {
        self.storage.root().to_string_lossy().to_string()
    }

    /// Resolves the pet state to display right now.
    pub fn resolve(&self) -> Result<ResolvedPetFfi, PetFfiError> {
        Ok(self.service.resolve_current_state()?.into())
    }

    /// Scheduled tick from the host's refresh timer.
    pub fn periodic_reconcile(&self) -> Result<ResolvedPetFfi, PetFfiError> {
        Ok(self.service.periodic_reconcile()?.into())
    }

    /// Manual refresh. Recomputes from the baseline only.
    pub fn refresh_offline(&self) -> Result<ResolvedPetFfi, PetFfiError> {
        Ok(self.service.refresh_offline()?.into())
    }

    /// Accepts a JSON push from the game. Returns `false` if it was discarded.
    pub fn push_live_update(&self, json: String) -> Result<bool, PetFfiError> {
        Ok(self.service.ingest_payload(&json)?)
    }

    /// Clears all stored pet data.
    pub fn reset(&self) -> Result<(), PetFfiError> {
        Ok(self.service.reset()?)
    }

    pub fn status(&self) -> Result<ReconcileStatusFfi, PetFfiError> {
        Ok(self.service.status()?.into())
    }
}
