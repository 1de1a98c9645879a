//! Core value types shared by the decay model, arbiter, stores and widget hosts.
//!
//! The JSON shape of [`PetState`] matches what the game has always pushed to the
//! widget (camelCase keys, `lastUpdateTime` as epoch milliseconds). Missing keys
//! fall back to the same defaults older game builds relied on, so previously
//! persisted snapshots keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

// ═══════════════════════════════════════════════════════════════════════════════
// Defaults
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_PET_NAME: &str = "我的宠物";
pub const DEFAULT_PREFAB_NAME: &str = "Pet_CatBrown";
pub const DEFAULT_INTRODUCTION: &str = "可爱的宠物";

/// Energy assumed when a pushed snapshot omits the key.
pub const WIRE_DEFAULT_ENERGY: i32 = 80;
/// Satiety assumed when a pushed snapshot omits the key.
pub const WIRE_DEFAULT_SATIETY: i32 = 70;

/// Stats shown when neither a live snapshot nor a usable baseline exists.
pub const FALLBACK_ENERGY: i32 = 100;
pub const FALLBACK_SATIETY: i32 = 100;

/// Age reported for offline-computed and fallback states. Age is not projected
/// forward offline; this is a placeholder pending product confirmation.
pub const OFFLINE_AGE_PLACEHOLDER_DAYS: i32 = 1;

fn default_pet_name() -> String {
    DEFAULT_PET_NAME.to_string()
}

fn default_prefab_name() -> String {
    DEFAULT_PREFAB_NAME.to_string()
}

fn default_introduction() -> String {
    DEFAULT_INTRODUCTION.to_string()
}

fn default_energy() -> i32 {
    WIRE_DEFAULT_ENERGY
}

fn default_satiety() -> i32 {
    WIRE_DEFAULT_SATIETY
}

fn default_age() -> i32 {
    OFFLINE_AGE_PLACEHOLDER_DAYS
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pet State
// ═══════════════════════════════════════════════════════════════════════════════

/// A pet's stats at a single instant.
///
/// Numeric fields are signed so that out-of-range values sent by a buggy
/// producer survive decoding and are rejected by validation instead of
/// failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetState {
    #[serde(default)]
    pub pet_id: String,
    #[serde(default = "default_pet_name")]
    pub pet_name: String,
    /// Visual-variant key (prefab name on the game side).
    #[serde(default = "default_prefab_name")]
    pub prefab_name: String,
    #[serde(default = "default_energy")]
    pub energy: i32,
    #[serde(default = "default_satiety")]
    pub satiety: i32,
    #[serde(default)]
    pub is_bored: bool,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default = "default_age")]
    pub age_in_days: i32,
    #[serde(default = "default_introduction")]
    pub introduction: String,
    #[serde(
        rename = "lastUpdateTime",
        default = "timestamp::epoch",
        with = "timestamp::capture"
    )]
    pub captured_at: DateTime<Utc>,
}

impl PetState {
    /// The hardcoded state shown when no source is usable.
    ///
    /// Empty id, default name and prefab, 100 energy, 100 satiety, not bored,
    /// age 1, default introduction, captured at `now`.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        PetState {
            pet_id: String::new(),
            pet_name: default_pet_name(),
            prefab_name: default_prefab_name(),
            energy: FALLBACK_ENERGY,
            satiety: FALLBACK_SATIETY,
            is_bored: false,
            purchase_date: String::new(),
            age_in_days: OFFLINE_AGE_PLACEHOLDER_DAYS,
            introduction: default_introduction(),
            captured_at: now,
        }
    }

    pub fn variant(&self) -> PetVariant {
        PetVariant::from_prefab(&self.prefab_name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Baseline Snapshot
// ═══════════════════════════════════════════════════════════════════════════════

/// The durable anchor for offline decay: the last authoritative stats plus the
/// instant they were captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineSnapshot {
    pub pet_id: String,
    pub pet_name: String,
    pub prefab_name: String,
    pub base_energy: i32,
    pub base_satiety: i32,
    pub base_is_bored: bool,
    /// When the baseline stats were captured. Decay is measured from here.
    pub captured_at: DateTime<Utc>,
    /// When offline decay was last computed from this baseline.
    pub recomputed_at: DateTime<Utc>,
}

impl BaselineSnapshot {
    /// Derives a baseline from an authoritative state, anchored at `at`.
    pub fn anchored(state: &PetState, at: DateTime<Utc>) -> Self {
        BaselineSnapshot {
            pet_id: state.pet_id.clone(),
            pet_name: state.pet_name.clone(),
            prefab_name: state.prefab_name.clone(),
            base_energy: state.energy,
            base_satiety: state.satiety,
            base_is_bored: state.is_bored,
            captured_at: at,
            recomputed_at: at,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Source Selection
// ═══════════════════════════════════════════════════════════════════════════════

/// Which data source produced a resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum StateSource {
    /// The game's most recent pushed snapshot.
    Live,
    /// Projected from the stored baseline and elapsed time.
    Offline,
    /// Nothing usable; the hardcoded fallback.
    Default,
}

impl StateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateSource::Live => "live",
            StateSource::Offline => "offline",
            StateSource::Default => "default",
        }
    }
}

impl std::fmt::Display for StateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved pet state and the source it came from, handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPet {
    pub state: PetState,
    pub source: StateSource,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Visual Variant
// ═══════════════════════════════════════════════════════════════════════════════

/// Known pet sprites. Unknown prefab names render as [`PetVariant::CatBrown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum PetVariant {
    CatBlack,
    CatBrown,
    CatGrey,
    CatWhite,
}

impl PetVariant {
    /// Matches by substring so decorated prefab names like `Pet_CatGrey(Clone)` resolve.
    pub fn from_prefab(prefab_name: &str) -> Self {
        if prefab_name.contains("CatBlack") {
            PetVariant::CatBlack
        } else if prefab_name.contains("CatGrey") {
            PetVariant::CatGrey
        } else if prefab_name.contains("CatWhite") {
            PetVariant::CatWhite
        } else {
            PetVariant::CatBrown
        }
    }

    pub fn prefab_name(&self) -> &'static str {
        match self {
            PetVariant::CatBlack => "Pet_CatBlack",
            PetVariant::CatBrown => "Pet_CatBrown",
            PetVariant::CatGrey => "Pet_CatGrey",
            PetVariant::CatWhite => "Pet_CatWhite",
        }
    }
}
