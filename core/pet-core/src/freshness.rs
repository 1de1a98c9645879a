//! Freshness arbitration between the live snapshot and the offline baseline.
//!
//! # Source ordering
//!
//! ```text
//! live     baseline            → source
//! ───────  ──────────────────  ────────
//! none     none                → Default
//! none     valid               → Offline
//! none     invalid             → Default
//! some     none                → Live
//! some     some, live fresher  → Live
//! some     some, valid         → Offline
//! some     some, invalid       → Default
//! ```
//!
//! "Fresher" is strict: a live snapshot captured at exactly the baseline's
//! capture instant loses to the baseline.
//!
//! Callers are expected to drop invalid live snapshots (see
//! [`FreshnessArbiter::is_state_valid`]) before asking for a source.

use chrono::{DateTime, Duration, Utc};

use crate::config::StatBounds;
use crate::types::{BaselineSnapshot, PetState, StateSource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreshnessArbiter {
    bounds: StatBounds,
}

impl FreshnessArbiter {
    pub fn new(bounds: StatBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &StatBounds {
        &self.bounds
    }

    /// Checks identity fields are present and every stat is in range.
    pub fn is_state_valid(&self, state: &PetState) -> bool {
        let problem = if state.pet_id.trim().is_empty() {
            Some("missing pet id")
        } else if state.pet_name.trim().is_empty() {
            Some("missing pet name")
        } else if state.prefab_name.trim().is_empty() {
            Some("missing prefab name")
        } else if !in_range(state.energy, self.bounds.max_energy) {
            Some("energy out of range")
        } else if !in_range(state.satiety, self.bounds.max_satiety) {
            Some("satiety out of range")
        } else if !in_range(state.age_in_days, self.bounds.max_age_days) {
            Some("age out of range")
        } else {
            None
        };

        match problem {
            Some(reason) => {
                tracing::warn!(
                    pet_id = %state.pet_id,
                    energy = state.energy,
                    satiety = state.satiety,
                    age_in_days = state.age_in_days,
                    reason,
                    "Rejecting pet state"
                );
                false
            }
            None => true,
        }
    }

    /// Checks both instants are positive, the capture instant is not beyond
    /// the clock-skew tolerance, and the base stats are in range.
    pub fn is_baseline_valid(&self, baseline: &BaselineSnapshot, now: DateTime<Utc>) -> bool {
        let latest_allowed = now + self.bounds.clock_skew_tolerance();

        let problem = if baseline.captured_at.timestamp_millis() <= 0
            || baseline.recomputed_at.timestamp_millis() <= 0
        {
            Some("non-positive timestamp")
        } else if baseline.captured_at > latest_allowed {
            Some("capture instant in the future")
        } else if !in_range(baseline.base_energy, self.bounds.max_energy) {
            Some("base energy out of range")
        } else if !in_range(baseline.base_satiety, self.bounds.max_satiety) {
            Some("base satiety out of range")
        } else {
            None
        };

        match problem {
            Some(reason) => {
                tracing::warn!(
                    captured_at = %baseline.captured_at,
                    recomputed_at = %baseline.recomputed_at,
                    base_energy = baseline.base_energy,
                    base_satiety = baseline.base_satiety,
                    reason,
                    "Rejecting baseline"
                );
                false
            }
            None => true,
        }
    }

    /// Strict comparison of capture instants. Ties favor the baseline.
    pub fn is_live_fresher_than(
        &self,
        live: Option<&PetState>,
        baseline: Option<&BaselineSnapshot>,
    ) -> bool {
        match (live, baseline) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(live), Some(baseline)) => live.captured_at > baseline.captured_at,
        }
    }

    /// Decides which source is authoritative. See the module docs for the table.
    pub fn choose_source(
        &self,
        live: Option<&PetState>,
        baseline: Option<&BaselineSnapshot>,
        now: DateTime<Utc>,
    ) -> StateSource {
        let source = match (live, baseline) {
            (None, None) => StateSource::Default,
            (None, Some(baseline)) => self.offline_or_default(baseline, now),
            (Some(_), None) => StateSource::Live,
            (Some(_), Some(baseline)) => {
                if self.is_live_fresher_than(live, Some(baseline)) {
                    StateSource::Live
                } else {
                    self.offline_or_default(baseline, now)
                }
            }
        };

        tracing::debug!(
            has_live = live.is_some(),
            has_baseline = baseline.is_some(),
            source = %source,
            "Chose pet state source"
        );
        source
    }

    /// How long ago the live snapshot was captured. `None` without a snapshot.
    pub fn live_age(&self, live: Option<&PetState>, now: DateTime<Utc>) -> Option<Duration> {
        live.map(|state| now.signed_duration_since(state.captured_at))
    }

    /// How long ago offline decay was last computed. `None` without a baseline.
    pub fn recomputation_age(
        &self,
        baseline: Option<&BaselineSnapshot>,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        baseline.map(|b| now.signed_duration_since(b.recomputed_at))
    }

    fn offline_or_default(
        &self,
        baseline: &BaselineSnapshot,
        now: DateTime<Utc>,
    ) -> StateSource {
        if self.is_baseline_valid(baseline, now) {
            StateSource::Offline
        } else {
            StateSource::Default
        }
    }
}

fn in_range(value: i32, max: i32) -> bool {
    (0..=max).contains(&value)
}
