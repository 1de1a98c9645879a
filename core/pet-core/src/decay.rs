//! Offline decay: projects baseline stats forward by elapsed wall-clock time.
//!
//! Every stat loses one point per configured interval, floored at zero.
//! Boredom is a one-way latch: a bored baseline stays bored until the reset
//! interval passes, then stays not-bored. Only a new live baseline can make
//! the pet bored again.
//!
//! The model is a pure function of `(baseline, now)`. Calling it repeatedly
//! or from several threads gives identical results.

use chrono::{DateTime, Utc};

use crate::config::DecayConfig;
use crate::types::{
    BaselineSnapshot, PetState, DEFAULT_INTRODUCTION, OFFLINE_AGE_PLACEHOLDER_DAYS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecayModel {
    config: DecayConfig,
}

impl DecayModel {
    pub fn new(config: DecayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    /// Whole seconds between the baseline capture and `now`, clamped at zero.
    ///
    /// A negative delta means the clock moved backwards (or the baseline was
    /// anchored slightly in the future); it counts as no time passing.
    pub fn elapsed_seconds(&self, baseline: &BaselineSnapshot, now: DateTime<Utc>) -> u64 {
        let elapsed = now.signed_duration_since(baseline.captured_at).num_seconds();
        if elapsed < 0 {
            tracing::warn!(
                elapsed_secs = elapsed,
                captured_at = %baseline.captured_at,
                now = %now,
                "Baseline captured after observation instant, clamping elapsed time to zero"
            );
            return 0;
        }
        elapsed as u64
    }

    /// Computes the pet's current stats from a baseline.
    ///
    /// Identity fields come from the baseline. Age and introduction are not
    /// modeled offline and take placeholder values. The result is captured at `now`.
    pub fn compute_current_stats(
        &self,
        baseline: &BaselineSnapshot,
        now: DateTime<Utc>,
    ) -> PetState {
        let elapsed = self.elapsed_seconds(baseline, now);

        PetState {
            pet_id: baseline.pet_id.clone(),
            pet_name: baseline.pet_name.clone(),
            prefab_name: baseline.prefab_name.clone(),
            energy: decay_stat(baseline.base_energy, elapsed, self.config.energy_interval_secs),
            satiety: decay_stat(
                baseline.base_satiety,
                elapsed,
                self.config.satiety_interval_secs,
            ),
            is_bored: bored_after(
                baseline.base_is_bored,
                elapsed,
                self.config.bored_reset_interval_secs,
            ),
            purchase_date: String::new(),
            age_in_days: OFFLINE_AGE_PLACEHOLDER_DAYS,
            introduction: DEFAULT_INTRODUCTION.to_string(),
            captured_at: now,
        }
    }
}

/// `max(0, base - floor(elapsed / interval))`. A zero interval never decays.
fn decay_stat(base: i32, elapsed_secs: u64, interval_secs: u64) -> i32 {
    let steps = elapsed_secs.checked_div(interval_secs).unwrap_or(0);
    let steps = i64::try_from(steps).unwrap_or(i64::MAX);
    i64::from(base).saturating_sub(steps).max(0) as i32
}

fn bored_after(base_is_bored: bool, elapsed_secs: u64, reset_secs: u64) -> bool {
    base_is_bored && elapsed_secs < reset_secs
}
