//! Reconciliation: the single entry point widget hosts call.
//!
//! ```text
//! trigger ──► resolve ──► live store ─┐
//!                     └─► baseline ───┼─► arbiter ──► Live    → re-anchor baseline, return live
//!                                     │              Offline → decay, touch recomputation instant
//!                                     │              Default → fallback, no writes
//! ```
//!
//! The service holds no state of its own beyond its collaborators. Two
//! concurrent resolves may both re-anchor; the last write wins and the next
//! resolve converges because decay depends only on elapsed time.
//!
//! Data problems never surface as errors here. Invalid live snapshots are
//! dropped, invalid baselines fall through to the default state. Only the
//! stores' I/O failures are returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::baseline::{BaselineStore, FileBaselineStore};
use crate::config::{DecayConfig, WidgetConfig};
use crate::decay::DecayModel;
use crate::error::Result;
use crate::freshness::FreshnessArbiter;
use crate::live::{parse_live_payload, FileLiveStore, LiveSnapshotStore};
use crate::storage::StorageConfig;
use crate::types::{BaselineSnapshot, PetState, ResolvedPet, StateSource};

/// Side-effect-free view of what a resolve would see right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileStatus {
    pub source: StateSource,
    pub has_live: bool,
    pub live_valid: bool,
    pub has_baseline: bool,
    pub baseline_valid: bool,
    pub live_age_secs: Option<i64>,
    pub baseline_elapsed_secs: Option<u64>,
    pub recomputation_age_secs: Option<i64>,
    pub decay: DecayConfig,
}

pub struct ReconciliationService {
    live: Arc<dyn LiveSnapshotStore>,
    baseline: Arc<dyn BaselineStore>,
    decay: DecayModel,
    arbiter: FreshnessArbiter,
}

impl ReconciliationService {
    pub fn new(
        live: Arc<dyn LiveSnapshotStore>,
        baseline: Arc<dyn BaselineStore>,
        decay: DecayModel,
        arbiter: FreshnessArbiter,
    ) -> Self {
        Self {
            live,
            baseline,
            decay,
            arbiter,
        }
    }

    pub fn from_config(
        live: Arc<dyn LiveSnapshotStore>,
        baseline: Arc<dyn BaselineStore>,
        config: &WidgetConfig,
    ) -> Self {
        Self::new(
            live,
            baseline,
            DecayModel::new(config.decay),
            FreshnessArbiter::new(config.bounds),
        )
    }

    /// File-backed service rooted at `storage`.
    pub fn open(storage: &StorageConfig, config: &WidgetConfig) -> Self {
        Self::from_config(
            Arc::new(FileLiveStore::new(&storage.live_file())),
            Arc::new(FileBaselineStore::new(&storage.baseline_file())),
            config,
        )
    }

    pub fn decay_model(&self) -> &DecayModel {
        &self.decay
    }

    pub fn arbiter(&self) -> &FreshnessArbiter {
        &self.arbiter
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Resolve
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn resolve_current_state(&self) -> Result<ResolvedPet> {
        self.resolve_at(Utc::now())
    }

    /// Resolves the authoritative pet state as observed at `now`.
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<ResolvedPet> {
        let live = self.valid_live()?;
        let baseline = self.baseline.load()?;
        let source = self
            .arbiter
            .choose_source(live.as_ref(), baseline.as_ref(), now);

        match (source, live, baseline) {
            (StateSource::Live, Some(live), _) => {
                self.baseline.save(&live, now)?;
                Ok(ResolvedPet {
                    state: live,
                    source: StateSource::Live,
                })
            }
            (StateSource::Offline, _, Some(baseline)) => self.compute_offline(&baseline, now),
            _ => Ok(fallback(now)),
        }
    }

    /// Time-driven entry point. Same behavior as [`Self::resolve_current_state`],
    /// including re-anchoring when live data wins.
    pub fn periodic_reconcile(&self) -> Result<ResolvedPet> {
        self.periodic_reconcile_at(Utc::now())
    }

    pub fn periodic_reconcile_at(&self, now: DateTime<Utc>) -> Result<ResolvedPet> {
        let resolved = self.resolve_at(now)?;
        tracing::debug!(source = %resolved.source, "Periodic reconcile");
        Ok(resolved)
    }

    /// Manual refresh: recomputes from the baseline only, ignoring live data.
    pub fn refresh_offline(&self) -> Result<ResolvedPet> {
        self.refresh_offline_at(Utc::now())
    }

    pub fn refresh_offline_at(&self, now: DateTime<Utc>) -> Result<ResolvedPet> {
        match self.baseline.load()? {
            Some(baseline) if self.arbiter.is_baseline_valid(&baseline, now) => {
                self.compute_offline(&baseline, now)
            }
            _ => {
                tracing::warn!("No valid baseline for offline refresh, using default state");
                Ok(fallback(now))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Live Updates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a live snapshot from the game and re-anchors the baseline to it
    /// at `now`, so offline decay starts from the moment the stats were received.
    ///
    /// Returns `false` when the snapshot is invalid and was discarded.
    pub fn on_live_update(&self, state: &PetState) -> Result<bool> {
        self.on_live_update_at(state, Utc::now())
    }

    pub fn on_live_update_at(&self, state: &PetState, now: DateTime<Utc>) -> Result<bool> {
        if !self.arbiter.is_state_valid(state) {
            tracing::warn!(pet_id = %state.pet_id, "Discarding invalid live update");
            return Ok(false);
        }

        self.live.put(state)?;
        self.baseline.save(state, now)?;
        tracing::info!(
            pet_id = %state.pet_id,
            energy = state.energy,
            satiety = state.satiety,
            is_bored = state.is_bored,
            captured_at = %state.captured_at,
            "Live update stored"
        );
        Ok(true)
    }

    /// Decodes a raw push from the game and forwards it to [`Self::on_live_update`].
    ///
    /// Malformed payloads are discarded like invalid snapshots.
    pub fn ingest_payload(&self, json: &str) -> Result<bool> {
        self.ingest_payload_at(json, Utc::now())
    }

    pub fn ingest_payload_at(&self, json: &str, now: DateTime<Utc>) -> Result<bool> {
        match parse_live_payload(json) {
            Ok(Some(state)) => self.on_live_update_at(&state, now),
            Ok(None) => {
                tracing::debug!("Live payload carried no pet snapshot");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed live payload");
                Ok(false)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Maintenance
    // ─────────────────────────────────────────────────────────────────────────────

    /// Clears both stores. Resolves return the default state until new live data arrives.
    pub fn reset(&self) -> Result<()> {
        self.baseline.clear()?;
        self.live.clear()?;
        tracing::info!("Pet widget data reset");
        Ok(())
    }

    pub fn status(&self) -> Result<ReconcileStatus> {
        self.status_at(Utc::now())
    }

    /// Reports what a resolve at `now` would choose, without writing anything.
    pub fn status_at(&self, now: DateTime<Utc>) -> Result<ReconcileStatus> {
        let raw_live = self.live.get()?;
        let live_valid = raw_live
            .as_ref()
            .is_some_and(|state| self.arbiter.is_state_valid(state));
        let live = raw_live.clone().filter(|_| live_valid);
        let baseline = self.baseline.load()?;

        Ok(ReconcileStatus {
            source: self
                .arbiter
                .choose_source(live.as_ref(), baseline.as_ref(), now),
            has_live: raw_live.is_some(),
            live_valid,
            has_baseline: baseline.is_some(),
            baseline_valid: baseline
                .as_ref()
                .is_some_and(|b| self.arbiter.is_baseline_valid(b, now)),
            live_age_secs: self
                .arbiter
                .live_age(raw_live.as_ref(), now)
                .map(|age| age.num_seconds()),
            baseline_elapsed_secs: baseline
                .as_ref()
                .map(|b| self.decay.elapsed_seconds(b, now)),
            recomputation_age_secs: self
                .arbiter
                .recomputation_age(baseline.as_ref(), now)
                .map(|age| age.num_seconds()),
            decay: *self.decay.config(),
        })
    }

    fn valid_live(&self) -> Result<Option<PetState>> {
        Ok(self
            .live
            .get()?
            .filter(|state| self.arbiter.is_state_valid(state)))
    }

    fn compute_offline(
        &self,
        baseline: &BaselineSnapshot,
        now: DateTime<Utc>,
    ) -> Result<ResolvedPet> {
        let state = self.decay.compute_current_stats(baseline, now);
        self.baseline.update_recomputation_instant(now)?;
        tracing::debug!(
            pet_id = %state.pet_id,
            energy = state.energy,
            satiety = state.satiety,
            is_bored = state.is_bored,
            "Computed offline pet state"
        );
        Ok(ResolvedPet {
            state,
            source: StateSource::Offline,
        })
    }
}

fn fallback(now: DateTime<Utc>) -> ResolvedPet {
    ResolvedPet {
        state: PetState::fallback(now),
        source: StateSource::Default,
    }
}
