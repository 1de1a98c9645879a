use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pet_core::{
    BaselineStore, FileBaselineStore, FileLiveStore, LiveSnapshotStore, PetError, PetState,
    ReconciliationService, StateSource, StorageConfig, WidgetConfig,
};
use tempfile::TempDir;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Base instant for scenarios: 2025-09-22T03:02:16Z.
fn t0() -> DateTime<Utc> {
    at(1_758_510_136)
}

fn pet(captured_at: DateTime<Utc>, energy: i32, satiety: i32) -> PetState {
    PetState {
        pet_id: "pet-1".to_string(),
        pet_name: "Mochi".to_string(),
        prefab_name: "Pet_CatGrey".to_string(),
        energy,
        satiety,
        is_bored: false,
        purchase_date: "2025-09-01".to_string(),
        age_in_days: 21,
        introduction: "Loves naps".to_string(),
        captured_at,
    }
}

struct Harness {
    _temp: TempDir,
    storage: StorageConfig,
    live: Arc<FileLiveStore>,
    baseline: Arc<FileBaselineStore>,
    service: ReconciliationService,
}

fn harness() -> Harness {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    let live = Arc::new(FileLiveStore::new(&storage.live_file()));
    let baseline = Arc::new(FileBaselineStore::new(&storage.baseline_file()));
    let service = ReconciliationService::from_config(
        live.clone(),
        baseline.clone(),
        &WidgetConfig::default(),
    );
    Harness {
        _temp: temp,
        storage,
        live,
        baseline,
        service,
    }
}

#[test]
fn test_fresher_live_wins_and_reanchors_baseline() {
    let h = harness();
    let t = t0();
    let earlier = t - Duration::seconds(1);
    h.baseline.save(&pet(earlier, 50, 50), earlier).unwrap();
    h.live.put(&pet(t, 90, 80)).unwrap();

    let resolved = h.service.resolve_at(t).unwrap();
    assert_eq!(resolved.source, StateSource::Live);
    assert_eq!(resolved.state, pet(t, 90, 80));

    let stored = h.baseline.load().unwrap().unwrap();
    assert_eq!(stored.captured_at, t);
    assert_eq!(stored.base_energy, 90);
    assert_eq!(stored.base_satiety, 80);
}

#[test]
fn test_late_resolve_anchors_at_observation_instant() {
    let h = harness();
    let t = t0();
    h.live.put(&pet(t, 100, 100)).unwrap();
    let now = t + Duration::seconds(1_296);

    let first = h.service.resolve_at(now).unwrap();
    assert_eq!(first.source, StateSource::Live);
    assert_eq!(h.baseline.load().unwrap().unwrap().captured_at, now);

    // Decay starts at the re-anchor, so the same instant shows the same stats.
    let second = h.service.resolve_at(now).unwrap();
    assert_eq!(second.source, StateSource::Offline);
    assert_eq!(second.state.energy, first.state.energy);
    assert_eq!(second.state.satiety, first.state.satiety);

    let later = h.service.resolve_at(now + Duration::seconds(1_296)).unwrap();
    assert_eq!(later.state.energy, 98);
}

#[test]
fn test_empty_stores_resolve_default_without_writes() {
    let h = harness();

    let resolved = h.service.resolve_at(t0()).unwrap();
    assert_eq!(resolved.source, StateSource::Default);
    assert_eq!(resolved.state, PetState::fallback(t0()));
    assert_eq!(resolved.state.energy, 100);
    assert_eq!(resolved.state.satiety, 100);
    assert_eq!(resolved.state.pet_name, "我的宠物");
    assert_eq!(resolved.state.prefab_name, "Pet_CatBrown");

    assert!(!h.storage.baseline_file().exists());
    assert!(!h.storage.live_file().exists());
}

#[test]
fn test_equal_instants_favor_offline() {
    let h = harness();
    let t = t0();
    h.baseline.save(&pet(t, 100, 100), t).unwrap();
    h.live.put(&pet(t, 10, 10)).unwrap();

    let resolved = h.service.resolve_at(t + Duration::seconds(1_296)).unwrap();
    assert_eq!(resolved.source, StateSource::Offline);
    assert_eq!(resolved.state.energy, 98);
    assert_eq!(resolved.state.satiety, 97);
}

#[test]
fn test_offline_decay_across_a_day() {
    let h = harness();
    let t = t0();
    h.service.on_live_update_at(&pet(t, 100, 100), t).unwrap();
    // Game closes; the live snapshot is still there but no newer one arrives.
    let now = t + Duration::hours(24);

    let resolved = h.service.resolve_at(now).unwrap();
    assert_eq!(resolved.source, StateSource::Offline);
    // 86400 / 648 = 133, 86400 / 432 = 200.
    assert_eq!(resolved.state.energy, 0);
    assert_eq!(resolved.state.satiety, 0);
    assert_eq!(resolved.state.pet_id, "pet-1");
    assert_eq!(resolved.state.age_in_days, 1);
    assert_eq!(resolved.state.captured_at, now);

    let stored = h.baseline.load().unwrap().unwrap();
    assert_eq!(stored.captured_at, t);
    assert_eq!(stored.recomputed_at, now);
}

#[test]
fn test_repeated_resolves_do_not_compound_decay() {
    let h = harness();
    let t = t0();
    h.service.on_live_update_at(&pet(t, 100, 100), t).unwrap();
    let now = t + Duration::seconds(6_480);

    let first = h.service.resolve_at(now).unwrap();
    let second = h.service.periodic_reconcile_at(now).unwrap();
    let third = h.service.refresh_offline_at(now).unwrap();
    assert_eq!(first.state.energy, 90);
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn test_invalid_live_falls_back_to_baseline_or_default() {
    let h = harness();
    let t = t0();
    let mut broken = pet(t + Duration::seconds(10), 5_000, 10);
    h.live.put(&broken).unwrap();

    assert_eq!(
        h.service.resolve_at(t + Duration::seconds(20)).unwrap().source,
        StateSource::Default
    );

    h.baseline.save(&pet(t, 70, 70), t).unwrap();
    assert_eq!(
        h.service.resolve_at(t + Duration::seconds(20)).unwrap().source,
        StateSource::Offline
    );

    broken.energy = 70;
    broken.pet_name = "   ".to_string();
    assert!(!h.service.on_live_update_at(&broken, t).unwrap());
}

#[test]
fn test_future_baseline_resolves_default() {
    let h = harness();
    let t = t0();
    h.baseline.save(&pet(t, 100, 100), t + Duration::minutes(5)).unwrap();

    let resolved = h.service.resolve_at(t).unwrap();
    assert_eq!(resolved.source, StateSource::Default);
}

#[test]
fn test_live_captured_in_future_anchors_at_now() {
    let h = harness();
    let t = t0();
    let future = pet(t + Duration::hours(2), 60, 60);
    h.service.on_live_update_at(&future, t).unwrap();

    assert_eq!(h.baseline.load().unwrap().unwrap().captured_at, t);
    let resolved = h.service.resolve_at(t + Duration::seconds(30)).unwrap();
    assert_eq!(resolved.source, StateSource::Live);
}

#[test]
fn test_reset_then_resolve_is_default() {
    let h = harness();
    let t = t0();
    h.service.on_live_update_at(&pet(t, 40, 40), t).unwrap();
    h.service.reset().unwrap();

    assert!(h.live.get().unwrap().is_none());
    assert!(h.baseline.load().unwrap().is_none());
    assert_eq!(
        h.service.resolve_at(t + Duration::hours(1)).unwrap().source,
        StateSource::Default
    );
}

#[test]
fn test_concurrent_resolves_converge() {
    let h = harness();
    let t = t0();
    let earlier = t - Duration::minutes(10);
    h.baseline.save(&pet(earlier, 50, 50), earlier).unwrap();
    h.live.put(&pet(t, 88, 77)).unwrap();

    let service = Arc::new(h.service);
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.resolve_at(t + Duration::seconds(i)).unwrap())
        })
        .collect();
    for handle in handles {
        let resolved = handle.join().unwrap();
        assert_eq!(resolved.state.energy, 88);
    }

    // Last writer wins; every writer anchored at its own observation instant.
    let stored = h.baseline.load().unwrap().unwrap();
    assert!(stored.captured_at >= t && stored.captured_at < t + Duration::seconds(8));
    assert_eq!(stored.base_energy, 88);
}

#[test]
fn test_game_envelope_push_round_trip() {
    let h = harness();
    let t = t0();
    let json = format!(
        r#"{{
            "widgetEnabled": true,
            "selectedPetId": "pet-9",
            "selectedPetData": {{
                "petName": "Tofu",
                "prefabName": "Pet_CatWhite",
                "energy": 64,
                "satiety": 48,
                "isBored": true
            }},
            "lastUpdateTime": "{}"
        }}"#,
        t.timestamp_millis()
    );

    // Delivered a few seconds after the game captured it.
    let received = t + Duration::seconds(3);
    assert!(h.service.ingest_payload_at(&json, received).unwrap());
    assert_eq!(h.live.get().unwrap().unwrap().pet_id, "pet-9");
    assert_eq!(h.baseline.load().unwrap().unwrap().captured_at, received);

    // The baseline is now newer than the snapshot, so decay runs from receipt.
    let resolved = h.service.resolve_at(received + Duration::seconds(599)).unwrap();
    assert_eq!(resolved.source, StateSource::Offline);
    assert_eq!(resolved.state.pet_id, "pet-9");
    assert_eq!(resolved.state.energy, 64);
    assert!(resolved.state.is_bored);

    let later = h.service.resolve_at(received + Duration::seconds(600)).unwrap();
    assert_eq!(later.source, StateSource::Offline);
    assert!(!later.state.is_bored);
    assert_eq!(later.state.satiety, 47);
}

#[test]
fn test_unreadable_baseline_is_an_error_not_a_default() {
    let h = harness();
    let t = t0();
    h.live.put(&pet(t, 90, 80)).unwrap();
    fs_err::create_dir_all(h.storage.baseline_file()).unwrap();

    let err = h.service.resolve_at(t + Duration::seconds(5)).unwrap_err();
    assert!(matches!(err, PetError::Io { .. }));
    assert!(matches!(
        h.service.refresh_offline_at(t),
        Err(PetError::Io { .. })
    ));
}
