mod common;

use common::{fixed_now, member, war_member, war_snapshot};

use activity_sync::period::EventType;
use activity_sync::reconcile::reconcile;
use activity_sync::store::repo::{HistoryRepo, JsonFileRepo, StoreError};
use activity_sync::store::HistoryStore;
use serde_json::json;

fn reconciled_store() -> HistoryStore {
    let roster = vec![member("#P1", "Ann"), member("#P2", "Bob")];
    let snapshot = war_snapshot(
        "20240601",
        2,
        vec![war_member("#P1", "Ann", &[(2, 45.5)])],
    );
    reconcile(HistoryStore::default(), &roster, &snapshot, 6, fixed_now()).0
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepo::new(dir.path());
    let store = reconciled_store();

    repo.save(EventType::War, &store).unwrap();
    let loaded = repo.load(EventType::War).unwrap();

    assert_eq!(loaded, store);
    assert!(dir.path().join("war_logs/player_stats_war.json").is_file());
    // The staging file never outlives a successful save.
    assert!(!dir.path().join("war_logs/player_stats_war.json.tmp").exists());
}

#[test]
fn missing_store_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepo::new(dir.path());

    let store = repo.load(EventType::Raid).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.last_updated, None);
}

#[test]
fn corrupted_store_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepo::new(dir.path());
    std::fs::create_dir_all(dir.path().join("war_logs")).unwrap();
    std::fs::write(repo.store_path(EventType::War), "{ not json").unwrap();

    let err = repo.load(EventType::War).unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }));
}

#[test]
fn stores_are_kept_apart_per_event_type() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepo::new(dir.path());

    repo.save(EventType::War, &reconciled_store()).unwrap();
    assert!(repo.load(EventType::Raid).unwrap().is_empty());
}

#[test]
fn persisted_document_matches_the_wire_contract() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepo::new(dir.path());
    repo.save(EventType::War, &reconciled_store()).unwrap();

    let raw = std::fs::read_to_string(repo.store_path(EventType::War)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(
        value,
        json!({
            "#P1": {
                "name": "Ann",
                "tag": "#P1",
                "history": [{
                    "date": "20240601",
                    "attacksUsed": 1,
                    "starsEarned": 2,
                    "destruction": 45.5,
                    "attacksMissed": 1,
                    "participated": true
                }]
            },
            "#P2": {
                "name": "Bob",
                "tag": "#P2",
                "history": [{
                    "date": "20240601",
                    "attacksUsed": "unavailable",
                    "starsEarned": "unavailable",
                    "destruction": "unavailable",
                    "attacksMissed": 0,
                    "participated": false
                }]
            },
            "lastUpdated": "2024-08-01T06:00:00Z"
        })
    );
}
