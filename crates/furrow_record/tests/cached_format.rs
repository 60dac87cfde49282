//! Durable cache format pinning.
//!
//! The cache shape is read back by later versions of the client, so
//! its JSON keys are load-bearing: historical camelCase client flags,
//! snake_case agronomic fields, and `type` for the log type. These
//! tests pin the key set and exercise a full file round trip.

use furrow_record::{CachedLog, Field, LocalId, LogDraft, LogRecord, RemoteId};
use serde_json::json;

fn sample_record() -> LogRecord {
    let draft = LogDraft {
        id: Some(RemoteId(5)),
        local_id: Some(LocalId::from("L1")),
        name: Some(Field::stamped("move heifers".to_string(), 120)),
        log_type: Some(Field::new("farm_activity".to_string())),
        notes: Some(Field::stamped("through the east gate".to_string(), 120)),
        movement: Some(Field::stamped(
            json!({ "area": [{ "tid": 3 }], "geometry": "POINT (2 2)" }),
            120,
        )),
        is_cached_locally: Some(true),
        is_ready_to_sync: Some(true),
        remote_uri: Some("farm/log/5".to_string()),
        ..LogDraft::default()
    };
    LogRecord::create(draft).unwrap()
}

#[test]
fn cache_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.json");

    let cached = sample_record().to_cached();
    let file = std::fs::File::create(&path).unwrap();
    serde_json::to_writer_pretty(file, &cached).unwrap();

    let reloaded: CachedLog =
        serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(reloaded, cached);
}

#[test]
fn cache_keys_are_stable() {
    let json = serde_json::to_value(sample_record().to_cached()).unwrap();
    let mut keys: Vec<String> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "area",
            "asset",
            "done",
            "equipment",
            "geofield",
            "id",
            "images",
            "isReadyToSync",
            "local_id",
            "log_category",
            "log_owner",
            "movement",
            "name",
            "notes",
            "quantity",
            "remoteUri",
            "timestamp",
            "type",
            "wasPushedToServer",
        ]
    );
}

#[test]
fn cache_envelope_layout_matches_history() {
    let json = serde_json::to_value(sample_record().to_cached()).unwrap();
    assert_eq!(
        json["name"],
        json!({ "data": "move heifers", "changed": 120 })
    );
    assert_eq!(json["type"]["data"], json!("farm_activity"));
    assert_eq!(json["done"], json!({ "data": true, "changed": null }));
}
