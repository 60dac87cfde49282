//! Property-based generators for records and wire logs.
//!
//! Generated records honor the shape invariants (seedings carry no
//! location fields) so strategies compose without fixups.

use proptest::prelude::*;

use furrow_record::{
    DoneFlag, Field, LogRecord, RemoteId, Timestamp, WireLog, WireNotes, SEEDING_TYPE,
};

/// Strategy for epoch-second timestamps.
pub fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    0..2_000_000_000i64
}

/// Strategy for optional edit stamps.
pub fn stamp_strategy() -> impl Strategy<Value = Option<Timestamp>> {
    prop::option::of(timestamp_strategy())
}

/// Strategy for log types, seedings included.
pub fn log_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("farm_activity".to_string()),
        Just("farm_harvest".to_string()),
        Just("farm_input".to_string()),
        Just("farm_observation".to_string()),
        Just(SEEDING_TYPE.to_string()),
    ]
}

/// Strategy for log names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z ]{0,23}").expect("valid regex")
}

/// Strategy for note text, empty included.
pub fn notes_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ,.]{0,40}").expect("valid regex")
}

/// Strategy for attachment reference lists: stored-file refs and
/// inline data URIs.
pub fn images_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            prop::string::string_regex("[0-9]{1,4}").expect("valid regex"),
            prop::string::string_regex("files/[a-z]{1,8}\\.jpg").expect("valid regex"),
            Just("data:image/png;base64,AAAA".to_string()),
        ],
        0..3,
    )
}

/// Strategy for canonical store records.
pub fn record_strategy() -> impl Strategy<Value = LogRecord> {
    (
        (name_strategy(), stamp_strategy()),
        log_type_strategy(),
        (notes_strategy(), stamp_strategy()),
        any::<bool>(),
        images_strategy(),
        timestamp_strategy(),
    )
        .prop_map(
            |((name, name_stamp), log_type, (notes, notes_stamp), done, images, event)| {
                let seeding = log_type == SEEDING_TYPE;
                let mut record = LogRecord {
                    name: Field {
                        data: name,
                        changed: name_stamp,
                    },
                    log_type: Field::new(log_type),
                    timestamp: Field::new(event.to_string()),
                    notes: Field {
                        data: notes,
                        changed: notes_stamp,
                    },
                    done: Field::new(done),
                    images: Field::new(images),
                    ..LogRecord::default()
                };
                if seeding {
                    record.area = None;
                    record.geofield = None;
                }
                record
            },
        )
}

/// Strategy for server wire records carrying the given id.
pub fn wire_log_strategy(id: i64) -> impl Strategy<Value = WireLog> {
    (
        name_strategy(),
        log_type_strategy(),
        notes_strategy(),
        any::<bool>(),
        timestamp_strategy(),
    )
        .prop_map(move |(name, log_type, notes, done, changed)| WireLog {
            id: Some(RemoteId(id)),
            changed: Some(changed),
            name,
            log_type,
            timestamp: changed.to_string(),
            done: DoneFlag(done),
            notes: WireNotes::new(format!("<p>{}</p>\n", notes)),
            url: Some(format!("farm/log/{}", id)),
            ..WireLog::default()
        })
}
