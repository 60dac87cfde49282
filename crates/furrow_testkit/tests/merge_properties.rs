//! Property coverage for merge precedence and shape invariants.

use proptest::prelude::*;

use furrow_record::{Field, LogRecord, RemoteId, WireLog, WireNotes, SEEDING_TYPE};
use furrow_sync::{classify, resolve, Disposition};
use furrow_testkit::{record_strategy, stamp_strategy, wire_log_strategy};

proptest! {
    #[test]
    fn seeding_outputs_never_carry_locations(record in record_strategy()) {
        // Retyping an existing record leaves stale location fields
        // behind; every outbound shape still drops them.
        let mut record = record;
        record.log_type = Field::new(SEEDING_TYPE.to_string());

        let wire = record.to_wire();
        prop_assert!(wire.area.is_none());
        prop_assert!(wire.geofield.is_none());

        let cached = record.to_cached();
        prop_assert!(cached.area.is_none());
        prop_assert!(cached.geofield.is_none());

        let rebuilt = LogRecord::from_wire(&wire, 10).unwrap();
        prop_assert!(rebuilt.area.is_none());
        prop_assert!(rebuilt.geofield.is_none());
    }

    #[test]
    fn wire_round_trip_preserves_field_data(record in record_strategy()) {
        let mut wire = record.to_wire();
        // The server echoes notes back wrapped in paragraph markup.
        wire.notes = WireNotes::new(format!("<p>{}</p>\n", record.notes.data));
        let rebuilt = LogRecord::from_wire(&wire, 999).unwrap();

        prop_assert_eq!(rebuilt.name.data, record.name.data);
        prop_assert_eq!(rebuilt.log_type.data, record.log_type.data);
        prop_assert_eq!(rebuilt.notes.data, record.notes.data);
        prop_assert_eq!(rebuilt.done.data, record.done.data);
        prop_assert_eq!(rebuilt.images.data, record.images.data);
        prop_assert_eq!(rebuilt.timestamp.data, record.timestamp.data);
        prop_assert_eq!(rebuilt.movement.data, record.movement.data);
    }

    #[test]
    fn merge_keeps_fields_edited_since_last_sync(
        local_stamp in stamp_strategy(),
        last_sync in 0..1_000_000i64,
        wire in wire_log_strategy(5),
    ) {
        // Force a post-sync server change so the pair diverges.
        let mut wire = wire;
        wire.changed = Some(last_sync + 1);

        let local = LogRecord {
            id: Some(RemoteId(5)),
            name: Field {
                data: "local name".to_string(),
                changed: local_stamp,
            },
            was_pushed_to_server: false,
            ..LogRecord::default()
        };
        let store = vec![local];
        let class = classify(&wire, &store, last_sync);
        prop_assert_eq!(class.disposition(), Disposition::Diverged);

        let now = 2_000_000_001;
        let merged = resolve(&wire, &class, last_sync, now).unwrap();
        let local_wins = matches!(local_stamp, Some(stamp) if stamp >= last_sync);
        if local_wins {
            prop_assert_eq!(&merged.name.data, "local name");
            prop_assert_eq!(merged.name.changed, local_stamp);
        } else {
            prop_assert_eq!(merged.name.data, wire.name.clone());
            prop_assert_eq!(merged.name.changed, Some(now));
        }
        // Completion always takes the server value, freshly stamped.
        prop_assert_eq!(merged.done, Field::stamped(wire.done.0, now));
        prop_assert!(merged.is_ready_to_sync);
        prop_assert!(!merged.was_pushed_to_server);
    }

    #[test]
    fn classification_is_total(
        pushed in any::<bool>(),
        changed in proptest::option::of(0..2_000_000_000i64),
        last_sync in 0..2_000_000_000i64,
    ) {
        let store = vec![LogRecord {
            id: Some(RemoteId(5)),
            was_pushed_to_server: pushed,
            ..LogRecord::default()
        }];
        let wire = WireLog {
            id: Some(RemoteId(5)),
            changed,
            ..WireLog::default()
        };

        let class = classify(&wire, &store, last_sync);
        let expected = match (pushed, changed.is_some_and(|c| c > last_sync)) {
            (true, false) => Disposition::Unchanged,
            (false, false) => Disposition::LocalOnly,
            (true, true) => Disposition::ServerOnly,
            (false, true) => Disposition::Diverged,
        };
        prop_assert_eq!(class.disposition(), expected);
    }
}
