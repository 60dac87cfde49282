//! Field-level reconciliation of incoming server records.

use serde_json::Value;

use furrow_record::{Field, LogRecord, RecordResult, Timestamp, WireLog};

use crate::classify::Classification;

/// Produces the post-pull rendition of one incoming server record.
///
/// Records without defended local edits take the server rendition
/// whole, keeping any assigned client identity. A diverged pair merges
/// field by field: envelopes edited at or after `last_sync` keep their
/// local value while the rest take the server's. Completion always
/// takes the server value stamped `now`, and the merged record comes
/// out ready to push and not yet cached.
///
/// # Errors
///
/// [`RecordError::MalformedInput`](furrow_record::RecordError) when
/// the server record's attachment field fits none of the accepted
/// shapes.
pub fn resolve(
    server: &WireLog,
    classification: &Classification,
    last_sync: Timestamp,
    now: Timestamp,
) -> RecordResult<LogRecord> {
    let incoming = LogRecord::from_wire(server, now)?;

    let Some(local) = classification
        .local
        .as_ref()
        .filter(|_| classification.has_local_change)
    else {
        let mut record = incoming;
        record.local_id = classification.local_id.clone();
        return Ok(record);
    };

    let mut merged = LogRecord {
        id: server.id,
        local_id: local.local_id.clone(),
        log_owner: newer(&local.log_owner, incoming.log_owner, last_sync),
        name: newer(&local.name, incoming.name, last_sync),
        log_type: newer(&local.log_type, incoming.log_type, last_sync),
        timestamp: newer(&local.timestamp, incoming.timestamp, last_sync),
        notes: newer(&local.notes, incoming.notes, last_sync),
        quantity: newer(&local.quantity, incoming.quantity, last_sync),
        log_category: newer(&local.log_category, incoming.log_category, last_sync),
        equipment: newer(&local.equipment, incoming.equipment, last_sync),
        asset: newer(&local.asset, incoming.asset, last_sync),
        images: newer(&local.images, incoming.images, last_sync),
        done: Field::stamped(server.done.0, now),
        movement: newer(&local.movement, incoming.movement, last_sync),
        area: newer_location(local.area.as_ref(), incoming.area, last_sync),
        geofield: newer_location(local.geofield.as_ref(), incoming.geofield, last_sync),
        is_cached_locally: false,
        is_ready_to_sync: true,
        was_pushed_to_server: false,
        remote_uri: incoming.remote_uri,
    };

    if merged.is_seeding() {
        merged.area = None;
        merged.geofield = None;
    } else {
        merged.area.get_or_insert_with(Field::default);
        merged.geofield.get_or_insert_with(Field::default);
    }

    Ok(merged)
}

// Ties on the sync stamp keep the local value.
fn newer<T: Clone>(local: &Field<T>, server: Field<T>, last_sync: Timestamp) -> Field<T> {
    if local.edited_since(last_sync) {
        local.clone()
    } else {
        server
    }
}

fn newer_location(
    local: Option<&Field<Vec<Value>>>,
    server: Option<Field<Vec<Value>>>,
    last_sync: Timestamp,
) -> Option<Field<Vec<Value>>> {
    match (local, server) {
        (Some(local), _) if local.edited_since(last_sync) => Some(local.clone()),
        (_, Some(server)) => Some(server),
        // Stale local value, nothing from the server: canonical empty.
        (Some(_), None) => Some(Field::default()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use furrow_record::{DoneFlag, LocalId, RemoteId, WireNotes, SEEDING_TYPE};
    use serde_json::json;

    use crate::classify::classify;

    const LAST_SYNC: Timestamp = 150;
    const NOW: Timestamp = 300;

    fn server_log(id: i64, changed: Timestamp) -> WireLog {
        WireLog {
            id: Some(RemoteId(id)),
            changed: Some(changed),
            name: "server name".to_string(),
            log_type: "farm_activity".to_string(),
            timestamp: "1533829800".to_string(),
            done: DoneFlag(true),
            notes: WireNotes::new("<p>server notes</p>\n".to_string()),
            quantity: vec![json!({ "measure": "weight", "value": 30 })],
            url: Some(format!("farm/log/{}", id)),
            ..WireLog::default()
        }
    }

    fn edited_local(id: i64) -> LogRecord {
        LogRecord {
            id: Some(RemoteId(id)),
            local_id: Some(LocalId::from("L1")),
            name: Field::stamped("local name".to_string(), 200),
            log_type: Field::stamped("farm_activity".to_string(), 90),
            notes: Field::stamped("stale notes".to_string(), 100),
            done: Field::stamped(false, 100),
            was_pushed_to_server: false,
            ..LogRecord::default()
        }
    }

    #[test]
    fn new_record_takes_the_server_rendition() {
        let wire = server_log(5, 200);
        let class = classify(&wire, &[], LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert_eq!(record, LogRecord::from_wire(&wire, NOW).unwrap());
        assert!(record.local_id.is_none());
        assert!(record.was_pushed_to_server);
        assert!(!record.is_ready_to_sync);
    }

    #[test]
    fn server_only_update_keeps_the_local_identity() {
        let wire = server_log(5, 200);
        let mut local = edited_local(5);
        local.was_pushed_to_server = true;
        let store = vec![local];
        let class = classify(&wire, &store, LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert_eq!(record.local_id, Some(LocalId::from("L1")));
        assert_eq!(record.name.data, "server name");
        assert_eq!(record.notes.data, "server notes");
        assert!(record.was_pushed_to_server);
    }

    #[test]
    fn diverged_pair_merges_field_by_field() {
        let wire = server_log(5, 200);
        let store = vec![edited_local(5)];
        let class = classify(&wire, &store, LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert_eq!(record.id, Some(RemoteId(5)));
        assert_eq!(record.local_id, Some(LocalId::from("L1")));
        // Edited after the last sync, the local name stands.
        assert_eq!(record.name, Field::stamped("local name".to_string(), 200));
        // Edited before the last sync, the notes take the server value.
        assert_eq!(record.notes, Field::stamped("server notes".to_string(), NOW));
        // Completion always takes the server value, freshly stamped.
        assert_eq!(record.done, Field::stamped(true, NOW));
        assert_eq!(record.remote_uri, "farm/log/5");
        assert!(record.is_ready_to_sync);
        assert!(!record.was_pushed_to_server);
        assert!(!record.is_cached_locally);
    }

    #[test]
    fn tie_on_the_sync_stamp_keeps_the_local_value() {
        let wire = server_log(5, 200);
        let mut local = edited_local(5);
        local.name = Field::stamped("edited at the sync".to_string(), LAST_SYNC);
        let store = vec![local];
        let class = classify(&wire, &store, LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert_eq!(record.name.data, "edited at the sync");
    }

    #[test]
    fn unedited_local_fields_take_the_server_value() {
        let wire = server_log(5, 200);
        let mut local = edited_local(5);
        local.quantity = Field::new(vec![json!({ "measure": "time", "value": 2 })]);
        let store = vec![local];
        let class = classify(&wire, &store, LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert_eq!(record.quantity.data, vec![json!({ "measure": "weight", "value": 30 })]);
        assert_eq!(record.quantity.changed, Some(NOW));
    }

    #[test]
    fn stale_location_with_no_server_value_resets_to_empty() {
        let mut wire = server_log(5, 200);
        wire.area = None;
        wire.geofield = None;
        let mut local = edited_local(5);
        local.area = Some(Field::stamped(vec![json!({ "tid": 4 })], 100));
        local.geofield = Some(Field::stamped(vec![json!({ "geom": "POINT (1 1)" })], 200));
        let store = vec![local];
        let class = classify(&wire, &store, LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert_eq!(record.area, Some(Field::default()));
        assert_eq!(
            record.geofield,
            Some(Field::stamped(vec![json!({ "geom": "POINT (1 1)" })], 200))
        );
    }

    #[test]
    fn merged_seeding_drops_location_fields() {
        let mut wire = server_log(5, 200);
        wire.log_type = SEEDING_TYPE.to_string();
        let mut local = edited_local(5);
        local.log_type = Field::new(SEEDING_TYPE.to_string());
        local.area = None;
        local.geofield = None;
        let store = vec![local];
        let class = classify(&wire, &store, LAST_SYNC);

        let record = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();
        assert!(record.is_seeding());
        assert!(record.area.is_none());
        assert!(record.geofield.is_none());
    }

    #[test]
    fn merging_twice_is_stable() {
        let wire = server_log(5, 200);
        let store = vec![edited_local(5)];
        let class = classify(&wire, &store, LAST_SYNC);
        let merged = resolve(&wire, &class, LAST_SYNC, NOW).unwrap();

        let store = vec![merged.clone()];
        let class = classify(&wire, &store, LAST_SYNC);
        let again = resolve(&wire, &class, LAST_SYNC, NOW + 60).unwrap();

        assert_eq!(again.name.data, merged.name.data);
        assert_eq!(again.notes.data, merged.notes.data);
        assert_eq!(again.done.data, merged.done.data);
        assert_eq!(again.quantity.data, merged.quantity.data);
        assert_eq!(again.local_id, merged.local_id);
    }
}
