//! The canonical in-memory log record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::Field;
use crate::ids::{LocalId, RemoteId};

/// Log type whose records never carry location fields.
pub const SEEDING_TYPE: &str = "farm_seeding";

/// Asset movement recorded by a log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Destination areas, as server-defined term references.
    #[serde(default)]
    pub area: Vec<Value>,
    /// Geometry of the move, if recorded.
    #[serde(default)]
    pub geometry: String,
}

/// The store shape of a farm activity log.
///
/// Agronomic fields sit in [`Field`] envelopes; identities and
/// bookkeeping flags are plain values. This is the shape the client
/// holds in memory and the one classification and merge operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Server identity, present once the record has crossed the wire.
    pub id: Option<RemoteId>,
    /// Device-local identity, assigned by the persistence layer.
    pub local_id: Option<LocalId>,
    /// Owner reference as the server reports it.
    pub log_owner: Field<String>,
    /// Human-readable log name.
    pub name: Field<String>,
    /// Server log type, e.g. `farm_activity` or `farm_seeding`.
    pub log_type: Field<String>,
    /// The log's own event time, kept in the server's string encoding.
    pub timestamp: Field<String>,
    /// Free-form notes, markup already stripped.
    pub notes: Field<String>,
    /// Quantity measurements, server-defined objects.
    pub quantity: Field<Vec<Value>>,
    /// Category term references.
    pub log_category: Field<Vec<Value>>,
    /// Equipment asset references.
    pub equipment: Field<Vec<Value>>,
    /// Asset references the log applies to.
    pub asset: Field<Vec<Value>>,
    /// Attachment references: inline payloads or stored-file refs.
    pub images: Field<Vec<String>>,
    /// Completion flag.
    pub done: Field<bool>,
    /// Asset movement recorded by this log.
    pub movement: Field<Movement>,
    /// Areas the log touches. Absent on seedings.
    pub area: Option<Field<Vec<Value>>>,
    /// Geometries the log touches. Absent on seedings.
    pub geofield: Option<Field<Vec<Value>>>,
    /// Whether the durable cache holds this revision.
    pub is_cached_locally: bool,
    /// Whether the record is eligible for the next outbound push.
    pub is_ready_to_sync: bool,
    /// Whether the server has acknowledged the latest local revision.
    pub was_pushed_to_server: bool,
    /// Canonical server URI, empty until first acknowledged.
    pub remote_uri: String,
}

impl LogRecord {
    /// True for records of the seeding log type.
    pub fn is_seeding(&self) -> bool {
        self.log_type.data == SEEDING_TYPE
    }
}

impl Default for LogRecord {
    /// The canonical zero-value record: every envelope unedited,
    /// `done` true, location fields present and empty.
    fn default() -> Self {
        Self {
            id: None,
            local_id: None,
            log_owner: Field::default(),
            name: Field::default(),
            log_type: Field::default(),
            timestamp: Field::default(),
            notes: Field::default(),
            quantity: Field::default(),
            log_category: Field::default(),
            equipment: Field::default(),
            asset: Field::default(),
            images: Field::default(),
            done: Field::new(true),
            movement: Field::default(),
            area: Some(Field::default()),
            geofield: Some(Field::default()),
            is_cached_locally: false,
            is_ready_to_sync: false,
            was_pushed_to_server: false,
            remote_uri: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_canonical() {
        let record = LogRecord::default();
        assert!(record.id.is_none());
        assert!(record.local_id.is_none());
        assert!(record.done.data);
        assert!(record.done.changed.is_none());
        assert_eq!(record.quantity.data, Vec::<Value>::new());
        assert_eq!(record.area, Some(Field::new(Vec::new())));
        assert!(!record.is_ready_to_sync);
        assert!(!record.was_pushed_to_server);
        assert_eq!(record.remote_uri, "");
    }

    #[test]
    fn seeding_is_detected_by_type() {
        assert!(!LogRecord::default().is_seeding());
        let seeding = LogRecord {
            log_type: Field::new(SEEDING_TYPE.to_string()),
            ..LogRecord::default()
        };
        assert!(seeding.is_seeding());
    }
}
