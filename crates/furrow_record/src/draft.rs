//! Partial log input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::Field;
use crate::ids::{LocalId, RemoteId};

/// Partial input for building a canonical log record.
///
/// Every field is optional; absent fields take the canonical defaults
/// of [`LogRecord::default`](crate::LogRecord::default). Collection
/// and attachment fields carry raw [`Value`]s so producing layers may
/// hand over either structured data or a JSON-serialized string of
/// it; both are coerced by [`LogRecord::create`](crate::LogRecord::create).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogDraft {
    /// Server identity, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    /// Device-local identity, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocalId>,
    /// Owner reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_owner: Option<Field<String>>,
    /// Log name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Field<String>>,
    /// Log type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub log_type: Option<Field<String>>,
    /// Event time in the server's string encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Field<String>>,
    /// Notes text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Field<String>>,
    /// Quantity measurements, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Field<Value>>,
    /// Category references, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_category: Option<Field<Value>>,
    /// Equipment references, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Field<Value>>,
    /// Asset references, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Field<Value>>,
    /// Attachments in any accepted shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Field<Value>>,
    /// Completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<Field<bool>>,
    /// Movement payload, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<Field<Value>>,
    /// Areas, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Field<Value>>,
    /// Geometries, structured or serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geofield: Option<Field<Value>>,
    /// Whether the durable cache holds this revision.
    #[serde(
        rename = "isCachedLocally",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_cached_locally: Option<bool>,
    /// Whether the record is eligible for the next push.
    #[serde(
        rename = "isReadyToSync",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_ready_to_sync: Option<bool>,
    /// Whether the server has acknowledged the latest revision.
    #[serde(
        rename = "wasPushedToServer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub was_pushed_to_server: Option<bool>,
    /// Canonical server URI.
    #[serde(
        rename = "remoteUri",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_serializes_empty() {
        let json = serde_json::to_value(LogDraft::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn draft_reads_historical_keys() {
        let draft: LogDraft = serde_json::from_value(serde_json::json!({
            "type": { "data": "farm_activity", "changed": null },
            "isReadyToSync": true,
            "remoteUri": "farm/log/5",
        }))
        .unwrap();
        assert_eq!(draft.log_type.unwrap().data, "farm_activity");
        assert_eq!(draft.is_ready_to_sync, Some(true));
        assert_eq!(draft.remote_uri.as_deref(), Some("farm/log/5"));
    }
}
