//! The durable cache shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::Field;
use crate::ids::{LocalId, RemoteId};
use crate::record::Movement;

/// A log as the durable cache stores it.
///
/// Envelopes pass through from the store shape untouched; values stay
/// structured all the way down. `is_cached_locally` never appears here
/// (it describes the cache itself) and identities appear only once
/// assigned. Client-only flags keep their historical camelCase keys
/// while agronomic fields keep the server's snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLog {
    /// Server identity, when assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    /// Device-local identity, when assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocalId>,
    /// Owner reference.
    pub log_owner: Field<String>,
    /// Log name.
    pub name: Field<String>,
    /// Log type.
    #[serde(rename = "type")]
    pub log_type: Field<String>,
    /// Event time in the server's string encoding.
    pub timestamp: Field<String>,
    /// Notes text.
    pub notes: Field<String>,
    /// Quantity measurements.
    pub quantity: Field<Vec<Value>>,
    /// Category term references.
    pub log_category: Field<Vec<Value>>,
    /// Equipment references.
    pub equipment: Field<Vec<Value>>,
    /// Asset references.
    pub asset: Field<Vec<Value>>,
    /// Attachment references.
    pub images: Field<Vec<String>>,
    /// Completion flag.
    pub done: Field<bool>,
    /// Recorded movement.
    pub movement: Field<Movement>,
    /// Areas; absent on seedings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Field<Vec<Value>>>,
    /// Geometries; absent on seedings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geofield: Option<Field<Vec<Value>>>,
    /// Outbound eligibility flag.
    #[serde(rename = "isReadyToSync")]
    pub is_ready_to_sync: bool,
    /// Server acknowledgement flag.
    #[serde(rename = "wasPushedToServer")]
    pub was_pushed_to_server: bool,
    /// Canonical server URI.
    #[serde(rename = "remoteUri")]
    pub remote_uri: String,
}
