//! The wire shape exchanged with the farm server.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::field::Timestamp;
use crate::ids::RemoteId;
use crate::record::Movement;

/// Notes format tag the server expects on outbound records.
pub const NOTES_FORMAT: &str = "farm_format";

/// Completion flag in its wire encoding.
///
/// The server speaks 1/0 integers, though responses have carried
/// numeric strings and booleans; all of those decode. Encoding always
/// emits an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoneFlag(pub bool);

impl From<bool> for DoneFlag {
    fn from(done: bool) -> Self {
        Self(done)
    }
}

impl Serialize for DoneFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(self.0))
    }
}

struct DoneFlagVisitor;

impl Visitor<'_> for DoneFlagVisitor {
    type Value = DoneFlag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 0/1 integer, a numeric string, or a boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(DoneFlag(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DoneFlag(v == 1))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DoneFlag(v == 1))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DoneFlag(matches!(v.trim().parse::<i64>(), Ok(1))))
    }
}

impl<'de> Deserialize<'de> for DoneFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DoneFlagVisitor)
    }
}

/// Notes payload as the server exchanges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNotes {
    /// Server-side text format tag.
    #[serde(default)]
    pub format: String,
    /// Markup-wrapped text; null or absent when the log has none.
    #[serde(default)]
    pub value: Option<String>,
}

impl WireNotes {
    /// Wraps note text for sending.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            format: NOTES_FORMAT.to_string(),
            value: Some(value.into()),
        }
    }
}

impl Default for WireNotes {
    fn default() -> Self {
        Self {
            format: NOTES_FORMAT.to_string(),
            value: None,
        }
    }
}

/// A log as it crosses the wire.
///
/// Outbound construction fills only what the server accepts; inbound
/// parsing tolerates absent collections, and the server-only fields
/// (`changed`, `url`) ride along when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireLog {
    /// Server identity; omitted on first send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    /// Record-level server change stamp; inbound only.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_stamp"
    )]
    pub changed: Option<Timestamp>,
    /// Log name.
    #[serde(default)]
    pub name: String,
    /// Log type.
    #[serde(rename = "type", default)]
    pub log_type: String,
    /// Event time in the server's string encoding.
    #[serde(default)]
    pub timestamp: String,
    /// Completion flag, 1/0 on the wire.
    #[serde(default)]
    pub done: DoneFlag,
    /// Owner reference.
    #[serde(default)]
    pub log_owner: String,
    /// Notes with their format wrapper.
    #[serde(default)]
    pub notes: WireNotes,
    /// Attachments: inline payload strings or `{"fid": ...}` refs
    /// outbound; any accepted attachment shape inbound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Value>,
    /// Asset references.
    #[serde(default)]
    pub asset: Vec<Value>,
    /// Quantity measurements.
    #[serde(default)]
    pub quantity: Vec<Value>,
    /// Category term references.
    #[serde(default)]
    pub log_category: Vec<Value>,
    /// Equipment references.
    #[serde(default)]
    pub equipment: Vec<Value>,
    /// Recorded asset movement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<Movement>,
    /// Areas; omitted on seedings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Vec<Value>>,
    /// Geometries; omitted on seedings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geofield: Option<Vec<Value>>,
    /// Canonical record URI; inbound only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStamp {
    Number(i64),
    Text(String),
}

fn de_stamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawStamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawStamp::Number(n)) => Ok(Some(n)),
        Some(RawStamp::Text(s)) => s
            .trim()
            .parse::<Timestamp>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("change stamp is not numeric: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn done_flag_decodes_every_server_encoding() {
        for (raw, expected) in [
            ("1", true),
            ("0", false),
            ("\"1\"", true),
            ("\"0\"", false),
            ("\"weeding\"", false),
            ("true", true),
            ("false", false),
        ] {
            let flag: DoneFlag = serde_json::from_str(raw).unwrap();
            assert_eq!(flag.0, expected, "decoding {}", raw);
        }
    }

    #[test]
    fn done_flag_encodes_as_integer() {
        assert_eq!(serde_json::to_string(&DoneFlag(true)).unwrap(), "1");
        assert_eq!(serde_json::to_string(&DoneFlag(false)).unwrap(), "0");
    }

    #[test]
    fn change_stamp_decodes_from_string_or_number() {
        let from_number: WireLog = serde_json::from_value(json!({ "changed": 200 })).unwrap();
        assert_eq!(from_number.changed, Some(200));

        let from_string: WireLog = serde_json::from_value(json!({ "changed": "200" })).unwrap();
        assert_eq!(from_string.changed, Some(200));
    }

    #[test]
    fn absent_fields_default_inbound() {
        let wire: WireLog = serde_json::from_value(json!({ "name": "till east field" })).unwrap();
        assert_eq!(wire.name, "till east field");
        assert!(wire.quantity.is_empty());
        assert!(wire.id.is_none());
        assert!(wire.area.is_none());
        assert_eq!(wire.notes.value, None);
        assert!(!wire.done.0);
    }

    #[test]
    fn outbound_omits_absent_optionals() {
        let wire = WireLog {
            name: "spread compost".to_string(),
            ..WireLog::default()
        };
        let json = serde_json::to_value(&wire).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(!keys.contains(&"id"));
        assert!(!keys.contains(&"url"));
        assert!(!keys.contains(&"changed"));
        assert!(!keys.contains(&"area"));
        assert_eq!(json["done"], json!(0));
    }
}
