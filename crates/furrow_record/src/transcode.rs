//! Conversions between the store, wire, and cache shapes.

use serde_json::Value;

use crate::cached::CachedLog;
use crate::draft::LogDraft;
use crate::error::RecordResult;
use crate::field::{Field, Timestamp};
use crate::normalize;
use crate::record::{LogRecord, SEEDING_TYPE};
use crate::wire::{DoneFlag, WireLog, WireNotes};

// Inline attachment payloads are data URIs; anything else is a
// stored-file reference the server knows by id.
fn is_inline_payload(image: &str) -> bool {
    image.starts_with('d')
}

impl LogRecord {
    /// Builds a canonical record from partial input.
    ///
    /// Absent fields take the defaults of [`LogRecord::default`].
    /// Collection fields are coerced from structured values or
    /// JSON-serialized strings, attachments are normalized, and the
    /// location fields are dropped when the drafted type is a seeding.
    ///
    /// # Errors
    ///
    /// [`RecordError::MalformedInput`](crate::RecordError) when a
    /// collection, movement, or attachment value fits none of the
    /// accepted shapes.
    pub fn create(draft: LogDraft) -> RecordResult<Self> {
        let base = LogRecord::default();

        let log_type = draft.log_type.unwrap_or(base.log_type);
        let seeding = log_type.data == SEEDING_TYPE;

        let images = match draft.images {
            None => base.images,
            Some(envelope) => Field {
                data: normalize::image_list("images", envelope.data)?,
                changed: envelope.changed,
            },
        };
        let movement = match draft.movement {
            None => base.movement,
            Some(envelope) => Field {
                data: normalize::movement("movement", envelope.data)?,
                changed: envelope.changed,
            },
        };
        let area = if seeding {
            None
        } else {
            Some(coerce_list("area", draft.area)?)
        };
        let geofield = if seeding {
            None
        } else {
            Some(coerce_list("geofield", draft.geofield)?)
        };

        Ok(Self {
            id: draft.id,
            local_id: draft.local_id,
            log_owner: draft.log_owner.unwrap_or(base.log_owner),
            name: draft.name.unwrap_or(base.name),
            log_type,
            timestamp: draft.timestamp.unwrap_or(base.timestamp),
            notes: draft.notes.unwrap_or(base.notes),
            quantity: coerce_list("quantity", draft.quantity)?,
            log_category: coerce_list("log_category", draft.log_category)?,
            equipment: coerce_list("equipment", draft.equipment)?,
            asset: coerce_list("asset", draft.asset)?,
            images,
            done: draft.done.unwrap_or(base.done),
            movement,
            area,
            geofield,
            is_cached_locally: draft.is_cached_locally.unwrap_or(false),
            is_ready_to_sync: draft.is_ready_to_sync.unwrap_or(false),
            was_pushed_to_server: draft.was_pushed_to_server.unwrap_or(false),
            remote_uri: draft.remote_uri.unwrap_or_default(),
        })
    }

    /// Flattens the record for sending.
    ///
    /// `done` goes out as 1/0, notes gain their format wrapper,
    /// stored-file attachment refs become `{"fid": ...}` objects while
    /// inline payloads pass through as strings, `id` rides only when
    /// assigned, and seedings lose their location fields.
    pub fn to_wire(&self) -> WireLog {
        let images = self
            .images
            .data
            .iter()
            .map(|image| {
                if is_inline_payload(image) {
                    Value::String(image.clone())
                } else {
                    serde_json::json!({ "fid": image })
                }
            })
            .collect();

        let seeding = self.is_seeding();
        WireLog {
            id: self.id,
            changed: None,
            name: self.name.data.clone(),
            log_type: self.log_type.data.clone(),
            timestamp: self.timestamp.data.clone(),
            done: DoneFlag(self.done.data),
            log_owner: self.log_owner.data.clone(),
            notes: WireNotes::new(self.notes.data.clone()),
            images: Some(Value::Array(images)),
            asset: self.asset.data.clone(),
            quantity: self.quantity.data.clone(),
            log_category: self.log_category.data.clone(),
            equipment: self.equipment.data.clone(),
            movement: Some(self.movement.data.clone()),
            area: if seeding {
                None
            } else {
                self.area.as_ref().map(|field| field.data.clone())
            },
            geofield: if seeding {
                None
            } else {
                self.geofield.as_ref().map(|field| field.data.clone())
            },
            url: None,
        }
    }

    /// Rebuilds a store record from a server response.
    ///
    /// Every envelope is stamped `received_at`, notes lose their
    /// markup wrapper, attachments are normalized, `done` is decoded
    /// from its wire encoding, and the flags record that the server
    /// holds this revision (`was_pushed_to_server`) while the durable
    /// cache does not yet (`is_cached_locally` false). `local_id` is
    /// never populated from the wire.
    ///
    /// # Errors
    ///
    /// [`RecordError::MalformedInput`](crate::RecordError) when the
    /// attachment field fits none of the accepted shapes.
    pub fn from_wire(wire: &WireLog, received_at: Timestamp) -> RecordResult<Self> {
        let seeding = wire.log_type == SEEDING_TYPE;

        let images = match &wire.images {
            None => Vec::new(),
            Some(value) => normalize::image_list("images", value.clone())?,
        };
        let area = if seeding {
            None
        } else {
            wire.area
                .as_ref()
                .map(|data| Field::stamped(data.clone(), received_at))
        };
        let geofield = if seeding {
            None
        } else {
            wire.geofield
                .as_ref()
                .map(|data| Field::stamped(data.clone(), received_at))
        };

        Ok(Self {
            id: wire.id,
            local_id: None,
            log_owner: Field::stamped(wire.log_owner.clone(), received_at),
            name: Field::stamped(wire.name.clone(), received_at),
            log_type: Field::stamped(wire.log_type.clone(), received_at),
            timestamp: Field::stamped(wire.timestamp.clone(), received_at),
            notes: Field::stamped(
                normalize::server_notes(wire.notes.value.as_deref()),
                received_at,
            ),
            quantity: Field::stamped(wire.quantity.clone(), received_at),
            log_category: Field::stamped(wire.log_category.clone(), received_at),
            equipment: Field::stamped(wire.equipment.clone(), received_at),
            asset: Field::stamped(wire.asset.clone(), received_at),
            images: Field::stamped(images, received_at),
            done: Field::stamped(wire.done.0, received_at),
            movement: Field::stamped(wire.movement.clone().unwrap_or_default(), received_at),
            area,
            geofield,
            is_cached_locally: false,
            is_ready_to_sync: false,
            was_pushed_to_server: true,
            remote_uri: wire.url.clone().unwrap_or_default(),
        })
    }

    /// Projects the record into its durable cache shape.
    ///
    /// Envelopes pass through untouched, identities ride only when
    /// assigned, and seedings lose their location fields.
    pub fn to_cached(&self) -> CachedLog {
        let seeding = self.is_seeding();
        CachedLog {
            id: self.id,
            local_id: self.local_id.clone(),
            log_owner: self.log_owner.clone(),
            name: self.name.clone(),
            log_type: self.log_type.clone(),
            timestamp: self.timestamp.clone(),
            notes: self.notes.clone(),
            quantity: self.quantity.clone(),
            log_category: self.log_category.clone(),
            equipment: self.equipment.clone(),
            asset: self.asset.clone(),
            images: self.images.clone(),
            done: self.done.clone(),
            movement: self.movement.clone(),
            area: if seeding { None } else { self.area.clone() },
            geofield: if seeding { None } else { self.geofield.clone() },
            is_ready_to_sync: self.is_ready_to_sync,
            was_pushed_to_server: self.was_pushed_to_server,
            remote_uri: self.remote_uri.clone(),
        }
    }
}

fn coerce_list(
    field: &'static str,
    drafted: Option<Field<Value>>,
) -> RecordResult<Field<Vec<Value>>> {
    match drafted {
        None => Ok(Field::default()),
        Some(envelope) => Ok(Field {
            data: normalize::object_list(field, envelope.data)?,
            changed: envelope.changed,
        }),
    }
}
