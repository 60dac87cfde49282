//! The per-field change envelope.
//!
//! Every agronomic field of a log record travels inside an envelope
//! pairing the value with the time it was last edited on this device.
//! The envelope is the unit of merge: two copies of a record are
//! reconciled field by field, never wholesale.

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch. Compared numerically everywhere.
pub type Timestamp = i64;

/// A field value paired with its local edit stamp.
///
/// `changed` is `None` only for fields never edited on this device.
/// A `Some` stamp records when the local copy diverged and decides,
/// against the last sync time, which side of a merge wins the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field<T> {
    /// The field value.
    pub data: T,
    /// When the value was last edited locally, if ever.
    #[serde(default)]
    pub changed: Option<Timestamp>,
}

impl<T> Field<T> {
    /// Creates an envelope for a value with no local edits.
    pub fn new(data: T) -> Self {
        Self { data, changed: None }
    }

    /// Creates an envelope stamped with an edit time.
    pub fn stamped(data: T, at: Timestamp) -> Self {
        Self {
            data,
            changed: Some(at),
        }
    }

    /// True if the field has ever been edited locally.
    pub fn is_edited(&self) -> bool {
        self.changed.is_some()
    }

    /// True if the field was edited at or after the given time.
    ///
    /// A never-edited field is not since anything.
    pub fn edited_since(&self, at: Timestamp) -> bool {
        matches!(self.changed, Some(changed) if changed >= at)
    }
}

impl<T: Default> Default for Field<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_stamp() {
        let field = Field::new("hay".to_string());
        assert_eq!(field.data, "hay");
        assert!(!field.is_edited());
    }

    #[test]
    fn stamped_records_edit_time() {
        let field = Field::stamped(true, 100);
        assert_eq!(field.changed, Some(100));
        assert!(field.is_edited());
    }

    #[test]
    fn edited_since_is_inclusive() {
        let field = Field::stamped(3, 150);
        assert!(field.edited_since(150));
        assert!(field.edited_since(100));
        assert!(!field.edited_since(151));
    }

    #[test]
    fn unedited_is_never_since() {
        let field: Field<Vec<i64>> = Field::default();
        assert!(!field.edited_since(0));
    }

    #[test]
    fn envelope_serializes_with_null_stamp() {
        let field = Field::new(String::new());
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json, serde_json::json!({ "data": "", "changed": null }));
    }
}
