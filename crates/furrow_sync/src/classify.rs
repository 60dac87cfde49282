//! Matching incoming server records against the client store.

use furrow_record::{LocalId, LogRecord, Timestamp, WireLog};

/// How one incoming server record relates to the client store.
///
/// Matching is by server identity: the first stored record carrying
/// the incoming record's id, in position order. Records without a
/// server id never match.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Client-only identity of the matched record, if it has one.
    pub local_id: Option<LocalId>,
    /// Store position of the matched record.
    pub store_index: Option<usize>,
    /// Whether the matched record holds edits the server has not seen.
    pub has_local_change: bool,
    /// Whether the server record changed after the last synchronization.
    pub has_server_change: bool,
    /// Snapshot of the matched record.
    pub local: Option<LogRecord>,
}

impl Classification {
    /// Collapses the match state into a merge disposition.
    pub fn disposition(&self) -> Disposition {
        match (
            self.store_index.is_some(),
            self.has_local_change,
            self.has_server_change,
        ) {
            (false, _, _) => Disposition::New,
            (true, false, false) => Disposition::Unchanged,
            (true, true, false) => Disposition::LocalOnly,
            (true, false, true) => Disposition::ServerOnly,
            (true, true, true) => Disposition::Diverged,
        }
    }
}

/// What a pull must do with one incoming server record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No stored counterpart; the record is appended.
    New,
    /// Neither side changed since the last synchronization.
    Unchanged,
    /// Only the client changed; the stored record stands.
    LocalOnly,
    /// Only the server changed; the stored record is overwritten.
    ServerOnly,
    /// Both sides changed; the records merge field by field.
    Diverged,
}

/// Classifies one incoming server record against the store contents.
///
/// A server stamp at or before `last_sync`, or no stamp at all, reads
/// as no server-side change.
pub fn classify(server: &WireLog, local: &[LogRecord], last_sync: Timestamp) -> Classification {
    let matched = server
        .id
        .and_then(|id| local.iter().enumerate().find(|(_, record)| record.id == Some(id)));

    let has_server_change =
        matched.is_some() && server.changed.is_some_and(|changed| changed > last_sync);

    match matched {
        Some((index, record)) => Classification {
            local_id: record.local_id.clone(),
            store_index: Some(index),
            has_local_change: !record.was_pushed_to_server,
            has_server_change,
            local: Some(record.clone()),
        },
        None => Classification {
            local_id: None,
            store_index: None,
            has_local_change: false,
            has_server_change,
            local: None,
        },
    }
}
