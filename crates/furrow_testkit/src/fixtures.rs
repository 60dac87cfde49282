//! Canned drafts, records, wire logs, and a wired-up sync harness.

use std::sync::Arc;

use serde_json::json;

use furrow_record::{
    DoneFlag, Field, LogDraft, LogRecord, RemoteId, Timestamp, WireLog, WireNotes,
};
use furrow_sync::{FixedClock, MemoryLogStore, SyncEngine};

use crate::farm::MemoryLogService;

/// A drafted activity log with its edited envelopes stamped `at`.
pub fn activity_draft(name: &str, at: Timestamp) -> LogDraft {
    LogDraft {
        name: Some(Field::stamped(name.to_string(), at)),
        log_type: Some(Field::new("farm_activity".to_string())),
        notes: Some(Field::stamped(format!("notes for {}", name), at)),
        quantity: Some(Field::stamped(json!([{ "measure": "time", "value": 1 }]), at)),
        ..LogDraft::default()
    }
}

/// A store record built from [`activity_draft`], marked ready to push.
pub fn ready_activity(name: &str, at: Timestamp) -> LogRecord {
    let mut record = LogRecord::create(activity_draft(name, at)).expect("draft is well formed");
    record.is_ready_to_sync = true;
    record
}

/// A server-shaped wire record: wrapped notes, change stamp, url.
pub fn server_wire(id: i64, changed: Timestamp, name: &str) -> WireLog {
    WireLog {
        id: Some(RemoteId(id)),
        changed: Some(changed),
        name: name.to_string(),
        log_type: "farm_activity".to_string(),
        timestamp: changed.to_string(),
        done: DoneFlag(true),
        notes: WireNotes::new(format!("<p>notes for {}</p>\n", name)),
        url: Some(format!("farm/log/{}", id)),
        ..WireLog::default()
    }
}

/// A full sync pipeline wired over in-memory fakes.
pub struct SyncHarness {
    /// The fake farm behind the engine.
    pub farm: Arc<MemoryLogService>,
    /// The store the engine reconciles.
    pub store: Arc<MemoryLogStore>,
    /// The clock stamping pulled envelopes.
    pub clock: Arc<FixedClock>,
    /// The engine under test.
    pub engine: SyncEngine<MemoryLogService, MemoryLogStore, FixedClock>,
}

impl SyncHarness {
    /// Creates a harness with the client clock at `now`.
    pub fn at(now: Timestamp) -> Self {
        let farm = Arc::new(MemoryLogService::new());
        let store = Arc::new(MemoryLogStore::new());
        let clock = Arc::new(FixedClock::at(now));
        let engine = SyncEngine::with_shared(farm.clone(), store.clone(), clock.clone());
        Self {
            farm,
            store,
            clock,
            engine,
        }
    }
}
