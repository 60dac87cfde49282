//! A stateful in-memory farm service.
//!
//! Behaves like a small farm server: filtered and by-id fetches read
//! from a mutable log set, sends assign ids and restamp the stored
//! copy, and reference data is settable per fixture.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::Mutex;

use furrow_record::{RemoteId, Timestamp, WireLog};
use furrow_sync::{Area, FarmAsset, LogFilter, LogService, SendReceipt, ServiceError, Term};

/// An in-memory farm server. Every call succeeds.
///
/// Accepted sends take the next sequential id (or keep the one they
/// carry), are stamped with the settable server clock, and get their
/// notes wrapped in the paragraph markup the real server adds.
pub struct MemoryLogService {
    logs: Mutex<Vec<WireLog>>,
    next_id: AtomicI64,
    server_time: AtomicI64,
    areas: Mutex<Vec<Area>>,
    assets: Mutex<Vec<FarmAsset>>,
    terms: Mutex<HashMap<String, Vec<Term>>>,
    tokens_seen: Mutex<Vec<String>>,
}

impl MemoryLogService {
    /// Creates an empty farm with its clock at zero.
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            server_time: AtomicI64::new(0),
            areas: Mutex::new(Vec::new()),
            assets: Mutex::new(Vec::new()),
            terms: Mutex::new(HashMap::new()),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    /// Sets the stamp applied to records the farm accepts.
    pub fn set_server_time(&self, at: Timestamp) {
        self.server_time.store(at, Ordering::SeqCst);
    }

    /// Adds a server-side record as given, assigning an id if absent.
    pub fn seed_log(&self, mut log: WireLog) -> RemoteId {
        let id = match log.id {
            Some(id) => {
                // Keep the id counter ahead of seeded ids.
                self.next_id.fetch_max(id.0 + 1, Ordering::SeqCst);
                id
            }
            None => RemoteId(self.next_id.fetch_add(1, Ordering::SeqCst)),
        };
        log.id = Some(id);
        if log.url.is_none() {
            log.url = Some(uri_of(id));
        }
        self.logs.lock().push(log);
        id
    }

    /// A copy of every server-side record.
    pub fn logs(&self) -> Vec<WireLog> {
        self.logs.lock().clone()
    }

    /// The server-side record with the given id.
    pub fn log(&self, id: RemoteId) -> Option<WireLog> {
        self.logs.lock().iter().find(|log| log.id == Some(id)).cloned()
    }

    /// Replaces the farm's areas.
    pub fn set_areas(&self, areas: Vec<Area>) {
        *self.areas.lock() = areas;
    }

    /// Replaces the farm's assets.
    pub fn set_assets(&self, assets: Vec<FarmAsset>) {
        *self.assets.lock() = assets;
    }

    /// Replaces the terms of one vocabulary.
    pub fn set_terms(&self, vocabulary: &str, terms: Vec<Term>) {
        self.terms.lock().insert(vocabulary.to_string(), terms);
    }

    /// Tokens presented by sends, in call order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().clone()
    }
}

impl Default for MemoryLogService {
    fn default() -> Self {
        Self::new()
    }
}

impl LogService for MemoryLogService {
    fn get_logs(&self, filter: &LogFilter) -> Result<Vec<WireLog>, ServiceError> {
        Ok(self
            .logs
            .lock()
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect())
    }

    fn get_logs_by_id(&self, ids: &[RemoteId]) -> Result<Vec<WireLog>, ServiceError> {
        let logs = self.logs.lock();
        Ok(ids
            .iter()
            .filter_map(|id| logs.iter().find(|log| log.id == Some(*id)).cloned())
            .collect())
    }

    fn send_log(&self, log: &WireLog, token: &str) -> Result<SendReceipt, ServiceError> {
        self.tokens_seen.lock().push(token.to_string());

        let id = match log.id {
            Some(id) => id,
            None => RemoteId(self.next_id.fetch_add(1, Ordering::SeqCst)),
        };

        let mut accepted = log.clone();
        accepted.id = Some(id);
        accepted.changed = Some(self.server_time.load(Ordering::SeqCst));
        accepted.url = Some(uri_of(id));
        // The server hands notes back wrapped in paragraph markup.
        let text = accepted.notes.value.take().unwrap_or_default();
        accepted.notes.value = Some(format!("<p>{}</p>\n", text));

        let mut logs = self.logs.lock();
        match logs.iter_mut().find(|stored| stored.id == Some(id)) {
            Some(stored) => *stored = accepted,
            None => logs.push(accepted),
        }

        Ok(SendReceipt {
            id,
            uri: uri_of(id),
        })
    }

    fn get_areas(&self) -> Result<Vec<Area>, ServiceError> {
        Ok(self.areas.lock().clone())
    }

    fn get_assets(&self) -> Result<Vec<FarmAsset>, ServiceError> {
        Ok(self.assets.lock().clone())
    }

    fn get_terms(&self, vocabulary: &str) -> Result<Vec<Term>, ServiceError> {
        Ok(self.terms.lock().get(vocabulary).cloned().unwrap_or_default())
    }
}

fn uri_of(id: RemoteId) -> String {
    format!("farm/log/{}", id)
}
