//! The remote farm service boundary.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use furrow_record::{RemoteId, WireLog};

use crate::error::ServiceError;

/// Vocabulary holding quantity unit terms.
pub const UNITS_VOCABULARY: &str = "farm_quantity_units";

/// Vocabulary holding log category terms.
pub const CATEGORIES_VOCABULARY: &str = "farm_log_categories";

/// Asset type marking equipment.
pub const EQUIPMENT_ASSET_TYPE: &str = "equipment";

/// Criteria for a filtered log fetch.
///
/// Empty criteria match everything. Real services apply the filter
/// server-side; in-memory services use [`LogFilter::matches`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Log types to include; empty means every type.
    #[serde(default)]
    pub log_types: Vec<String>,
    /// Completion state to require, if any.
    #[serde(default)]
    pub done: Option<bool>,
}

impl LogFilter {
    /// A filter matching every log.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the filter to the given log types.
    pub fn with_log_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the filter to one completion state.
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    /// Whether a wire record satisfies the criteria.
    pub fn matches(&self, log: &WireLog) -> bool {
        if !self.log_types.is_empty() && !self.log_types.iter().any(|t| *t == log.log_type) {
            return false;
        }
        if let Some(done) = self.done {
            if log.done.0 != done {
                return false;
            }
        }
        true
    }
}

/// Server acknowledgement of a sent log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Identity the server filed the record under.
    pub id: RemoteId,
    /// Canonical URI of the record.
    pub uri: String,
}

/// A named area of the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Server term identity.
    pub tid: i64,
    /// Area name.
    pub name: String,
    /// Geometries describing the area.
    #[serde(default)]
    pub geofield: Vec<Value>,
}

/// A farm asset: an animal, a planting, a piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmAsset {
    /// Server asset identity.
    pub id: i64,
    /// Asset name.
    pub name: String,
    /// Server asset type, e.g. `animal` or `equipment`.
    #[serde(rename = "type")]
    pub asset_type: String,
}

/// A taxonomy term, e.g. a quantity unit or a log category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Server term identity.
    pub tid: i64,
    /// Term name.
    pub name: String,
}

/// The remote farm service.
///
/// Transport details (endpoints, batching, serialization) live behind
/// this trait; the engine sees typed requests and [`ServiceError`]s.
/// Auth tokens are opaque pass-through strings.
pub trait LogService: Send + Sync {
    /// Fetches logs matching the filter.
    fn get_logs(&self, filter: &LogFilter) -> Result<Vec<WireLog>, ServiceError>;

    /// Fetches specific logs by server identity.
    fn get_logs_by_id(&self, ids: &[RemoteId]) -> Result<Vec<WireLog>, ServiceError>;

    /// Sends one log and returns the server's receipt.
    fn send_log(&self, log: &WireLog, token: &str) -> Result<SendReceipt, ServiceError>;

    /// Fetches every farm area.
    fn get_areas(&self) -> Result<Vec<Area>, ServiceError>;

    /// Fetches every farm asset.
    fn get_assets(&self) -> Result<Vec<FarmAsset>, ServiceError>;

    /// Fetches the terms of one vocabulary.
    fn get_terms(&self, vocabulary: &str) -> Result<Vec<Term>, ServiceError>;
}

/// Scripted service double for unit tests.
///
/// Log fetches and sends consume queued responses in order; reference
/// fetches replay a single set response. An unset response reads as a
/// dead server. Every call is recorded for assertion.
#[derive(Default)]
pub struct MockLogService {
    logs_responses: Mutex<VecDeque<Result<Vec<WireLog>, ServiceError>>>,
    logs_by_id_responses: Mutex<VecDeque<Result<Vec<WireLog>, ServiceError>>>,
    send_responses: Mutex<VecDeque<Result<SendReceipt, ServiceError>>>,
    areas_response: Mutex<Option<Result<Vec<Area>, ServiceError>>>,
    assets_response: Mutex<Option<Result<Vec<FarmAsset>, ServiceError>>>,
    terms_response: Mutex<Option<Result<Vec<Term>, ServiceError>>>,
    filters_seen: Mutex<Vec<LogFilter>>,
    ids_seen: Mutex<Vec<Vec<RemoteId>>>,
    sent: Mutex<Vec<(WireLog, String)>>,
    vocabularies_seen: Mutex<Vec<String>>,
}

impl MockLogService {
    /// Creates a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next [`LogService::get_logs`] call.
    pub fn queue_logs(&self, response: Result<Vec<WireLog>, ServiceError>) {
        self.logs_responses.lock().push_back(response);
    }

    /// Queues a response for the next [`LogService::get_logs_by_id`] call.
    pub fn queue_logs_by_id(&self, response: Result<Vec<WireLog>, ServiceError>) {
        self.logs_by_id_responses.lock().push_back(response);
    }

    /// Queues a response for the next [`LogService::send_log`] call.
    pub fn queue_send(&self, response: Result<SendReceipt, ServiceError>) {
        self.send_responses.lock().push_back(response);
    }

    /// Sets the response replayed by [`LogService::get_areas`].
    pub fn set_areas(&self, response: Result<Vec<Area>, ServiceError>) {
        *self.areas_response.lock() = Some(response);
    }

    /// Sets the response replayed by [`LogService::get_assets`].
    pub fn set_assets(&self, response: Result<Vec<FarmAsset>, ServiceError>) {
        *self.assets_response.lock() = Some(response);
    }

    /// Sets the response replayed by [`LogService::get_terms`].
    pub fn set_terms(&self, response: Result<Vec<Term>, ServiceError>) {
        *self.terms_response.lock() = Some(response);
    }

    /// Filters passed to [`LogService::get_logs`], in call order.
    pub fn filters_seen(&self) -> Vec<LogFilter> {
        self.filters_seen.lock().clone()
    }

    /// Id lists passed to [`LogService::get_logs_by_id`], in call order.
    pub fn ids_seen(&self) -> Vec<Vec<RemoteId>> {
        self.ids_seen.lock().clone()
    }

    /// Logs and tokens passed to [`LogService::send_log`], in call order.
    pub fn sent(&self) -> Vec<(WireLog, String)> {
        self.sent.lock().clone()
    }

    /// Vocabularies passed to [`LogService::get_terms`], in call order.
    pub fn vocabularies_seen(&self) -> Vec<String> {
        self.vocabularies_seen.lock().clone()
    }

    fn dead_server(method: &str) -> ServiceError {
        ServiceError::Network(format!("no scripted response for {}", method))
    }
}

impl LogService for MockLogService {
    fn get_logs(&self, filter: &LogFilter) -> Result<Vec<WireLog>, ServiceError> {
        self.filters_seen.lock().push(filter.clone());
        self.logs_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Self::dead_server("get_logs")))
    }

    fn get_logs_by_id(&self, ids: &[RemoteId]) -> Result<Vec<WireLog>, ServiceError> {
        self.ids_seen.lock().push(ids.to_vec());
        self.logs_by_id_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Self::dead_server("get_logs_by_id")))
    }

    fn send_log(&self, log: &WireLog, token: &str) -> Result<SendReceipt, ServiceError> {
        self.sent.lock().push((log.clone(), token.to_string()));
        self.send_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Self::dead_server("send_log")))
    }

    fn get_areas(&self) -> Result<Vec<Area>, ServiceError> {
        self.areas_response
            .lock()
            .clone()
            .unwrap_or_else(|| Err(Self::dead_server("get_areas")))
    }

    fn get_assets(&self) -> Result<Vec<FarmAsset>, ServiceError> {
        self.assets_response
            .lock()
            .clone()
            .unwrap_or_else(|| Err(Self::dead_server("get_assets")))
    }

    fn get_terms(&self, vocabulary: &str) -> Result<Vec<Term>, ServiceError> {
        self.vocabularies_seen.lock().push(vocabulary.to_string());
        self.terms_response
            .lock()
            .clone()
            .unwrap_or_else(|| Err(Self::dead_server("get_terms")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_of(log_type: &str, done: bool) -> WireLog {
        WireLog {
            log_type: log_type.to_string(),
            done: done.into(),
            ..WireLog::default()
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = LogFilter::all();
        assert!(filter.matches(&wire_of("farm_activity", true)));
        assert!(filter.matches(&wire_of("farm_seeding", false)));
    }

    #[test]
    fn filter_restricts_types_and_done() {
        let filter = LogFilter::all()
            .with_log_types(["farm_activity", "farm_harvest"])
            .with_done(true);
        assert!(filter.matches(&wire_of("farm_activity", true)));
        assert!(!filter.matches(&wire_of("farm_activity", false)));
        assert!(!filter.matches(&wire_of("farm_input", true)));
    }

    #[test]
    fn mock_replays_queued_responses_in_order() {
        let mock = MockLogService::new();
        mock.queue_logs(Ok(vec![wire_of("farm_activity", true)]));
        mock.queue_logs(Err(ServiceError::Network("down".into())));

        assert_eq!(mock.get_logs(&LogFilter::all()).unwrap().len(), 1);
        assert!(mock.get_logs(&LogFilter::all()).is_err());
        assert_eq!(mock.filters_seen().len(), 2);
    }

    #[test]
    fn mock_reads_as_dead_server_when_unscripted() {
        let mock = MockLogService::new();
        let err = mock.get_logs(&LogFilter::all()).unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn mock_records_sends_with_tokens() {
        let mock = MockLogService::new();
        mock.queue_send(Ok(SendReceipt {
            id: RemoteId(7),
            uri: "farm/log/7".into(),
        }));
        mock.send_log(&wire_of("farm_activity", true), "secret").unwrap();

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "secret");
    }
}
