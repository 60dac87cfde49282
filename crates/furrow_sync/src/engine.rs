//! The pull/push orchestrator.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use furrow_record::{LogRecord, RemoteId, Timestamp, WireLog};

use crate::classify::{classify, Disposition};
use crate::clock::Clock;
use crate::error::{SyncError, SyncResult};
use crate::resolve::resolve;
use crate::service::{
    Area, FarmAsset, LogFilter, LogService, Term, CATEGORIES_VOCABULARY, EQUIPMENT_ASSET_TYPE,
    UNITS_VOCABULARY,
};
use crate::store::LogStore;

/// One store change computed by a pull.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreMutation {
    /// A record unknown to the store was appended.
    Append {
        /// The appended record.
        record: LogRecord,
    },
    /// The record at an existing position was overwritten.
    Replace {
        /// Store position overwritten.
        index: usize,
        /// The record now at that position.
        record: LogRecord,
    },
}

/// Store changes applied by one pull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullOutcome {
    /// Mutations in application order.
    pub mutations: Vec<StoreMutation>,
}

impl PullOutcome {
    /// Number of records the pull appended.
    pub fn appended(&self) -> usize {
        self.mutations
            .iter()
            .filter(|mutation| matches!(mutation, StoreMutation::Append { .. }))
            .count()
    }

    /// Number of records the pull overwrote.
    pub fn replaced(&self) -> usize {
        self.mutations
            .iter()
            .filter(|mutation| matches!(mutation, StoreMutation::Replace { .. }))
            .count()
    }

    /// True when the pull changed nothing.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Store positions whose sends the server acknowledged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOutcome {
    /// Settled positions, in attempt order.
    pub settled: Vec<usize>,
}

/// Reconciles the client store with the remote farm service.
///
/// One call is one reconciliation pass; the engine keeps no state of
/// its own between calls. Collaborators arrive as `Arc`s so the caller
/// can keep inspecting the store it handed over.
pub struct SyncEngine<S, T, C> {
    service: Arc<S>,
    store: Arc<T>,
    clock: Arc<C>,
}

impl<S: LogService, T: LogStore, C: Clock> SyncEngine<S, T, C> {
    /// Creates an engine owning its collaborators.
    pub fn new(service: S, store: T, clock: C) -> Self {
        Self {
            service: Arc::new(service),
            store: Arc::new(store),
            clock: Arc::new(clock),
        }
    }

    /// Creates an engine over already-shared collaborators.
    pub fn with_shared(service: Arc<S>, store: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            service,
            store,
            clock,
        }
    }

    /// The store the engine reconciles against.
    pub fn store(&self) -> &T {
        &self.store
    }

    /// Pulls server records and reconciles them into the store.
    ///
    /// Round one fetches everything matching `filter` and applies each
    /// record per its classification against a snapshot taken at pull
    /// start. Records the store knows by server id that the filter
    /// missed are refetched by id in a second round, which only
    /// updates matched records. `last_sync` divides stale local edits
    /// from defended ones.
    ///
    /// Mutations are applied to the store as computed and also
    /// returned for the caller's bookkeeping.
    ///
    /// # Errors
    ///
    /// [`SyncError::Pull`] when the service fails in either round,
    /// [`SyncError::Record`] when an incoming record fails
    /// normalization. Mutations applied before the failure stay
    /// applied.
    pub fn pull(&self, filter: &LogFilter, last_sync: Timestamp) -> SyncResult<PullOutcome> {
        let snapshot = self.store.snapshot();
        let now = self.clock.now();

        let incoming = self
            .service
            .get_logs(filter)
            .map_err(|source| SyncError::Pull { source })?;
        info!(fetched = incoming.len(), last_sync, "pull round one");

        let mut seen: HashSet<RemoteId> = incoming.iter().filter_map(|log| log.id).collect();

        let mut mutations = Vec::new();
        self.apply_incoming(&incoming, &snapshot, last_sync, now, false, &mut mutations)?;

        // Ids the store holds that the filter missed, deduplicated.
        let missed: Vec<RemoteId> = snapshot
            .iter()
            .filter_map(|record| record.id)
            .filter(|id| seen.insert(*id))
            .collect();

        if !missed.is_empty() {
            let refetched = self
                .service
                .get_logs_by_id(&missed)
                .map_err(|source| SyncError::Pull { source })?;
            info!(
                requested = missed.len(),
                fetched = refetched.len(),
                "pull round two"
            );
            self.apply_incoming(&refetched, &snapshot, last_sync, now, true, &mut mutations)?;
        }

        Ok(PullOutcome { mutations })
    }

    fn apply_incoming(
        &self,
        incoming: &[WireLog],
        snapshot: &[LogRecord],
        last_sync: Timestamp,
        now: Timestamp,
        update_only: bool,
        mutations: &mut Vec<StoreMutation>,
    ) -> SyncResult<()> {
        for log in incoming {
            let classification = classify(log, snapshot, last_sync);
            match classification.disposition() {
                Disposition::New => {
                    if update_only {
                        warn!(id = ?log.id, "refetched log has no local match");
                        continue;
                    }
                    let record = resolve(log, &classification, last_sync, now)?;
                    let index = self.store.append(record.clone());
                    debug!(index, id = ?record.id, "appended pulled log");
                    mutations.push(StoreMutation::Append { record });
                }
                Disposition::ServerOnly | Disposition::Diverged => {
                    let Some(index) = classification.store_index else {
                        continue;
                    };
                    let record = resolve(log, &classification, last_sync, now)?;
                    self.store.replace_at(&[index], &|_| record.clone())?;
                    debug!(index, id = ?record.id, "replaced stored log");
                    mutations.push(StoreMutation::Replace { index, record });
                }
                Disposition::Unchanged | Disposition::LocalOnly => {}
            }
        }
        Ok(())
    }

    /// Sends the records at `indices` and settles each acknowledgement.
    ///
    /// Every index is attempted regardless of earlier failures. A
    /// settled record takes the server's identity and URI and is
    /// marked pushed and no longer ready. `token` is an opaque auth
    /// credential passed through to the service.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnknownIndex`] before any send when an index is
    /// out of range, [`SyncError::Push`] naming the unsettled indices
    /// when any send fails. Settled indices stay settled either way.
    pub fn push(&self, indices: &[usize], token: &str) -> SyncResult<PushOutcome> {
        let len = self.store.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(SyncError::UnknownIndex { index });
        }

        let mut settled = Vec::new();
        let mut failed = Vec::new();
        let mut first_error: Option<_> = None;

        for &index in indices {
            let Some(record) = self.store.log_at(index) else {
                return Err(SyncError::UnknownIndex { index });
            };
            match self.service.send_log(&record.to_wire(), token) {
                Ok(receipt) => {
                    self.store.replace_at(&[index], &|mut record| {
                        record.id = Some(receipt.id);
                        record.remote_uri = receipt.uri.clone();
                        record.was_pushed_to_server = true;
                        record.is_ready_to_sync = false;
                        record
                    })?;
                    debug!(index, id = %receipt.id, "log settled on the server");
                    settled.push(index);
                }
                Err(error) => {
                    warn!(index, %error, "log failed to send");
                    failed.push(index);
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(source) => Err(SyncError::Push {
                indices: failed,
                source,
            }),
            None => Ok(PushOutcome { settled }),
        }
    }

    /// Clears the ready flag on one record so an aborted outbound
    /// attempt is not picked up again.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnknownIndex`] when the index is out of range.
    pub fn unready(&self, index: usize) -> SyncResult<()> {
        self.store.replace_at(&[index], &|mut record| {
            record.is_ready_to_sync = false;
            record
        })
    }

    /// Fetches the farm's areas.
    ///
    /// # Errors
    ///
    /// [`SyncError::Pull`] when the service fails.
    pub fn fetch_areas(&self) -> SyncResult<Vec<Area>> {
        let areas = self
            .service
            .get_areas()
            .map_err(|source| SyncError::Pull { source })?;
        info!(count = areas.len(), "fetched areas");
        Ok(areas)
    }

    /// Fetches the farm's assets.
    ///
    /// # Errors
    ///
    /// [`SyncError::Pull`] when the service fails.
    pub fn fetch_assets(&self) -> SyncResult<Vec<FarmAsset>> {
        let assets = self
            .service
            .get_assets()
            .map_err(|source| SyncError::Pull { source })?;
        info!(count = assets.len(), "fetched assets");
        Ok(assets)
    }

    /// Fetches the farm's assets filtered to equipment.
    ///
    /// # Errors
    ///
    /// [`SyncError::Pull`] when the service fails.
    pub fn fetch_equipment(&self) -> SyncResult<Vec<FarmAsset>> {
        let mut assets = self.fetch_assets()?;
        assets.retain(|asset| asset.asset_type == EQUIPMENT_ASSET_TYPE);
        Ok(assets)
    }

    /// Fetches the quantity unit terms.
    ///
    /// # Errors
    ///
    /// [`SyncError::Pull`] when the service fails.
    pub fn fetch_units(&self) -> SyncResult<Vec<Term>> {
        self.fetch_terms(UNITS_VOCABULARY)
    }

    /// Fetches the log category terms.
    ///
    /// # Errors
    ///
    /// [`SyncError::Pull`] when the service fails.
    pub fn fetch_categories(&self) -> SyncResult<Vec<Term>> {
        self.fetch_terms(CATEGORIES_VOCABULARY)
    }

    fn fetch_terms(&self, vocabulary: &str) -> SyncResult<Vec<Term>> {
        let terms = self
            .service
            .get_terms(vocabulary)
            .map_err(|source| SyncError::Pull { source })?;
        info!(vocabulary, count = terms.len(), "fetched vocabulary terms");
        Ok(terms)
    }
}
