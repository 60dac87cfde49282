//! # Furrow Sync
//!
//! Two-way synchronization of farm activity logs.
//!
//! This crate provides:
//! - Classification of server records against the local store
//! - Field-level merge resolution driven by envelope stamps
//! - A pull/push orchestrator over trait-shaped collaborators
//! - The remote service and local store boundaries, with in-memory
//!   and scripted implementations for tests
//!
//! ## Architecture
//!
//! The engine reconciles three copies of every record: the in-memory
//! store (authoritative during a session), the durable cache, and the
//! remote server. A pull runs in two rounds: filtered records first,
//! then the locally known records the filter missed, update-only. A
//! push settles each record independently and applies the server's
//! receipt to the store.
//!
//! ## Key invariants
//!
//! - Merge is per field: a field edited locally at or after the last
//!   sync keeps its local value, everything else takes the server's
//! - Records are never removed or reordered, so store indices are
//!   stable for the life of a session
//! - A failed send never blocks or rolls back other sends
//! - Normalization failures are data errors and are never retried

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod clock;
mod engine;
mod error;
mod resolve;
mod service;
mod store;

pub use classify::{classify, Classification, Disposition};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{PullOutcome, PushOutcome, StoreMutation, SyncEngine};
pub use error::{ServiceError, SyncError, SyncResult};
pub use resolve::resolve;
pub use service::{
    Area, FarmAsset, LogFilter, LogService, MockLogService, SendReceipt, Term,
    CATEGORIES_VOCABULARY, EQUIPMENT_ASSET_TYPE, UNITS_VOCABULARY,
};
pub use store::{LogStore, MemoryLogStore};
