//! # Furrow Record
//!
//! Farm log record shapes and transcoding.
//!
//! A log lives in three renditions:
//! - the **store shape** ([`LogRecord`]): held in memory, every
//!   agronomic field wrapped in a [`Field`] envelope carrying its
//!   local edit stamp;
//! - the **wire shape** ([`WireLog`]): the flattened JSON the farm
//!   server exchanges;
//! - the **cache shape** ([`CachedLog`]): what the durable cache
//!   persists between sessions.
//!
//! Four conversions connect them: [`LogRecord::create`] builds a
//! canonical record from partial input, [`LogRecord::to_wire`] and
//! [`LogRecord::from_wire`] cross the server boundary, and
//! [`LogRecord::to_cached`] projects the durable shape. One rule holds
//! in every produced shape: seeding logs never carry location fields.
//!
//! This crate does no I/O and reads no clocks; conversion stamps are
//! passed in by the caller.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cached;
mod draft;
mod error;
mod field;
mod ids;
mod normalize;
mod record;
mod transcode;
mod wire;

pub use cached::CachedLog;
pub use draft::LogDraft;
pub use error::{RecordError, RecordResult};
pub use field::{Field, Timestamp};
pub use ids::{LocalId, RemoteId};
pub use record::{LogRecord, Movement, SEEDING_TYPE};
pub use wire::{DoneFlag, WireLog, WireNotes, NOTES_FORMAT};
