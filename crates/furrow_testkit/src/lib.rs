//! # Furrow Testkit
//!
//! Test utilities for the Furrow sync pipeline.
//!
//! This crate provides:
//! - Canned drafts, records, and server-shaped wire logs
//! - A stateful in-memory farm service and a wired-up sync harness
//! - Property-based generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use furrow_testkit::prelude::*;
//!
//! #[test]
//! fn pulls_from_the_fake_farm() {
//!     let harness = SyncHarness::at(1_000);
//!     harness.farm.seed_log(server_wire(1, 500, "spread compost"));
//!     harness.engine.pull(&LogFilter::all(), 0).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod farm;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::farm::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use farm::*;
pub use fixtures::*;
pub use generators::*;
