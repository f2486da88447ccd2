//! # OvlDB Testkit
//!
//! Test utilities for OvlDB.
//!
//! This crate provides:
//! - Temporary-directory fixtures and overlap-file helpers
//! - Property-based test generators using proptest
//! - Whole-file round-trip properties for every payload layout
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ovldb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_temp_dir(|dir| {
//!         let records = sample_overlaps::<Payload32x5>(100);
//!         write_dump(&dir.join("asm.ovb"), &records, &small_config());
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
