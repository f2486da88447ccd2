//! Benchmark support for OvlDB.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
