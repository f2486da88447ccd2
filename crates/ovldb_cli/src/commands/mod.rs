//! CLI command implementations.

pub mod counts;
pub mod dump;
pub mod stats;

use clap::ValueEnum;

/// Which wire format to read a file with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileKind {
    /// Store format: the first id is implicit from position.
    Store,
    /// Dump format: both ids are on the wire.
    Dump,
}
