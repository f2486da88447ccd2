//! Record wire formats.
//!
//! A store file and a dump file carry the same payload but different
//! participant ids: inside a store, the first id is implicit from the
//! record's position, so only the second id is written. The two formats
//! are uninhabited marker types used as type parameters, which makes
//! mixing them between a writer and a reader a compile error.

use crate::id::ReadId;

/// Wire layout of a record's explicit participant identifiers.
pub trait RecordFormat: 'static {
    /// Number of 32-bit words the explicit ids occupy on the wire.
    const ID_WORDS: usize;

    /// Human-readable format name, for diagnostics and tooling.
    const NAME: &'static str;

    /// Encodes the explicit ids into the first
    /// [`ID_WORDS`](Self::ID_WORDS) words of `out`.
    fn encode_ids(a_id: ReadId, b_id: ReadId, out: &mut [u32]);

    /// Decodes the explicit ids from the first
    /// [`ID_WORDS`](Self::ID_WORDS) words of `words`.
    ///
    /// Formats that do not carry an id on the wire leave the corresponding
    /// output untouched.
    fn decode_ids(words: &[u32], a_id: &mut ReadId, b_id: &mut ReadId);
}

/// Store ("normal") format: the first id is implicit from store position
/// and only the second id is written.
#[derive(Debug)]
pub enum StoreFormat {}

impl RecordFormat for StoreFormat {
    const ID_WORDS: usize = 1;
    const NAME: &'static str = "store";

    fn encode_ids(_a_id: ReadId, b_id: ReadId, out: &mut [u32]) {
        out[0] = b_id.as_u32();
    }

    fn decode_ids(words: &[u32], _a_id: &mut ReadId, b_id: &mut ReadId) {
        *b_id = ReadId::new(words[0]);
    }
}

/// Dump ("full") format: both participant ids are written explicitly.
/// Only this format supports the per-participant count side-channel.
#[derive(Debug)]
pub enum DumpFormat {}

impl RecordFormat for DumpFormat {
    const ID_WORDS: usize = 2;
    const NAME: &'static str = "dump";

    fn encode_ids(a_id: ReadId, b_id: ReadId, out: &mut [u32]) {
        out[0] = a_id.as_u32();
        out[1] = b_id.as_u32();
    }

    fn decode_ids(words: &[u32], a_id: &mut ReadId, b_id: &mut ReadId) {
        *a_id = ReadId::new(words[0]);
        *b_id = ReadId::new(words[1]);
    }
}
