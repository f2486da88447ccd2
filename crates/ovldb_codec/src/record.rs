//! The overlap record and whole-record encoding.

use crate::format::RecordFormat;
use crate::id::ReadId;
use crate::payload::PayloadCodec;

/// A stored relationship between two sequencing reads plus an opaque
/// alignment payload.
///
/// Both ids are always present in memory; whether `a_id` reaches the wire
/// depends on the record format (see [`crate::StoreFormat`] and
/// [`crate::DumpFormat`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlap<P> {
    /// First participant. Implicit from position in store files.
    pub a_id: ReadId,
    /// Second participant.
    pub b_id: ReadId,
    /// Opaque alignment payload.
    pub payload: P,
}

impl<P> Overlap<P> {
    /// Creates a new overlap record.
    #[must_use]
    pub const fn new(a_id: ReadId, b_id: ReadId, payload: P) -> Self {
        Self { a_id, b_id, payload }
    }
}

/// Returns the wire width of one record, in 32-bit words.
#[must_use]
pub const fn record_words<F: RecordFormat, P: PayloadCodec>() -> usize {
    F::ID_WORDS + P::WIRE_WORDS
}

/// Returns the wire width of one record, in bytes.
#[must_use]
pub const fn record_bytes<F: RecordFormat, P: PayloadCodec>() -> usize {
    record_words::<F, P>() * 4
}

/// Encodes one record into the front of `out`.
///
/// Returns the number of words consumed, always
/// [`record_words`]`::<F, P>()`.
///
/// # Panics
///
/// Panics if `out` is shorter than one record.
pub fn encode_record<F: RecordFormat, P: PayloadCodec>(
    overlap: &Overlap<P>,
    out: &mut [u32],
) -> usize {
    let (ids, payload) = out[..record_words::<F, P>()].split_at_mut(F::ID_WORDS);
    F::encode_ids(overlap.a_id, overlap.b_id, ids);
    overlap.payload.pack(payload);
    record_words::<F, P>()
}

/// Decodes one record from the front of `words` into `overlap`.
///
/// Fields the format does not carry on the wire are left untouched.
/// Returns the number of words consumed, always
/// [`record_words`]`::<F, P>()`.
///
/// # Panics
///
/// Panics if `words` is shorter than one record.
pub fn decode_record<F: RecordFormat, P: PayloadCodec>(
    words: &[u32],
    overlap: &mut Overlap<P>,
) -> usize {
    let (ids, payload) = words[..record_words::<F, P>()].split_at(F::ID_WORDS);
    F::decode_ids(ids, &mut overlap.a_id, &mut overlap.b_id);
    overlap.payload = P::unpack(payload);
    record_words::<F, P>()
}
