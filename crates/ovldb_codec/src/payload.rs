//! Payload layouts and their wire packing.
//!
//! An overlap carries an opaque alignment payload whose shape is fixed at
//! build time. Three layouts exist; they differ in how many 32-bit words
//! they occupy on the wire and, for the 64-bit layout, in how each word is
//! split. The layouts are distinct types, so a reader and a writer can only
//! ever agree.

use std::fmt;

/// Wire packing for one payload layout.
///
/// Packing and unpacking are pure and total: `pack` fills exactly
/// [`WIRE_WORDS`](Self::WIRE_WORDS) words of `out`, `unpack` consumes
/// exactly that many words, and `unpack(pack(p)) == p` for every payload.
pub trait PayloadCodec: Copy + Default + PartialEq + Eq + fmt::Debug + 'static {
    /// Number of 32-bit words this payload occupies on the wire.
    const WIRE_WORDS: usize;

    /// Packs the payload into the first [`WIRE_WORDS`](Self::WIRE_WORDS)
    /// words of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `WIRE_WORDS`.
    fn pack(&self, out: &mut [u32]);

    /// Unpacks a payload from the first [`WIRE_WORDS`](Self::WIRE_WORDS)
    /// words of `words`.
    ///
    /// # Panics
    ///
    /// Panics if `words` is shorter than `WIRE_WORDS`.
    fn unpack(words: &[u32]) -> Self;
}

/// Five 32-bit payload words, stored on the wire as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Payload32x5(pub [u32; 5]);

impl PayloadCodec for Payload32x5 {
    const WIRE_WORDS: usize = 5;

    fn pack(&self, out: &mut [u32]) {
        out[..5].copy_from_slice(&self.0);
    }

    fn unpack(words: &[u32]) -> Self {
        let mut w = [0u32; 5];
        w.copy_from_slice(&words[..5]);
        Self(w)
    }
}

/// Three 64-bit payload words, each split into two 32-bit halves on the
/// wire, high half first. Values are unsigned; the split preserves them
/// exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Payload64x3(pub [u64; 3]);

impl PayloadCodec for Payload64x3 {
    const WIRE_WORDS: usize = 6;

    fn pack(&self, out: &mut [u32]) {
        for (i, word) in self.0.iter().enumerate() {
            out[2 * i] = (word >> 32) as u32;
            out[2 * i + 1] = *word as u32;
        }
    }

    fn unpack(words: &[u32]) -> Self {
        let mut w = [0u64; 3];
        for (i, word) in w.iter_mut().enumerate() {
            *word = (u64::from(words[2 * i]) << 32) | u64::from(words[2 * i + 1]);
        }
        Self(w)
    }
}

/// Eight 32-bit payload words, stored on the wire as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Payload32x8(pub [u32; 8]);

impl PayloadCodec for Payload32x8 {
    const WIRE_WORDS: usize = 8;

    fn pack(&self, out: &mut [u32]) {
        out[..8].copy_from_slice(&self.0);
    }

    fn unpack(words: &[u32]) -> Self {
        let mut w = [0u32; 8];
        w.copy_from_slice(&words[..8]);
        Self(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<P: PayloadCodec>(payload: P) {
        let mut wire = vec![0u32; P::WIRE_WORDS];
        payload.pack(&mut wire);
        assert_eq!(P::unpack(&wire), payload);
    }

    #[test]
    fn payload_32x5_roundtrip() {
        roundtrip(Payload32x5([1, 2, 3, u32::MAX, 0]));
    }

    #[test]
    fn payload_32x8_roundtrip() {
        roundtrip(Payload32x8([0, 1, 2, 3, 4, 5, 6, u32::MAX]));
    }

    #[test]
    fn payload_64x3_roundtrip() {
        roundtrip(Payload64x3([0, u64::MAX, 0x0123_4567_89ab_cdef]));
    }

    #[test]
    fn payload_64x3_splits_high_half_first() {
        let payload = Payload64x3([0x0123_4567_89ab_cdef, 0, u64::MAX]);
        let mut wire = [0u32; 6];
        payload.pack(&mut wire);
        assert_eq!(
            wire,
            [0x0123_4567, 0x89ab_cdef, 0, 0, u32::MAX, u32::MAX]
        );
    }

    #[test]
    fn payload_64x3_no_sign_extension() {
        // A set high bit in the low half must not bleed into the high half.
        let payload = Payload64x3([0x0000_0001_8000_0000, 0, 0]);
        let mut wire = [0u32; 6];
        payload.pack(&mut wire);
        assert_eq!(wire[0], 1);
        assert_eq!(wire[1], 0x8000_0000);
        assert_eq!(Payload64x3::unpack(&wire), payload);
    }

    #[test]
    fn direct_copy_layouts_are_verbatim() {
        let payload = Payload32x5([10, 20, 30, 40, 50]);
        let mut wire = [0u32; 5];
        payload.pack(&mut wire);
        assert_eq!(wire, [10, 20, 30, 40, 50]);
    }
}
