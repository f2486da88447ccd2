//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random overlap records in every
//! payload layout, plus whole-file round-trip properties exercised through
//! real temporary files.

use ovldb_codec::{Overlap, Payload32x5, Payload32x8, Payload64x3, PayloadCodec, ReadId};
use proptest::prelude::*;

/// Strategy for generating read ids.
///
/// Ids are kept below a few million so count tables stay a reasonable size
/// while still crossing their growth boundary.
pub fn read_id_strategy() -> impl Strategy<Value = ReadId> {
    (0u32..4_000_000).prop_map(ReadId::new)
}

/// Strategy for generating 5-word payloads.
pub fn payload_32x5_strategy() -> impl Strategy<Value = Payload32x5> {
    prop::array::uniform5(any::<u32>()).prop_map(Payload32x5)
}

/// Strategy for generating 3-word 64-bit payloads.
pub fn payload_64x3_strategy() -> impl Strategy<Value = Payload64x3> {
    prop::array::uniform3(any::<u64>()).prop_map(Payload64x3)
}

/// Strategy for generating 8-word payloads.
pub fn payload_32x8_strategy() -> impl Strategy<Value = Payload32x8> {
    prop::array::uniform8(any::<u32>()).prop_map(Payload32x8)
}

/// Strategy for generating one overlap from a payload strategy.
pub fn overlap_strategy<P, S>(payload: S) -> impl Strategy<Value = Overlap<P>>
where
    P: PayloadCodec,
    S: Strategy<Value = P>,
{
    (read_id_strategy(), read_id_strategy(), payload)
        .prop_map(|(a_id, b_id, payload)| Overlap::new(a_id, b_id, payload))
}

/// Strategy for generating a batch of overlaps.
pub fn overlap_batch_strategy<P, S>(
    payload: S,
    max_len: usize,
) -> impl Strategy<Value = Vec<Overlap<P>>>
where
    P: PayloadCodec,
    S: Strategy<Value = P>,
{
    prop::collection::vec(overlap_strategy(payload), 0..max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{read_dump, small_config, with_temp_dir, write_dump};
    use ovldb_core::CountTable;
    use std::collections::HashMap;

    fn roundtrips<P: PayloadCodec>(records: &[Overlap<P>], compressed: bool) -> bool {
        with_temp_dir(|dir| {
            let path = dir.join("asm.ovb");
            let config = small_config().block_compression(compressed);
            write_dump(&path, records, &config);
            read_dump::<P>(&path, &config) == records
        })
    }

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn wire_roundtrip_32x5(records in overlap_batch_strategy(payload_32x5_strategy(), 64)) {
            prop_assert!(roundtrips(&records, false));
        }

        #[test]
        fn wire_roundtrip_64x3(records in overlap_batch_strategy(payload_64x3_strategy(), 64)) {
            prop_assert!(roundtrips(&records, false));
        }

        #[test]
        fn wire_roundtrip_32x8(records in overlap_batch_strategy(payload_32x8_strategy(), 64)) {
            prop_assert!(roundtrips(&records, false));
        }

        #[test]
        fn compressed_roundtrip_32x5(records in overlap_batch_strategy(payload_32x5_strategy(), 64)) {
            prop_assert!(roundtrips(&records, true));
        }

        #[test]
        fn counts_match_id_occurrences(
            records in overlap_batch_strategy(payload_32x5_strategy(), 32)
        ) {
            let counts = with_temp_dir(|dir| {
                let path = dir.join("asm.ovb");
                write_dump(&path, &records, &small_config());
                CountTable::load(&dir.join("asm.counts")).unwrap()
            });

            let mut expected: HashMap<u32, u32> = HashMap::new();
            for r in &records {
                *expected.entry(r.a_id.as_u32()).or_insert(0) += 1;
                *expected.entry(r.b_id.as_u32()).or_insert(0) += 1;
            }

            let max_id = records
                .iter()
                .map(|r| r.a_id.max(r.b_id).as_u32())
                .max()
                .unwrap_or(0);
            prop_assert_eq!(counts.len() as u64, u64::from(max_id) + 2);

            for (id, &count) in counts.iter().enumerate() {
                let want = expected.get(&(id as u32)).copied().unwrap_or(0);
                prop_assert_eq!(count, want, "id {}", id);
            }
        }
    }
}
