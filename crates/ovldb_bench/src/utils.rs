//! Benchmark utilities.

use ovldb_codec::{Overlap, PayloadCodec, ReadId};
use rand::Rng;

/// Generates one random payload for any layout.
pub fn random_payload<P: PayloadCodec>() -> P {
    let mut rng = rand::thread_rng();
    let words: Vec<u32> = (0..P::WIRE_WORDS).map(|_| rng.gen()).collect();
    P::unpack(&words)
}

/// Generates a batch of random overlaps with ids below `max_id`.
pub fn random_overlaps<P: PayloadCodec>(count: usize, max_id: u32) -> Vec<Overlap<P>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            Overlap::new(
                ReadId::new(rng.gen_range(0..max_id)),
                ReadId::new(rng.gen_range(0..max_id)),
                random_payload(),
            )
        })
        .collect()
}
