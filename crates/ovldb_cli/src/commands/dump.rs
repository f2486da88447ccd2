//! `ovldb dump` - print the records of an overlap file.

use crate::commands::FileKind;
use ovldb_core::{
    CoreResult, DefaultPayload, DumpFormat, Overlap, OverlapReader, PayloadCodec, RecordFormat,
    StoreConfig, StoreFormat,
};
use std::path::Path;

/// Runs the dump command.
pub fn run(
    path: &Path,
    kind: FileKind,
    raw: bool,
    skip: Option<u64>,
    limit: Option<u64>,
    json: bool,
) -> CoreResult<()> {
    let config = StoreConfig::new().block_compression(!raw);
    match kind {
        FileKind::Store => {
            let mut reader =
                OverlapReader::<DefaultPayload, StoreFormat>::open_store(path, &config)?;
            print_records(&mut reader, skip, limit, json)
        }
        FileKind::Dump => {
            let mut reader = OverlapReader::<DefaultPayload, DumpFormat>::open_dump(path, &config)?;
            print_records(&mut reader, skip, limit, json)
        }
    }
}

fn print_records<F: RecordFormat>(
    reader: &mut OverlapReader<DefaultPayload, F>,
    skip: Option<u64>,
    limit: Option<u64>,
    json: bool,
) -> CoreResult<()> {
    if let Some(k) = skip {
        reader.seek_overlap(k)?;
    }

    let with_a = F::ID_WORDS == 2;
    let mut overlap = Overlap::default();
    let mut printed = 0u64;
    while limit.map_or(true, |l| printed < l) {
        if !reader.read_overlap(&mut overlap)? {
            break;
        }
        print_record(&overlap, with_a, json);
        printed += 1;
    }

    tracing::debug!(records = printed, "dump complete");
    Ok(())
}

fn print_record(overlap: &Overlap<DefaultPayload>, with_a: bool, json: bool) {
    let words = payload_words(&overlap.payload);
    if json {
        let mut value = serde_json::json!({
            "b_id": overlap.b_id.as_u32(),
            "payload": words,
        });
        if with_a {
            value["a_id"] = overlap.a_id.as_u32().into();
        }
        println!("{value}");
    } else {
        let hex: Vec<String> = words.iter().map(|w| format!("{w:08x}")).collect();
        if with_a {
            println!("{}\t{}\t{}", overlap.a_id, overlap.b_id, hex.join(" "));
        } else {
            println!("{}\t{}", overlap.b_id, hex.join(" "));
        }
    }
}

/// Repacks a payload into its wire words for display.
fn payload_words<P: PayloadCodec>(payload: &P) -> Vec<u32> {
    let mut words = vec![0u32; P::WIRE_WORDS];
    payload.pack(&mut words);
    words
}
