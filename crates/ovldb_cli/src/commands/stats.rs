//! `ovldb stats` - summarize an overlap file.

use crate::commands::FileKind;
use ovldb_core::{
    record_bytes, CoreResult, DefaultPayload, DumpFormat, Overlap, OverlapReader, PayloadCodec,
    RecordFormat, StoreConfig, StoreFormat,
};
use std::path::Path;

/// Accumulated statistics over one file.
#[derive(Debug, Default)]
struct Stats {
    records: u64,
    min_a: Option<u32>,
    max_a: Option<u32>,
    min_b: Option<u32>,
    max_b: Option<u32>,
}

impl Stats {
    fn add(&mut self, overlap: &Overlap<DefaultPayload>, with_a: bool) {
        self.records += 1;
        if with_a {
            let a = overlap.a_id.as_u32();
            self.min_a = Some(self.min_a.map_or(a, |m| m.min(a)));
            self.max_a = Some(self.max_a.map_or(a, |m| m.max(a)));
        }
        let b = overlap.b_id.as_u32();
        self.min_b = Some(self.min_b.map_or(b, |m| m.min(b)));
        self.max_b = Some(self.max_b.map_or(b, |m| m.max(b)));
    }
}

/// Runs the stats command.
pub fn run(path: &Path, kind: FileKind, raw: bool) -> CoreResult<()> {
    let config = StoreConfig::new().block_compression(!raw);
    let stats = match kind {
        FileKind::Store => {
            let mut reader =
                OverlapReader::<DefaultPayload, StoreFormat>::open_store(path, &config)?;
            collect(&mut reader)?
        }
        FileKind::Dump => {
            let mut reader = OverlapReader::<DefaultPayload, DumpFormat>::open_dump(path, &config)?;
            collect(&mut reader)?
        }
    };

    let file_bytes = std::fs::metadata(path)?.len();
    let record = match kind {
        FileKind::Store => record_bytes::<StoreFormat, DefaultPayload>(),
        FileKind::Dump => record_bytes::<DumpFormat, DefaultPayload>(),
    };

    println!("file:            {}", path.display());
    println!("file bytes:      {file_bytes}");
    println!("records:         {}", stats.records);
    println!("record bytes:    {record}");
    println!("payload words:   {}", DefaultPayload::WIRE_WORDS);
    if let (Some(min), Some(max)) = (stats.min_a, stats.max_a) {
        println!("a_id range:      {min}..={max}");
    }
    if let (Some(min), Some(max)) = (stats.min_b, stats.max_b) {
        println!("b_id range:      {min}..={max}");
    }
    Ok(())
}

fn collect<F: RecordFormat>(reader: &mut OverlapReader<DefaultPayload, F>) -> CoreResult<Stats> {
    let with_a = F::ID_WORDS == 2;
    let mut stats = Stats::default();
    let mut overlap = Overlap::default();
    while reader.read_overlap(&mut overlap)? {
        stats.add(&overlap, with_a);
    }
    Ok(stats)
}
