//! `ovldb counts` - print a per-read count table.

use ovldb_core::{CoreResult, CountTable};
use std::path::Path;

/// Runs the counts command.
pub fn run(path: &Path, nonzero: bool, json: bool) -> CoreResult<()> {
    let counts = CountTable::load(path)?;

    if json {
        let value = serde_json::json!({
            "entries": counts.len(),
            "counts": counts,
        });
        println!("{value}");
        return Ok(());
    }

    for (id, count) in counts.iter().enumerate() {
        if !nonzero || *count > 0 {
            println!("{id}\t{count}");
        }
    }
    Ok(())
}
