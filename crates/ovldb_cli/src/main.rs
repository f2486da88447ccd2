//! OvlDB CLI
//!
//! Command-line tools for inspecting overlap files.
//!
//! # Commands
//!
//! - `dump` - Print the records of an overlap file
//! - `counts` - Print a per-read count table
//! - `stats` - Summarize an overlap file
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use commands::FileKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// OvlDB command-line overlap file tools.
#[derive(Parser)]
#[command(name = "ovldb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the records of an overlap file
    Dump {
        /// Path to the overlap file
        file: PathBuf,

        /// File format (store files omit the first id, dump files carry both)
        #[arg(short, long, value_enum, default_value = "dump")]
        format: FileKind,

        /// Treat a dump file as raw words (no block compression)
        #[arg(long)]
        raw: bool,

        /// Skip this many records first (seekable store files only)
        #[arg(short, long)]
        skip: Option<u64>,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<u64>,

        /// Emit one JSON object per record
        #[arg(short, long)]
        json: bool,
    },

    /// Print a per-read count table
    Counts {
        /// Path to the counts file
        file: PathBuf,

        /// Only print reads with a nonzero count
        #[arg(short, long)]
        nonzero: bool,

        /// Emit the table as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Summarize an overlap file
    Stats {
        /// Path to the overlap file
        file: PathBuf,

        /// File format (store files omit the first id, dump files carry both)
        #[arg(short, long, value_enum, default_value = "dump")]
        format: FileKind,

        /// Treat a dump file as raw words (no block compression)
        #[arg(long)]
        raw: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Dump {
            file,
            format,
            raw,
            skip,
            limit,
            json,
        } => {
            commands::dump::run(&file, format, raw, skip, limit, json)?;
        }
        Commands::Counts {
            file,
            nonzero,
            json,
        } => {
            commands::counts::run(&file, nonzero, json)?;
        }
        Commands::Stats { file, format, raw } => {
            commands::stats::run(&file, format, raw)?;
        }
        Commands::Version => {
            println!("OvlDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("OvlDB Core v{}", ovldb_core::VERSION);
        }
    }

    Ok(())
}
