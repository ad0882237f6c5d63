//! # climdex CLI Entry Point
//!
//! Binary entry point for the climdex command-line interface.
//!
//! ## Usage
//!
//! ```bash
//! # Start with a CSV dataset
//! climdex ./climate.csv
//!
//! # Start with the built-in 10-record sample
//! climdex --sample
//!
//! # Start empty
//! climdex
//!
//! # Show version / help
//! climdex --version
//! climdex --help
//! ```

use std::env;
use std::path::PathBuf;

use eyre::{bail, Result};

use climdex::cli::Repl;
use climdex::loader::{load_into, sample_records, CsvLoader};
use climdex::tree::AvlIndex;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut use_sample = false;
    let mut csv_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("climdex {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--sample" | "-s" => {
                use_sample = true;
            }
            arg if arg.starts_with('-') => {
                bail!("Unknown option: {}", arg);
            }
            arg => {
                if csv_path.is_some() {
                    bail!("Only one CSV path may be given");
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    let mut index = AvlIndex::new();

    if use_sample {
        let records = sample_records();
        let loaded = load_into(&mut index, &records);
        println!("Loaded {} sample records", loaded);
    }

    if let Some(path) = csv_path {
        let records = CsvLoader::new().load(&path)?;
        let loaded = load_into(&mut index, &records);
        println!(
            "Loaded {} of {} records from {}",
            loaded,
            records.len(),
            path.display()
        );
    }

    if let Some(stats) = index.statistics() {
        println!(
            "Keys: min {:.2}, max {:.2}, mean {:.2}, median {:.2}",
            stats.min, stats.max, stats.mean, stats.median
        );
    }

    let mut repl = Repl::new(index)?;
    repl.run()
}

fn print_usage() {
    println!("climdex - AVL record index");
    println!();
    println!("Usage:");
    println!("  climdex [OPTIONS] [CSV_PATH]");
    println!();
    println!("Options:");
    println!("  -s, --sample     Preload the built-in 10-record sample dataset");
    println!("  -h, --help       Show this help message");
    println!("  -v, --version    Show version");
    println!();
    println!("CSV files need a code column (ISO3), a name column (Country), and");
    println!("one or more measure columns (F1961, F1962, ...) that are averaged");
    println!("into each record's key.");
}
