//! Plantcoco: PlantDoc-style CSV annotations to COCO JSON.
//!
//! Plantcoco reads a dataset root holding a label map, split lists, image
//! files, and per-image CSV bounding-box annotations, and emits one
//! COCO-schema JSON document per split. Splits are converted independently
//! over a shared read-only label map; recoverable gaps (missing images,
//! missing CSVs, unknown labels) are counted and summarized instead of
//! aborting the run.
//!
//! # Modules
//!
//! - [`dataset`]: Input-side model (label map, split lists, CSV rows)
//! - [`convert`]: The per-split conversion pipeline and its reports
//! - [`coco`]: COCO document model, integrity check, and writer
//! - [`error`]: Error types for plantcoco operations

pub mod coco;
pub mod convert;
pub mod dataset;
pub mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use convert::ConvertOptions;
use dataset::NameMatching;

pub use error::PlantCocoError;

/// The plantcoco CLI application.
#[derive(Parser)]
#[command(name = "plantcoco")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert per-image CSV annotations to COCO JSON, one file per split.
    Convert(ConvertArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Dataset root directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output directory for COCO JSON files (created if absent).
    #[arg(long, default_value = "annotations")]
    out: PathBuf,

    /// Category directory name under the root.
    #[arg(long, default_value = convert::DEFAULT_CATEGORY)]
    category: String,

    /// Splits to convert (default: every list file under sets/).
    #[arg(long, num_args = 1..)]
    splits: Vec<String>,

    /// How CSV label names are matched ('normalized' or 'exact').
    #[arg(long, default_value = "normalized")]
    name_matching: String,
}

/// Run the plantcoco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PlantCocoError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert_command(args),
        None => {
            // No subcommand: just print a usage hint and exit successfully
            println!("plantcoco {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert PlantDoc-style CSV annotations to COCO JSON.");
            println!();
            println!("Run 'plantcoco --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert_command(args: ConvertArgs) -> Result<(), PlantCocoError> {
    let name_matching = match args.name_matching.as_str() {
        "normalized" => NameMatching::Normalized,
        "exact" => NameMatching::Exact,
        other => {
            return Err(PlantCocoError::UnsupportedMatchMode(format!(
                "'{}' (supported: normalized, exact)",
                other
            )));
        }
    };

    let options = ConvertOptions {
        root: args.root,
        out_dir: args.out,
        category: args.category,
        splits: args.splits,
        name_matching,
    };

    let outcome = convert::run_convert(&options)?;

    // End-of-run summary, one block per split. Gaps are informational;
    // they never affect the exit status.
    for split in &outcome.converted {
        println!("Generated {}: {}", split.path.display(), split.report);
    }

    // A failed split does not block the others, but it does fail the run.
    if !outcome.failed.is_empty() {
        for failure in &outcome.failed {
            eprintln!("Split '{}' failed: {}", failure.split, failure.error);
        }
        let total = outcome.converted.len() + outcome.failed.len();
        return Err(PlantCocoError::SplitsFailed {
            failed: outcome.failed.len(),
            total,
        });
    }

    Ok(())
}
