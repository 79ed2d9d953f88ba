//! Balance the number of images across class subdirectories by writing
//! augmented versions of the under-represented classes.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use leaf_dataset_tools::config::AppConfig;
use leaf_dataset_tools::logging::setup_logging;
use leaf_dataset_tools::{balance_dataset, validate_root, ImageAugmenter};

#[derive(Parser, Debug)]
#[command(
    name = "balance",
    about = "Balance the number of images across subdirectories by creating augmented versions."
)]
struct Args {
    /// Root directory containing subdirectories with images
    directory: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging("balance");
    info!("Balancing dataset at {:?}", args.directory);

    if let Err(e) = validate_root(&args.directory) {
        error!("Invalid dataset root: {}", e);
        eprintln!("Error: {}", e);
        return Ok(ExitCode::FAILURE);
    }

    let config = AppConfig::load();
    let mut augmenter = ImageAugmenter::new(config.augmentation);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    balance_dataset(&args.directory, &mut augmenter, &mut out)
        .with_context(|| format!("Failed to balance {}", args.directory.display()))?;
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}
