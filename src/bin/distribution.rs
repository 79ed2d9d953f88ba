//! Print how images are distributed over the class subdirectories of a dataset.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use leaf_dataset_tools::logging::setup_logging;
use leaf_dataset_tools::{format_distribution, scan_class_counts, DistributionStats};

const BAR_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "distribution",
    about = "Shows the number of images in each subdirectory of a dataset."
)]
struct Args {
    /// Dataset root containing one subdirectory per class
    directory: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging("distribution");

    if !args.directory.exists() {
        println!("The directory {} does not exist.", args.directory.display());
        return Ok(ExitCode::FAILURE);
    }

    let counts = scan_class_counts(&args.directory)
        .with_context(|| format!("Failed to scan {}", args.directory.display()))?;
    let stats = DistributionStats::from_counts(&counts);

    if stats.is_empty() {
        println!("No subdirectories to plot");
    } else if stats.total_images == 0 {
        println!("Found subdirectories but no images to plot");
    } else {
        println!("{}", args.directory.display());
        for line in format_distribution(&stats, BAR_WIDTH) {
            println!("{}", line);
        }
    }
    Ok(ExitCode::SUCCESS)
}
