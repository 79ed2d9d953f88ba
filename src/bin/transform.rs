//! Write the feature-extraction images of one picture beside it.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use leaf_dataset_tools::config::AppConfig;
use leaf_dataset_tools::is_image_path;
use leaf_dataset_tools::logging::setup_logging;
use leaf_dataset_tools::core::transformation::run_all;

#[derive(Parser, Debug)]
#[command(
    name = "transform",
    about = "Writes threshold, edge, shape, blur, pseudolandmark and isolation images of a picture."
)]
struct Args {
    /// Path to a picture (.jpg, .jpeg or .png)
    pic_path: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging("transform");

    if !args.pic_path.exists() || !is_image_path(&args.pic_path) {
        warn!("Rejected {:?}: not a picture", args.pic_path);
        println!("Provided argument should be a path to a picture.");
        return Ok(ExitCode::FAILURE);
    }

    let config = AppConfig::load();
    let written = run_all(&args.pic_path, &config.transformation)
        .with_context(|| format!("Failed to transform {}", args.pic_path.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
