//! Write augmented versions of one picture beside it.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use leaf_dataset_tools::config::AppConfig;
use leaf_dataset_tools::logging::setup_logging;
use leaf_dataset_tools::{is_image_path, Augment, ImageAugmenter, Transform};

#[derive(Parser, Debug)]
#[command(
    name = "augment",
    about = "Creates augmented versions of the provided picture."
)]
struct Args {
    /// Path to a picture (.jpg, .jpeg or .png)
    pic_path: PathBuf,

    /// Number of augmentations to create
    #[arg(short = 'n', default_value_t = Transform::ALL.len())]
    count: usize,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging("augment");
    println!("Pic: {}", args.pic_path.display());

    if !args.pic_path.exists() || !is_image_path(&args.pic_path) {
        warn!("Rejected {:?}: not a picture", args.pic_path);
        println!("Provided argument should be a path to a picture.");
        return Ok(ExitCode::FAILURE);
    }

    let config = AppConfig::load();
    let written = ImageAugmenter::new(config.augmentation)
        .augment(&args.pic_path, args.count)
        .with_context(|| format!("Failed to augment {}", args.pic_path.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
