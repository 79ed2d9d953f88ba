//! The augmentation seam used by the rebalance workflow.
//!
//! `Augment` is the capability "given one image and a count, write up to that
//! many derived variants beside it". `ImageAugmenter` does it in-process with
//! the transforms in `transforms.rs`.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::transforms::{apply_transform, Transform};
use crate::config::AugmentationConfig;
use crate::core::dataset::is_image_path;
use crate::core::error::AugmentError;
use crate::core::operations::{derived_path, save_image};

/// Produces derived images from a source image.
///
/// Implementations must never modify or delete the source or any other
/// existing file, and must create at most `count` files per call. Callers
/// treat `count` as a best-effort target.
pub trait Augment {
    /// Write up to `count` augmented variants of `image`, returning only the
    /// paths newly created
    fn augment(&mut self, image: &Path, count: usize) -> Result<Vec<PathBuf>, AugmentError>;
}

/// In-process augmenter writing `<stem>_<Transform>.<ext>` files.
///
/// A request for N variants applies the first `min(N, 6)` transforms of
/// `Transform::ALL`. A transform whose output path already exists is
/// skipped, so repeated calls never rewrite earlier variants or dataset
/// images that happen to carry a derived name.
#[derive(Debug, Clone, Default)]
pub struct ImageAugmenter {
    config: AugmentationConfig,
}

impl ImageAugmenter {
    pub fn new(config: AugmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }
}

impl Augment for ImageAugmenter {
    #[instrument(name = "augment", skip(self))]
    fn augment(&mut self, path: &Path, count: usize) -> Result<Vec<PathBuf>, AugmentError> {
        if !is_image_path(path) || !path.is_file() {
            return Err(AugmentError::NotAnImage(path.to_path_buf()));
        }

        let transforms = Transform::first(count);
        if transforms.is_empty() {
            return Ok(Vec::new());
        }

        let source = image::open(path).map_err(|source| AugmentError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(transforms.len());
        for &transform in transforms {
            let output = derived_path(path, transform.suffix());
            if output.exists() {
                warn!("{:?} already exists, skipping {:?}", output, transform);
                continue;
            }
            let augmented = apply_transform(&source, transform, &self.config);
            save_image(&augmented, &output).map_err(|source| AugmentError::Encode {
                path: output.clone(),
                source,
            })?;
            debug!("{:?} -> {:?}", transform, output);
            written.push(output);
        }

        info!("Wrote {} augmentations of {:?}", written.len(), path);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::tempdir;

    fn write_leaf(path: &Path) {
        RgbImage::from_fn(16, 12, |x, y| Rgb([(x * 10) as u8, (y * 15) as u8, 60]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_augment_writes_first_n_variants() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("leaf.png");
        write_leaf(&source);

        let written = ImageAugmenter::default().augment(&source, 3).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("leaf_Rotate.png"),
                dir.path().join("leaf_Blur.png"),
                dir.path().join("leaf_Zoom.png"),
            ]
        );
        for path in &written {
            assert!(path.is_file());
        }
        assert!(!dir.path().join("leaf_Flip.png").exists());
    }

    #[test]
    fn test_augment_caps_at_six_and_keeps_source() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("leaf.jpg");
        write_leaf(&source);
        let before = fs::read(&source).unwrap();

        let written = ImageAugmenter::default().augment(&source, 10).unwrap();
        assert_eq!(written.len(), 6);
        assert_eq!(fs::read(&source).unwrap(), before);

        let zoom = image::open(dir.path().join("leaf_Zoom.jpg")).unwrap();
        assert_eq!((zoom.width(), zoom.height()), (8, 6));
    }

    #[test]
    fn test_augment_keeps_existing_derived_names() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("leaf.png");
        let existing = dir.path().join("leaf_Rotate.png");
        write_leaf(&source);
        fs::copy(&source, &existing).unwrap();
        let before = fs::read(&existing).unwrap();

        let written = ImageAugmenter::default().augment(&source, 2).unwrap();
        assert_eq!(written, vec![dir.path().join("leaf_Blur.png")]);
        assert_eq!(fs::read(&existing).unwrap(), before);

        // a second run has nothing new to create
        assert!(ImageAugmenter::default().augment(&source, 2).unwrap().is_empty());
    }

    #[test]
    fn test_augment_zero_count_writes_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("leaf.png");
        write_leaf(&source);

        assert!(ImageAugmenter::default().augment(&source, 0).unwrap().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_augment_rejects_non_images() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "leaf").unwrap();

        let result = ImageAugmenter::default().augment(&notes, 2);
        assert!(matches!(result, Err(AugmentError::NotAnImage(_))));

        let missing = dir.path().join("missing.png");
        let result = ImageAugmenter::default().augment(&missing, 2);
        assert!(matches!(result, Err(AugmentError::NotAnImage(_))));
    }

    #[test]
    fn test_augment_reports_decode_failure() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"not a png").unwrap();

        let result = ImageAugmenter::default().augment(&broken, 1);
        assert!(matches!(result, Err(AugmentError::Decode { .. })));
    }
}
