use image::{DynamicImage, GrayImage};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::edges::{canny_edges, gaussian_blur};
use super::landmarks::{draw_landmarks, pseudolandmarks};
use super::masks::{fill_small_objects, saturation_mask, threshold_mask};
use super::shape::{analyze_size, isolate};
use crate::config::TransformationConfig;
use crate::core::dataset::is_image_path;
use crate::core::error::TransformError;
use crate::core::operations::{derived_path, save_image};

/// Feature images written for one picture, in the order they are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureImage {
    Threshold,
    Edges,
    Analyzed,
    Blurred,
    Pseudolandmarks,
    Isolated,
}

impl FeatureImage {
    pub const ALL: [FeatureImage; 6] = [
        FeatureImage::Threshold,
        FeatureImage::Edges,
        FeatureImage::Analyzed,
        FeatureImage::Blurred,
        FeatureImage::Pseudolandmarks,
        FeatureImage::Isolated,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            FeatureImage::Threshold => "Threshold",
            FeatureImage::Edges => "Edges",
            FeatureImage::Analyzed => "Analyzed",
            FeatureImage::Blurred => "Blurred",
            FeatureImage::Pseudolandmarks => "Pseudolandmarks",
            FeatureImage::Isolated => "Isolated",
        }
    }
}

fn render(
    feature: FeatureImage,
    source: &DynamicImage,
    lightness_mask: &GrayImage,
    leaf_mask: &GrayImage,
    config: &TransformationConfig,
) -> Result<DynamicImage, TransformError> {
    let rendered = match feature {
        FeatureImage::Threshold => DynamicImage::ImageLuma8(lightness_mask.clone()),
        FeatureImage::Edges => DynamicImage::ImageLuma8(canny_edges(
            source,
            config.canny_sigma,
            config.canny_low_ratio,
            config.canny_high_ratio,
        )),
        FeatureImage::Analyzed => {
            let (annotated, stats) = analyze_size(source, lightness_mask, config.line_thickness)?;
            info!(
                "Shape: area {} px, perimeter {} px, {}x{} px, centroid ({:.1}, {:.1})",
                stats.area,
                stats.perimeter,
                stats.width(),
                stats.height(),
                stats.centroid.0,
                stats.centroid.1
            );
            DynamicImage::ImageRgb8(annotated)
        }
        FeatureImage::Blurred => gaussian_blur(source, config.gaussian_kernel_size),
        FeatureImage::Pseudolandmarks => {
            let landmarks = pseudolandmarks(leaf_mask, config.landmark_bands)?;
            let mut canvas = source.to_rgb8();
            draw_landmarks(&mut canvas, &landmarks, config.landmark_radius);
            DynamicImage::ImageRgb8(canvas)
        }
        FeatureImage::Isolated => DynamicImage::ImageRgb8(isolate(source, leaf_mask)),
    };
    Ok(rendered)
}

/// Write every feature image of `path` beside it as `<stem>_<Feature>.<ext>`.
///
/// A feature that cannot be computed (for example an empty leaf mask) is
/// logged and left out; decode and encode failures abort.
#[instrument(name = "transform", skip(config))]
pub fn run_all(path: &Path, config: &TransformationConfig) -> Result<Vec<PathBuf>, TransformError> {
    if !is_image_path(path) || !path.is_file() {
        return Err(TransformError::NotAnImage(path.to_path_buf()));
    }

    let source = image::open(path).map_err(|source| TransformError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let lightness_mask = threshold_mask(&source);
    let leaf_mask = fill_small_objects(&saturation_mask(&source), config.fill_size);

    let mut written = Vec::new();
    for feature in FeatureImage::ALL {
        let rendered = match render(feature, &source, &lightness_mask, &leaf_mask, config) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("Skipping {:?} for {:?}: {}", feature, path, e);
                continue;
            }
        };
        let output = derived_path(path, feature.suffix());
        save_image(&rendered, &output).map_err(|source| TransformError::Encode {
            path: output.clone(),
            source,
        })?;
        written.push(output);
    }

    info!("Wrote {} feature images for {:?}", written.len(), path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_leaf(path: &Path) {
        RgbImage::from_fn(48, 48, |x, y| {
            let dx = x as i32 - 24;
            let dy = y as i32 - 24;
            if dx * dx + 2 * dy * dy < 300 {
                Rgb([50, 150, 40])
            } else {
                Rgb([235, 235, 230])
            }
        })
        .save(path)
        .unwrap();
    }

    #[test]
    fn test_run_all_writes_every_feature() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("leaf.png");
        write_leaf(&source);

        let config = TransformationConfig {
            fill_size: 20,
            ..Default::default()
        };
        let written = run_all(&source, &config).unwrap();
        let expected: Vec<PathBuf> = FeatureImage::ALL
            .iter()
            .map(|f| dir.path().join(format!("leaf_{}.png", f.suffix())))
            .collect();
        assert_eq!(written, expected);
        for path in &written {
            assert!(path.is_file());
        }
    }

    #[test]
    fn test_run_all_skips_features_of_blank_picture() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("blank.png");
        RgbImage::from_pixel(16, 16, Rgb([200, 200, 200]))
            .save(&source)
            .unwrap();

        let written = run_all(&source, &TransformationConfig::default()).unwrap();
        assert!(written.contains(&dir.path().join("blank_Threshold.png")));
        assert!(written.contains(&dir.path().join("blank_Blurred.png")));
        assert!(!written.contains(&dir.path().join("blank_Pseudolandmarks.png")));
    }

    #[test]
    fn test_run_all_rejects_non_images() {
        let dir = tempdir().unwrap();
        let result = run_all(&dir.path().join("leaf.gif"), &TransformationConfig::default());
        assert!(matches!(result, Err(TransformError::NotAnImage(_))));
    }
}
