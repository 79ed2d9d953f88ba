use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

use leaf_dataset_tools::{
    balance_dataset, plan_rebalance, scan_class_counts, Augment, AugmentError, ClassAction,
    ImageAugmenter,
};

fn write_picture(path: &Path, shade: u8) {
    RgbImage::from_fn(12, 10, |x, y| Rgb([shade, (x * 12) as u8, (y * 20) as u8]))
        .save(path)
        .unwrap();
}

/// Dataset root with one subdirectory per `(class, image count)` entry
fn dataset(classes: &[(&str, usize)]) -> TempDir {
    let root = tempdir().unwrap();
    for (class, count) in classes {
        let dir = root.path().join(class);
        fs::create_dir(&dir).unwrap();
        for i in 0..*count {
            write_picture(&dir.join(format!("image_{i:02}.png")), (i * 30) as u8);
        }
    }
    root
}

/// Writes exactly the requested number of placeholder files
#[derive(Default)]
struct ExactAugmenter {
    calls: Vec<(PathBuf, usize)>,
}

impl Augment for ExactAugmenter {
    fn augment(&mut self, image: &Path, count: usize) -> Result<Vec<PathBuf>, AugmentError> {
        self.calls.push((image.to_path_buf(), count));
        let stem = image.file_stem().unwrap().to_string_lossy().into_owned();
        let written: Vec<PathBuf> = (0..count)
            .map(|i| image.with_file_name(format!("{stem}_copy{i}.png")))
            .collect();
        for path in &written {
            fs::copy(image, path).unwrap();
        }
        Ok(written)
    }
}

/// Fails every request
struct BrokenAugmenter;

impl Augment for BrokenAugmenter {
    fn augment(&mut self, image: &Path, _count: usize) -> Result<Vec<PathBuf>, AugmentError> {
        Err(AugmentError::NotAnImage(image.to_path_buf()))
    }
}

#[test]
fn test_example_dataset_allocations() {
    let root = dataset(&[("A", 10), ("B", 4), ("C", 7)]);
    let plan = plan_rebalance(root.path()).unwrap().unwrap();
    assert_eq!(plan.target, 10);

    let allocations: Vec<(String, Vec<usize>)> = plan
        .classes
        .iter()
        .map(|c| (c.name.clone(), c.requests().iter().map(|r| r.count).collect()))
        .collect();
    assert_eq!(
        allocations,
        vec![
            ("A".to_string(), vec![]),
            ("B".to_string(), vec![2, 2, 1, 1]),
            ("C".to_string(), vec![1, 1, 1]),
        ]
    );
    assert_eq!(plan.classes[0].action, ClassAction::AlreadyBalanced);
}

#[test]
fn test_balance_reaches_target_with_exact_augmenter() {
    let root = dataset(&[("A", 10), ("B", 4), ("C", 7)]);
    let mut augmenter = ExactAugmenter::default();
    let mut out = Vec::new();

    let report = balance_dataset(root.path(), &mut augmenter, &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(report.target, 10);
    assert!(report.after.values().all(|&count| count == 10));
    assert_eq!(report.outcome.images_written, 9);
    assert!(report.outcome.failed.is_empty());
    // the balanced class is never touched
    assert!(augmenter
        .calls
        .iter()
        .all(|(path, _)| !path.starts_with(root.path().join("A"))));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Target count: 10 images per subdirectory"));
    assert!(printed.contains("=== Final counts ==="));
    assert!(printed.trim_end().ends_with("C: 10 images"));
}

#[test]
fn test_balance_with_image_augmenter() {
    let root = dataset(&[("healthy", 5), ("rust", 2)]);
    let mut augmenter = ImageAugmenter::default();
    let mut out = Vec::new();

    let report = balance_dataset(root.path(), &mut augmenter, &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(report.after["healthy"], 5);
    assert_eq!(report.after["rust"], 5);

    let rust = root.path().join("rust");
    assert!(rust.join("image_00_Rotate.png").is_file());
    assert!(rust.join("image_00_Blur.png").is_file());
    assert!(rust.join("image_01_Rotate.png").is_file());
    assert!(!rust.join("image_01_Blur.png").exists());
}

#[test]
fn test_balance_is_best_effort_past_six_variants() {
    // one source image can yield at most six variants
    let root = dataset(&[("big", 10), ("tiny", 1)]);
    let mut augmenter = ImageAugmenter::default();

    let report = balance_dataset(root.path(), &mut augmenter, &mut std::io::sink())
        .unwrap()
        .unwrap();

    assert_eq!(report.outcome.succeeded, 1);
    assert_eq!(report.outcome.images_written, 6);
    assert_eq!(report.after["tiny"], 7);
}

#[test]
fn test_balance_skips_empty_class_and_continues() {
    let root = dataset(&[("full", 3), ("empty", 0), ("half", 2)]);
    fs::write(root.path().join("empty").join("notes.txt"), "no images").unwrap();
    let mut augmenter = ExactAugmenter::default();
    let mut out = Vec::new();

    let report = balance_dataset(root.path(), &mut augmenter, &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(report.outcome.skipped, vec!["empty".to_string()]);
    assert_eq!(report.after["empty"], 0);
    assert_eq!(report.after["half"], 3);
    assert_eq!(augmenter.calls.len(), 1);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("No images to augment in"));
}

#[test]
fn test_balance_logs_failures_and_finishes() {
    let root = dataset(&[("A", 4), ("B", 1), ("C", 2)]);
    let mut out = Vec::new();

    let report = balance_dataset(root.path(), &mut BrokenAugmenter, &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(report.outcome.failed.len(), 3);
    assert_eq!(report.outcome.succeeded, 0);
    assert_eq!(report.after, report.before);

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.matches("Error augmenting").count(), 3);
    assert!(printed.contains("=== Final counts ==="));
}

#[test]
fn test_balance_without_subdirectories() {
    let root = tempdir().unwrap();
    write_picture(&root.path().join("loose.png"), 0);
    let mut out = Vec::new();

    let report = balance_dataset(root.path(), &mut ExactAugmenter::default(), &mut out).unwrap();
    assert!(report.is_none());
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("No subdirectories found."));
}

#[test]
fn test_already_balanced_dataset_makes_no_calls() {
    let root = dataset(&[("A", 3), ("B", 3)]);
    let mut augmenter = ExactAugmenter::default();

    balance_dataset(root.path(), &mut augmenter, &mut std::io::sink()).unwrap();
    assert!(augmenter.calls.is_empty());
    assert_eq!(
        scan_class_counts(root.path()).unwrap().values().sum::<usize>(),
        6
    );
}

#[test]
fn test_balance_never_overwrites_dataset_images() {
    let root = dataset(&[("A", 4)]);
    let b = root.path().join("B");
    fs::create_dir(&b).unwrap();
    write_picture(&b.join("leaf.png"), 10);
    write_picture(&b.join("leaf_Rotate.png"), 200);
    let existing = fs::read(b.join("leaf_Rotate.png")).unwrap();
    let mut out = Vec::new();

    let report = balance_dataset(root.path(), &mut ImageAugmenter::default(), &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(fs::read(b.join("leaf_Rotate.png")).unwrap(), existing);
    assert!(b.join("leaf_Rotate_Rotate.png").is_file());
    assert_eq!(report.outcome.images_written, 1);
    assert_eq!(report.after["B"], 3);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("1 new images written"));
}
