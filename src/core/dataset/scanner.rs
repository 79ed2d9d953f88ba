//! Dataset root scanning.
//!
//! A dataset root holds one subdirectory per class. Only image files sitting
//! directly inside a class subdirectory are counted; other files and nested
//! directories are ignored. Every listing is sorted by path so that anything
//! order-dependent downstream (remainder allocation) is reproducible.
//!
//! Only a failure to read the root is an error. A class subdirectory that
//! cannot be listed is kept with its read error so callers can report it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::error::DatasetError;

/// Recognized image extensions, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Class subdirectory name -> image count, ordered by name.
/// Always rebuilt from a fresh scan.
pub type CountTable = BTreeMap<String, usize>;

/// One class subdirectory and the images found directly inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDir {
    pub name: String,
    pub path: PathBuf,
    /// Image paths in sorted order
    pub images: Vec<PathBuf>,
    /// Set when the subdirectory could not be listed; `images` is then empty
    pub read_error: Option<String>,
}

impl ClassDir {
    /// Build a class from the result of listing its directory
    pub fn from_listing(path: PathBuf, listing: Result<Vec<PathBuf>, DatasetError>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        match listing {
            Ok(images) => Self {
                name,
                path,
                images,
                read_error: None,
            },
            Err(e) => {
                let details = error_chain(&e);
                warn!("Cannot list class directory {:?}: {}", path, details);
                Self {
                    name,
                    path,
                    images: Vec::new(),
                    read_error: Some(details),
                }
            }
        }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn is_readable(&self) -> bool {
        self.read_error.is_none()
    }
}

/// `err` followed by each of its sources, joined with `: `
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Image counts of the readable classes
pub fn count_table(classes: &[ClassDir]) -> CountTable {
    classes
        .iter()
        .filter(|class| class.is_readable())
        .map(|class| (class.name.clone(), class.image_count()))
        .collect()
}

/// Check whether a path has a recognized image extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Make sure `root` exists and is a directory before anything is scanned
pub fn validate_root(root: &Path) -> Result<(), DatasetError> {
    if !root.exists() {
        return Err(DatasetError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DatasetError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

fn read_dir_paths(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|source| DatasetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// List the image files directly inside `dir`, sorted by path
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let images: Vec<PathBuf> = read_dir_paths(dir)?
        .into_iter()
        .filter(|path| path.is_file() && is_image_path(path))
        .collect();
    debug!("Found {} images in {:?}", images.len(), dir);
    Ok(images)
}

/// Count the image files directly inside `dir`
pub fn count_images(dir: &Path) -> Result<usize, DatasetError> {
    list_images(dir).map(|images| images.len())
}

/// Scan every immediate subdirectory of `root`, sorted by path.
/// Non-directory entries at the root are ignored.
pub fn scan_class_dirs(root: &Path) -> Result<Vec<ClassDir>, DatasetError> {
    let classes: Vec<ClassDir> = read_dir_paths(root)?
        .into_iter()
        .filter(|path| path.is_dir())
        .map(|path| {
            let listing = list_images(&path);
            ClassDir::from_listing(path, listing)
        })
        .collect();

    info!("Scanned {} class directories in {:?}", classes.len(), root);
    Ok(classes)
}

/// Build a fresh count table for `root`; unreadable classes are left out
pub fn scan_class_counts(root: &Path) -> Result<CountTable, DatasetError> {
    Ok(count_table(&scan_class_dirs(root)?))
}
