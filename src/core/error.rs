use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a dataset root
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("the directory {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to read directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write the balance report")]
    Report(#[source] io::Error),
}

/// Errors raised by one augmentation request
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("{} is not a path to a picture", .0.display())]
    NotAnImage(PathBuf),
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors raised while extracting feature images
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{} is not a path to a picture", .0.display())]
    NotAnImage(PathBuf),
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no foreground pixels in the leaf mask")]
    EmptyMask,
}
