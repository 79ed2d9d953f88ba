mod file_ops;

pub use file_ops::{derived_path, save_image};
