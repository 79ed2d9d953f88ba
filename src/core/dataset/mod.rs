mod scanner;

pub use scanner::{
    count_images, count_table, error_chain, is_image_path, list_images, scan_class_counts,
    scan_class_dirs, validate_root, ClassDir, CountTable, IMAGE_EXTENSIONS,
};
