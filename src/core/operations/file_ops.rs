use image::{DynamicImage, ImageResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of a derived image written beside `source`: `<stem>_<suffix>.<ext>`.
///
/// The original extension is kept verbatim so the derived file is encoded in
/// the same format as its source.
///
/// # Examples
///
/// ```
/// use leaf_dataset_tools::derived_path;
/// use std::path::{Path, PathBuf};
///
/// let derived = derived_path(Path::new("apple/leaf_01.JPG"), "Rotate");
/// assert_eq!(derived, PathBuf::from("apple/leaf_01_Rotate.JPG"));
/// ```
pub fn derived_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match source.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    source.with_file_name(file_name)
}

/// Encode `image` to `path`, choosing the format from the extension.
///
/// JPEG cannot carry alpha, so images with an alpha channel are flattened to
/// RGB before being written to a `.jpg`/`.jpeg` path.
pub fn save_image(image: &DynamicImage, path: &Path) -> ImageResult<()> {
    let is_jpeg = path
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "jpg" || ext == "jpeg"
        })
        .unwrap_or(false);

    if is_jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)?;
    } else {
        image.save(path)?;
    }
    debug!("Wrote {:?}", path);
    Ok(())
}
