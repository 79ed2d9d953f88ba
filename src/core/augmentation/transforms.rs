use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel, Rgb, Rgba};
use imageproc::filter::box_filter;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::map::map_colors;

use crate::config::AugmentationConfig;

/// The augmentation transforms, in the fixed order they are applied.
/// A request for N augmentations uses the first N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Rotate,
    Blur,
    Zoom,
    Flip,
    Illuminate,
    Contrast,
}

impl Transform {
    pub const ALL: [Transform; 6] = [
        Transform::Rotate,
        Transform::Blur,
        Transform::Zoom,
        Transform::Flip,
        Transform::Illuminate,
        Transform::Contrast,
    ];

    /// Suffix appended to the source stem for the derived file
    pub fn suffix(&self) -> &'static str {
        match self {
            Transform::Rotate => "Rotate",
            Transform::Blur => "Blur",
            Transform::Zoom => "Zoom",
            Transform::Flip => "Flip",
            Transform::Illuminate => "Illuminate",
            Transform::Contrast => "Contrast",
        }
    }

    /// The first `count` transforms, capped at the length of the list
    pub fn first(count: usize) -> &'static [Transform] {
        &Self::ALL[..count.min(Self::ALL.len())]
    }
}

/// Apply one transform to `image`, returning a new image
pub fn apply_transform(
    image: &DynamicImage,
    transform: Transform,
    config: &AugmentationConfig,
) -> DynamicImage {
    match transform {
        Transform::Rotate => rotate(image, config.rotation_degrees),
        Transform::Blur => box_blur(image, config.blur_radius),
        Transform::Zoom => zoom(image, config.zoom_keep),
        Transform::Flip => image.fliph(),
        Transform::Illuminate => brightness(image, config.brightness_factor),
        Transform::Contrast => contrast(image, config.contrast_factor),
    }
}

/// Rotate counter-clockwise about the centre, keeping the canvas size.
/// Uncovered corners are filled with black (transparent when there is alpha).
pub fn rotate(image: &DynamicImage, degrees: f32) -> DynamicImage {
    // rotate_about_center turns clockwise
    let theta = -degrees.to_radians();
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(rotate_about_center(
            &image.to_rgba8(),
            theta,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        ))
    } else {
        DynamicImage::ImageRgb8(rotate_about_center(
            &image.to_rgb8(),
            theta,
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
        ))
    }
}

/// Box blur every channel with a `(2 * radius + 1)` square window
pub fn box_blur(image: &DynamicImage, radius: u32) -> DynamicImage {
    if radius == 0 {
        return image.clone();
    }
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(box_blur_channels(&image.to_rgba8(), radius))
    } else {
        DynamicImage::ImageRgb8(box_blur_channels(&image.to_rgb8(), radius))
    }
}

fn box_blur_channels<P>(image: &ImageBuffer<P, Vec<u8>>, radius: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    let mut out = ImageBuffer::<P, Vec<u8>>::new(width, height);

    for channel in 0..P::CHANNEL_COUNT as usize {
        let plane = GrayImage::from_fn(width, height, |x, y| {
            Luma([image.get_pixel(x, y).channels()[channel]])
        });
        let blurred = box_filter(&plane, radius, radius);
        for (x, y, value) in blurred.enumerate_pixels() {
            out.get_pixel_mut(x, y).channels_mut()[channel] = value[0];
        }
    }
    out
}

/// Crop the centre of the image, keeping `keep` of each dimension
pub fn zoom(image: &DynamicImage, keep: f32) -> DynamicImage {
    let keep = keep.clamp(0.0, 1.0);
    let (width, height) = (image.width(), image.height());
    let x_offset = ((width as f32 * (1.0 - keep)) / 2.0) as u32;
    let y_offset = ((height as f32 * (1.0 - keep)) / 2.0) as u32;
    let new_width = width.saturating_sub(2 * x_offset).max(1);
    let new_height = height.saturating_sub(2 * y_offset).max(1);
    image.crop_imm(x_offset, y_offset, new_width, new_height)
}

fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Apply `f` to every colour channel, leaving alpha untouched
fn map_color_channels<F>(image: &DynamicImage, f: F) -> DynamicImage
where
    F: Fn(u8) -> u8,
{
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(map_colors(&image.to_rgba8(), |p| {
            p.map_with_alpha(&f, |a| a)
        }))
    } else {
        DynamicImage::ImageRgb8(map_colors(&image.to_rgb8(), |p| p.map(&f)))
    }
}

/// Scale every colour channel by `factor` (1.0 leaves the image unchanged)
pub fn brightness(image: &DynamicImage, factor: f32) -> DynamicImage {
    map_color_channels(image, |c| clamp_u8(c as f32 * factor))
}

/// Stretch colour channels away from the mean grey level by `factor`
pub fn contrast(image: &DynamicImage, factor: f32) -> DynamicImage {
    let gray = image.to_luma8();
    let pixel_count = (gray.width() as u64 * gray.height() as u64).max(1);
    let sum: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    let mean = (sum as f32 / pixel_count as f32).round();

    map_color_channels(image, |c| clamp_u8(mean + factor * (c as f32 - mean)))
}
