use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Gaussian sigma for an odd kernel size, using the usual
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8` rule (k = 7 gives 1.4)
pub fn gaussian_sigma(kernel_size: u32) -> f32 {
    let k = kernel_size.max(1) as f32;
    (0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8).max(0.1)
}

/// Gaussian smoothing with the sigma implied by `kernel_size`
pub fn gaussian_blur(image: &DynamicImage, kernel_size: u32) -> DynamicImage {
    let sigma = gaussian_sigma(kernel_size);
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(gaussian_blur_f32(&image.to_rgba8(), sigma))
    } else {
        DynamicImage::ImageRgb8(gaussian_blur_f32(&image.to_rgb8(), sigma))
    }
}

/// Canny edges of the grey image.
///
/// The image is smoothed with `sigma` first. Hysteresis thresholds are the
/// given fractions of the strongest Sobel gradient, so the result adapts to
/// the picture's contrast. A flat image has no edges.
pub fn canny_edges(image: &DynamicImage, sigma: f32, low_ratio: f32, high_ratio: f32) -> GrayImage {
    let gray = image.to_luma8();
    let smoothed = if sigma > 0.0 {
        gaussian_blur_f32(&gray, sigma)
    } else {
        gray
    };

    let gx = horizontal_sobel(&smoothed);
    let gy = vertical_sobel(&smoothed);
    let max_magnitude = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(x, y)| ((x[0] as f32).powi(2) + (y[0] as f32).powi(2)).sqrt())
        .fold(0.0f32, f32::max);

    if max_magnitude == 0.0 {
        return GrayImage::new(smoothed.width(), smoothed.height());
    }

    let low = max_magnitude * low_ratio;
    let high = (max_magnitude * high_ratio).max(low);
    canny(&smoothed, low, high)
}
