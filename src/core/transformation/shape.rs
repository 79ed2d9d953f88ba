use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::core::error::TransformError;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const AXIS_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Size and shape measurements of the foreground of a mask
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStats {
    /// Foreground pixels
    pub area: usize,
    /// Points on the outer contours
    pub perimeter: usize,
    /// Inclusive `(min_x, min_y, max_x, max_y)`
    pub bounding_box: (u32, u32, u32, u32),
    pub centroid: (f32, f32),
}

impl ShapeStats {
    pub fn width(&self) -> u32 {
        self.bounding_box.2 - self.bounding_box.0 + 1
    }

    pub fn height(&self) -> u32 {
        self.bounding_box.3 - self.bounding_box.1 + 1
    }
}

/// Measure the foreground (non-zero pixels) of `mask`
pub fn measure(mask: &GrayImage) -> Result<ShapeStats, TransformError> {
    let mut area = 0usize;
    let (mut sum_x, mut sum_y) = (0f64, 0f64);
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (u32::MAX, u32::MAX, 0u32, 0u32);

    for (x, y, p) in mask.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        area += 1;
        sum_x += x as f64;
        sum_y += y as f64;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if area == 0 {
        return Err(TransformError::EmptyMask);
    }

    let perimeter = outer_contours(mask).iter().map(|c| c.points.len()).sum();

    Ok(ShapeStats {
        area,
        perimeter,
        bounding_box: (min_x, min_y, max_x, max_y),
        centroid: ((sum_x / area as f64) as f32, (sum_y / area as f64) as f32),
    })
}

fn outer_contours(mask: &GrayImage) -> Vec<Contour<i32>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .collect()
}

fn draw_thick_line(canvas: &mut RgbImage, start: (f32, f32), end: (f32, f32), thickness: u32, color: Rgb<u8>) {
    let half = (thickness.max(1) as i32 - 1) / 2;
    for offset in -half..=half {
        let o = offset as f32;
        draw_line_segment_mut(canvas, (start.0 + o, start.1), (end.0 + o, end.1), color);
        draw_line_segment_mut(canvas, (start.0, start.1 + o), (end.0, end.1 + o), color);
    }
}

/// Draw the outline, extent lines and centroid of the mask's foreground over
/// `image`, returning the annotated picture and its measurements
pub fn analyze_size(
    image: &DynamicImage,
    mask: &GrayImage,
    line_thickness: u32,
) -> Result<(RgbImage, ShapeStats), TransformError> {
    let stats = measure(mask)?;
    let mut canvas = image.to_rgb8();

    for contour in outer_contours(mask) {
        let points = &contour.points;
        for (i, start) in points.iter().enumerate() {
            let end = &points[(i + 1) % points.len()];
            draw_thick_line(
                &mut canvas,
                (start.x as f32, start.y as f32),
                (end.x as f32, end.y as f32),
                line_thickness,
                OUTLINE_COLOR,
            );
        }
    }

    let (min_x, min_y, max_x, max_y) = stats.bounding_box;
    let (cx, cy) = stats.centroid;
    draw_thick_line(&mut canvas, (min_x as f32, cy), (max_x as f32, cy), line_thickness, AXIS_COLOR);
    draw_thick_line(&mut canvas, (cx, min_y as f32), (cx, max_y as f32), line_thickness, AXIS_COLOR);
    draw_filled_circle_mut(&mut canvas, (cx.round() as i32, cy.round() as i32), 2, CENTER_COLOR);

    Ok((canvas, stats))
}

/// Keep the masked pixels of `image` and paint everything else white
pub fn isolate(image: &DynamicImage, mask: &GrayImage) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let inside = mask.get_pixel_checked(x, y).map(|m| m[0] != 0).unwrap_or(false);
        if !inside {
            *pixel = Rgb([255, 255, 255]);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn square_mask() -> GrayImage {
        GrayImage::from_fn(20, 20, |x, y| {
            if (4..14).contains(&x) && (6..12).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_measure_rectangle() {
        let stats = measure(&square_mask()).unwrap();
        assert_eq!(stats.area, 60);
        assert_eq!(stats.bounding_box, (4, 6, 13, 11));
        assert_eq!(stats.width(), 10);
        assert_eq!(stats.height(), 6);
        assert_eq!(stats.centroid, (8.5, 8.5));
        assert!(stats.perimeter > 0);
    }

    #[test]
    fn test_measure_empty_mask() {
        let result = measure(&GrayImage::new(5, 5));
        assert!(matches!(result, Err(TransformError::EmptyMask)));
    }

    #[test]
    fn test_analyze_size_draws_outline() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([0, 100, 0])));
        let (annotated, stats) = analyze_size(&image, &square_mask(), 1).unwrap();
        assert_eq!(stats.area, 60);
        assert_eq!(annotated.get_pixel(4, 6), &OUTLINE_COLOR);
        assert_eq!(annotated.get_pixel(0, 0), &Rgb([0, 100, 0]));
    }

    #[test]
    fn test_isolate_whitens_background() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([10, 120, 10])));
        let isolated = isolate(&image, &square_mask());
        assert_eq!(isolated.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(isolated.get_pixel(5, 7), &Rgb([10, 120, 10]));
    }
}
