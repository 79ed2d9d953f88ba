use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use imageproc::point::Point;

use crate::core::error::TransformError;

const TOP_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
const BOTTOM_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const LEFT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const RIGHT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTER_V_COLOR: Rgb<u8> = Rgb([0, 128, 255]);
const CENTER_H_COLOR: Rgb<u8> = Rgb([255, 128, 0]);
const RING_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Pseudolandmarks of a leaf mask.
///
/// The Y-axis sets (`left`, `right`, `center_v`) come from horizontal bands
/// stacked over the leaf's height; the X-axis sets (`top`, `bottom`,
/// `center_h`) from vertical bands across its width. Empty bands contribute
/// no point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Landmarks {
    pub top: Vec<Point<u32>>,
    pub bottom: Vec<Point<u32>>,
    pub left: Vec<Point<u32>>,
    pub right: Vec<Point<u32>>,
    pub center_v: Vec<Point<u32>>,
    pub center_h: Vec<Point<u32>>,
}

impl Landmarks {
    pub fn len(&self) -> usize {
        self.top.len()
            + self.bottom.len()
            + self.left.len()
            + self.right.len()
            + self.center_v.len()
            + self.center_h.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn foreground_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    mask.enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .fold(None, |bounds, (x, y, _)| match bounds {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

/// `[start, end)` ranges splitting `min..=max` into at most `bands` slices
fn band_ranges(min: u32, max: u32, bands: u32) -> Vec<(u32, u32)> {
    let extent = max - min + 1;
    let bands = bands.clamp(1, extent);
    (0..bands)
        .map(|i| (min + i * extent / bands, min + (i + 1) * extent / bands))
        .filter(|(start, end)| end > start)
        .collect()
}

fn midpoint(a: Point<u32>, b: Point<u32>) -> Point<u32> {
    Point::new((a.x + b.x) / 2, (a.y + b.y) / 2)
}

/// Compute pseudolandmarks over `bands` slices of the mask's foreground
pub fn pseudolandmarks(mask: &GrayImage, bands: u32) -> Result<Landmarks, TransformError> {
    let (min_x, min_y, max_x, max_y) = foreground_bounds(mask).ok_or(TransformError::EmptyMask)?;
    let is_leaf = |x: u32, y: u32| mask.get_pixel(x, y)[0] != 0;
    let mut landmarks = Landmarks::default();

    for (y0, y1) in band_ranges(min_y, max_y, bands) {
        let mut extreme: Option<(Point<u32>, Point<u32>)> = None;
        for y in y0..y1 {
            for x in min_x..=max_x {
                if !is_leaf(x, y) {
                    continue;
                }
                let p = Point::new(x, y);
                extreme = Some(match extreme {
                    None => (p, p),
                    Some((l, r)) => (if x < l.x { p } else { l }, if x > r.x { p } else { r }),
                });
            }
        }
        if let Some((l, r)) = extreme {
            landmarks.left.push(l);
            landmarks.right.push(r);
            landmarks.center_v.push(midpoint(l, r));
        }
    }

    for (x0, x1) in band_ranges(min_x, max_x, bands) {
        let mut extreme: Option<(Point<u32>, Point<u32>)> = None;
        for x in x0..x1 {
            for y in min_y..=max_y {
                if !is_leaf(x, y) {
                    continue;
                }
                let p = Point::new(x, y);
                extreme = Some(match extreme {
                    None => (p, p),
                    Some((t, b)) => (if y < t.y { p } else { t }, if y > b.y { p } else { b }),
                });
            }
        }
        if let Some((t, b)) = extreme {
            landmarks.top.push(t);
            landmarks.bottom.push(b);
            landmarks.center_h.push(midpoint(t, b));
        }
    }

    Ok(landmarks)
}

/// Draw every landmark as a filled dot with a white ring
pub fn draw_landmarks(canvas: &mut RgbImage, landmarks: &Landmarks, radius: i32) {
    let sets = [
        (&landmarks.top, TOP_COLOR),
        (&landmarks.bottom, BOTTOM_COLOR),
        (&landmarks.left, LEFT_COLOR),
        (&landmarks.right, RIGHT_COLOR),
        (&landmarks.center_v, CENTER_V_COLOR),
        (&landmarks.center_h, CENTER_H_COLOR),
    ];
    for (points, color) in sets {
        for p in points {
            let center = (p.x as i32, p.y as i32);
            draw_filled_circle_mut(canvas, center, radius, color);
            draw_hollow_circle_mut(canvas, center, radius + 1, RING_COLOR);
        }
    }
}
