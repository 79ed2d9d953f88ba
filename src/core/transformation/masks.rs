use image::{DynamicImage, GrayImage, Luma, Rgb};
use imageproc::contrast::otsu_level;
use imageproc::map::map_colors;
use imageproc::region_labelling::{connected_components, Connectivity};
use palette::{FromColor, Hsv, Lab, Srgb};

fn srgb(pixel: &Rgb<u8>) -> Srgb {
    Srgb::new(
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    )
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// CIE-Lab lightness rescaled from 0..100 to 0..255
pub fn lightness_channel(image: &DynamicImage) -> GrayImage {
    map_colors(&image.to_rgb8(), |p| {
        let lab = Lab::from_color(srgb(&p));
        Luma([to_u8(lab.l * 2.55)])
    })
}

/// HSV saturation rescaled from 0..1 to 0..255
pub fn saturation_channel(image: &DynamicImage) -> GrayImage {
    map_colors(&image.to_rgb8(), |p| {
        let hsv = Hsv::from_color(srgb(&p));
        Luma([to_u8(hsv.saturation * 255.0)])
    })
}

/// Binary mask of the pixels brighter than the Otsu level of `gray`
pub fn otsu_mask(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    map_colors(gray, |p| Luma([if p[0] > level { 255 } else { 0 }]))
}

/// Otsu mask of the Lab lightness channel
pub fn threshold_mask(image: &DynamicImage) -> GrayImage {
    otsu_mask(&lightness_channel(image))
}

/// Otsu mask of the HSV saturation channel; separates a leaf from a pale background
pub fn saturation_mask(image: &DynamicImage) -> GrayImage {
    otsu_mask(&saturation_channel(image))
}

/// Drop 8-connected foreground components smaller than `min_size` pixels
pub fn fill_small_objects(mask: &GrayImage, min_size: usize) -> GrayImage {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let label_count = labels.pixels().map(|p| p[0]).max().unwrap_or(0) as usize;
    let mut sizes = vec![0usize; label_count + 1];
    for p in labels.pixels() {
        sizes[p[0] as usize] += 1;
    }

    map_colors(&labels, |p| {
        let label = p[0] as usize;
        Luma([if label != 0 && sizes[label] >= min_size { 255 } else { 0 }])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn leaf_on_white() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(20, 20, |x, y| {
            if (5..15).contains(&x) && (5..15).contains(&y) {
                Rgb([40, 160, 40])
            } else {
                Rgb([250, 250, 250])
            }
        }))
    }

    #[test]
    fn test_lightness_extremes() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let l = lightness_channel(&image);
        assert_eq!(l.get_pixel(0, 0)[0], 0);
        assert!(l.get_pixel(1, 0)[0] >= 254);
    }

    #[test]
    fn test_saturation_mask_finds_leaf() {
        let mask = saturation_mask(&leaf_on_white());
        assert_eq!(mask.get_pixel(10, 10)[0], 255);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        let area = mask.pixels().filter(|p| p[0] == 255).count();
        assert_eq!(area, 100);
    }

    #[test]
    fn test_threshold_mask_light_object() {
        // the white background is the light class
        let mask = threshold_mask(&leaf_on_white());
        assert_eq!(mask.get_pixel(0, 0)[0], 255);
        assert_eq!(mask.get_pixel(10, 10)[0], 0);
    }

    #[test]
    fn test_fill_small_objects() {
        let mut mask = GrayImage::new(20, 20);
        for y in 2..10 {
            for x in 2..10 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask.put_pixel(17, 17, Luma([255]));
        mask.put_pixel(18, 18, Luma([255]));

        let filled = fill_small_objects(&mask, 10);
        assert_eq!(filled.get_pixel(5, 5)[0], 255);
        assert_eq!(filled.get_pixel(17, 17)[0], 0);
        assert_eq!(filled.get_pixel(18, 18)[0], 0);
        assert_eq!(filled.pixels().filter(|p| p[0] == 255).count(), 64);
    }
}
