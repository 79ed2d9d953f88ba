mod augmenter;
mod transforms;

pub use augmenter::{Augment, ImageAugmenter};
pub use transforms::{
    apply_transform, box_blur, brightness, contrast, rotate, zoom, Transform,
};
