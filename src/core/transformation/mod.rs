//! Feature images extracted from a single leaf picture.
//!
//! - `masks`: Otsu masks on Lab lightness and HSV saturation, small-object removal
//! - `edges`: Canny edges and gaussian smoothing
//! - `shape`: size/shape statistics, outline drawing and background isolation
//! - `landmarks`: pseudolandmarks along both axes of the leaf mask
//! - `pipeline`: writes every feature image beside the source

mod edges;
mod landmarks;
mod masks;
mod pipeline;
mod shape;

pub use edges::{canny_edges, gaussian_blur, gaussian_sigma};
pub use landmarks::{draw_landmarks, pseudolandmarks, Landmarks};
pub use masks::{
    fill_small_objects, lightness_channel, otsu_mask, saturation_channel, saturation_mask,
    threshold_mask,
};
pub use pipeline::{run_all, FeatureImage};
pub use shape::{analyze_size, isolate, measure, ShapeStats};
