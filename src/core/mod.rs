pub mod analysis;
pub mod augmentation;
pub mod dataset;
pub mod error;
pub mod operations;
pub mod transformation;

pub use analysis::*;
pub use augmentation::*;
pub use dataset::*;
pub use error::*;
pub use operations::*;
