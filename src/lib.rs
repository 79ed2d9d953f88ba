//! Command-line tooling for a plant-leaf image dataset.
//!
//! The library holds everything the binaries under `src/bin/` share:
//! - `core::dataset`: scanning class subdirectories and counting images
//! - `core::analysis`: balance targets, allocation plans and the rebalance workflow
//! - `core::augmentation`: the six augmentation transforms and the `Augment` seam
//! - `core::transformation`: masks, edges, shape analysis and pseudolandmarks
//! - `config`: persisted tool settings
//! - `logging`: tracing setup shared by every binary

pub mod config;
pub mod core;
pub mod logging;

pub use crate::core::*;
