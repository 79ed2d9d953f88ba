mod app_config;

pub use app_config::{AppConfig, AugmentationConfig, TransformationConfig};
