use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SETTINGS_FILE: &str = "settings.json";
const LOG_DIR: &str = "logs";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "leaf-dataset-tools", "leaf-dataset-tools")
}

/// Tool configuration shared by every binary.
///
/// Values default to the parameters the pipeline has always used; a
/// `settings.json` in the platform config directory can override any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub augmentation: AugmentationConfig,
    #[serde(default)]
    pub transformation: TransformationConfig,
}

/// Parameters of the six augmentation transforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    /// Counter-clockwise rotation in degrees
    pub rotation_degrees: f32,
    /// Box blur radius in pixels
    pub blur_radius: u32,
    /// Fraction of each dimension kept by the centre crop
    pub zoom_keep: f32,
    pub brightness_factor: f32,
    pub contrast_factor: f32,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            rotation_degrees: 60.0,
            blur_radius: 15,
            zoom_keep: 0.5,
            brightness_factor: 1.5,
            contrast_factor: 2.0,
        }
    }
}

/// Parameters of the feature-extraction images written by `transform`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformationConfig {
    /// Odd gaussian kernel size; sigma is derived from it
    pub gaussian_kernel_size: u32,
    /// Pre-smoothing applied before Canny
    pub canny_sigma: f32,
    /// Hysteresis thresholds as fractions of the strongest gradient
    pub canny_low_ratio: f32,
    pub canny_high_ratio: f32,
    /// Foreground components smaller than this many pixels are dropped from the leaf mask
    pub fill_size: usize,
    pub landmark_bands: u32,
    pub landmark_radius: i32,
    pub line_thickness: u32,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            gaussian_kernel_size: 7,
            canny_sigma: 1.3,
            canny_low_ratio: 0.1,
            canny_high_ratio: 0.2,
            fill_size: 200,
            landmark_bands: 20,
            landmark_radius: 3,
            line_thickness: 1,
        }
    }
}

impl AppConfig {
    /// Path of the settings file in the platform config directory
    pub fn get_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Directory for log files, in the platform data directory so that a
    /// tool run from inside a dataset never adds a subdirectory to it
    pub fn get_log_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_DIR))
    }

    /// Load settings from the platform config directory, or defaults if absent
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => {
                warn!("Could not determine config directory. Using defaults.");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or cannot be parsed
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded settings from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse settings file {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!("No settings file at {:?}. Using defaults.", path);
                } else {
                    warn!("Failed to read settings file {:?}: {}. Using defaults.", path, e);
                }
                Self::default()
            }
        }
    }
}
