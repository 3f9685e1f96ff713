//! Viewer configuration
//!
//! Settings are layered with increasing precedence:
//! 1. Built-in defaults
//! 2. A TOML file (`--config <path>`, or `vista.toml` in the working directory)
//! 3. Command-line overrides, applied by the binary

use crate::{Result, VistaError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file picked up from the working directory
pub const LOCAL_CONFIG_FILE: &str = "vista.toml";

/// Window and framebuffer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vista".to_string(),
            width: 1280,
            height: 720,
            clear_color: [0.2, 0.3, 0.3],
        }
    }
}

/// Initial camera pose and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub world_up: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub movement_speed: f32,
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            movement_speed: 10.0,
            look_sensitivity: 0.1,
        }
    }
}

/// Picking and spawning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Scale of the pick indicator spheres; the pick radius is 10% larger
    pub picker_size: f32,
    /// Distance in front of the camera where new entities appear
    pub spawn_distance: f32,
    /// Uniform scale given to new entities
    pub spawn_scale: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            picker_size: 0.1,
            spawn_distance: 3.0,
            spawn_scale: 0.3,
        }
    }
}

/// Paths to models and shaders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Model spawned by the "Add model" button
    pub model: PathBuf,
    /// Model drawn as the pick indicator; a generated sphere when unset
    pub indicator_model: Option<PathBuf>,
    /// Directory that shader file names are resolved against
    pub shader_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("data/nanosuit/nanosuit.obj"),
            indicator_model: None,
            shader_dir: PathBuf::from("data/shaders"),
        }
    }
}

/// Top-level viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub editor: EditorConfig,
    pub assets: AssetConfig,
}

impl ViewerConfig {
    /// Load from an explicit path, or from `vista.toml` if present, or defaults.
    ///
    /// An explicit path that cannot be read is `VistaError::IoError`; a missing
    /// local file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => {
                let local = Path::new(LOCAL_CONFIG_FILE);
                if local.exists() {
                    Self::load_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            VistaError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
