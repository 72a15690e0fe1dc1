//! Editor configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use glam::Vec3;
use scene::MarchSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "SDF Editor".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub fovy_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(6.0, 5.0, 8.0),
            target: Vec3::new(0.0, 0.5, 0.0),
            fovy_degrees: 45.0,
        }
    }
}

/// Pointer and wheel navigation speeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Radians per pixel of orbit drag.
    pub orbit_speed: f32,
    /// View-plane units per pixel of pan drag, per unit of orbit radius.
    pub pan_speed: f32,
    /// Radius fraction per wheel notch.
    pub zoom_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            orbit_speed: 0.005,
            pan_speed: 0.0015,
            zoom_speed: 0.1,
            min_radius: 1.0,
            max_radius: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub navigation: NavigationConfig,
    /// Object records allocated before the first buffer growth.
    pub object_capacity: usize,
    pub render: MarchSettings,
    #[serde(default = "MarchSettings::picking")]
    pub picking: MarchSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            navigation: NavigationConfig::default(),
            object_capacity: render::DEFAULT_CAPACITY,
            render: MarchSettings::render(),
            picking: MarchSettings::picking(),
        }
    }
}

impl EditorConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_owned()));
        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be nonzero");
        }
        let nav = &self.navigation;
        if nav.min_radius <= 0.0 || nav.min_radius > nav.max_radius {
            return invalid("navigation radii must satisfy 0 < min_radius <= max_radius");
        }
        if self.object_capacity == 0 {
            return invalid("object_capacity must be at least 1");
        }
        for (name, settings) in [("render", &self.render), ("picking", &self.picking)] {
            if settings.max_steps == 0 || settings.max_distance <= 0.0 || settings.surface_epsilon <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} march settings must be positive"
                )));
            }
        }
        if (self.camera.position - self.camera.target).length() <= f32::EPSILON {
            return invalid("camera position and target must differ");
        }
        Ok(())
    }
}
