use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a camera configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid camera config: {0}")]
    Invalid(String),
}

/// Tunables for the orbit camera.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial pitch in radians.
    pub pitch: f32,
    /// Initial yaw in radians.
    pub yaw: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Vertical field of view in radians.
    pub field_of_view: f32,
    /// Initial zoom. Raised to `min_zoom` on the first update.
    pub zoom: f32,
    pub look_at: Vec3,
    /// Radians per pixel per second of middle-button drag.
    pub drag_sensitivity: f32,
    /// Wheel units per zoom step.
    pub wheel_divisor: f32,
    pub min_zoom: f32,
    /// Orbit distance per unit of zoom.
    pub zoom_distance_scale: f32,
    pub focal_distance: f32,
    pub focal_width: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            field_of_view: std::f32::consts::FRAC_PI_4,
            zoom: -15.0,
            look_at: Vec3::ZERO,
            drag_sensitivity: 0.12,
            wheel_divisor: 5.0,
            min_zoom: 40.0,
            zoom_distance_scale: 1.0 / 200.0,
            focal_distance: 40.0,
            focal_width: 75.0,
        }
    }
}

impl CameraConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_yaml::to_string(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.near_plane.is_nan() || self.near_plane <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "near_plane must be positive, got {}",
                self.near_plane
            )));
        }
        if self.far_plane.is_nan() || self.far_plane <= self.near_plane {
            return Err(ConfigError::Invalid(format!(
                "far_plane ({}) must be beyond near_plane ({})",
                self.far_plane, self.near_plane
            )));
        }
        if self.field_of_view.is_nan()
            || self.field_of_view <= 0.0
            || self.field_of_view >= std::f32::consts::PI
        {
            return Err(ConfigError::Invalid(format!(
                "field_of_view must be in (0, π), got {}",
                self.field_of_view
            )));
        }
        if self.wheel_divisor == 0.0 || !self.wheel_divisor.is_finite() {
            return Err(ConfigError::Invalid("wheel_divisor must be non-zero".into()));
        }
        Ok(())
    }
}
