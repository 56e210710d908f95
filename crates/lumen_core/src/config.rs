//! Render configuration.
//!
//! `RenderConfig` is what users write in a JSON file or override from the
//! command line. `RenderParams` is the small by-value subset handed to every
//! unit of work during a render.

use std::path::Path;

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{Camera, CameraResult};
use crate::scene::Color;

/// Errors from loading or validating a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Shading and sampling parameters, passed by value into every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Ambient coefficient
    pub ambient: f32,
    /// Lambertian (diffuse) coefficient
    pub lambert: f32,
    /// Global scale applied to every surface's reflectivity
    pub reflectivity: f32,
    /// Maximum number of mirror bounces
    pub max_depth: u32,
    /// Average several deterministic sub-pixel samples per pixel
    pub anti_aliasing: bool,
    /// Samples per axis when anti-aliasing (n x n per pixel)
    pub samples_per_axis: u32,
    /// Color returned when a ray hits nothing
    pub background: Color,
}

impl RenderParams {
    /// Number of samples taken for each pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        if self.anti_aliasing {
            self.samples_per_axis * self.samples_per_axis
        } else {
            1
        }
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderConfig::default().params()
    }
}

/// Camera placement as it appears in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Rotation about X, Y, Z in degrees
    pub euler: [f32; 3],
    /// Horizontal field of view in degrees
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-2.0, 0.0, 2.0),
            euler: [0.0, 30.0, 0.0],
            fov: crate::camera::DEFAULT_FOV,
        }
    }
}

/// Full render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub ambient: f32,
    pub lambert: f32,
    pub reflectivity: f32,
    pub max_depth: u32,
    pub anti_aliasing: bool,
    pub samples_per_axis: u32,
    /// Edge length of the square pixel blocks dispatched to worker threads
    pub bucket_size: u32,
    pub background: Color,
    pub camera: CameraConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            ambient: 0.0,
            lambert: 0.6,
            reflectivity: 0.3,
            max_depth: 2,
            anti_aliasing: true,
            samples_per_axis: 3,
            bucket_size: 16,
            background: Color::ZERO,
            camera: CameraConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::info!("Loading render config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configurations that cannot produce a frame.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, value) in [
            ("ambient", self.ambient),
            ("lambert", self.lambert),
            ("reflectivity", self.reflectivity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} coefficient must be finite and non-negative, got {value}"
                )));
            }
        }
        // The reflection blend needs a weight within [0, 1]
        if self.reflectivity > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "reflectivity coefficient must be at most 1, got {}",
                self.reflectivity
            )));
        }
        if self.samples_per_axis == 0 {
            return Err(ConfigError::Invalid("samples_per_axis must be at least 1".into()));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid("bucket_size must be at least 1".into()));
        }
        if !self.background.is_finite() {
            return Err(ConfigError::Invalid("background must be finite".into()));
        }
        Ok(())
    }

    /// Parameters handed to every unit of work.
    pub fn params(&self) -> RenderParams {
        RenderParams {
            ambient: self.ambient,
            lambert: self.lambert,
            reflectivity: self.reflectivity,
            max_depth: self.max_depth,
            anti_aliasing: self.anti_aliasing,
            samples_per_axis: self.samples_per_axis,
            background: self.background,
        }
    }

    /// Build the configured camera.
    pub fn camera(&self) -> CameraResult<Camera> {
        Camera::new(self.camera.position, self.camera.euler, (self.width, self.height))?
            .with_fov(self.camera.fov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (1000, 1000));
        assert_eq!(config.ambient, 0.0);
        assert_eq!(config.lambert, 0.6);
        assert_eq!(config.reflectivity, 0.3);
        assert_eq!(config.max_depth, 2);
        assert!(config.anti_aliasing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_samples_per_pixel() {
        let mut params = RenderParams::default();
        params.samples_per_axis = 4;
        assert_eq!(params.samples_per_pixel(), 16);
        params.anti_aliasing = false;
        assert_eq!(params.samples_per_pixel(), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json_str(
            r#"{ "width": 64, "max_depth": 4, "camera": { "fov": 45.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 1000);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.camera.position, Vec3::new(-2.0, 0.0, 2.0));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RenderConfig::default();
        config.height = 0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.lambert = -0.1;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.samples_per_axis = 0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.bucket_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_reflectivity_range() {
        let mut config = RenderConfig::default();
        config.reflectivity = 1.0;
        assert!(config.validate().is_ok());

        config.reflectivity = 2.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.reflectivity = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_deep_reflection() {
        let mut config = RenderConfig::default();
        config.max_depth = u32::MAX;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_camera_from_config() {
        let mut config = RenderConfig::default();
        config.width = 32;
        config.height = 16;

        let camera = config.camera().unwrap();
        assert_eq!((camera.width(), camera.height()), (32, 16));
        assert_eq!(camera.position(), Vec3::new(-2.0, 0.0, 2.0));

        config.camera.fov = 200.0;
        assert!(config.camera().is_err());
    }

    #[test]
    fn test_bundled_benchmark_config() {
        let config = RenderConfig::from_json_str(include_str!("../../../assets/benchmark.json")).unwrap();
        assert_eq!(config.max_depth, 4);
        assert!(config.validate().is_ok());
    }
}
