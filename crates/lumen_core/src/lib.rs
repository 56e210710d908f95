//! Lumen Core - scene, camera and render configuration.
//!
//! This crate provides the read-only inputs of a render:
//!
//! - **Scene model**: `Scene`, `Sphere`, `Plane`, `Light`, validated once
//!   at construction
//! - **Camera model**: `Camera` and the per-pixel `PixelGrid` it produces
//! - **Configuration**: `RenderConfig` (file/CLI facing) and the by-value
//!   `RenderParams` handed to every unit of work
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Camera, RenderConfig, Scene};
//!
//! let config = RenderConfig::default();
//! let scene = Scene::default_scene()?;
//! let camera = config.camera()?;
//! let grid = camera.generate_pixel_grid();
//! ```

pub mod camera;
pub mod config;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, CameraError, PixelGrid};
pub use config::{CameraConfig, ConfigError, RenderConfig, RenderParams};
pub use scene::{Color, Light, Plane, Scene, SceneDescription, SceneError, Sphere};
