//! Scene model for Lumen.
//!
//! A scene is a small, flat collection of spheres, planes and point lights.
//! It is validated once when it is built and is immutable afterwards, so the
//! renderer can share it between every parallel unit of work without
//! re-checking anything per ray.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color type alias (RGB values in the 0-1 range)
pub type Color = Vec3;

/// Allowed deviation of a plane normal's length from 1.
const UNIT_TOLERANCE: f32 = 1e-3;

/// Errors detected while building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid sphere {index}: {reason}")]
    InvalidSphere { index: usize, reason: &'static str },

    #[error("Invalid plane {index}: {reason}")]
    InvalidPlane { index: usize, reason: &'static str },

    #[error("Invalid light {index}: {reason}")]
    InvalidLight { index: usize, reason: &'static str },

    #[error("The {table} table has {len} values, which is not a multiple of its row width {width}")]
    TableShape {
        table: &'static str,
        len: usize,
        width: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A sphere with a flat base color and a mirror reflectivity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Color,
    /// Fraction of the final color taken from the mirror bounce (0-1)
    pub reflectivity: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, color: Color, reflectivity: f32) -> Self {
        Self {
            center,
            radius,
            color,
            reflectivity,
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        if !self.center.is_finite() || !self.radius.is_finite() {
            return Err("center and radius must be finite");
        }
        if self.radius <= 0.0 {
            return Err("radius must be positive");
        }
        check_surface(self.color, self.reflectivity)
    }
}

/// An infinite plane through `point` with a unit `normal`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
    pub color: Color,
    pub reflectivity: f32,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, color: Color, reflectivity: f32) -> Self {
        Self {
            point,
            normal,
            color,
            reflectivity,
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        if !self.point.is_finite() || !self.normal.is_finite() {
            return Err("point and normal must be finite");
        }
        if (self.normal.length() - 1.0).abs() > UNIT_TOLERANCE {
            return Err("normal must have unit length");
        }
        check_surface(self.color, self.reflectivity)
    }
}

/// A point light. No distance falloff is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    /// Per-channel intensity (non-negative)
    pub intensity: Color,
}

impl Light {
    /// Create a white light with a scalar intensity.
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self::colored(position, Color::splat(intensity))
    }

    /// Create a light with a per-channel intensity.
    pub fn colored(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        if !self.position.is_finite() || !self.intensity.is_finite() {
            return Err("position and intensity must be finite");
        }
        if self.intensity.min_element() < 0.0 {
            return Err("intensity must be non-negative");
        }
        Ok(())
    }
}

fn check_surface(color: Color, reflectivity: f32) -> Result<(), &'static str> {
    if !color.is_finite() || color.min_element() < 0.0 || color.max_element() > 1.0 {
        return Err("color channels must be within 0-1");
    }
    if !(0.0..=1.0).contains(&reflectivity) {
        return Err("reflectivity must be within 0-1");
    }
    Ok(())
}

// Fixed-layout rows of the flat scene tables.

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SphereRow {
    center: [f32; 3],
    radius: f32,
    color: [f32; 3],
    reflectivity: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct PlaneRow {
    point: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
    reflectivity: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct LightRow {
    position: [f32; 3],
    intensity: f32,
}

/// Number of `f32` values per sphere row (center, radius, color, reflectivity).
pub const SPHERE_ROW_WIDTH: usize = 8;
/// Number of `f32` values per plane row (point, normal, color, reflectivity).
pub const PLANE_ROW_WIDTH: usize = 10;
/// Number of `f32` values per light row (position, intensity).
pub const LIGHT_ROW_WIDTH: usize = 4;

fn rows<'a, T: Pod>(table: &'static str, values: &'a [f32], width: usize) -> SceneResult<&'a [T]> {
    bytemuck::try_cast_slice(values).map_err(|_| SceneError::TableShape {
        table,
        len: values.len(),
        width,
    })
}

/// Serializable scene description, as read from a JSON scene file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub spheres: Vec<Sphere>,
    pub planes: Vec<Plane>,
    pub lights: Vec<Light>,
}

/// A validated, immutable scene.
#[derive(Clone, Debug)]
pub struct Scene {
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    lights: Vec<Light>,
}

impl Scene {
    /// Build a scene, rejecting degenerate geometry and non-finite data.
    pub fn new(spheres: Vec<Sphere>, planes: Vec<Plane>, lights: Vec<Light>) -> SceneResult<Self> {
        for (index, sphere) in spheres.iter().enumerate() {
            sphere
                .check()
                .map_err(|reason| SceneError::InvalidSphere { index, reason })?;
        }
        for (index, plane) in planes.iter().enumerate() {
            plane
                .check()
                .map_err(|reason| SceneError::InvalidPlane { index, reason })?;
        }
        for (index, light) in lights.iter().enumerate() {
            light
                .check()
                .map_err(|reason| SceneError::InvalidLight { index, reason })?;
        }

        log::debug!(
            "Scene built: {} spheres, {} planes, {} lights",
            spheres.len(),
            planes.len(),
            lights.len()
        );

        Ok(Self {
            spheres,
            planes,
            lights,
        })
    }

    /// Build a scene from flat numeric tables.
    ///
    /// Row layouts:
    /// - spheres: center x/y/z, radius, color r/g/b, reflectivity
    /// - planes: point x/y/z, normal x/y/z, color r/g/b, reflectivity
    /// - lights: position x/y/z, intensity
    pub fn from_tables(spheres: &[f32], planes: &[f32], lights: &[f32]) -> SceneResult<Self> {
        let sphere_rows: &[SphereRow] = rows("sphere", spheres, SPHERE_ROW_WIDTH)?;
        let plane_rows: &[PlaneRow] = rows("plane", planes, PLANE_ROW_WIDTH)?;
        let light_rows: &[LightRow] = rows("light", lights, LIGHT_ROW_WIDTH)?;

        let spheres = sphere_rows
            .iter()
            .map(|r| {
                Sphere::new(
                    Vec3::from_array(r.center),
                    r.radius,
                    Color::from_array(r.color),
                    r.reflectivity,
                )
            })
            .collect();
        let planes = plane_rows
            .iter()
            .map(|r| {
                Plane::new(
                    Vec3::from_array(r.point),
                    Vec3::from_array(r.normal),
                    Color::from_array(r.color),
                    r.reflectivity,
                )
            })
            .collect();
        let lights = light_rows
            .iter()
            .map(|r| Light::new(Vec3::from_array(r.position), r.intensity))
            .collect();

        Self::new(spheres, planes, lights)
    }

    /// Build a scene from a deserialized description.
    pub fn from_description(description: SceneDescription) -> SceneResult<Self> {
        Self::new(description.spheres, description.planes, description.lights)
    }

    /// Parse and validate a JSON scene description.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Self::from_description(serde_json::from_str(json)?)
    }

    /// Load and validate a JSON scene file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The demonstration scene: a few colored spheres on a reflective
    /// floor in front of a back wall, lit by two lights. The world is
    /// Z-up with the floor at z = -1.
    pub fn default_scene() -> SceneResult<Self> {
        let spheres = vec![
            Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0, Color::new(0.9, 0.2, 0.2), 0.5),
            Sphere::new(Vec3::new(2.5, -1.8, -0.3), 0.7, Color::new(0.2, 0.8, 0.3), 0.3),
            Sphere::new(Vec3::new(2.0, 1.6, -0.5), 0.5, Color::new(0.2, 0.3, 0.9), 0.8),
            Sphere::new(Vec3::new(0.4, 0.9, -0.7), 0.3, Color::new(0.9, 0.8, 0.2), 0.1),
        ];
        let planes = vec![
            Plane::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z, Color::new(0.8, 0.8, 0.8), 0.4),
            Plane::new(Vec3::new(8.0, 0.0, 0.0), Vec3::NEG_X, Color::new(0.3, 0.4, 0.6), 0.0),
        ];
        let lights = vec![
            Light::new(Vec3::new(-1.0, 3.0, 6.0), 1.0),
            Light::new(Vec3::new(4.0, -4.0, 5.0), 0.6),
        ];

        Self::new(spheres, planes, lights)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Total number of intersectable primitives.
    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.planes.len()
    }
}
