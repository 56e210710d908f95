//! Camera for primary-ray generation.
//!
//! The camera looks down its local +X axis with +Z up, so screen-right is
//! local -Y. Its orientation is three Euler angles in degrees (see
//! [`rotation_from_euler_degrees`]); a positive Y angle pitches the view
//! down.

use lumen_math::{rotation_from_euler_degrees, Mat3, Vec2, Vec3};
use thiserror::Error;

/// Errors detected while building a camera.
#[derive(Error, Debug, PartialEq)]
pub enum CameraError {
    #[error("Resolution must be non-zero, got {width}x{height}")]
    EmptyResolution { width: u32, height: u32 },

    #[error("Camera position and orientation must be finite")]
    NonFinite,

    #[error("Field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),
}

pub type CameraResult<T> = Result<T, CameraError>;

/// Default horizontal field of view in degrees.
pub const DEFAULT_FOV: f32 = 60.0;

/// A pinhole camera: position, orientation and resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    euler_degrees: [f32; 3],
    width: u32,
    height: u32,
    /// Horizontal field of view in degrees
    fov: f32,
    rotation: Mat3,
}

impl Camera {
    /// Create a camera, rejecting empty resolutions and non-finite input.
    pub fn new(position: Vec3, euler_degrees: [f32; 3], resolution: (u32, u32)) -> CameraResult<Self> {
        let (width, height) = resolution;
        if width == 0 || height == 0 {
            return Err(CameraError::EmptyResolution { width, height });
        }
        if !position.is_finite() || euler_degrees.iter().any(|a| !a.is_finite()) {
            return Err(CameraError::NonFinite);
        }

        Ok(Self {
            position,
            euler_degrees,
            width,
            height,
            fov: DEFAULT_FOV,
            rotation: rotation_from_euler_degrees(euler_degrees),
        })
    }

    /// Set the horizontal field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> CameraResult<Self> {
        if !(fov > 0.0 && fov < 180.0) {
            return Err(CameraError::FieldOfView(fov));
        }
        self.fov = fov;
        Ok(self)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn euler_degrees(&self) -> [f32; 3] {
        self.euler_degrees
    }

    /// Local-to-world rotation.
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Compute the camera-local direction through every pixel centre.
    ///
    /// Row 0 is the top of the image and column 0 its left edge. The grid is
    /// built once per frame and reused by every sample.
    pub fn generate_pixel_grid(&self) -> PixelGrid {
        let half_width = (self.fov.to_radians() / 2.0).tan();
        let half_height = half_width * self.height as f32 / self.width as f32;

        // One pixel step on the image plane at distance 1
        let step_right = Vec3::new(0.0, -2.0 * half_width / self.width as f32, 0.0);
        let step_down = Vec3::new(0.0, 0.0, -2.0 * half_height / self.height as f32);
        let top_left = Vec3::new(1.0, half_width, half_height) + 0.5 * (step_right + step_down);

        let mut directions = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let on_plane = top_left + x as f32 * step_right + y as f32 * step_down;
                directions.push(on_plane.normalize());
            }
        }

        PixelGrid {
            width: self.width,
            height: self.height,
            directions,
            step_right,
            step_down,
        }
    }
}

/// Dense width x height table of unit camera-local ray directions.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    directions: Vec<Vec3>,
    step_right: Vec3,
    step_down: Vec3,
}

impl PixelGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Unit direction through the centre of pixel (x, y).
    #[inline]
    pub fn direction(&self, x: u32, y: u32) -> Vec3 {
        self.directions[y as usize * self.width as usize + x as usize]
    }

    /// Unit direction through pixel (x, y) displaced by `offset` pixels.
    ///
    /// Offsets are in pixel units, so [-0.5, 0.5) on both axes stays inside
    /// the pixel footprint.
    pub fn sample_direction(&self, x: u32, y: u32, offset: Vec2) -> Vec3 {
        let centre = self.direction(x, y);
        if offset == Vec2::ZERO {
            return centre;
        }
        // Back onto the image plane at distance 1
        let on_plane = centre / centre.x;
        (on_plane + offset.x * self.step_right + offset.y * self.step_down).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            Camera::new(Vec3::ZERO, [0.0; 3], (0, 10)).unwrap_err(),
            CameraError::EmptyResolution { width: 0, height: 10 }
        );
        assert_eq!(
            Camera::new(Vec3::new(f32::NAN, 0.0, 0.0), [0.0; 3], (4, 4)).unwrap_err(),
            CameraError::NonFinite
        );
        let camera = Camera::new(Vec3::ZERO, [0.0; 3], (4, 4)).unwrap();
        assert!(camera.with_fov(0.0).is_err());
        assert!(camera.with_fov(180.0).is_err());
        assert!(camera.with_fov(90.0).is_ok());
    }

    #[test]
    fn test_grid_dimensions_and_unit_length() {
        let camera = Camera::new(Vec3::ZERO, [0.0; 3], (8, 6)).unwrap();
        let grid = camera.generate_pixel_grid();

        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 6);
        for y in 0..6 {
            for x in 0..8 {
                let dir = grid.direction(x, y);
                assert!((dir.length() - 1.0).abs() < 1e-5);
                assert!(dir.x > 0.0);
            }
        }
    }

    #[test]
    fn test_grid_orientation() {
        let camera = Camera::new(Vec3::ZERO, [0.0; 3], (4, 4)).unwrap();
        let grid = camera.generate_pixel_grid();

        // Top-left looks up and to the left (+Y is left)
        let top_left = grid.direction(0, 0);
        assert!(top_left.y > 0.0 && top_left.z > 0.0);

        // Bottom-right looks down and to the right
        let bottom_right = grid.direction(3, 3);
        assert!(bottom_right.y < 0.0 && bottom_right.z < 0.0);

        // Symmetric about the optical axis
        assert!((top_left.y + bottom_right.y).abs() < 1e-6);
        assert!((top_left.z + bottom_right.z).abs() < 1e-6);
    }

    #[test]
    fn test_fov_spans_image() {
        let camera = Camera::new(Vec3::ZERO, [0.0; 3], (2, 1)).unwrap().with_fov(90.0).unwrap();
        let grid = camera.generate_pixel_grid();

        // Pixel centres sit at a quarter and three quarters of the half-width
        let left = grid.direction(0, 0);
        assert!((left.y / left.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sample_direction_offsets() {
        let camera = Camera::new(Vec3::ZERO, [0.0; 3], (4, 4)).unwrap();
        let grid = camera.generate_pixel_grid();

        assert_eq!(grid.sample_direction(1, 1, Vec2::ZERO), grid.direction(1, 1));

        // Half a pixel right of pixel 1 and half a pixel left of pixel 2 meet
        let a = grid.sample_direction(1, 1, Vec2::new(0.5, 0.0));
        let b = grid.sample_direction(2, 1, Vec2::new(-0.5, 0.0));
        assert!((a - b).length() < 1e-5);
        assert!((a.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_wide_grid_indexing() {
        // Row-major indexing in usize across a very wide strip
        let camera = Camera::new(Vec3::ZERO, [0.0; 3], (70_000, 2)).unwrap();
        let grid = camera.generate_pixel_grid();

        let last = grid.direction(69_999, 1);
        assert!(last.y < 0.0 && last.z < 0.0);
        assert_ne!(grid.direction(69_999, 0), grid.direction(69_999, 1));
    }

    #[test]
    fn test_rotation_is_applied() {
        let camera = Camera::new(Vec3::new(-2.0, 0.0, 2.0), [0.0, 45.0, 0.0], (4, 4)).unwrap();
        let forward = camera.rotation() * Vec3::X;
        let expected = Vec3::new(1.0, 0.0, -1.0).normalize();
        assert!((forward - expected).length() < 1e-5);
    }
}
