// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
mod rotation;

pub use interval::Interval;
pub use ray::Ray;
pub use rotation::rotation_from_euler_degrees;

/// Distance below which intersections are rejected and along which
/// secondary rays are pushed off a surface to avoid self-intersection.
pub const EPSILON: f32 = 1e-4;
