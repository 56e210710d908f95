//! Closed-form ray/primitive intersection.
//!
//! Both functions return the distance along the ray to the nearest
//! intersection strictly beyond [`EPSILON`], or `None`.

use lumen_core::{Plane, Sphere};
use lumen_math::{Ray, EPSILON};

/// Intersect a ray with a sphere.
///
/// Returns the smallest root of the ray/sphere quadratic that lies beyond
/// `EPSILON`. A ray starting inside the sphere hits the far side; a tangent
/// ray hits at its single root.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = sphere.center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in front of the origin
    let near = (h - sqrtd) / a;
    if near > EPSILON {
        return Some(near);
    }
    let far = (h + sqrtd) / a;
    (far > EPSILON).then_some(far)
}

/// Intersect a ray with an infinite plane.
///
/// Rays parallel to the plane (|direction . normal| < `EPSILON`) never hit.
pub fn intersect_plane(ray: &Ray, plane: &Plane) -> Option<f32> {
    let denom = ray.direction().dot(plane.normal);

    // Ray is parallel to plane
    if denom.abs() < EPSILON {
        return None;
    }

    let t = (plane.point - ray.origin()).dot(plane.normal) / denom;
    (t > EPSILON).then_some(t)
}
