//! Nearest-hit search over the scene.

use lumen_core::{Color, Scene};
use lumen_math::{Interval, Ray, Vec3};

use crate::intersect::{intersect_plane, intersect_sphere};

/// Which primitive a ray hit, by index into the scene's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Sphere(usize),
    Plane(usize),
}

/// Record of a ray-object intersection.
///
/// Produced by [`find_nearest_hit`] and consumed immediately by shading.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Distance along the ray
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Base color of the surface
    pub color: Color,
    /// Surface reflectivity before the global coefficient is applied
    pub reflectivity: f32,
    pub surface: Surface,
}

impl HitRecord {
    fn new(ray: &Ray, t: f32, outward_normal: Vec3, color: Color, reflectivity: f32, surface: Surface) -> Self {
        // If the ray and normal point in the same direction, we're behind the surface
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face { outward_normal } else { -outward_normal };

        Self {
            t,
            p: ray.at(t),
            normal,
            front_face,
            color,
            reflectivity,
            surface,
        }
    }

    /// Origin for secondary rays: the hit point pushed off the surface.
    pub fn offset_origin(&self) -> Vec3 {
        self.p + self.normal * lumen_math::EPSILON
    }
}

/// Find the nearest intersection with `ray_t.min < t < ray_t.max`.
///
/// Spheres are scanned before planes; on an exact distance tie the first
/// primitive in scan order wins.
pub fn find_nearest_hit(ray: &Ray, scene: &Scene, ray_t: Interval) -> Option<HitRecord> {
    let mut closest_so_far = ray_t.max;
    let mut nearest: Option<(f32, Surface)> = None;

    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some(t) = intersect_sphere(ray, sphere) {
            if ray_t.with_max(closest_so_far).surrounds(t) {
                closest_so_far = t;
                nearest = Some((t, Surface::Sphere(index)));
            }
        }
    }

    for (index, plane) in scene.planes().iter().enumerate() {
        if let Some(t) = intersect_plane(ray, plane) {
            if ray_t.with_max(closest_so_far).surrounds(t) {
                closest_so_far = t;
                nearest = Some((t, Surface::Plane(index)));
            }
        }
    }

    // Build the record once, for the winner only
    nearest.map(|(t, surface)| match surface {
        Surface::Sphere(index) => {
            let sphere = &scene.spheres()[index];
            let outward_normal = (ray.at(t) - sphere.center) / sphere.radius;
            HitRecord::new(ray, t, outward_normal, sphere.color, sphere.reflectivity, surface)
        }
        Surface::Plane(index) => {
            let plane = &scene.planes()[index];
            HitRecord::new(ray, t, plane.normal, plane.color, plane.reflectivity, surface)
        }
    })
}

/// Whether anything intersects `ray` within `ray_t`.
///
/// Equivalent to `find_nearest_hit(..).is_some()` but stops at the first
/// intersection found, which is all a shadow test needs.
pub fn is_occluded(ray: &Ray, scene: &Scene, ray_t: Interval) -> bool {
    scene
        .spheres()
        .iter()
        .filter_map(|sphere| intersect_sphere(ray, sphere))
        .chain(scene.planes().iter().filter_map(|plane| intersect_plane(ray, plane)))
        .any(|t| ray_t.surrounds(t))
}
