//! Whitted-style tracing with a bounded reflection depth.

use lumen_core::{Color, RenderParams, Scene};
use lumen_math::{Interval, Ray, Vec3};

use crate::hittable::find_nearest_hit;
use crate::shading::shade;

/// Mirror `d` about the unit normal `n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

/// Compute the color seen by a ray.
///
/// Shades the nearest hit and, while `depth` remains and the surface is
/// reflective, blends in the color seen along the mirror direction:
/// `(1 - r) * direct + r * reflected`. The blend is unrolled into a loop
/// carrying the weight of the remaining reflected term, so at most `depth`
/// reflection rays are cast and stack use does not grow with `depth`.
pub fn trace(ray: &Ray, scene: &Scene, params: &RenderParams, depth: u32) -> Color {
    let mut color = Color::ZERO;
    let mut weight: f32 = 1.0;
    let mut ray = *ray;
    let mut remaining = depth;

    loop {
        // Ray didn't hit anything - return background
        let Some(hit) = find_nearest_hit(&ray, scene, Interval::FORWARD) else {
            return color + weight * params.background;
        };

        let direct = shade(&hit, scene, params);

        let reflectivity = hit.reflectivity * params.reflectivity;
        if reflectivity <= 0.0 || remaining == 0 {
            return color + weight * direct;
        }

        color += weight * (1.0 - reflectivity) * direct;
        weight *= reflectivity;
        ray = Ray::new(hit.offset_origin(), reflect(ray.direction(), hit.normal));
        remaining -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Light, Plane, Sphere};

    fn params(reflectivity: f32, max_depth: u32) -> RenderParams {
        RenderParams {
            ambient: 0.1,
            lambert: 0.6,
            reflectivity,
            max_depth,
            background: Color::ZERO,
            ..RenderParams::default()
        }
    }

    /// A perfect mirror facing a red wall, with the camera looking at the mirror.
    fn mirror_scene() -> Scene {
        Scene::new(
            vec![Sphere::new(Vec3::new(-6.0, 0.0, 0.0), 1.0, Color::new(1.0, 0.0, 0.0), 0.0)],
            vec![Plane::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X, Color::new(0.0, 0.0, 1.0), 1.0)],
            vec![Light::new(Vec3::new(-3.0, 0.0, 3.0), 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = mirror_scene();
        let mut p = params(1.0, 2);
        p.background = Color::new(0.1, 0.2, 0.3);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(trace(&ray, &scene, &p, 2), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_depth_zero_is_direct_shade_only() {
        let scene = mirror_scene();
        let p = params(1.0, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let hit = find_nearest_hit(&ray, &scene, Interval::FORWARD).unwrap();
        let direct = shade(&hit, &scene, &p);
        assert_eq!(trace(&ray, &scene, &p, 0), direct);
    }

    #[test]
    fn test_full_mirror_shows_reflection() {
        let scene = mirror_scene();
        let p = params(1.0, 1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        // The mirror is blue but fully reflective, so we see the red sphere
        let color = trace(&ray, &scene, &p, 1);
        assert!(color.x > 0.0);
        assert_eq!(color.z, 0.0);
    }

    #[test]
    fn test_global_reflectivity_scales_blend() {
        let scene = mirror_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let off = trace(&ray, &scene, &params(0.0, 3), 3);
        let half = trace(&ray, &scene, &params(0.5, 3), 3);
        let full = trace(&ray, &scene, &params(1.0, 3), 3);

        assert_eq!(off.x, 0.0);
        assert!(half.x > 0.0 && half.z > 0.0);
        assert!((half - 0.5 * (off + full)).length() < 1e-5);
    }

    fn facing_mirrors() -> Scene {
        Scene::new(
            vec![],
            vec![
                Plane::new(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X, Color::ONE, 1.0),
                Plane::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X, Color::ONE, 1.0),
            ],
            vec![Light::new(Vec3::ZERO, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let color = trace(&ray, &facing_mirrors(), &params(1.0, 50), 50);
        assert!(color.is_finite());
    }

    #[test]
    fn test_huge_depth_between_mirrors() {
        let mirrors = facing_mirrors();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let p = params(1.0, 1_000_000);

        let color = trace(&ray, &mirrors, &p, 1_000_000);
        assert!(color.is_finite());

        // Perfect mirrors pass the last bounce's direct shade straight through
        let shallow = trace(&ray, &mirrors, &p, 3);
        assert!((color - shallow).length() < 1e-5);
    }

    #[test]
    fn test_partial_mirror_blend() {
        let scene = mirror_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let p = params(0.5, 1);

        let wall = find_nearest_hit(&ray, &scene, Interval::FORWARD).unwrap();
        let direct = shade(&wall, &scene, &p);
        let bounce = Ray::new(wall.offset_origin(), reflect(ray.direction(), wall.normal));
        let reflected = trace(&bounce, &scene, &p, 0);

        let expected = 0.5 * direct + 0.5 * reflected;
        assert!((trace(&ray, &scene, &p, 1) - expected).length() < 1e-6);
    }
}
