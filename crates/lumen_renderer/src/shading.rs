//! Ambient + Lambertian shading with hard shadows.

use lumen_core::{Color, RenderParams, Scene};
use lumen_math::{Interval, Ray};

use crate::hittable::{is_occluded, HitRecord};

/// Direct lighting at a hit point.
///
/// The ambient term is always applied. Each light adds
/// `lambert * max(0, n . l) * intensity * color` unless something lies
/// between the hit point and the light. Channels are not clamped here.
pub fn shade(hit: &HitRecord, scene: &Scene, params: &RenderParams) -> Color {
    let mut color = hit.color * params.ambient;
    let origin = hit.offset_origin();

    for light in scene.lights() {
        let to_light = light.position - origin;

        // A light sitting on the hit point has no direction to shade with
        let Some(direction) = to_light.try_normalize() else {
            continue;
        };
        let distance = to_light.length();

        let shadow_ray = Ray::new(origin, direction);
        if is_occluded(&shadow_ray, scene, Interval::FORWARD.with_max(distance)) {
            continue;
        }

        let cos_theta = hit.normal.dot(direction).max(0.0);
        color += params.lambert * cos_theta * light.intensity * hit.color;
    }

    color
}
