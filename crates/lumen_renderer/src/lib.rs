//! Lumen Renderer - the ray tracing kernel.
//!
//! A deterministic ray tracer with:
//! - Closed-form sphere and plane intersection
//! - Ambient + Lambertian shading with hard shadows
//! - Mirror reflection up to a bounded depth
//! - Anti-aliasing via stratified sub-pixel samples
//! - Bucketed parallel dispatch with rayon
//!
//! Every pixel is an independent unit of work that only reads the shared
//! scene, camera grid and parameters and writes its own frame buffer cell.

mod bucket;
mod frame;
mod hittable;
mod intersect;
mod renderer;
mod sampling;
mod shading;
mod tracer;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use frame::{color_to_rgb, FrameBuffer, CHANNELS};
pub use hittable::{find_nearest_hit, is_occluded, HitRecord, Surface};
pub use intersect::{intersect_plane, intersect_sphere};
pub use renderer::{RenderError, RenderResult, Renderer};
pub use sampling::{average_samples, SamplePattern};
pub use shading::shade;
pub use tracer::{reflect, trace};

/// Re-export the shared inputs so callers need only this crate
pub use lumen_core::{Camera, Color, Light, Plane, RenderConfig, RenderParams, Scene, Sphere};
pub use lumen_math::{Interval, Ray, Vec2, Vec3, EPSILON};
