//! Frame orchestration.
//!
//! A [`Renderer`] holds everything a unit of work reads: the scene, the
//! camera's pixel grid, position and rotation, the render parameters and
//! the sample pattern. None of it changes during a render, so buckets can
//! be traced on any number of threads without synchronization; the frame
//! buffer is only touched once every bucket has finished.

use std::sync::Arc;
use std::time::Instant;

use lumen_core::{Camera, PixelGrid, RenderParams, Scene};
use lumen_math::{Mat3, Ray, Vec2, Vec3};
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::frame::{color_to_rgb, FrameBuffer};
use crate::sampling::{average_samples, SamplePattern};
use crate::tracer::trace;

/// Errors that abort a render.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("Frame buffer is {actual_width}x{actual_height}, camera renders {expected_width}x{expected_height}")]
    FrameSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Read-only render context shared by every bucket.
#[derive(Debug, Clone)]
pub struct Renderer {
    scene: Arc<Scene>,
    grid: PixelGrid,
    origin: Vec3,
    rotation: Mat3,
    params: RenderParams,
    pattern: SamplePattern,
    bucket_size: u32,
}

impl Renderer {
    /// Precompute the camera's pixel grid and sample pattern.
    pub fn new(scene: Arc<Scene>, camera: &Camera, params: RenderParams) -> Self {
        Self {
            scene,
            grid: camera.generate_pixel_grid(),
            origin: camera.position(),
            rotation: camera.rotation(),
            pattern: SamplePattern::from_params(&params),
            params,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }

    /// Set the edge length of dispatched buckets.
    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size.max(1);
        self
    }

    /// Replace the sub-pixel sample pattern.
    pub fn with_sample_pattern(mut self, pattern: SamplePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// World-space ray through pixel (x, y) displaced by `offset` pixels.
    pub fn primary_ray(&self, x: u32, y: u32, offset: Vec2) -> Ray {
        let local = self.grid.sample_direction(x, y, offset);
        Ray::new(self.origin, self.rotation * local)
    }

    /// Trace every sample of pixel (x, y) and return its clamped bytes.
    pub fn render_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let color = average_samples(&self.pattern, |offset| {
            let ray = self.primary_ray(x, y, offset);
            trace(&ray, &self.scene, &self.params, self.params.max_depth)
        });
        color_to_rgb(color)
    }

    /// Render a complete frame into a new buffer.
    pub fn render(&self) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.width(), self.height());
        self.write_frame(&mut frame);
        frame
    }

    /// Render a complete frame into a caller-provided buffer.
    ///
    /// Fails without touching the buffer if its size does not match the
    /// camera resolution.
    pub fn render_into(&self, frame: &mut FrameBuffer) -> RenderResult<()> {
        if frame.width() != self.width() || frame.height() != self.height() {
            return Err(RenderError::FrameSize {
                expected_width: self.width(),
                expected_height: self.height(),
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
        self.write_frame(frame);
        Ok(())
    }

    fn write_frame(&self, frame: &mut FrameBuffer) {
        let start = Instant::now();
        let buckets = generate_buckets(self.width(), self.height(), self.bucket_size);

        let results: Vec<BucketResult> = buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, self))
            .collect();

        for result in &results {
            frame.write_bucket(result);
        }

        log::debug!(
            "Rendered {}x{} ({} buckets, {} spp, depth {}) in {:?}",
            self.width(),
            self.height(),
            buckets.len(),
            self.pattern.len(),
            self.params.max_depth,
            start.elapsed()
        );
    }
}
