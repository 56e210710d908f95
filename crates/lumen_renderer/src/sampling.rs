//! Deterministic sub-pixel sampling for anti-aliasing.

use lumen_core::{Color, RenderParams};
use lumen_math::Vec2;

/// A fixed set of sub-pixel offsets, in pixel units within [-0.5, 0.5)².
///
/// Offsets are stratified on an n x n grid. No randomness is involved, so
/// rendering the same frame twice yields identical bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePattern {
    offsets: Vec<Vec2>,
}

impl SamplePattern {
    /// One sample through the pixel centre.
    pub fn single() -> Self {
        Self {
            offsets: vec![Vec2::ZERO],
        }
    }

    /// n x n samples at the centres of the grid cells.
    pub fn stratified(per_axis: u32) -> Self {
        Self::stratified_with_phase(per_axis, 0.5)
    }

    /// n x n samples, each placed at `phase` (0-1) along its grid cell.
    ///
    /// Different phases give different, equally valid offset sets.
    pub fn stratified_with_phase(per_axis: u32, phase: f32) -> Self {
        let n = per_axis.max(1);
        let phase = phase.clamp(0.0, 1.0 - f32::EPSILON);
        let step = 1.0 / n as f32;

        let mut offsets = Vec::with_capacity((n * n) as usize);
        for j in 0..n {
            for i in 0..n {
                offsets.push(Vec2::new(
                    (i as f32 + phase) * step - 0.5,
                    (j as f32 + phase) * step - 0.5,
                ));
            }
        }
        Self { offsets }
    }

    /// The pattern selected by the render parameters.
    pub fn from_params(params: &RenderParams) -> Self {
        if params.anti_aliasing {
            Self::stratified(params.samples_per_axis)
        } else {
            Self::single()
        }
    }

    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Average `radiance` over every offset in the pattern.
pub fn average_samples(pattern: &SamplePattern, mut radiance: impl FnMut(Vec2) -> Color) -> Color {
    let sum = pattern
        .offsets()
        .iter()
        .fold(Color::ZERO, |acc, &offset| acc + radiance(offset));
    sum / pattern.len() as f32
}
