//! The 3 x W x H byte frame buffer.

use image::{Rgb, RgbImage};
use lumen_core::Color;
use lumen_math::Interval;

use crate::bucket::BucketResult;

/// Number of color channels per pixel.
pub const CHANNELS: usize = 3;

/// Scale a 0-1 color to bytes, clamping each channel to [0, 255].
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let byte_range = Interval::new(0.0, 255.0);
    // NaN saturates to 0 in the cast
    let to_byte = |c: f32| byte_range.clamp(c * 255.0) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Channel-planar output image: all red bytes, then green, then blue,
/// each plane stored column by column (`[channel][x][y]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a new zero-filled frame buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; CHANNELS * width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, channel: usize, x: u32, y: u32) -> usize {
        (channel * self.width as usize + x as usize) * self.height as usize + y as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        [0, 1, 2].map(|c| self.data[self.index(c, x, y)])
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        for (c, value) in rgb.into_iter().enumerate() {
            let i = self.index(c, x, y);
            self.data[i] = value;
        }
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, rgb) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *rgb);
        }
    }

    /// Raw planar bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Convert to an interleaved RGB image for display or saving.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::Bucket;

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 3.0, 0.5)), [0, 255, 127]);
        assert_eq!(color_to_rgb(Color::new(f32::NAN, 0.0, 0.0)), [0, 0, 0]);
    }

    #[test]
    fn test_new_is_zeroed() {
        let frame = FrameBuffer::new(4, 3);
        assert_eq!(frame.as_bytes().len(), 36);
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_planar_layout() {
        let mut frame = FrameBuffer::new(2, 3);
        frame.set(1, 2, [10, 20, 30]);

        assert_eq!(frame.get(1, 2), [10, 20, 30]);
        let bytes = frame.as_bytes();
        // channel * (2 * 3) + x * 3 + y
        assert_eq!(bytes[5], 10);
        assert_eq!(bytes[6 + 5], 20);
        assert_eq!(bytes[12 + 5], 30);
    }

    #[test]
    fn test_write_bucket() {
        let mut frame = FrameBuffer::new(4, 4);
        let bucket = Bucket::new(2, 1, 2, 2);
        let pixels = vec![[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]];
        frame.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(frame.get(2, 1), [1, 1, 1]);
        assert_eq!(frame.get(3, 1), [2, 2, 2]);
        assert_eq!(frame.get(2, 2), [3, 3, 3]);
        assert_eq!(frame.get(3, 2), [4, 4, 4]);
        assert_eq!(frame.get(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_to_rgb_image() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.set(2, 1, [7, 8, 9]);

        let image = frame.to_rgb_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [7, 8, 9]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
