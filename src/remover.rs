//! Background-removal transform seam
//!
//! The worker treats background removal as an opaque, resource-heavy
//! operation behind the [`BackgroundRemover`] trait, mirroring how model
//! inference sits behind a backend trait elsewhere. A pure-Rust reference
//! implementation is provided so the CLI works without a model runtime;
//! callers with a real segmentation model plug it in through the same
//! trait.

use crate::error::{BatchError, Result};
use image::{DynamicImage, Rgba, RgbaImage};

/// The background-removal transformation applied to each batch item
///
/// Implementations receive a decoded image and return an RGBA image with
/// the background made transparent. They are invoked strictly one at a
/// time from the worker loop, never concurrently.
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background from one image
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Transform`] on any model or runtime failure.
    /// The failure is non-fatal to the run; the worker reports it and
    /// moves to the next item.
    fn remove(&self, image: &DynamicImage) -> Result<RgbaImage>;
}

/// Border-keying background remover
///
/// Estimates the background color by averaging the outermost pixel ring,
/// then zeroes the alpha of every pixel within a chroma distance of that
/// estimate. Works for flat or near-flat backgrounds (product shots,
/// scans); photographic backgrounds need a segmentation model behind the
/// same trait.
pub struct BorderKeyRemover {
    /// Maximum squared RGB distance from the border color that still
    /// counts as background
    tolerance: u32,
}

impl BorderKeyRemover {
    const DEFAULT_TOLERANCE: u32 = 3 * 40 * 40;

    /// Create a remover with the default tolerance
    #[must_use]
    pub fn new() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Create a remover with a custom per-channel tolerance (0-255)
    #[must_use]
    pub fn with_channel_tolerance(tolerance: u8) -> Self {
        let t = u32::from(tolerance);
        Self { tolerance: 3 * t * t }
    }

    /// Average color of the one-pixel border ring
    fn estimate_background(image: &RgbaImage) -> Rgba<u8> {
        let (width, height) = image.dimensions();
        let mut sum = [0u64; 3];
        let mut count = 0u64;

        for (x, y, pixel) in image.enumerate_pixels() {
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                sum[0] += u64::from(pixel[0]);
                sum[1] += u64::from(pixel[1]);
                sum[2] += u64::from(pixel[2]);
                count += 1;
            }
        }

        // count is non-zero for any non-empty image
        let avg = |c: u64| u8::try_from(c / count.max(1)).unwrap_or(u8::MAX);
        Rgba([avg(sum[0]), avg(sum[1]), avg(sum[2]), 255])
    }

    fn distance_sq(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
        let d = |i: usize| {
            let diff = i32::from(a[i]) - i32::from(b[i]);
            (diff * diff) as u32
        };
        d(0) + d(1) + d(2)
    }
}

impl Default for BorderKeyRemover {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundRemover for BorderKeyRemover {
    fn remove(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let mut rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(BatchError::transform("input image has zero dimensions"));
        }

        let background = Self::estimate_background(&rgba);
        tracing::debug!(
            r = background[0],
            g = background[1],
            b = background[2],
            "estimated background color from border ring"
        );

        for pixel in rgba.pixels_mut() {
            if Self::distance_sq(*pixel, background) <= self.tolerance {
                pixel[3] = 0;
            }
        }

        Ok(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// White canvas with a solid red square in the middle
    fn red_square_on_white(size: u32) -> DynamicImage {
        let mut img = RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255]));
        let lo = size / 3;
        let hi = 2 * size / 3;
        for y in lo..hi {
            for x in lo..hi {
                img.put_pixel(x, y, Rgba([200, 0, 0, 255]));
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_background_becomes_transparent_foreground_stays() {
        let input = red_square_on_white(12);
        let output = BorderKeyRemover::new().remove(&input).expect("transform");

        // Corner was background
        assert_eq!(output.get_pixel(0, 0)[3], 0);
        // Center of the red square is foreground
        assert_eq!(output.get_pixel(6, 6)[3], 255);
        assert_eq!(output.get_pixel(6, 6)[0], 200);
    }

    #[test]
    fn test_zero_sized_image_is_a_transform_error() {
        let input = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        let err = BorderKeyRemover::new().remove(&input).unwrap_err();
        assert!(matches!(err, BatchError::Transform(_)));
    }

    #[test]
    fn test_tolerance_zero_only_removes_exact_matches() {
        let input = red_square_on_white(9);
        let output = BorderKeyRemover::with_channel_tolerance(0)
            .remove(&input)
            .expect("transform");

        assert_eq!(output.get_pixel(0, 0)[3], 0);
        assert_eq!(output.get_pixel(4, 4)[3], 255);
    }

    #[test]
    fn test_output_dimensions_match_input() {
        let input = red_square_on_white(15);
        let output = BorderKeyRemover::new().remove(&input).expect("transform");
        assert_eq!(output.dimensions(), (15, 15));
    }
}
