//! Pixel probing for texture import decisions
//!
//! This module decodes a single still-image payload just far enough to
//! answer two questions:
//! - What is the native resolution? (drives the max-size policy)
//! - Does the image carry non-opaque pixels anywhere? (drives the
//!   alpha-transparency flag)
//!
//! Decode buffers live only for the duration of a call; nothing is cached.

use image::DynamicImage;
use thiserror::Error;

/// Upper bound on the number of pixels sampled when looking for alpha.
///
/// Sampling at a fixed stride keeps the cost at roughly this many probes no
/// matter how large the image is. The trade-off: a small isolated
/// transparent region that falls entirely between stride steps is missed.
/// That is a known limitation, not a bug. Callers rely on this cost bound,
/// so do not tighten the stride.
const ALPHA_SAMPLE_BUDGET: usize = 4096;

/// Probing failed because the payload is not a decodable image.
///
/// Callers treat this as a recoverable condition (fallback max size, "no
/// alpha"), never as a batch-fatal error.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The byte payload did not decode as a supported image format
    #[error("unsupported or corrupt image data: {0}")]
    Decode(#[from] image::ImageError),
}

/// Dimensions and sampled alpha usage of a decoded image.
///
/// Derived per probe, never stored. Width and height are always non-zero
/// when probing succeeds; a failed decode yields a [`ProbeError`] instead of
/// zeroed metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
    /// True when stride sampling found a pixel with alpha below 255
    pub has_alpha: bool,
}

/// Decode an image payload into dimensions and sampled alpha usage.
pub fn probe(bytes: &[u8]) -> Result<ImageMetrics, ProbeError> {
    let img = image::load_from_memory(bytes)?;
    let has_alpha = sample_alpha(&img);

    Ok(ImageMetrics {
        width: img.width(),
        height: img.height(),
        has_alpha,
    })
}

/// Decode an image payload and report whether it uses transparency anywhere.
pub fn probe_alpha(bytes: &[u8]) -> Result<bool, ProbeError> {
    let img = image::load_from_memory(bytes)?;
    Ok(sample_alpha(&img))
}

/// Sample the alpha channel at a fixed stride.
///
/// The image is expanded to canonical RGBA8 so every source format (paletted,
/// grayscale, RGB) answers through the same 4-bytes-per-pixel view. Formats
/// without an alpha channel expand to alpha = 255 and report opaque.
fn sample_alpha(img: &DynamicImage) -> bool {
    let rgba = img.to_rgba8();
    let pixel_count = rgba.width() as usize * rgba.height() as usize;
    let step = (pixel_count / ALPHA_SAMPLE_BUDGET).max(1);
    let raw = rgba.as_raw();

    (0..pixel_count)
        .step_by(step)
        .any(|i| raw[i * 4 + 3] < u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a PNG of the given size, fully opaque except for the listed
    /// pixel coordinates, which get alpha = 128.
    fn png_with_alpha_at(width: u32, height: u32, transparent: &[(u32, u32)]) -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, 255]));
        for &(x, y) in transparent {
            img.put_pixel(x, y, Rgba([120, 80, 40, 128]));
        }

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_probe_reports_dimensions() {
        let bytes = png_with_alpha_at(300, 150, &[]);
        let metrics = probe(&bytes).unwrap();

        assert_eq!(metrics.width, 300);
        assert_eq!(metrics.height, 150);
        assert!(!metrics.has_alpha);
    }

    #[test]
    fn test_probe_alpha_detects_transparency() {
        let bytes = png_with_alpha_at(8, 8, &[(3, 5)]);

        assert!(probe_alpha(&bytes).unwrap());
        assert!(probe(&bytes).unwrap().has_alpha);
    }

    #[test]
    fn test_rgb_image_is_opaque() {
        // No alpha channel in the source; RGBA expansion fills 255
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        assert!(!probe_alpha(&buf).unwrap());
    }

    #[test]
    fn test_undecodable_bytes_fail() {
        let garbage = b"definitely not an image";

        assert!(probe(garbage).is_err());
        assert!(probe_alpha(garbage).is_err());
    }

    #[test]
    fn test_stride_sampling_hits_sampled_pixels() {
        // 128x128 = 16384 pixels, so the stride is exactly 4.
        // A transparent pixel at linear index 4 sits on the stride.
        let bytes = png_with_alpha_at(128, 128, &[(4, 0)]);
        assert!(probe_alpha(&bytes).unwrap());
    }

    #[test]
    fn test_stride_sampling_can_miss_between_steps() {
        // Same stride of 4; linear index 1 is never sampled. This pins the
        // documented approximation: tiny transparent regions between stride
        // steps are not detected.
        let bytes = png_with_alpha_at(128, 128, &[(1, 0)]);
        assert!(!probe_alpha(&bytes).unwrap());
    }
}
