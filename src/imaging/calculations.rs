//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every adapter sizes its output through [`compute_target_size`]; there is no
//! other resize math in the crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Output size of a resample, both sides at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn longer_side(self) -> u32 {
        self.width.max(self.height)
    }
}

/// Compute the size an image should be resampled to so that its longer side
/// fits within `max_pixel_dimension`.
///
/// Inputs are signed because platform bounds decoders report `-1` for
/// images they could not read; those are rejected rather than clamped.
/// Sides that do not fit in `u32` are rejected too.
///
/// # Arguments
/// * `max_pixel_dimension` - Upper bound for the longer side
/// * `original_width`, `original_height` - Source size in pixels
///
/// # Returns
/// * The original size when it already fits (never upscales), otherwise a
///   size with the same aspect ratio whose longer side is `max_pixel_dimension`.
///
/// # Examples
/// ```
/// # use picture_chooser::imaging::{compute_target_size, TargetSize};
/// // 4032x3024 phone photo bounded to 1024 → 1024x768
/// assert_eq!(
///     compute_target_size(1024, 4032, 3024).unwrap(),
///     TargetSize { width: 1024, height: 768 }
/// );
///
/// // Already small enough → unchanged
/// assert_eq!(
///     compute_target_size(2000, 800, 600).unwrap(),
///     TargetSize { width: 800, height: 600 }
/// );
/// ```
pub fn compute_target_size(
    max_pixel_dimension: i64,
    original_width: i64,
    original_height: i64,
) -> Result<TargetSize, DimensionError> {
    if max_pixel_dimension <= 0 {
        return Err(DimensionError::InvalidArgument(format!(
            "max pixel dimension must be positive, got {max_pixel_dimension}"
        )));
    }
    if original_width <= 0 || original_height <= 0 {
        return Err(DimensionError::InvalidArgument(format!(
            "image dimensions must be positive, got {original_width}x{original_height}"
        )));
    }

    let width = to_pixels(original_width)?;
    let height = to_pixels(original_height)?;

    let longer_side = original_width.max(original_height);
    if longer_side <= max_pixel_dimension {
        return Ok(TargetSize { width, height });
    }

    let scale = max_pixel_dimension as f64 / longer_side as f64;
    // f64::round is half-away-from-zero, which is half-up for positive values
    let width = ((original_width as f64 * scale).round() as i64).max(1);
    let height = ((original_height as f64 * scale).round() as i64).max(1);

    // Both sides are at most the source sides, which fit in u32
    Ok(TargetSize {
        width: to_pixels(width)?,
        height: to_pixels(height)?,
    })
}

fn to_pixels(value: i64) -> Result<u32, DimensionError> {
    u32::try_from(value).map_err(|_| {
        DimensionError::InvalidArgument(format!(
            "image dimension {value} exceeds the {} pixel limit",
            u32::MAX
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(max: i64, w: i64, h: i64) -> (u32, u32) {
        let t = compute_target_size(max, w, h).unwrap();
        (t.width, t.height)
    }

    // =========================================================================
    // No upscaling
    // =========================================================================

    #[test]
    fn smaller_image_is_unchanged() {
        assert_eq!(size(2000, 800, 600), (800, 600));
    }

    #[test]
    fn longer_side_equal_to_max_is_unchanged() {
        assert_eq!(size(1024, 1024, 512), (1024, 512));
        assert_eq!(size(1024, 1024, 1024), (1024, 1024));
    }

    #[test]
    fn tiny_image_is_unchanged() {
        assert_eq!(size(4096, 1, 1), (1, 1));
    }

    // =========================================================================
    // Downscaling
    // =========================================================================

    #[test]
    fn landscape_phone_photo() {
        // 4032x3024, scale ≈ 0.2540 → 1024x768
        assert_eq!(size(1024, 4032, 3024), (1024, 768));
    }

    #[test]
    fn portrait_phone_photo() {
        assert_eq!(size(1024, 3024, 4032), (768, 1024));
    }

    #[test]
    fn square_image() {
        assert_eq!(size(500, 2000, 2000), (500, 500));
    }

    #[test]
    fn rounds_half_up() {
        // 3x1 bounded to 2: 1 * 2/3 = 0.667 → 1
        assert_eq!(size(2, 3, 1), (2, 1));
        // 400x250 bounded to 100: 250 * 0.25 = 62.5 → 63
        assert_eq!(size(100, 400, 250), (100, 63));
    }

    #[test]
    fn extreme_panorama_keeps_one_pixel_height() {
        // 10000x3 bounded to 100 would give 0.03 → clamped to 1
        assert_eq!(size(100, 10000, 3), (100, 1));
    }

    #[test]
    fn aspect_ratio_preserved_within_rounding() {
        for &(max, w, h) in &[
            (1024, 4032, 3024),
            (800, 1920, 1080),
            (333, 1000, 777),
            (640, 480, 6000),
            (97, 12345, 6789),
        ] {
            let t = compute_target_size(max, w, h).unwrap();
            assert!(
                (t.longer_side() as i64 - max).abs() <= 1,
                "longer side of {w}x{h}@{max} was {}",
                t.longer_side()
            );
            let src_ratio = w as f64 / h as f64;
            // Allow one pixel of rounding on the shorter side
            let lo = (t.width as f64 - 1.0).max(1.0) / (t.height as f64 + 1.0);
            let hi = (t.width as f64 + 1.0) / (t.height as f64 - 1.0).max(1.0);
            assert!(
                lo <= src_ratio && src_ratio <= hi,
                "ratio of {w}x{h} not preserved in {}x{}",
                t.width,
                t.height
            );
        }
    }

    // =========================================================================
    // Invalid input
    // =========================================================================

    #[test]
    fn zero_max_dimension_is_invalid() {
        assert!(matches!(
            compute_target_size(0, 800, 600),
            Err(DimensionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn negative_max_dimension_is_invalid() {
        assert!(compute_target_size(-5, 800, 600).is_err());
    }

    #[test]
    fn negative_or_zero_source_dimensions_are_invalid() {
        assert!(compute_target_size(1024, -1, 600).is_err());
        assert!(compute_target_size(1024, 800, -1).is_err());
        assert!(compute_target_size(1024, 0, 600).is_err());
        assert!(compute_target_size(1024, 800, 0).is_err());
    }

    #[test]
    fn source_dimensions_beyond_u32_are_invalid() {
        // Would otherwise come back unchanged but truncated
        assert!(matches!(
            compute_target_size(i64::MAX, 5_000_000_000, 10),
            Err(DimensionError::InvalidArgument(_))
        ));
        // Would otherwise be scaled with a distorted ratio
        assert!(matches!(
            compute_target_size(6_000_000_000, 12_000_000_000, 10),
            Err(DimensionError::InvalidArgument(_))
        ));
        assert!(compute_target_size(1024, 10, i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn largest_u32_source_is_accepted() {
        let max = i64::from(u32::MAX);
        assert_eq!(size(max, max, 1), (u32::MAX, 1));
        assert_eq!(size(i64::MAX, max, max), (u32::MAX, u32::MAX));
    }
}
