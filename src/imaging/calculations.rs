//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions for a width-constrained resize.
///
/// The height follows the source aspect ratio, rounded to the nearest pixel
/// and never below 1. Targets wider than the source upscale.
///
/// # Arguments
/// * `original` - Source dimensions (width, height)
/// * `target_width` - Requested output width in pixels
///
/// # Returns
/// * `(width, height)` - Output dimensions
pub fn scaled_dimensions(original: (u32, u32), target_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_w == 0 {
        return (target_width, orig_h.max(1));
    }

    let ratio = target_width as f64 / orig_w as f64;
    let height = (orig_h as f64 * ratio).round().max(1.0) as u32;
    (target_width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_downscale() {
        assert_eq!(scaled_dimensions((2400, 1600), 1200), (1200, 800));
    }

    #[test]
    fn portrait_downscale() {
        assert_eq!(scaled_dimensions((1000, 2000), 420), (420, 840));
    }

    #[test]
    fn square_downscale() {
        assert_eq!(scaled_dimensions((800, 800), 640), (640, 640));
    }

    #[test]
    fn rounds_to_nearest_pixel() {
        // 333 * 420 / 1000 = 139.86
        assert_eq!(scaled_dimensions((1000, 333), 420), (420, 140));
    }

    #[test]
    fn upscales_when_target_is_wider() {
        assert_eq!(scaled_dimensions((100, 50), 420), (420, 210));
    }

    #[test]
    fn very_wide_source_keeps_one_pixel_height() {
        assert_eq!(scaled_dimensions((10000, 1), 420), (420, 1));
    }

    #[test]
    fn same_width_is_identity() {
        assert_eq!(scaled_dimensions((640, 480), 640), (640, 480));
    }
}
