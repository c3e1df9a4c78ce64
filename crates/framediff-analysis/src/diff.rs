//! Per-pixel diff computation
//!
//! Builds the binary diff map the cluster detector scans. Each pixel
//! of the two inputs is reduced to changed/unchanged by thresholding
//! the average absolute channel difference; the result is stored as a
//! green-on-black RGB image so it doubles as a visualization.

use crate::error::{AnalysisError, AnalysisResult};
use framediff_core::RasterImage;

/// Mask channel-0 value marking a pixel as included in the diff.
/// Any other value suppresses the pixel entirely.
pub const MASK_INCLUDE: u8 = 255;

/// Binary per-pixel change map.
///
/// Changed pixels are green `(0, 255, 0)`, unchanged pixels black. The
/// changed predicate used throughout clustering is "green channel is
/// 255".
#[derive(Debug, Clone)]
pub struct DiffMap {
    map: RasterImage,
}

impl DiffMap {
    /// Width of the map in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.map.width()
    }

    /// Height of the map in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.map.height()
    }

    /// Whether the pixel at `(x, y)` is classified as changed.
    ///
    /// Out-of-bounds coordinates are reported unchanged.
    #[inline]
    pub fn is_changed(&self, x: u32, y: u32) -> bool {
        matches!(self.map.rgb_at(x, y), Some((_, g, _)) if g == MASK_INCLUDE)
    }

    /// Total number of changed pixels.
    pub fn changed_count(&self) -> u64 {
        self.map
            .pixels()
            .chunks_exact(3)
            .filter(|px| px[1] == MASK_INCLUDE)
            .count() as u64
    }

    /// Borrow the green/black visualization image.
    pub fn as_image(&self) -> &RasterImage {
        &self.map
    }

    /// Consume the map, returning the visualization image for encoding.
    pub fn into_image(self) -> RasterImage {
        self.map
    }
}

/// Compute the diff map between two RGB images.
///
/// For each pixel included by the mask (or every pixel when no mask is
/// given), the absolute per-channel difference is averaged; pixels
/// whose average exceeds `sensitivity` are marked changed. Masked-out
/// pixels keep a zero diff and therefore never classify as changed.
///
/// # Errors
///
/// - [`AnalysisError::UnsupportedChannels`] unless both inputs are
///   3-channel RGB.
/// - [`AnalysisError::DimensionMismatch`] if the inputs differ in
///   width or height.
/// - [`AnalysisError::MaskDimensionMismatch`] if a mask is supplied
///   with different width or height. The mask itself may be 1- or
///   3-channel; only its first channel is consulted.
pub fn compute_diff(
    reference: &RasterImage,
    candidate: &RasterImage,
    mask: Option<&RasterImage>,
    sensitivity: u8,
) -> AnalysisResult<DiffMap> {
    if reference.channels() != 3 {
        return Err(AnalysisError::UnsupportedChannels(reference.channels()));
    }
    if candidate.channels() != 3 {
        return Err(AnalysisError::UnsupportedChannels(candidate.channels()));
    }
    if !reference.sizes_equal(candidate) {
        return Err(AnalysisError::DimensionMismatch(
            reference.width(),
            reference.height(),
            candidate.width(),
            candidate.height(),
        ));
    }
    if let Some(m) = mask
        && !m.sizes_equal(reference)
    {
        return Err(AnalysisError::MaskDimensionMismatch(
            m.width(),
            m.height(),
            reference.width(),
            reference.height(),
        ));
    }

    let mut map = RasterImage::new(reference.width(), reference.height(), 3)?;
    let mask_stride = mask.map(|m| m.channels() as usize);

    {
        let out = map.pixels_mut();
        let ref_px = reference.pixels();
        let cand_px = candidate.pixels();

        for i in 0..(reference.width() as usize * reference.height() as usize) {
            let included = match (mask, mask_stride) {
                (Some(m), Some(stride)) => m.pixels()[i * stride] == MASK_INCLUDE,
                _ => true,
            };
            if !included {
                continue;
            }

            let off = i * 3;
            let mut sum = 0u32;
            for c in 0..3 {
                sum += cand_px[off + c].abs_diff(ref_px[off + c]) as u32;
            }
            let avg = sum / 3;
            if avg > sensitivity as u32 {
                out[off] = 0;
                out[off + 1] = 255;
                out[off + 2] = 0;
            }
        }
    }

    Ok(DiffMap { map })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: (u8, u8, u8)) -> RasterImage {
        let mut img = RasterImage::new(width, height, 3).unwrap();
        for px in img.pixels_mut().chunks_exact_mut(3) {
            px.copy_from_slice(&[rgb.0, rgb.1, rgb.2]);
        }
        img
    }

    #[test]
    fn test_identical_images_have_empty_diff() {
        let a = solid(8, 8, (120, 50, 200));
        let diff = compute_diff(&a, &a.clone(), None, 20).unwrap();
        assert_eq!(diff.changed_count(), 0);
        assert!(!diff.is_changed(3, 3));
    }

    #[test]
    fn test_large_difference_marks_changed() {
        let a = solid(4, 4, (0, 0, 0));
        let b = solid(4, 4, (200, 200, 200));
        let diff = compute_diff(&a, &b, None, 20).unwrap();
        assert_eq!(diff.changed_count(), 16);
        assert!(diff.is_changed(0, 0));
        assert_eq!(diff.as_image().rgb_at(0, 0), Some((0, 255, 0)));
    }

    #[test]
    fn test_sensitivity_is_strict_greater() {
        let a = solid(2, 2, (0, 0, 0));
        let b = solid(2, 2, (20, 20, 20));
        // avg diff is exactly 20: not > 20
        let diff = compute_diff(&a, &b, None, 20).unwrap();
        assert_eq!(diff.changed_count(), 0);
        let diff = compute_diff(&a, &b, None, 19).unwrap();
        assert_eq!(diff.changed_count(), 4);
    }

    #[test]
    fn test_average_folds_channels() {
        let a = solid(2, 2, (0, 0, 0));
        // Only one channel differs by 90: avg = 30
        let b = solid(2, 2, (90, 0, 0));
        assert_eq!(compute_diff(&a, &b, None, 30).unwrap().changed_count(), 0);
        assert_eq!(compute_diff(&a, &b, None, 29).unwrap().changed_count(), 4);
    }

    #[test]
    fn test_mask_suppresses_pixels() {
        let a = solid(4, 4, (0, 0, 0));
        let b = solid(4, 4, (255, 255, 255));

        let mut mask = solid(4, 4, (0, 0, 0));
        // Include one pixel only
        mask.set_rgb(2, 1, 255, 255, 255).unwrap();

        let diff = compute_diff(&a, &b, Some(&mask), 20).unwrap();
        assert_eq!(diff.changed_count(), 1);
        assert!(diff.is_changed(2, 1));
        assert!(!diff.is_changed(0, 0));
    }

    #[test]
    fn test_mask_partial_values_suppress() {
        // 254 is not the include marker
        let a = solid(2, 2, (0, 0, 0));
        let b = solid(2, 2, (255, 255, 255));
        let mask = solid(2, 2, (254, 254, 254));
        let diff = compute_diff(&a, &b, Some(&mask), 20).unwrap();
        assert_eq!(diff.changed_count(), 0);
    }

    #[test]
    fn test_single_channel_mask() {
        let a = solid(2, 2, (0, 0, 0));
        let b = solid(2, 2, (255, 255, 255));
        let mut mask = RasterImage::new(2, 2, 1).unwrap();
        mask.pixels_mut()[0] = 255;
        let diff = compute_diff(&a, &b, Some(&mask), 20).unwrap();
        assert_eq!(diff.changed_count(), 1);
        assert!(diff.is_changed(0, 0));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let a = solid(4, 4, (0, 0, 0));
        let b = solid(4, 5, (0, 0, 0));
        assert!(matches!(
            compute_diff(&a, &b, None, 20),
            Err(AnalysisError::DimensionMismatch(4, 4, 4, 5))
        ));
    }

    #[test]
    fn test_mask_dimension_mismatch_rejected() {
        let a = solid(4, 4, (0, 0, 0));
        let mask = solid(3, 4, (255, 255, 255));
        assert!(matches!(
            compute_diff(&a, &a.clone(), Some(&mask), 20),
            Err(AnalysisError::MaskDimensionMismatch(3, 4, 4, 4))
        ));
    }
}
