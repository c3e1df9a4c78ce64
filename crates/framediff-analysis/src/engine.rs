//! Comparison orchestration
//!
//! Ties the analyzer stages together: optional grayscale
//! normalization, diff-map computation, cluster detection, and
//! annotation. One call compares one pair of frames; the engine owns
//! every buffer it derives and hands the annotated candidate back to
//! the caller.

use crate::cluster::detect_clusters;
use crate::diff::compute_diff;
use crate::error::{AnalysisError, AnalysisResult};
use crate::grayscale::{DEFAULT_COLOR_TOLERANCE, desaturate, is_grayscale};
use framediff_core::RasterImage;

/// Tuning parameters for one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareParams {
    /// Per-pixel average-diff threshold (0-255). A pixel counts as
    /// changed when its averaged channel difference exceeds this.
    pub sensitivity: u8,
    /// Nominal side length of the detection window, in pixels.
    pub cluster_square_size: u32,
    /// Fraction of the window's nominal area that must be changed
    /// pixels for the window to count as a hit.
    pub cluster_threshold_factor: f32,
    /// Desaturate one input when exactly one of the two classifies as
    /// grayscale, so color-vs-monochrome noise does not flood the diff.
    pub grayscale_normalize: bool,
    /// Channel-spread tolerance for the grayscale classifier.
    pub color_tolerance: u8,
    /// Number of colorful pixels above which an input classifies as a
    /// color image.
    pub colorful_pixel_threshold: u32,
}

impl Default for CompareParams {
    fn default() -> Self {
        CompareParams {
            sensitivity: 20,
            cluster_square_size: 12,
            cluster_threshold_factor: 0.5,
            grayscale_normalize: false,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
            colorful_pixel_threshold: 100,
        }
    }
}

impl CompareParams {
    /// Check the parameter combination before running a comparison.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidParameter`] for a cluster square
    /// size below 2 or a negative/non-finite threshold factor.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.cluster_square_size < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "cluster square size must be at least 2, got {}",
                self.cluster_square_size
            )));
        }
        if !self.cluster_threshold_factor.is_finite() || self.cluster_threshold_factor < 0.0 {
            return Err(AnalysisError::InvalidParameter(format!(
                "cluster threshold factor must be finite and non-negative, got {}",
                self.cluster_threshold_factor
            )));
        }
        Ok(())
    }
}

/// Outcome of one comparison.
#[derive(Debug)]
pub struct Comparison {
    /// Number of detection windows that fired.
    pub hit_count: u32,
    /// The candidate image with red outlines burned in at every hit.
    /// `None` when nothing fired; the caller then has nothing to write.
    pub annotated: Option<RasterImage>,
}

/// Compare a candidate frame against a reference frame.
///
/// The engine takes ownership of both buffers: the candidate is
/// mutated in place by normalization and annotation and returned
/// inside the [`Comparison`] when hits were found; the reference (and
/// the derived diff map) are dropped on return.
///
/// # Errors
///
/// Parameter validation errors plus everything
/// [`compute_diff`](crate::diff::compute_diff) rejects: non-RGB
/// inputs, image dimension mismatch, mask dimension mismatch.
pub fn compare(
    reference: RasterImage,
    candidate: RasterImage,
    mask: Option<&RasterImage>,
    params: &CompareParams,
) -> AnalysisResult<Comparison> {
    params.validate()?;

    let mut reference = reference;
    let mut candidate = candidate;

    if params.grayscale_normalize {
        let ref_gray = is_grayscale(
            &reference,
            params.color_tolerance,
            params.colorful_pixel_threshold,
        )?;
        let cand_gray = is_grayscale(
            &candidate,
            params.color_tolerance,
            params.colorful_pixel_threshold,
        )?;
        // Desaturate the odd one out; two color or two gray inputs are
        // already comparable.
        if ref_gray && !cand_gray {
            desaturate(&mut candidate)?;
        } else if cand_gray && !ref_gray {
            desaturate(&mut reference)?;
        }
    }

    let diff = compute_diff(&reference, &candidate, mask, params.sensitivity)?;
    let hit_count = detect_clusters(
        &diff,
        &mut candidate,
        params.cluster_square_size,
        params.cluster_threshold_factor,
    )?;

    Ok(Comparison {
        hit_count,
        annotated: (hit_count > 0).then_some(candidate),
    })
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
    fn test_defaults() {
        let p = CompareParams::default();
        assert_eq!(p.sensitivity, 20);
        assert_eq!(p.cluster_square_size, 12);
        assert_eq!(p.cluster_threshold_factor, 0.5);
        assert!(!p.grayscale_normalize);
    }

    #[test]
    fn test_identical_frames_no_hits() {
        let a = solid(32, 32, (80, 90, 100));
        let result = compare(a.clone(), a, None, &CompareParams::default()).unwrap();
        assert_eq!(result.hit_count, 0);
        assert!(result.annotated.is_none());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let a = solid(8, 8, (0, 0, 0));
        let params = CompareParams {
            cluster_square_size: 1,
            ..CompareParams::default()
        };
        assert!(compare(a.clone(), a, None, &params).is_err());
    }

    #[test]
    fn test_grayscale_normalization_suppresses_chroma_noise() {
        // Same luminance everywhere; one frame carries color. Without
        // normalization the channel spread alone exceeds the
        // sensitivity; with it the frames become identical.
        let color = solid(64, 64, (180, 60, 120));
        let gray = solid(64, 64, (120, 120, 120));

        let noisy = compare(
            gray.clone(),
            color.clone(),
            None,
            &CompareParams::default(),
        )
        .unwrap();
        assert!(noisy.hit_count > 0);

        let params = CompareParams {
            grayscale_normalize: true,
            ..CompareParams::default()
        };
        let normalized = compare(gray, color, None, &params).unwrap();
        assert_eq!(normalized.hit_count, 0);
    }

    #[test]
    fn test_annotated_returned_on_hits() {
        let a = solid(64, 64, (0, 0, 0));
        let mut b = a.clone();
        for y in 10..30 {
            for x in 10..30 {
                b.set_rgb(x, y, 255, 255, 255).unwrap();
            }
        }
        let result = compare(a, b, None, &CompareParams::default()).unwrap();
        assert!(result.hit_count >= 1);
        let annotated = result.annotated.expect("hits should yield an image");
        let red = annotated
            .pixels()
            .chunks_exact(3)
            .filter(|px| px == &[255u8, 0, 0])
            .count();
        assert!(red > 0);
    }
}
