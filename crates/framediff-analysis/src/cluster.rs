//! Sliding-window cluster detection
//!
//! Scattered single-pixel changes are noise; a window densely filled
//! with changed pixels is a real event. The detector slides a square
//! window over the diff map with 50% overlap and declares a hit
//! wherever the changed-pixel count clears the threshold fraction of
//! the window area.
//!
//! # Window geometry
//!
//! Two quirks are deliberate and calibration-relevant:
//!
//! - Each window counts over the INCLUSIVE `(size+1) x (size+1)`
//!   square, one pixel wider than nominal, while the hit threshold is
//!   computed from the nominal `size^2` area. Correcting either side
//!   alone would shift every existing threshold calibration.
//! - Window origins run `0..dim - size` with a strict bound, so a
//!   bottom/right border of up to `size` pixels is never scanned.

use crate::diff::DiffMap;
use crate::error::{AnalysisError, AnalysisResult};
use framediff_core::{Color, RasterImage, draw_square_outline};

/// One detection window that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterWindow {
    /// Window origin, left edge
    pub x: u32,
    /// Window origin, top edge
    pub y: u32,
    /// Nominal side length (the scanned square is one pixel wider)
    pub size: u32,
}

fn validate_window_params(square_size: u32, threshold_factor: f32) -> AnalysisResult<()> {
    if square_size < 2 {
        return Err(AnalysisError::InvalidParameter(format!(
            "cluster square size must be at least 2, got {square_size}"
        )));
    }
    if !threshold_factor.is_finite() || threshold_factor < 0.0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "cluster threshold factor must be finite and non-negative, got {threshold_factor}"
        )));
    }
    Ok(())
}

/// Scan the diff map and return every window that qualifies as a hit.
///
/// Windows are visited on a grid stepping `square_size / 2` on both
/// axes. Overlapping windows fire independently, so one large change
/// region typically produces several hits.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] for a square size below
/// 2 (the half-size step would be zero) or a negative/non-finite
/// threshold factor.
pub fn find_cluster_hits(
    diff: &DiffMap,
    square_size: u32,
    threshold_factor: f32,
) -> AnalysisResult<Vec<ClusterWindow>> {
    validate_window_params(square_size, threshold_factor)?;

    let step = square_size / 2;
    let x_end = diff.width().saturating_sub(square_size);
    let y_end = diff.height().saturating_sub(square_size);
    let required = f64::from(square_size) * f64::from(square_size) * f64::from(threshold_factor);

    let mut hits = Vec::new();
    let mut x = 0;
    while x < x_end {
        let mut y = 0;
        while y < y_end {
            let mut changed = 0u32;
            for sx in 0..=square_size {
                for sy in 0..=square_size {
                    if diff.is_changed(x + sx, y + sy) {
                        changed += 1;
                    }
                }
            }
            if f64::from(changed) > required {
                hits.push(ClusterWindow {
                    x,
                    y,
                    size: square_size,
                });
            }
            y += step;
        }
        x += step;
    }
    Ok(hits)
}

/// Detect cluster hits and burn a red outline into the candidate image
/// at each hit window.
///
/// Returns the number of hits. The candidate buffer is the one handed
/// back to the caller for encoding; the diff map is left untouched.
///
/// # Errors
///
/// Same parameter validation as [`find_cluster_hits`].
pub fn detect_clusters(
    diff: &DiffMap,
    candidate: &mut RasterImage,
    square_size: u32,
    threshold_factor: f32,
) -> AnalysisResult<u32> {
    let hits = find_cluster_hits(diff, square_size, threshold_factor)?;
    for hit in &hits {
        draw_square_outline(candidate, hit.x, hit.y, hit.size, Color::RED);
    }
    Ok(hits.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;

    /// Diff map with a solid changed block at (x, y) of the given size.
    fn diff_with_block(w: u32, h: u32, x0: u32, y0: u32, bw: u32, bh: u32) -> DiffMap {
        let a = RasterImage::new(w, h, 3).unwrap();
        let mut b = RasterImage::new(w, h, 3).unwrap();
        for y in y0..(y0 + bh).min(h) {
            for x in x0..(x0 + bw).min(w) {
                b.set_rgb(x, y, 255, 255, 255).unwrap();
            }
        }
        compute_diff(&a, &b, None, 20).unwrap()
    }

    #[test]
    fn test_empty_diff_no_hits() {
        let diff = diff_with_block(32, 32, 0, 0, 0, 0);
        assert!(find_cluster_hits(&diff, 8, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_dense_block_fires() {
        let diff = diff_with_block(64, 64, 10, 10, 20, 20);
        let hits = find_cluster_hits(&diff, 12, 0.5).unwrap();
        assert!(!hits.is_empty());
        // Every hit window must overlap the changed block
        for hit in &hits {
            assert!(hit.x <= 30 && hit.x + hit.size >= 10);
            assert!(hit.y <= 30 && hit.y + hit.size >= 10);
        }
    }

    #[test]
    fn test_overlapping_windows_fire_independently() {
        // A 20x20 block fully covers several 50%-overlapped 12px windows
        let diff = diff_with_block(64, 64, 10, 10, 20, 20);
        let hits = find_cluster_hits(&diff, 12, 0.5).unwrap();
        assert!(hits.len() > 1, "expected stacked hits, got {}", hits.len());
    }

    #[test]
    fn test_threshold_is_strict_greater() {
        // Exactly fill size^2 * factor pixels: count must EXCEED it.
        // size 4, factor 0.5 -> required 8. Paint exactly 8 changed
        // pixels inside the window's inclusive 5x5 extent.
        let a = RasterImage::new(16, 16, 3).unwrap();
        let mut b = RasterImage::new(16, 16, 3).unwrap();
        for i in 0..8 {
            b.set_rgb(i % 4, i / 4, 255, 255, 255).unwrap();
        }
        let diff = compute_diff(&a, &b, None, 20).unwrap();
        assert!(find_cluster_hits(&diff, 4, 0.5).unwrap().is_empty());

        // One more pixel tips it over
        let mut b9 = b.clone();
        b9.set_rgb(0, 2, 255, 255, 255).unwrap();
        let diff = compute_diff(&a, &b9, None, 20).unwrap();
        let hits = find_cluster_hits(&diff, 4, 0.5).unwrap();
        assert!(hits.contains(&ClusterWindow { x: 0, y: 0, size: 4 }));
    }

    #[test]
    fn test_window_extent_is_inclusive() {
        // size 4, factor 0.5 -> required > 8. Window at origin (0,0)
        // scans the inclusive columns/rows 0..=4. Fill column 4 and
        // row 4 only (9 pixels in the 5x5 extent, none in the nominal
        // 4x4): the off-by-one means these DO count.
        let a = RasterImage::new(16, 16, 3).unwrap();
        let mut b = RasterImage::new(16, 16, 3).unwrap();
        for i in 0..=4u32 {
            b.set_rgb(4, i, 255, 255, 255).unwrap();
            b.set_rgb(i, 4, 255, 255, 255).unwrap();
        }
        let diff = compute_diff(&a, &b, None, 20).unwrap();
        let hits = find_cluster_hits(&diff, 4, 0.5).unwrap();
        assert!(hits.contains(&ClusterWindow { x: 0, y: 0, size: 4 }));
    }

    #[test]
    fn test_bottom_right_border_never_scanned() {
        // 32x32 with size 8: the last origin is (20, 20), whose
        // inclusive extent reaches pixel 28. A dense 3x3 block at
        // (29, 29) would clear the 6.4-pixel threshold if any window
        // saw it, but the border is never scanned.
        let diff = diff_with_block(32, 32, 29, 29, 3, 3);
        assert!(find_cluster_hits(&diff, 8, 0.1).unwrap().is_empty());
    }

    #[test]
    fn test_window_larger_than_image_no_hits() {
        let diff = diff_with_block(8, 8, 0, 0, 8, 8);
        assert!(find_cluster_hits(&diff, 16, 0.1).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let diff = diff_with_block(16, 16, 0, 0, 4, 4);
        assert!(find_cluster_hits(&diff, 1, 0.5).is_err());
        assert!(find_cluster_hits(&diff, 0, 0.5).is_err());
        assert!(find_cluster_hits(&diff, 8, -0.5).is_err());
        assert!(find_cluster_hits(&diff, 8, f32::NAN).is_err());
    }

    #[test]
    fn test_detect_clusters_draws_red_outlines() {
        let a = RasterImage::new(64, 64, 3).unwrap();
        let mut b = RasterImage::new(64, 64, 3).unwrap();
        for y in 10..30 {
            for x in 10..30 {
                b.set_rgb(x, y, 200, 200, 200).unwrap();
            }
        }
        let diff = compute_diff(&a, &b, None, 20).unwrap();
        let count = detect_clusters(&diff, &mut b, 12, 0.5).unwrap();
        assert!(count >= 1);

        let red = b
            .pixels()
            .chunks_exact(3)
            .filter(|px| px == &[255u8, 0, 0])
            .count();
        assert!(red > 0, "expected red annotation pixels");
    }

    #[test]
    fn test_detect_clusters_zero_hits_leaves_image_untouched() {
        let a = RasterImage::new(32, 32, 3).unwrap();
        let mut b = a.clone();
        let diff = compute_diff(&a, &b, None, 20).unwrap();
        let before = b.clone();
        let count = detect_clusters(&diff, &mut b, 8, 0.5).unwrap();
        assert_eq!(count, 0);
        assert_eq!(b, before);
    }
}
