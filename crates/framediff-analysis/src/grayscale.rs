//! Grayscale classification and normalization
//!
//! A frame coming from a camera that has switched to night mode is
//! effectively monochrome even though it is encoded as RGB. Diffing
//! such a frame against a color frame floods the diff map with chroma
//! noise, so the engine can classify both inputs and desaturate the
//! colorful one before computing the diff.

use crate::error::{AnalysisError, AnalysisResult};
use framediff_core::RasterImage;

/// Default channel-spread tolerance for [`is_grayscale`].
///
/// A pixel whose `max(r,g,b) - min(r,g,b)` exceeds this is counted as
/// colorful. 3 absorbs JPEG chroma subsampling artifacts on frames
/// that are visually gray.
pub const DEFAULT_COLOR_TOLERANCE: u8 = 3;

/// Classify an image as visually grayscale.
///
/// Counts pixels whose RGB channel spread exceeds `color_tolerance`;
/// the image is non-grayscale once more than
/// `colorful_pixel_threshold` such pixels exist. 1-channel images are
/// grayscale by definition.
///
/// # Errors
///
/// Returns [`AnalysisError::UnsupportedChannels`] for channel counts
/// other than 1 or 3.
pub fn is_grayscale(
    image: &RasterImage,
    color_tolerance: u8,
    colorful_pixel_threshold: u32,
) -> AnalysisResult<bool> {
    match image.channels() {
        1 => Ok(true),
        3 => {
            let mut colorful = 0u32;
            for px in image.pixels().chunks_exact(3) {
                let max = px[0].max(px[1]).max(px[2]);
                let min = px[0].min(px[1]).min(px[2]);
                if max - min > color_tolerance {
                    colorful += 1;
                    if colorful > colorful_pixel_threshold {
                        return Ok(false);
                    }
                }
            }
            Ok(true)
        }
        other => Err(AnalysisError::UnsupportedChannels(other)),
    }
}

/// Desaturate an RGB image in place.
///
/// Every pixel's channels are replaced by their integer average
/// `(r + g + b) / 3`. Applying this twice changes nothing: an averaged
/// triple averages to itself. 1-channel images are left untouched.
///
/// # Errors
///
/// Returns [`AnalysisError::UnsupportedChannels`] for channel counts
/// other than 1 or 3.
pub fn desaturate(image: &mut RasterImage) -> AnalysisResult<()> {
    match image.channels() {
        1 => Ok(()),
        3 => {
            for px in image.pixels_mut().chunks_exact_mut(3) {
                let avg = ((px[0] as u32 + px[1] as u32 + px[2] as u32) / 3) as u8;
                px[0] = avg;
                px[1] = avg;
                px[2] = avg;
            }
            Ok(())
        }
        other => Err(AnalysisError::UnsupportedChannels(other)),
    }
}
