//! framediff - Visual change detection between image frames
//!
//! Compares pairs of decoded frames and reports clustered regions of
//! significant change:
//!
//! - Per-pixel diffing with a tunable sensitivity threshold
//! - Optional mask images to exclude volatile regions
//! - Optional grayscale normalization for color-vs-monochrome pairs
//! - Sliding-window clustering that separates real change from noise
//! - Red-outline annotation of every detected region
//!
//! # Example
//!
//! ```
//! use framediff::RasterImage;
//! use framediff::analysis::{CompareParams, compare};
//!
//! let reference = RasterImage::new(64, 64, 3).unwrap();
//! let candidate = reference.clone();
//! let result = compare(reference, candidate, None, &CompareParams::default()).unwrap();
//! assert_eq!(result.hit_count, 0);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use framediff_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use framediff_analysis as analysis;
pub use framediff_io as io;
