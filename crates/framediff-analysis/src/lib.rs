//! framediff-analysis - The frame comparison engine
//!
//! Compares two equally-sized decoded frames and reports rectangular
//! regions of significant visual change:
//!
//! - **Grayscale** ([`grayscale`]): classify inputs as visually
//!   grayscale and desaturate in place
//! - **Diff** ([`diff`]): per-pixel change map with optional mask
//!   gating
//! - **Cluster** ([`cluster`]): sliding-window hit detection and
//!   annotation
//! - **Engine** ([`engine`]): orchestration and parameters
//!
//! # Example
//!
//! ```
//! use framediff_analysis::{CompareParams, compare};
//! use framediff_core::RasterImage;
//!
//! let reference = RasterImage::new(64, 64, 3).unwrap();
//! let candidate = reference.clone();
//! let result = compare(reference, candidate, None, &CompareParams::default()).unwrap();
//! assert_eq!(result.hit_count, 0);
//! ```

pub mod cluster;
pub mod diff;
pub mod engine;
pub mod error;
pub mod grayscale;

pub use cluster::{ClusterWindow, detect_clusters, find_cluster_hits};
pub use diff::{DiffMap, MASK_INCLUDE, compute_diff};
pub use engine::{Comparison, CompareParams, compare};
pub use error::{AnalysisError, AnalysisResult};
pub use grayscale::{DEFAULT_COLOR_TOLERANCE, desaturate, is_grayscale};
