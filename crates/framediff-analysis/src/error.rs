//! Error types for framediff-analysis

use thiserror::Error;

/// Errors that can occur while comparing two images
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] framediff_core::Error),

    /// Compared images differ in width or height
    #[error("dimension mismatch between compared images: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),

    /// Mask geometry does not match the compared images
    #[error("mask dimension mismatch: mask is {0}x{1}, images are {2}x{3}")]
    MaskDimensionMismatch(u32, u32, u32, u32),

    /// Operation requires RGB input
    #[error("unsupported channel count: {0} (3-channel RGB required)")]
    UnsupportedChannels(u32),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
