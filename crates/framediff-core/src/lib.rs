//! framediff-core - Pixel containers and drawing primitives
//!
//! This crate provides the data structures shared by the framediff
//! change detector:
//!
//! - [`RasterImage`] - owned, interleaved pixel buffer with metadata
//! - [`Color`] / [`draw_square_outline`] - annotation rendering
//! - [`Error`] / [`Result`] - the core error type

pub mod draw;
pub mod error;
pub mod image;

pub use draw::{Color, draw_square_outline};
pub use error::{Error, Result};
pub use image::RasterImage;
