//! framediff-io - Image decoding and encoding
//!
//! Reads JPEG and PNG files into [`RasterImage`] buffers and writes
//! result images back out:
//!
//! - **Format** ([`format`]): magic-number format detection
//! - **JPEG** ([`jpeg`]): decode via `jpeg-decoder`, encode via
//!   `jpeg-encoder`
//! - **PNG** ([`png`]): decode/encode via the `png` crate
//!
//! Reading always sniffs the file content, never the extension, so a
//! mislabeled file decodes with the right codec. Writing picks the
//! codec from the target extension and defaults to JPEG.

pub mod error;
pub mod format;
pub mod jpeg;
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
pub use jpeg::{read_jpeg, write_jpeg};
pub use png::{read_png, write_png};

use framediff_core::RasterImage;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

/// Read an image file, dispatching on the detected format.
///
/// The decoded image is always 3-channel RGB.
///
/// # Errors
///
/// [`IoError::Io`] if the file cannot be read,
/// [`IoError::UnsupportedFormat`] if the content is neither JPEG nor
/// PNG, plus any codec decode error.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<RasterImage> {
    let data = std::fs::read(path)?;
    match detect_format_from_bytes(&data)? {
        ImageFormat::Jpeg => read_jpeg(Cursor::new(data)),
        ImageFormat::Png => read_png(Cursor::new(data)),
    }
}

/// Write an image to a file, picking the codec from the extension.
///
/// `.png` writes PNG; everything else (including no extension) writes
/// JPEG.
///
/// # Errors
///
/// [`IoError::Io`] if the file cannot be created, plus any codec
/// encode error.
pub fn write_image<P: AsRef<Path>>(image: &RasterImage, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    match format {
        ImageFormat::Jpeg => write_jpeg(image, writer),
        ImageFormat::Png => write_png(image, writer),
    }
}
