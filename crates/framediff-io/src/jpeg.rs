//! JPEG image format support
//!
//! Reads JPEG images with the `jpeg-decoder` crate and writes them
//! with `jpeg-encoder`. Grayscale JPEGs are expanded to 3-channel RGB
//! on read so every decoded frame enters the pipeline in the same
//! layout.

use crate::{IoError, IoResult};
use framediff_core::RasterImage;
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Encoder quality for written JPEGs (0-100).
const JPEG_QUALITY: u8 = 90;

/// Read a JPEG image, normalized to 3-channel RGB.
///
/// # Errors
///
/// [`IoError::DecodeError`] on malformed data;
/// [`IoError::UnsupportedFormat`] for 16-bit grayscale and CMYK
/// streams.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<RasterImage> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG metadata unavailable".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let rgb = match info.pixel_format {
        PixelFormat::RGB24 => pixels,
        PixelFormat::L8 => {
            let mut rgb = Vec::with_capacity(pixels.len() * 3);
            for g in pixels {
                rgb.extend_from_slice(&[g, g, g]);
            }
            rgb
        }
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    RasterImage::from_pixels(width, height, 3, rgb).map_err(IoError::Core)
}

/// Write an image as JPEG at quality 90.
///
/// # Errors
///
/// [`IoError::InvalidData`] if either dimension exceeds the JPEG limit
/// of 65535 pixels; [`IoError::EncodeError`] if encoding fails.
pub fn write_jpeg<W: Write>(image: &RasterImage, writer: W) -> IoResult<()> {
    let width = u16::try_from(image.width()).map_err(|_| {
        IoError::InvalidData(format!("width {} exceeds JPEG limit", image.width()))
    })?;
    let height = u16::try_from(image.height()).map_err(|_| {
        IoError::InvalidData(format!("height {} exceeds JPEG limit", image.height()))
    })?;

    let color_type = match image.channels() {
        1 => ColorType::Luma,
        _ => ColorType::Rgb,
    };

    let encoder = Encoder::new(writer, JPEG_QUALITY);
    encoder
        .encode(image.pixels(), width, height, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;
    Ok(())
}
