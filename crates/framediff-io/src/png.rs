//! PNG image format support
//!
//! Decodes PNGs into RGB `RasterImage` buffers. Every supported input
//! layout (grayscale, grayscale+alpha, RGB, RGBA, indexed) is
//! normalized to 3-channel RGB on read; alpha is discarded since the
//! comparison pipeline only looks at color values.

use crate::{IoError, IoResult};
use framediff_core::RasterImage;
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image, normalized to 3-channel RGB
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<RasterImage> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG bit depth: {:?}",
            bit_depth
        )));
    }

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);

    match color_type {
        ColorType::Grayscale => {
            for y in 0..height {
                let row = &data[y as usize * bytes_per_row..];
                for x in 0..width as usize {
                    let g = row[x];
                    rgb.extend_from_slice(&[g, g, g]);
                }
            }
        }
        ColorType::GrayscaleAlpha => {
            for y in 0..height {
                let row = &data[y as usize * bytes_per_row..];
                for x in 0..width as usize {
                    let g = row[x * 2];
                    rgb.extend_from_slice(&[g, g, g]);
                }
            }
        }
        ColorType::Rgb => {
            for y in 0..height {
                let row = &data[y as usize * bytes_per_row..];
                rgb.extend_from_slice(&row[..width as usize * 3]);
            }
        }
        ColorType::Rgba => {
            for y in 0..height {
                let row = &data[y as usize * bytes_per_row..];
                for x in 0..width as usize {
                    rgb.extend_from_slice(&row[x * 4..x * 4 + 3]);
                }
            }
        }
        ColorType::Indexed => {
            let palette = reader
                .info()
                .palette
                .as_ref()
                .ok_or_else(|| IoError::InvalidData("indexed PNG without palette".to_string()))?
                .to_vec();
            for y in 0..height {
                let row = &data[y as usize * bytes_per_row..];
                for x in 0..width as usize {
                    let idx = row[x] as usize * 3;
                    let entry = palette.get(idx..idx + 3).ok_or_else(|| {
                        IoError::InvalidData(format!("palette index {} out of range", row[x]))
                    })?;
                    rgb.extend_from_slice(entry);
                }
            }
        }
    }

    RasterImage::from_pixels(width, height, 3, rgb).map_err(IoError::Core)
}

/// Write an image as PNG
///
/// 3-channel images are written as RGB, 1-channel as grayscale, both
/// at 8 bits per sample.
pub fn write_png<W: Write>(image: &RasterImage, writer: W) -> IoResult<()> {
    let color_type = match image.channels() {
        1 => ColorType::Grayscale,
        _ => ColorType::Rgb,
    };

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.pixels())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    Ok(())
}
