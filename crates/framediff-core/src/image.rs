//! RasterImage - the decoded pixel container
//!
//! A `RasterImage` owns a flat interleaved pixel buffer plus its
//! width/height/channel metadata. Supported layouts are 3-channel RGB
//! (`r, g, b, r, g, b, ...`, row-major, no row padding) and 1-channel
//! grayscale.
//!
//! # Ownership model
//!
//! The buffer is exclusively owned. Components that mutate pixels take
//! `&mut RasterImage` (or ownership); there is no shared module state.
//! All pixel access goes through bounds-checked indexing so a
//! malformed coordinate can never read or write outside the buffer.

use crate::error::{Error, Result};

/// Decoded raster image with an owned interleaved pixel buffer.
///
/// Invariant: `pixels.len() == width * height * channels`, enforced by
/// every constructor.
///
/// # Examples
///
/// ```
/// use framediff_core::RasterImage;
///
/// let img = RasterImage::new(640, 480, 3).unwrap();
/// assert_eq!(img.width(), 640);
/// assert_eq!(img.pixels().len(), 640 * 480 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new image with all pixels set to zero (black).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 and
    /// [`Error::InvalidChannels`] if `channels` is not 1 or 3.
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self> {
        Self::validate_geometry(width, height, channels)?;
        let len = width as usize * height as usize * channels as usize;
        Ok(RasterImage {
            width,
            height,
            channels,
            pixels: vec![0u8; len],
        })
    }

    /// Wrap an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if the buffer length does
    /// not equal `width * height * channels`, in addition to the
    /// geometry checks of [`RasterImage::new`].
    pub fn from_pixels(width: u32, height: u32, channels: u32, pixels: Vec<u8>) -> Result<Self> {
        Self::validate_geometry(width, height, channels)?;
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(Error::BufferSizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(RasterImage {
            width,
            height,
            channels,
            pixels,
        })
    }

    fn validate_geometry(width: u32, height: u32, channels: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if channels != 1 && channels != 3 {
            return Err(Error::InvalidChannels(channels));
        }
        Ok(())
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of channels per pixel (1 or 3).
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Get read access to the raw interleaved pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get mutable access to the raw interleaved pixel buffer.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the image, returning the raw pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of the first channel of pixel `(x, y)`.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[inline]
    pub fn pixel_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.channels as usize)
    }

    /// Get one row of pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels as usize;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Get the RGB triple at `(x, y)`.
    ///
    /// For 1-channel images the gray value is replicated across all
    /// three components. Returns `None` if out of bounds.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let off = self.pixel_offset(x, y)?;
        match self.channels {
            1 => {
                let v = self.pixels[off];
                Some((v, v, v))
            }
            _ => Some((self.pixels[off], self.pixels[off + 1], self.pixels[off + 2])),
        }
    }

    /// Set the pixel at `(x, y)`.
    ///
    /// On 1-channel images the stored value is the integer average of
    /// the three components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates are outside
    /// the image.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        let off = self.pixel_offset(x, y).ok_or(Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        match self.channels {
            1 => {
                self.pixels[off] = ((r as u32 + g as u32 + b as u32) / 3) as u8;
            }
            _ => {
                self.pixels[off] = r;
                self.pixels[off + 1] = g;
                self.pixels[off + 2] = b;
            }
        }
        Ok(())
    }

    /// Check whether two images share width and height.
    pub fn sizes_equal(&self, other: &RasterImage) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Require identical width, height, and channel count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] or
    /// [`Error::ChannelMismatch`] describing the first difference.
    pub fn ensure_compatible(&self, other: &RasterImage) -> Result<()> {
        if !self.sizes_equal(other) {
            return Err(Error::DimensionMismatch(
                self.width,
                self.height,
                other.width,
                other.height,
            ));
        }
        if self.channels != other.channels {
            return Err(Error::ChannelMismatch(self.channels, other.channels));
        }
        Ok(())
    }
}
