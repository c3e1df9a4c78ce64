//! Drawing primitives
//!
//! The only shape this tool draws is the hollow square outline burned
//! into the candidate image at every cluster hit.

use crate::image::RasterImage;

/// RGB color for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// White color
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Red color
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    /// Green color
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };

    /// Convert to a grayscale value (0-255)
    pub fn to_gray(&self) -> u8 {
        ((self.r as u32 + self.g as u32 + self.b as u32) / 3) as u8
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Draw a hollow square outline with its top-left corner at `(x, y)`.
///
/// Walks every offset `(sx, sy)` in `[0, size]` on both axes and paints
/// the ones lying on the square border. The walked region is inclusive,
/// so the outline is `size + 1` pixels wide and tall. Writes falling
/// outside the image are clipped.
///
/// Overlapping outlines simply overwrite each other; callers drawing
/// one box per overlapping detection window get additively merged
/// rectangles, which is the intended rendering.
pub fn draw_square_outline(image: &mut RasterImage, x: u32, y: u32, size: u32, color: Color) {
    for sx in 0..=size {
        for sy in 0..=size {
            if sx == 0 || sx == size || sy == 0 || sy == size {
                // set_rgb bounds-checks; ignore clipped writes
                let _ = image.set_rgb(x + sx, y + sy, color.r, color.g, color.b);
            }
        }
    }
}
