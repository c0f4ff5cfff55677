//! Direct pixel access over an RGBA8 framebuffer.
//!
//! Responsibilities:
//! - Borrow a byte buffer as a drawable surface without copying.
//! - Provide the two primitives the viewer chrome needs: opaque pixel
//!   writes and Bresenham lines for the graticule.

/// Mutable view over a `width * height` RGBA8 pixel buffer.
pub struct Canvas<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Wraps a pixel buffer. The slice length must be `width * height * 4`.
    pub fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self { pixels, width, height }
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Writes one pixel, ignoring coordinates outside the canvas.
    pub fn set(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    /// Draws a line between two points with Bresenham stepping.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 4]) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                return;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}
