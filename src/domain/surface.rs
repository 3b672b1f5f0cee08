/// Draw surface: the display primitives every scene renders through.
///
/// `Surface` is the host-facing seam. Implementors provide pixel access;
/// lines, rectangles and text are built on top of `set_pixel`, so every
/// surface rasterizes identically. `Canvas` is the in-memory 72x40
/// framebuffer a frame is composed into before the host presents it.
///
/// Coordinates are signed: streams and glitches regularly start above or
/// left of the screen, and off-screen pixels are clipped silently.

use super::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{GLYPH_ADVANCE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Monochrome pixel value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    Off,
    On,
}

impl Color {
    /// Alternating fill used by the flash transition: even = off, odd = on.
    pub fn from_parity(n: u32) -> Color {
        if n % 2 == 0 { Color::Off } else { Color::On }
    }
}

pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
    fn clear(&mut self, color: Color);

    /// Bresenham line, both endpoints inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
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

    /// Rectangle outline. Non-positive sizes draw nothing.
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 { return; }
        let (x1, y1) = (x + w - 1, y + h - 1);
        self.draw_line(x, y, x1, y, color);
        self.draw_line(x, y1, x1, y1, color);
        self.draw_line(x, y, x, y1, color);
        self.draw_line(x1, y, x1, y1, color);
    }

    /// Text in the built-in 5x7 font, one glyph every `GLYPH_ADVANCE` px.
    /// Only lit glyph pixels are written; the background shows through.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            let gx = x + i as i32 * GLYPH_ADVANCE;
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if font::lit(ch, col, row) {
                        self.set_pixel(gx + col, y + row, color);
                    }
                }
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Canvas {
    width: i32,
    height: i32,
    pixels: Vec<bool>,
}

impl Canvas {
    /// Blank canvas at the device resolution.
    pub fn new() -> Self {
        Self::with_size(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn with_size(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "canvas must be non-empty");
        Canvas {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Rows of pixels, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width as usize)
    }
}

impl Surface for Canvas {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color == Color::On;
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color == Color::On);
    }
}
