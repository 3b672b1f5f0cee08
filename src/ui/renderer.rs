/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The 72x40 canvas is packed two pixel rows per terminal row with the
/// upper/lower half-block glyphs. Each pixel is `pixel_width` columns wide;
/// 1 gives roughly square pixels on a typical terminal font.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::surface::{Canvas, Surface};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// Using the same explicit RGB for `Clear(ClearType::All)` and every
    /// cell's background keeps VTE-style terminals from showing seams
    /// between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, Cell::BASE_BG));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg);
    }
}

// ── Palette ──

const PIXEL_ON: Color = Color::Rgb { r: 90, g: 255, b: 140 };
const PIXEL_OFF: Color = Color::Rgb { r: 8, g: 18, b: 12 };
const BEZEL: Color = Color::Rgb { r: 70, g: 70, b: 95 };
const LABEL: Color = Color::Rgb { r: 160, g: 160, b: 190 };

const TITLE: &str = "THUMBHACK ZERO";
const LEGEND: &str = "Arrows/WASD move   Z/Enter A   X/Bksp B   Esc quit";

/// Glyph for a terminal cell covering pixel rows `top` and `bottom`.
fn half_block(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '█',
        (true, false) => '▀',
        (false, true) => '▄',
        (false, false) => ' ',
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    /// Terminal columns per canvas pixel.
    pixel_w: usize,
    /// Key release events were requested in `init`; popped in `cleanup`.
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new(pixel_width: usize) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            pixel_w: pixel_width.clamp(1, 2),
            keyboard_enhanced: false,
        }
    }

    /// True once the terminal has agreed to report key releases.
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }
        log::info!("keyboard release events: {}", self.keyboard_enhanced);

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.keyboard_enhanced = false;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, canvas: &Canvas) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            log::debug!("terminal resized to {tw}x{th}");
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.compose(canvas);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Terminal size needed for the bezel: screen + border + title + legend.
    fn required_size(&self, canvas: &Canvas) -> (usize, usize) {
        let cols = canvas.width() as usize * self.pixel_w + 2;
        let rows = (canvas.height() as usize).div_ceil(2) + 2;
        (cols.max(LEGEND.len()), rows + 2)
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, canvas: &Canvas) {
        self.front.clear();

        let (need_w, need_h) = self.required_size(canvas);
        if self.front.width < need_w || self.front.height < need_h {
            let msg = format!("Terminal too small: need {need_w}x{need_h}");
            self.front.put_centered(self.front.height / 2, &msg, LABEL);
            return;
        }

        let screen_w = canvas.width() as usize * self.pixel_w;
        let screen_h = (canvas.height() as usize).div_ceil(2);
        let left = (self.front.width - (screen_w + 2)) / 2;
        let top = (self.front.height - need_h) / 2;

        self.front.put_centered(top, TITLE, LABEL);
        self.compose_bezel(left, top + 1, screen_w + 2, screen_h + 2);
        self.front.put_centered(top + screen_h + 3, LEGEND, LABEL);

        let rows: Vec<&[bool]> = canvas.rows().collect();
        for (ty, pair) in rows.chunks(2).enumerate() {
            let upper = pair[0];
            let lower = pair.get(1).copied();
            for (px, &on) in upper.iter().enumerate() {
                let below = lower.map(|row| row[px]).unwrap_or(false);
                let cell = Cell::new(half_block(on, below), PIXEL_ON, PIXEL_OFF);
                for dx in 0..self.pixel_w {
                    self.front.set(left + 1 + px * self.pixel_w + dx, top + 2 + ty, cell);
                }
            }
        }
    }

    fn compose_bezel(&mut self, x: usize, y: usize, w: usize, h: usize) {
        let (r, b) = (x + w - 1, y + h - 1);
        for cx in x + 1..r {
            self.front.set(cx, y, Cell::new('─', BEZEL, Cell::BASE_BG));
            self.front.set(cx, b, Cell::new('─', BEZEL, Cell::BASE_BG));
        }
        for cy in y + 1..b {
            self.front.set(x, cy, Cell::new('│', BEZEL, Cell::BASE_BG));
            self.front.set(r, cy, Cell::new('│', BEZEL, Cell::BASE_BG));
        }
        self.front.set(x, y, Cell::new('┌', BEZEL, Cell::BASE_BG));
        self.front.set(r, y, Cell::new('┐', BEZEL, Cell::BASE_BG));
        self.front.set(x, b, Cell::new('└', BEZEL, Cell::BASE_BG));
        self.front.set(r, b, Cell::new('┘', BEZEL, Cell::BASE_BG));
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Do NOT use ResetColor here: the terminal default may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
