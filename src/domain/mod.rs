/// Host-independent building blocks: screen geometry, RNG, timers,
/// input snapshots, the draw surface and the decorative effects layer.

pub mod effects;
pub mod font;
pub mod input;
pub mod rng;
pub mod surface;
pub mod timer;

/// Logical display width in pixels.
pub const SCREEN_WIDTH: i32 = 72;
/// Logical display height in pixels.
pub const SCREEN_HEIGHT: i32 = 40;
/// Fixed frame rate every countdown is expressed in.
pub const FPS: u32 = 30;
/// Horizontal advance of one glyph (5 px glyph + 1 px gap).
pub const GLYPH_ADVANCE: i32 = 6;

/// X that horizontally centres `text` on the screen.
pub fn centered_x(text: &str) -> i32 {
    (SCREEN_WIDTH - text.chars().count() as i32 * GLYPH_ADVANCE) / 2
}

/// Convert seconds to a whole number of frames.
pub fn frames(seconds: f32) -> u32 {
    (seconds * FPS as f32).round() as u32
}
