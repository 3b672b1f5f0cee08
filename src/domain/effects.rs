/// Decorative overlay effects.
///
/// Stateless: every function draws onto whatever the active screen already
/// composed, pulling randomness from the shared `GameRng`. Callers layer
/// several per frame; the order only affects which pixels end up on top.
/// With the same seed each function reproduces the same pixels.

use super::rng::GameRng;
use super::surface::{Color, Surface};

/// Noise density used when a caller has no preference.
pub const DEFAULT_NOISE: f32 = 0.1;

const GLITCH_CHANCE: f32 = 0.2;
const GLITCH_JITTER: i32 = 2;
const RAIN_COLUMN_STEP: usize = 4;
const RAIN_CHANCE: f32 = 0.3;
const BORDER_INSET: i32 = 8;

/// Dark line across every even row.
pub fn draw_scanlines<S: Surface + ?Sized>(surface: &mut S) {
    let (w, h) = (surface.width(), surface.height());
    for y in (0..h).step_by(2) {
        surface.draw_line(0, y, w - 1, y, Color::Off);
    }
}

/// Occasionally outline a jittered copy of the given rectangle.
pub fn draw_glitch_rect<S: Surface + ?Sized>(
    surface: &mut S,
    rng: &mut GameRng,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
) {
    if !rng.chance(GLITCH_CHANCE) { return; }
    let dx = rng.int(-GLITCH_JITTER, GLITCH_JITTER);
    let dw = rng.int(-GLITCH_JITTER, GLITCH_JITTER);
    surface.draw_rect(x + dx, y, w + dw, h, Color::On);
}

/// Light `width * height * intensity` random pixels.
pub fn draw_noise<S: Surface + ?Sized>(surface: &mut S, rng: &mut GameRng, intensity: f32) {
    let (w, h) = (surface.width(), surface.height());
    let count = (w as f32 * h as f32 * intensity) as usize;
    for _ in 0..count {
        let x = rng.int(0, w - 1);
        let y = rng.int(0, h - 1);
        surface.set_pixel(x, y, Color::On);
    }
}

/// Sparse falling "1"s; `offset` scrolls the pattern frame to frame.
pub fn draw_matrix_rain<S: Surface + ?Sized>(surface: &mut S, rng: &mut GameRng, offset: u32) {
    let (w, h) = (surface.width(), surface.height());
    for x in (0..w).step_by(RAIN_COLUMN_STEP) {
        if rng.chance(RAIN_CHANCE) {
            let y = ((offset as i64 + x as i64) % h as i64) as i32;
            surface.draw_text("1", x, y, Color::On);
        }
    }
}

/// A random bit glyph in each corner.
pub fn draw_hacking_border<S: Surface + ?Sized>(surface: &mut S, rng: &mut GameRng) {
    let right = surface.width() - BORDER_INSET;
    let bottom = surface.height() - BORDER_INSET;
    for (x, y) in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
        let glyph = rng.bit_glyph();
        surface.draw_text(glyph, x, y, Color::On);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::surface::Canvas;
    use crate::domain::{SCREEN_HEIGHT, SCREEN_WIDTH};

    fn render(seed: u64, effect: impl Fn(&mut Canvas, &mut GameRng)) -> Canvas {
        let mut canvas = Canvas::new();
        let mut rng = GameRng::seeded(seed);
        effect(&mut canvas, &mut rng);
        canvas
    }

    #[test]
    fn effects_are_reproducible_from_seed() {
        let effects: [fn(&mut Canvas, &mut GameRng); 4] = [
            |c, r| draw_noise(c, r, DEFAULT_NOISE),
            |c, r| draw_matrix_rain(c, r, 17),
            |c, r| draw_hacking_border(c, r),
            |c, r| {
                for _ in 0..20 {
                    draw_glitch_rect(c, r, 10, 10, 30, 9);
                }
            },
        ];
        for effect in effects {
            assert_eq!(render(42, effect), render(42, effect));
        }
    }

    #[test]
    fn scanlines_darken_even_rows_only() {
        let mut canvas = Canvas::new();
        canvas.clear(Color::On);
        draw_scanlines(&mut canvas);
        for y in 0..SCREEN_HEIGHT {
            assert_eq!(canvas.pixel(5, y), y % 2 == 1, "row {y}");
        }
        assert_eq!(canvas.lit_count(), (SCREEN_WIDTH * SCREEN_HEIGHT / 2) as usize);
    }

    #[test]
    fn noise_is_bounded_by_intensity() {
        let canvas = render(5, |c, r| draw_noise(c, r, 0.03));
        let budget = (SCREEN_WIDTH as f32 * SCREEN_HEIGHT as f32 * 0.03) as usize;
        assert!(canvas.lit_count() > 0);
        assert!(canvas.lit_count() <= budget);
    }

    #[test]
    fn zero_noise_draws_nothing() {
        assert_eq!(render(5, |c, r| draw_noise(c, r, 0.0)).lit_count(), 0);
    }

    #[test]
    fn glitch_rect_is_occasional() {
        let mut hits = 0;
        for seed in 0..200 {
            if render(seed, |c, r| draw_glitch_rect(c, r, 10, 10, 20, 8)).lit_count() > 0 {
                hits += 1;
            }
        }
        // p = 0.2 over 200 trials
        assert!((15..=70).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn glitch_rect_keeps_its_row() {
        for seed in 0..100 {
            let canvas = render(seed, |c, r| draw_glitch_rect(c, r, 20, 12, 10, 6));
            if canvas.lit_count() == 0 { continue; }
            for x in 0..SCREEN_WIDTH {
                assert!(!canvas.pixel(x, 11));
                assert!(!canvas.pixel(x, 18));
            }
            assert!((0..SCREEN_WIDTH).any(|x| canvas.pixel(x, 12)));
        }
    }

    #[test]
    fn rain_uses_every_fourth_column() {
        let canvas = render(8, |c, r| {
            for _ in 0..30 {
                draw_matrix_rain(c, r, 3);
            }
        });
        // glyph "1" only lights columns 1..=3 of its cell
        for x in (0..SCREEN_WIDTH).filter(|x| x % 4 == 0) {
            for y in 0..SCREEN_HEIGHT {
                assert!(!canvas.pixel(x, y));
            }
        }
        assert!(canvas.lit_count() > 0);
    }

    #[test]
    fn border_touches_all_corners() {
        let canvas = render(1, |c, r| draw_hacking_border(c, r));
        let inset = BORDER_INSET;
        let corners = [
            (0, 0),
            (SCREEN_WIDTH - inset, 0),
            (0, SCREEN_HEIGHT - inset),
            (SCREEN_WIDTH - inset, SCREEN_HEIGHT - inset),
        ];
        for (cx, cy) in corners {
            let lit = (cx..cx + 5).any(|x| (cy..cy + 7).any(|y| canvas.pixel(x, y)));
            assert!(lit, "corner ({cx}, {cy})");
        }
    }
}
