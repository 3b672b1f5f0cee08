/// Title card and the scripted "breach" messages that lead into level 1.

use crate::domain::effects::{draw_glitch_rect, draw_hacking_border, draw_matrix_rain, draw_noise, draw_scanlines};
use crate::domain::surface::{Color, Surface};
use crate::domain::{centered_x, frames, GLYPH_ADVANCE, SCREEN_HEIGHT};
use crate::sim::event::Tone;

use super::{Context, Host, HostError};

const TITLE: &str = "ThumbHack";
const SUBTITLE: &str = "Zero";
const PROMPT: &str = "Press A";

const TITLE_Y: i32 = 10;
const SUBTITLE_Y: i32 = 20;
const PROMPT_Y: i32 = 30;
const TITLE_JITTER_CHANCE: f32 = 0.1;
/// Prompt visibility toggles every half second.
const BLINK_FRAMES: u32 = 15;
const STRAY_DIGIT_CHANCE: f32 = 0.3;

pub const BREACH_MESSAGES: [&str; 5] = [
    "SYSTEM BREACH",
    "INITIATING...",
    "ACCESS DENIED",
    "BYPASSING...",
    "ACCESS GRANTED",
];
const BREACH_NOISE: f32 = 0.03;

/// Blocks until confirm. Returns without presenting the confirming frame.
pub fn title_screen<H: Host>(ctx: &mut Context<H>) -> Result<(), HostError> {
    log::debug!("scene: title");
    loop {
        if ctx.poll_input()?.confirm {
            return Ok(());
        }
        draw_title(ctx);
        ctx.present()?;
    }
}

fn draw_title<H: Host>(ctx: &mut Context<H>) {
    let Context { canvas, rng, frame, .. } = &mut *ctx;
    canvas.clear(Color::Off);

    let mut x = centered_x(TITLE);
    if rng.chance(TITLE_JITTER_CHANCE) {
        x += rng.int(-1, 1);
    }
    canvas.draw_text(TITLE, x, TITLE_Y, Color::On);
    canvas.draw_text(SUBTITLE, centered_x(SUBTITLE), SUBTITLE_Y, Color::On);

    if prompt_visible(*frame) {
        canvas.draw_text(PROMPT, centered_x(PROMPT), PROMPT_Y, Color::On);
    }

    if rng.chance(STRAY_DIGIT_CHANCE) {
        let (x, y) = (rng.int(0, 10), rng.int(0, 10));
        let glyph = rng.bit_glyph();
        canvas.draw_text(glyph, x, y, Color::On);
    }

    draw_matrix_rain(canvas, rng, *frame);
    draw_hacking_border(canvas, rng);
}

fn prompt_visible(frame: u32) -> bool {
    (frame / BLINK_FRAMES) % 2 == 1
}

/// Five status lines, half a second each, each with its own beep.
pub fn intro_sequence<H: Host>(ctx: &mut Context<H>) -> Result<(), HostError> {
    log::debug!("scene: intro sequence");
    let y = SCREEN_HEIGHT / 2 - 4;
    for msg in BREACH_MESSAGES {
        let hz = ctx.rng.int(800, 1200) as u32;
        ctx.play(Tone::new(hz, 50));

        for _ in 0..frames(0.5) {
            ctx.poll_input()?;
            ctx.show_message(msg);
            let Context { canvas, rng, .. } = &mut *ctx;
            let w = msg.chars().count() as i32 * GLYPH_ADVANCE;
            draw_glitch_rect(canvas, rng, centered_x(msg) - 2, y - 2, w + 3, 11);
            draw_scanlines(canvas);
            draw_noise(canvas, rng, BREACH_NOISE);
            ctx.present()?;
        }
    }
    Ok(())
}
