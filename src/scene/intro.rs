/// Boot animation: digit rain with a rising chime, then a screen flash.

use crate::domain::rng::GameRng;
use crate::domain::surface::{Color, Surface};
use crate::domain::{frames, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::event::Tone;

use super::{Context, Host, HostError};

/// Frames the rain runs for.
pub const INTRO_FRAMES: u32 = 180;
/// A note sounds whenever the remaining frame count is a multiple of this.
const NOTE_INTERVAL: u32 = 10;
const NOTE_MS: u32 = 50;
const SCALE: [u32; 8] = [523, 587, 659, 783, 880, 987, 1046, 1174];

const STREAM_SPACING: usize = 6;
/// Vertical distance between glyphs in one stream's tail.
const STREAM_GLYPH_PITCH: i32 = 6;
const FLASH_STEPS: u32 = 5;
const FLASH_BASE_HZ: u32 = 1200;
const FLASH_STEP_HZ: u32 = 100;

// ── Streams ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Stream {
    pub x: i32,
    /// Head position; the tail extends upward from here.
    pub y: i32,
    pub length: i32,
    pub speed: i32,
}

impl Stream {
    fn spawn(x: i32, rng: &mut GameRng) -> Self {
        Stream {
            x,
            y: rng.int(-SCREEN_HEIGHT, 0),
            length: rng.int(8, 16),
            speed: rng.int(1, 2),
        }
    }

    fn respawn(&mut self, rng: &mut GameRng) {
        self.y = rng.int(-SCREEN_HEIGHT, -10);
        self.length = rng.int(8, 16);
        self.speed = rng.int(1, 2);
    }
}

/// One column of digits every 6 px across the screen.
pub struct MatrixRain {
    streams: Vec<Stream>,
}

impl MatrixRain {
    pub fn new(rng: &mut GameRng) -> Self {
        let streams = (0..SCREEN_WIDTH)
            .step_by(STREAM_SPACING)
            .map(|x| Stream::spawn(x, rng))
            .collect();
        MatrixRain { streams }
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn update(&mut self, rng: &mut GameRng) {
        for stream in &mut self.streams {
            stream.y += stream.speed;
            if stream.y > SCREEN_HEIGHT {
                stream.respawn(rng);
            }
        }
    }

    /// Clears the surface, then draws each visible digit of every stream.
    pub fn draw(&self, surface: &mut dyn Surface, rng: &mut GameRng) {
        surface.clear(Color::Off);
        for stream in &self.streams {
            for i in 0..stream.length {
                let y = stream.y - i * STREAM_GLYPH_PITCH;
                if (0..SCREEN_HEIGHT).contains(&y) {
                    surface.draw_text(rng.bit_glyph(), stream.x, y, Color::On);
                }
            }
        }
    }
}

// ── Scenes ──

pub fn matrix_intro<H: Host>(ctx: &mut Context<H>) -> Result<(), HostError> {
    log::debug!("scene: matrix intro");
    let mut rain = MatrixRain::new(&mut ctx.rng);
    let mut notes = SCALE.iter().cycle();

    for remaining in (1..=INTRO_FRAMES).rev() {
        ctx.poll_input()?;
        rain.update(&mut ctx.rng);
        rain.draw(&mut ctx.canvas, &mut ctx.rng);

        if remaining % NOTE_INTERVAL == 0 {
            if let Some(&hz) = notes.next() {
                ctx.play(Tone::new(hz, NOTE_MS));
            }
        }
        ctx.present()?;
    }
    Ok(())
}

/// Alternate the whole screen off/on with a falling beep.
pub fn flash_transition<H: Host>(ctx: &mut Context<H>) -> Result<(), HostError> {
    for i in 0..FLASH_STEPS {
        ctx.canvas.clear(Color::from_parity(i));
        ctx.play(Tone::new(FLASH_BASE_HZ - i * FLASH_STEP_HZ, NOTE_MS));
        ctx.hold(frames(0.1))?;
    }
    Ok(())
}
