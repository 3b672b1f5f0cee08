/// Level runner and the short screens between levels.

use crate::domain::effects::{draw_glitch_rect, draw_hacking_border, draw_noise};
use crate::domain::rng::GameRng;
use crate::domain::surface::{Color, Surface};
use crate::domain::frames;
use crate::sim::event::{GameEvent, Tone};
use crate::sim::extractor::DataExtractor;
use crate::sim::firewall::FirewallBreaker;
use crate::sim::sequence::SequenceHack;
use crate::sim::{Minigame, Outcome};

use super::{Context, Host, HostError};

const PLAY_NOISE: f32 = 0.02;
/// Box the glitch flicker hugs: the timer digits in the top-left corner.
const TIMER_BOX: (i32, i32, i32, i32) = (0, 0, 16, 11);

pub const PROMPT: &str = "Press A";
const RESTART_TONE: Tone = Tone::new(1000, 100);

// ── Level table ──

pub struct LevelSpec {
    pub number: u32,
    pub difficulty: u32,
    build: fn(u32, &mut GameRng) -> Box<dyn Minigame>,
}

impl LevelSpec {
    pub fn build(&self, rng: &mut GameRng) -> Box<dyn Minigame> {
        (self.build)(self.difficulty, rng)
    }
}

pub const LEVELS: [LevelSpec; 3] = [
    LevelSpec { number: 1, difficulty: 1, build: |d, rng| Box::new(SequenceHack::new(d, rng)) },
    LevelSpec { number: 2, difficulty: 2, build: |d, rng| Box::new(FirewallBreaker::new(d, rng)) },
    LevelSpec { number: 3, difficulty: 3, build: |d, rng| Box::new(DataExtractor::new(d, rng)) },
];

// ── Runner ──

/// Drive `game` one step per frame until it is won or lost.
/// The final frame is presented before returning.
pub fn run_minigame<H: Host>(ctx: &mut Context<H>, game: &mut dyn Minigame) -> Result<Outcome, HostError> {
    log::info!("level start: {} ({} frames)", game.name(), game.countdown().total());
    let mut events: Vec<GameEvent> = Vec::new();
    loop {
        let input = ctx.poll_input()?;

        events.clear();
        let outcome = game.step(&input, &mut ctx.rng, &mut events);
        for tone in events.iter().filter_map(|e| e.tone()) {
            ctx.play(tone);
        }

        ctx.canvas.clear(Color::Off);
        game.draw(&mut ctx.canvas);
        draw_play_overlay(ctx);
        ctx.present()?;

        if outcome.is_over() {
            log::info!(
                "level end: {} {:?} with {} frames left",
                game.name(),
                outcome,
                game.countdown().remaining()
            );
            return Ok(outcome);
        }
    }
}

fn draw_play_overlay<H: Host>(ctx: &mut Context<H>) {
    let Context { canvas, rng, .. } = &mut *ctx;
    draw_noise(canvas, rng, PLAY_NOISE);
    draw_hacking_border(canvas, rng);
    let (x, y, w, h) = TIMER_BOX;
    draw_glitch_rect(canvas, rng, x, y, w, h);
}

// ── Interstitials ──

pub fn level_complete<H: Host>(ctx: &mut Context<H>, number: u32) -> Result<(), HostError> {
    ctx.canvas.clear(Color::Off);
    ctx.canvas.draw_text(&format!("LEVEL {number}"), 15, 10, Color::On);
    ctx.canvas.draw_text("COMPLETE", 12, 20, Color::On);
    ctx.hold(frames(2.0))
}

/// Verdict for the whole run, then a further pause before the prompt.
pub fn outcome_screen<H: Host>(ctx: &mut Context<H>, success: bool) -> Result<(), HostError> {
    let msg = if success { "HACK COMPLETE" } else { "HACK FAILED" };
    ctx.show_message(msg);
    ctx.hold(frames(2.0))?;
    ctx.hold(frames(1.0))
}

pub fn restart_prompt<H: Host>(ctx: &mut Context<H>) -> Result<(), HostError> {
    ctx.show_message(PROMPT);
    ctx.present()?;
    ctx.wait_for_confirm()?;
    ctx.play(RESTART_TONE);
    ctx.hold(frames(0.2))
}
