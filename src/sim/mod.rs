/// Minigame simulation.
///
/// Each minigame is a small state machine advanced once per frame by
/// `Minigame::step`. Stepping never draws and drawing never mutates, so a
/// game can be driven headless from scripted input in tests.
///
/// Step order shared by all three games:
///   1. Per-frame world update (falling streams, if any)
///   2. At most one input accepted
///   3. Win check
///   4. Countdown tick -> loss on zero

pub mod event;
pub mod extractor;
pub mod firewall;
pub mod sequence;

use crate::domain::input::FrameInput;
use crate::domain::rng::GameRng;
use crate::domain::surface::{Color, Surface};
use crate::domain::timer::Countdown;
use event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Running,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Running
    }
}

pub trait Minigame {
    fn name(&self) -> &'static str;

    /// Advance one frame. Once the outcome is `Won` or `Lost` further calls
    /// change nothing and return the same outcome.
    fn step(&mut self, input: &FrameInput, rng: &mut GameRng, events: &mut Vec<GameEvent>) -> Outcome;

    fn outcome(&self) -> Outcome;

    fn countdown(&self) -> &Countdown;

    fn draw(&self, surface: &mut dyn Surface);
}

/// Seconds left, top-left corner.
pub(crate) fn draw_timer(surface: &mut dyn Surface, countdown: &Countdown) {
    surface.draw_text(&countdown.seconds_left().to_string(), 2, 2, Color::On);
}

/// Shared tail of every step: tick the countdown and lose on zero.
pub(crate) fn tick_countdown(countdown: &mut Countdown, outcome: &mut Outcome) -> Outcome {
    if countdown.tick() {
        *outcome = Outcome::Lost;
    }
    *outcome
}
