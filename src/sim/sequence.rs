/// Level 1: password sequence hack.
///
/// Repeat a random string of D-pad directions before the clock runs out.
/// A wrong full-length entry wipes the player's input but leaves the
/// countdown running.

use crate::domain::input::{Button, Direction, FrameInput};
use crate::domain::rng::GameRng;
use crate::domain::surface::{Color, Surface};
use crate::domain::timer::Countdown;

use super::event::GameEvent;
use super::{draw_timer, tick_countdown, Minigame, Outcome};

const BASE_LENGTH: usize = 3;
const BASE_FRAMES: i64 = 150;
const FRAMES_PER_DIFFICULTY: i64 = 20;

/// Input priority; only the first pressed button counts.
const PRIORITY: [Button; 5] = [Button::Up, Button::Down, Button::Left, Button::Right, Button::Cancel];

const COLUMN_X: i32 = 10;
const COLUMN_STEP: i32 = 10;
const TARGET_ROW: i32 = 10;
const PLAYER_ROW: i32 = 25;

pub fn target_length(difficulty: u32) -> usize {
    BASE_LENGTH + difficulty as usize
}

/// Frames allowed at `difficulty`, never less than one.
pub fn time_limit(difficulty: u32) -> u32 {
    (BASE_FRAMES - FRAMES_PER_DIFFICULTY * difficulty as i64).max(1) as u32
}

pub struct SequenceHack {
    target: Vec<Direction>,
    entered: Vec<Direction>,
    countdown: Countdown,
    outcome: Outcome,
}

impl SequenceHack {
    pub fn new(difficulty: u32, rng: &mut GameRng) -> Self {
        let target = (0..target_length(difficulty))
            .map(|_| *rng.pick(&Direction::ALL))
            .collect();
        Self::with_target(difficulty, target)
    }

    /// Fixed puzzle; the time limit still follows `difficulty`.
    pub fn with_target(difficulty: u32, target: Vec<Direction>) -> Self {
        assert!(!target.is_empty(), "sequence target must not be empty");
        SequenceHack {
            target,
            entered: Vec::new(),
            countdown: Countdown::new(time_limit(difficulty)),
            outcome: Outcome::Running,
        }
    }

    pub fn target(&self) -> &[Direction] {
        &self.target
    }

    pub fn entered(&self) -> &[Direction] {
        &self.entered
    }

    fn handle_input(&mut self, input: &FrameInput, events: &mut Vec<GameEvent>) {
        let Some(button) = input.first_of(&PRIORITY) else { return };
        match Direction::from_button(button) {
            Some(dir) => {
                if self.entered.len() < self.target.len() {
                    self.entered.push(dir);
                    events.push(GameEvent::KeyAccepted);
                }
            }
            None => {
                if self.entered.pop().is_some() {
                    events.push(GameEvent::KeyErased);
                }
            }
        }
    }
}

impl Minigame for SequenceHack {
    fn name(&self) -> &'static str {
        "sequence hack"
    }

    fn step(&mut self, input: &FrameInput, _rng: &mut GameRng, events: &mut Vec<GameEvent>) -> Outcome {
        if self.outcome.is_over() { return self.outcome; }

        self.handle_input(input, events);

        if self.entered.len() == self.target.len() {
            if self.entered == self.target {
                self.outcome = Outcome::Won;
                return self.outcome;
            }
            self.entered.clear();
            events.push(GameEvent::SequenceRejected);
        }

        tick_countdown(&mut self.countdown, &mut self.outcome)
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }

    fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    fn draw(&self, surface: &mut dyn Surface) {
        draw_timer(surface, &self.countdown);
        for (row, dirs) in [(TARGET_ROW, &self.target), (PLAYER_ROW, &self.entered)] {
            for (i, dir) in dirs.iter().enumerate() {
                let x = COLUMN_X + i as i32 * COLUMN_STEP;
                surface.draw_text(dir.symbol(), x, row, Color::On);
            }
        }
    }
}
