/// Level 2: firewall breaker.
///
/// A path of nodes walks left to right across a 6x4 grid. The player steers
/// a cursor onto the final node; intermediate nodes are decoration only.

use crate::domain::input::{Button, FrameInput};
use crate::domain::rng::GameRng;
use crate::domain::surface::{Color, Surface};
use crate::domain::timer::Countdown;

use super::event::GameEvent;
use super::{draw_timer, tick_countdown, Minigame, Outcome};

pub const GRID_W: i32 = 6;
pub const GRID_H: i32 = 4;

const TIME_LIMIT: u32 = 200;
const BASE_LENGTH: usize = 3;

/// Movement priority. A direction that would leave the grid is skipped and
/// the next pressed one is tried.
const PRIORITY: [Button; 4] = [Button::Up, Button::Down, Button::Right, Button::Left];

const ORIGIN_X: i32 = 10;
const ORIGIN_Y: i32 = 10;
const CELL_STEP_X: i32 = 10;
const CELL_STEP_Y: i32 = 8;
const NODE_SIZE: i32 = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathCell {
    pub x: i32,
    pub y: i32,
}

impl PathCell {
    pub const fn new(x: i32, y: i32) -> Self {
        PathCell { x, y }
    }

    fn screen_pos(self) -> (i32, i32) {
        (ORIGIN_X + self.x * CELL_STEP_X, ORIGIN_Y + self.y * CELL_STEP_Y)
    }
}

/// Bounded random walk: x steps by one from 0, y drifts at most one row.
pub fn generate_path(difficulty: u32, rng: &mut GameRng) -> Vec<PathCell> {
    let len = BASE_LENGTH + difficulty as usize;
    let mut path = Vec::with_capacity(len);
    path.push(PathCell::new(0, rng.int(0, GRID_H - 1)));
    while path.len() < len {
        let last = path[path.len() - 1];
        let y = rng.int((last.y - 1).max(0), (last.y + 1).min(GRID_H - 1));
        path.push(PathCell::new(last.x + 1, y));
    }
    path
}

pub struct FirewallBreaker {
    path: Vec<PathCell>,
    cursor: PathCell,
    countdown: Countdown,
    outcome: Outcome,
}

impl FirewallBreaker {
    pub fn new(difficulty: u32, rng: &mut GameRng) -> Self {
        Self::with_path(generate_path(difficulty, rng))
    }

    pub fn with_path(path: Vec<PathCell>) -> Self {
        assert!(!path.is_empty(), "firewall path must not be empty");
        FirewallBreaker {
            path,
            cursor: PathCell::new(0, 0),
            countdown: Countdown::new(TIME_LIMIT),
            outcome: Outcome::Running,
        }
    }

    pub fn path(&self) -> &[PathCell] {
        &self.path
    }

    pub fn cursor(&self) -> PathCell {
        self.cursor
    }

    fn exit_node(&self) -> PathCell {
        self.path[self.path.len() - 1]
    }

    fn try_move(&mut self, button: Button) -> bool {
        let c = self.cursor;
        let next = match button {
            Button::Up if c.y > 0 => PathCell::new(c.x, c.y - 1),
            Button::Down if c.y < GRID_H - 1 => PathCell::new(c.x, c.y + 1),
            Button::Right if c.x < GRID_W - 1 => PathCell::new(c.x + 1, c.y),
            Button::Left if c.x > 0 => PathCell::new(c.x - 1, c.y),
            _ => return false,
        };
        self.cursor = next;
        true
    }
}

impl Minigame for FirewallBreaker {
    fn name(&self) -> &'static str {
        "firewall breaker"
    }

    fn step(&mut self, input: &FrameInput, _rng: &mut GameRng, events: &mut Vec<GameEvent>) -> Outcome {
        if self.outcome.is_over() { return self.outcome; }

        for button in PRIORITY {
            if input.is_pressed(button) && self.try_move(button) {
                events.push(GameEvent::CursorMoved);
                break;
            }
        }

        if self.cursor == self.exit_node() {
            self.outcome = Outcome::Won;
            return self.outcome;
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
        for node in &self.path {
            let (x, y) = node.screen_pos();
            surface.draw_rect(x, y, NODE_SIZE, NODE_SIZE, Color::On);
        }
        let (x, y) = self.cursor.screen_pos();
        surface.draw_rect(x - 1, y - 1, NODE_SIZE + 2, NODE_SIZE + 2, Color::On);
    }
}
