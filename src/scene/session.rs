/// Top-level loop: intro, title, briefing, three levels, verdict, restart.

use crate::sim::Outcome;

use super::intro::{flash_transition, matrix_intro};
use super::level::{level_complete, outcome_screen, restart_prompt, run_minigame, LEVELS};
use super::title::{intro_sequence, title_screen};
use super::{Context, Host, HostError};

pub const STARTING_LIVES: u32 = 3;

/// Bookkeeping for one play-through. Informational only: nothing here
/// changes which scene comes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub current_level: u32,
    pub lives: u32,
    pub score: u32,
    pub results: Vec<(u32, Outcome)>,
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession {
            current_level: 1,
            lives: STARTING_LIVES,
            score: 0,
            results: Vec::new(),
        }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished level. A win banks the frames left on its clock.
    pub fn record(&mut self, level: u32, outcome: Outcome, frames_left: u32) {
        match outcome {
            Outcome::Won => {
                self.score += frames_left;
                self.current_level = level + 1;
            }
            Outcome::Lost => self.lives = self.lives.saturating_sub(1),
            Outcome::Running => return,
        }
        self.results.push((level, outcome));
    }

    /// True once every level in the table has been won.
    pub fn all_won(&self) -> bool {
        self.results.len() == LEVELS.len() && self.results.iter().all(|(_, o)| *o == Outcome::Won)
    }
}

/// One full cycle from the boot animation to the restart confirm.
/// Returns whether the hack succeeded.
pub fn run_once<H: Host>(ctx: &mut Context<H>) -> Result<bool, HostError> {
    matrix_intro(ctx)?;
    flash_transition(ctx)?;
    title_screen(ctx)?;
    intro_sequence(ctx)?;

    let mut session = GameSession::new();
    for level in &LEVELS {
        let mut game = level.build(&mut ctx.rng);
        let outcome = run_minigame(ctx, game.as_mut())?;
        session.record(level.number, outcome, game.countdown().remaining());

        if outcome != Outcome::Won {
            break;
        }
        // the last level goes straight to the verdict
        if (level.number as usize) < LEVELS.len() {
            level_complete(ctx, level.number)?;
        }
    }

    let success = session.all_won();
    log::info!(
        "session over: success={} score={} lives={} results={:?}",
        success,
        session.score,
        session.lives,
        session.results
    );

    outcome_screen(ctx, success)?;
    restart_prompt(ctx)?;
    Ok(success)
}

/// Loop forever; only a host error (including quit) gets out.
pub fn run<H: Host>(ctx: &mut Context<H>) -> Result<(), HostError> {
    let mut runs: u32 = 0;
    loop {
        runs += 1;
        log::info!("run {runs} starting (seed {})", ctx.rng.seed());
        run_once(ctx)?;
    }
}
