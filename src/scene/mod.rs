/// Scene layer: everything that owns a frame loop.
///
/// A scene borrows the `Context` (host + canvas + RNG), runs its own loop
/// and returns when its completion predicate holds. The only suspension
/// points are `Context::present` (frame pacing) and blocking waits for a
/// confirm press, both of which surface `HostError::Quit` when the player
/// closes the game.
///
/// Frame order inside every loop:
///   poll input -> update -> clear -> draw state -> draw overlay -> present

pub mod intro;
pub mod level;
pub mod session;
pub mod title;

use thiserror::Error;

use crate::domain::input::FrameInput;
use crate::domain::rng::GameRng;
use crate::domain::surface::{Canvas, Color, Surface};
use crate::sim::event::Tone;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("player quit")]
    Quit,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The platform a scene runs on: display, speaker, buttons, frame clock.
pub trait Host {
    /// Snapshot of buttons freshly pressed since the previous poll.
    fn poll_input(&mut self) -> Result<FrameInput, HostError>;

    /// Fire-and-forget beep.
    fn play(&mut self, tone: Tone);

    /// Show `canvas` and block until the next frame boundary.
    fn present(&mut self, canvas: &Canvas) -> Result<(), HostError>;
}

/// Platform context handed to every scene.
pub struct Context<H: Host> {
    pub host: H,
    pub canvas: Canvas,
    pub rng: GameRng,
    /// Frames presented since start, drives blinking and rain scroll.
    pub frame: u32,
}

impl<H: Host> Context<H> {
    pub fn new(host: H, rng: GameRng) -> Self {
        Context { host, canvas: Canvas::new(), rng, frame: 0 }
    }

    pub fn poll_input(&mut self) -> Result<FrameInput, HostError> {
        self.host.poll_input()
    }

    pub fn play(&mut self, tone: Tone) {
        self.host.play(tone);
    }

    pub fn present(&mut self) -> Result<(), HostError> {
        self.host.present(&self.canvas)?;
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }

    /// Keep the current picture up for `frames` frames, ignoring buttons.
    pub fn hold(&mut self, frames: u32) -> Result<(), HostError> {
        for _ in 0..frames {
            self.poll_input()?;
            self.present()?;
        }
        Ok(())
    }

    /// Clear the canvas and print `text` centred on the middle row.
    pub fn show_message(&mut self, text: &str) {
        self.canvas.clear(Color::Off);
        let y = crate::domain::SCREEN_HEIGHT / 2 - 4;
        self.canvas.draw_text(text, crate::domain::centered_x(text), y, Color::On);
    }

    /// Block until confirm is pressed, presenting the canvas each frame.
    pub fn wait_for_confirm(&mut self) -> Result<(), HostError> {
        loop {
            if self.poll_input()?.confirm {
                return Ok(());
            }
            self.present()?;
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// Headless host: feeds a script of inputs and records what the game
    /// asked the platform to do.
    pub struct ScriptedHost {
        script: VecDeque<FrameInput>,
        /// Input repeated once the script runs dry; `None` quits instead.
        fallback: Option<FrameInput>,
        pub tones: Vec<Tone>,
        pub presented: u32,
        pub polls: u32,
        pub last_frame: Option<Canvas>,
    }

    impl ScriptedHost {
        pub fn new(script: Vec<FrameInput>, fallback: Option<FrameInput>) -> Self {
            ScriptedHost {
                script: script.into(),
                fallback,
                tones: Vec::new(),
                presented: 0,
                polls: 0,
                last_frame: None,
            }
        }
    }

    impl Host for ScriptedHost {
        fn poll_input(&mut self) -> Result<FrameInput, HostError> {
            self.polls += 1;
            match self.script.pop_front() {
                Some(input) => Ok(input),
                None => self.fallback.ok_or(HostError::Quit),
            }
        }

        fn play(&mut self, tone: Tone) {
            self.tones.push(tone);
        }

        fn present(&mut self, canvas: &Canvas) -> Result<(), HostError> {
            self.presented += 1;
            self.last_frame = Some(canvas.clone());
            Ok(())
        }
    }

    pub fn context(script: Vec<FrameInput>, fallback: Option<FrameInput>) -> Context<ScriptedHost> {
        Context::new(ScriptedHost::new(script, fallback), GameRng::seeded(1234))
    }
}
