/// Desktop terminal host: crossterm display and keyboard, optional gamepad
/// and speaker, and the 30 fps frame clock.

use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::domain::input::FrameInput;
use crate::domain::surface::Canvas;
use crate::domain::FPS;
use crate::scene::{Host, HostError};
use crate::sim::event::Tone;

use super::gamepad::GamepadState;
use super::input::InputState;
use super::renderer::Renderer;
use super::sound::SoundEngine;

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / FPS as u64);

pub struct TerminalHost {
    renderer: Renderer,
    keyboard: InputState,
    gamepad: GamepadState,
    sound: Option<SoundEngine>,
    next_frame: Instant,
}

impl TerminalHost {
    /// Puts the terminal into raw/alternate-screen mode. Pair with `cleanup`.
    pub fn new(config: &GameConfig) -> std::io::Result<Self> {
        let mut renderer = Renderer::new(config.display.pixel_width);
        renderer.init()?;

        let mut gamepad = GamepadState::new();
        gamepad.load_button_config(&config.gamepad);
        log::info!("gamepad connected at startup: {}", gamepad.connected);

        let sound = if config.audio.enabled {
            SoundEngine::new(config.audio.volume)
        } else {
            None
        };
        log::info!("audio: {}", if sound.is_some() { "on" } else { "off" });

        let mut keyboard = InputState::new();
        keyboard.honor_release = renderer.keyboard_enhanced();

        Ok(TerminalHost {
            renderer,
            keyboard,
            gamepad,
            sound,
            next_frame: Instant::now(),
        })
    }

    pub fn cleanup(&mut self) -> std::io::Result<()> {
        self.renderer.cleanup()
    }
}

/// Union of two edge-triggered snapshots.
fn merge(a: FrameInput, b: FrameInput) -> FrameInput {
    FrameInput {
        up: a.up || b.up,
        down: a.down || b.down,
        left: a.left || b.left,
        right: a.right || b.right,
        confirm: a.confirm || b.confirm,
        cancel: a.cancel || b.cancel,
    }
}

impl Host for TerminalHost {
    fn poll_input(&mut self) -> Result<FrameInput, HostError> {
        self.keyboard.drain_events()?;
        if self.keyboard.quit_requested() {
            return Err(HostError::Quit);
        }
        self.gamepad.update();
        Ok(merge(self.keyboard.frame_input(), self.gamepad.frame_input()))
    }

    fn play(&mut self, tone: Tone) {
        if let Some(sfx) = &self.sound {
            sfx.play(tone);
        }
    }

    fn present(&mut self, canvas: &Canvas) -> Result<(), HostError> {
        self.renderer.render(canvas)?;

        let now = Instant::now();
        if self.next_frame > now {
            std::thread::sleep(self.next_frame - now);
            self.next_frame += FRAME;
        } else {
            // fell behind: don't try to catch up with a burst of frames
            self.next_frame = now + FRAME;
        }
        Ok(())
    }
}
