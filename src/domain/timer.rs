/// Frame-based countdown.
///
/// Every scene timer counts frames, not wall time; the host's frame pacing
/// turns frames into seconds.

use super::FPS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    total: u32,
}

impl Countdown {
    pub fn new(frames: u32) -> Self {
        Countdown { remaining: frames, total: frames }
    }

    /// Advance one frame. Returns true once the countdown has hit zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Whole seconds left, as shown in the HUD.
    pub fn seconds_left(&self) -> u32 {
        self.remaining / FPS
    }
}
