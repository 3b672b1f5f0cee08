/// Events emitted during a minigame step.
/// The scene layer consumes these for audio feedback.

/// A fire-and-forget beep.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Tone {
    pub hz: u32,
    pub ms: u32,
}

impl Tone {
    pub const fn new(hz: u32, ms: u32) -> Self {
        Tone { hz, ms }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// A direction was appended to the sequence.
    KeyAccepted,
    /// The last sequence entry was removed.
    KeyErased,
    /// A full-length sequence did not match and was wiped.
    SequenceRejected,
    CursorMoved,
    DataCaptured,
}

impl GameEvent {
    pub fn tone(self) -> Option<Tone> {
        match self {
            GameEvent::KeyAccepted | GameEvent::CursorMoved => Some(Tone::new(1200, 50)),
            GameEvent::KeyErased => Some(Tone::new(800, 50)),
            GameEvent::DataCaptured => Some(Tone::new(2000, 100)),
            GameEvent::SequenceRejected => None,
        }
    }
}
