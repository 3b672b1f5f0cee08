/// Keyboard tracker.
///
/// Turns the terminal's key stream into one edge-triggered `FrameInput`
/// per frame. Holding a key produces a single press: auto-repeat events
/// only refresh the hold timer.
///
/// Uses crossterm's keyboard enhancement for Release events when the
/// renderer managed to enable it. Otherwise holds end after a timeout, and
/// two taps of one key inside that window read as a single press.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::input::{Button, FrameInput};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Game button bound to `code`, if any.
pub fn button_for(code: KeyCode) -> Option<Button> {
    let button = match code {
        KeyCode::Up => Button::Up,
        KeyCode::Down => Button::Down,
        KeyCode::Left => Button::Left,
        KeyCode::Right => Button::Right,
        KeyCode::Enter => Button::Confirm,
        KeyCode::Backspace => Button::Cancel,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Button::Up,
            's' => Button::Down,
            'a' => Button::Left,
            'd' => Button::Right,
            'z' | ' ' => Button::Confirm,
            'x' => Button::Cancel,
            _ => return None,
        },
        _ => return None,
    };
    Some(button)
}

/// Esc, Q or Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Buttons that went from released to held during the last drain.
    fresh: FrameInput,

    quit: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh: FrameInput::default(),
            quit: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.fresh = FrameInput::default();

        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, Instant::now());
            }
        }

        self.expire_holds(Instant::now());
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if is_quit(&key) {
            self.quit = true;
            return;
        }
        let was_held = self.is_held_at(key.code, now);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
                return;
            }
            KeyEventKind::Release => return,
            // auto-repeat only ever extends a hold
            KeyEventKind::Repeat => {
                self.last_active.insert(key.code, now);
                return;
            }
            KeyEventKind::Press => {
                self.last_active.insert(key.code, now);
            }
        }
        // With release reporting every Press is a new press. Without it,
        // repeats arrive as Press too, so a Press inside the hold window
        // is still the same press.
        if self.honor_release || !was_held {
            if let Some(button) = button_for(key.code) {
                self.fresh.set(button, true);
            }
        }
    }

    /// Release events end holds when honored; otherwise holds time out.
    fn expire_holds(&mut self, now: Instant) {
        if !self.honor_release {
            self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        }
    }

    /// Buttons freshly pressed during the last drain.
    pub fn frame_input(&self) -> FrameInput {
        self.fresh
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| self.honor_release || now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn bindings_cover_both_layouts() {
        assert_eq!(button_for(KeyCode::Up), Some(Button::Up));
        assert_eq!(button_for(KeyCode::Char('W')), Some(Button::Up));
        assert_eq!(button_for(KeyCode::Char('a')), Some(Button::Left));
        assert_eq!(button_for(KeyCode::Char(' ')), Some(Button::Confirm));
        assert_eq!(button_for(KeyCode::Enter), Some(Button::Confirm));
        assert_eq!(button_for(KeyCode::Char('x')), Some(Button::Cancel));
        assert_eq!(button_for(KeyCode::Backspace), Some(Button::Cancel));
        assert_eq!(button_for(KeyCode::Char('p')), None);
        assert_eq!(button_for(KeyCode::Tab), None);
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(&key(KeyCode::Esc, KeyEventKind::Press)));
        assert!(is_quit(&key(KeyCode::Char('q'), KeyEventKind::Press)));
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyEventKind::Press)));
        let mut ctrl_c = key(KeyCode::Char('c'), KeyEventKind::Press);
        ctrl_c.modifiers = KeyModifiers::CONTROL;
        assert!(is_quit(&ctrl_c));
        assert!(!is_quit(&key(KeyCode::Esc, KeyEventKind::Release)));
    }

    #[test]
    fn repeats_do_not_retrigger() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.handle_key(key(KeyCode::Left, KeyEventKind::Press), t0);
        assert!(input.frame_input().left);

        input.fresh = FrameInput::default();
        input.handle_key(key(KeyCode::Left, KeyEventKind::Repeat), t0 + Duration::from_millis(30));
        assert!(!input.frame_input().any());

        // long after the hold expired, a new press counts again
        input.fresh = FrameInput::default();
        input.handle_key(key(KeyCode::Left, KeyEventKind::Press), t0 + Duration::from_secs(1));
        assert!(input.frame_input().left);
    }

    #[test]
    fn release_rearms_when_honored() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t0 = Instant::now();
        input.handle_key(key(KeyCode::Char('z'), KeyEventKind::Press), t0);
        input.handle_key(key(KeyCode::Char('z'), KeyEventKind::Release), t0);
        input.fresh = FrameInput::default();
        input.handle_key(key(KeyCode::Char('z'), KeyEventKind::Press), t0);
        assert!(input.frame_input().confirm);
    }

    #[test]
    fn held_key_repeating_past_the_timeout_stays_one_press() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.handle_key(key(KeyCode::Up, KeyEventKind::Press), t0);
        assert!(input.frame_input().up);

        // OS auto-repeat delay is longer than the hold window
        input.fresh = FrameInput::default();
        input.expire_holds(t0 + Duration::from_millis(200));
        input.handle_key(key(KeyCode::Up, KeyEventKind::Repeat), t0 + Duration::from_millis(500));
        assert!(!input.frame_input().any());
    }

    #[test]
    fn quick_taps_count_twice_with_release_events() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t0 = Instant::now();
        let mut presses = 0;
        for i in 0..2u64 {
            input.fresh = FrameInput::default();
            let t = t0 + Duration::from_millis(40 * i);
            input.handle_key(key(KeyCode::Up, KeyEventKind::Press), t);
            if input.frame_input().up {
                presses += 1;
            }
            input.handle_key(key(KeyCode::Up, KeyEventKind::Release), t + Duration::from_millis(10));
        }
        assert_eq!(presses, 2);
    }

    #[test]
    fn honored_hold_never_times_out() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t0 = Instant::now();
        input.handle_key(key(KeyCode::Left, KeyEventKind::Press), t0);
        input.expire_holds(t0 + Duration::from_secs(2));
        input.fresh = FrameInput::default();
        input.handle_key(key(KeyCode::Left, KeyEventKind::Repeat), t0 + Duration::from_secs(2));
        assert!(!input.frame_input().any());
        assert!(input.is_held_at(KeyCode::Left, t0 + Duration::from_secs(2)));
    }

    #[test]
    fn quit_is_sticky() {
        let mut input = InputState::new();
        input.handle_key(key(KeyCode::Esc, KeyEventKind::Press), Instant::now());
        assert!(input.quit_requested());
        assert!(!input.frame_input().any());
    }
}
