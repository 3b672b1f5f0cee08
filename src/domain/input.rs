/// Input snapshot: the buttons freshly pressed this frame.
///
/// The host polls once per frame and hands every scene the same
/// `FrameInput`. Presses are edge-triggered; nothing is queued, so a scene
/// that accepts one button per frame simply drops the rest.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// "A" on the handheld.
    Confirm,
    /// "B" on the handheld.
    Cancel,
}

/// A D-pad direction, also the symbol alphabet of the sequence puzzle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Up => "U",
            Direction::Down => "D",
            Direction::Left => "L",
            Direction::Right => "R",
        }
    }

    pub fn from_button(button: Button) -> Option<Direction> {
        match button {
            Button::Up => Some(Direction::Up),
            Button::Down => Some(Direction::Down),
            Button::Left => Some(Direction::Left),
            Button::Right => Some(Direction::Right),
            Button::Confirm | Button::Cancel => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub cancel: bool,
}

impl FrameInput {
    /// Snapshot with exactly one button down.
    pub fn only(button: Button) -> Self {
        let mut input = FrameInput::default();
        input.set(button, true);
        input
    }

    pub fn set(&mut self, button: Button, down: bool) {
        match button {
            Button::Up => self.up = down,
            Button::Down => self.down = down,
            Button::Left => self.left = down,
            Button::Right => self.right = down,
            Button::Confirm => self.confirm = down,
            Button::Cancel => self.cancel = down,
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Confirm => self.confirm,
            Button::Cancel => self.cancel,
        }
    }

    /// First button of `priority` that is down.
    pub fn first_of(&self, priority: &[Button]) -> Option<Button> {
        priority.iter().copied().find(|b| self.is_pressed(*b))
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right || self.confirm || self.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_picks_first_down() {
        let mut input = FrameInput::only(Button::Right);
        input.set(Button::Down, true);
        let order = [Button::Up, Button::Down, Button::Left, Button::Right];
        assert_eq!(input.first_of(&order), Some(Button::Down));
        assert_eq!(FrameInput::default().first_of(&order), None);
    }

    #[test]
    fn only_sets_one_button() {
        let input = FrameInput::only(Button::Cancel);
        assert!(input.cancel);
        assert!(!input.confirm && !input.up);
        assert!(input.any());
        assert!(!FrameInput::default().any());
    }

    #[test]
    fn direction_symbols() {
        let symbols: Vec<_> = Direction::ALL.iter().map(|d| d.symbol()).collect();
        assert_eq!(symbols, ["U", "D", "L", "R"]);
        assert_eq!(Direction::from_button(Button::Left), Some(Direction::Left));
        assert_eq!(Direction::from_button(Button::Confirm), None);
    }
}
