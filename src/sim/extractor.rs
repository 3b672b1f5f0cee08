/// Level 3: data extractor.
///
/// Four tokens fall down the screen; roughly a third carry data. Pressing
/// capture while a data token crosses the capture line banks it. Capture is
/// decided by vertical distance only: the horizontal cursor just chooses
/// the column every token is drawn in.

use crate::domain::input::FrameInput;
use crate::domain::rng::GameRng;
use crate::domain::surface::{Color, Surface};
use crate::domain::timer::Countdown;
use crate::domain::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::event::GameEvent;
use super::{draw_timer, tick_countdown, Minigame, Outcome};

pub const STREAM_COUNT: usize = 4;
pub const CAPTURE_LINE: i32 = SCREEN_HEIGHT / 2;

const TIME_LIMIT: u32 = 300;
const BASE_REQUIRED: u32 = 5;
const DATA_CHANCE: f32 = 0.3;
/// Tokens strictly closer than this to the capture line can be taken.
const CAPTURE_WINDOW: i32 = 4;
const TOKEN_HEIGHT: i32 = 8;
const CURSOR_STEP: i32 = 8;
const CURSOR_MAX: i32 = SCREEN_WIDTH - CURSOR_STEP;
const PROGRESS_X: i32 = 40;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DataStream {
    pub y: i32,
    pub speed: i32,
    pub is_data: bool,
}

impl DataStream {
    fn spawn(rng: &mut GameRng) -> Self {
        DataStream {
            y: rng.int(0, SCREEN_HEIGHT - TOKEN_HEIGHT),
            speed: rng.int(1, 3),
            is_data: rng.chance(DATA_CHANCE),
        }
    }

    /// Fall one frame; past the bottom the token re-enters above the
    /// screen with a fresh data roll.
    fn advance(&mut self, rng: &mut GameRng) {
        self.y += self.speed;
        if self.y > SCREEN_HEIGHT {
            self.y = -TOKEN_HEIGHT;
            self.is_data = rng.chance(DATA_CHANCE);
        }
    }

    fn on_capture_line(&self) -> bool {
        (self.y - CAPTURE_LINE).abs() < CAPTURE_WINDOW
    }

    fn glyph(&self) -> &'static str {
        if self.is_data { "$" } else { "0" }
    }
}

pub struct DataExtractor {
    streams: [DataStream; STREAM_COUNT],
    cursor_x: i32,
    captured: u32,
    required: u32,
    countdown: Countdown,
    outcome: Outcome,
}

impl DataExtractor {
    pub fn new(difficulty: u32, rng: &mut GameRng) -> Self {
        let streams = std::array::from_fn(|_| DataStream::spawn(rng));
        Self::with_streams(difficulty, streams)
    }

    pub fn with_streams(difficulty: u32, streams: [DataStream; STREAM_COUNT]) -> Self {
        DataExtractor {
            streams,
            cursor_x: 0,
            captured: 0,
            required: BASE_REQUIRED + difficulty,
            countdown: Countdown::new(TIME_LIMIT),
            outcome: Outcome::Running,
        }
    }

    pub fn streams(&self) -> &[DataStream; STREAM_COUNT] {
        &self.streams
    }

    pub fn cursor_x(&self) -> i32 {
        self.cursor_x
    }

    pub fn captured(&self) -> u32 {
        self.captured
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    /// Stops at `required`; tokens past the winning one stay uncaptured.
    fn capture(&mut self, events: &mut Vec<GameEvent>) {
        for stream in self.streams.iter_mut() {
            if self.captured >= self.required {
                break;
            }
            if stream.is_data && stream.on_capture_line() {
                stream.is_data = false;
                self.captured += 1;
                events.push(GameEvent::DataCaptured);
            }
        }
    }

    /// Left, Right, then capture; a move blocked by the screen edge lets
    /// the next pressed button through.
    fn handle_input(&mut self, input: &FrameInput, events: &mut Vec<GameEvent>) {
        if input.left && self.cursor_x > 0 {
            self.cursor_x -= CURSOR_STEP;
            events.push(GameEvent::CursorMoved);
        } else if input.right && self.cursor_x < CURSOR_MAX {
            self.cursor_x += CURSOR_STEP;
            events.push(GameEvent::CursorMoved);
        } else if input.confirm {
            self.capture(events);
        }
    }
}

impl Minigame for DataExtractor {
    fn name(&self) -> &'static str {
        "data extractor"
    }

    fn step(&mut self, input: &FrameInput, rng: &mut GameRng, events: &mut Vec<GameEvent>) -> Outcome {
        if self.outcome.is_over() { return self.outcome; }

        for stream in self.streams.iter_mut() {
            stream.advance(rng);
        }

        self.handle_input(input, events);

        if self.captured >= self.required {
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
        let progress = format!("{}/{}", self.captured, self.required);
        surface.draw_text(&progress, PROGRESS_X, 2, Color::On);

        for stream in &self.streams {
            surface.draw_text(stream.glyph(), self.cursor_x, stream.y, Color::On);
        }

        let w = surface.width();
        surface.draw_line(0, CAPTURE_LINE, w, CAPTURE_LINE, Color::On);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::Button;

    fn stream(y: i32, speed: i32, is_data: bool) -> DataStream {
        DataStream { y, speed, is_data }
    }

    /// Four tokens parked far from the capture line, never wrapping within
    /// a short test.
    fn parked() -> [DataStream; STREAM_COUNT] {
        [stream(-200, 1, false); STREAM_COUNT]
    }

    fn step(game: &mut DataExtractor, input: FrameInput) -> (Outcome, Vec<GameEvent>) {
        let mut events = Vec::new();
        let outcome = game.step(&input, &mut GameRng::seeded(0), &mut events);
        (outcome, events)
    }

    fn capture() -> FrameInput {
        FrameInput::only(Button::Confirm)
    }

    #[test]
    fn spawned_streams_respect_ranges() {
        let mut rng = GameRng::seeded(4);
        for _ in 0..50 {
            let game = DataExtractor::new(3, &mut rng);
            assert_eq!(game.required(), 8);
            assert_eq!(game.countdown().remaining(), TIME_LIMIT);
            for s in game.streams() {
                assert!((0..=SCREEN_HEIGHT - 8).contains(&s.y));
                assert!((1..=3).contains(&s.speed));
            }
        }
    }

    #[test]
    fn five_aligned_captures_win() {
        let mut game = DataExtractor::with_streams(0, parked());
        assert_eq!(game.required(), 5);
        for n in 1..=5 {
            // lands exactly on the capture line after this frame's fall
            game.streams[0] = stream(CAPTURE_LINE - 1, 1, true);
            let (outcome, events) = step(&mut game, capture());
            assert_eq!(game.captured(), n);
            assert_eq!(events, vec![GameEvent::DataCaptured]);
            let expected = if n == 5 { Outcome::Won } else { Outcome::Running };
            assert_eq!(outcome, expected);
        }

        // sixth attempt on the cleared token
        let (outcome, events) = step(&mut game, capture());
        assert_eq!(outcome, Outcome::Won);
        assert!(events.is_empty());
        assert_eq!(game.captured(), 5);
    }

    #[test]
    fn cleared_token_cannot_be_recaptured() {
        let mut streams = parked();
        streams[2] = stream(CAPTURE_LINE - 3, 1, true);
        let mut game = DataExtractor::with_streams(0, streams);
        step(&mut game, capture());
        assert_eq!(game.captured(), 1);
        assert!(!game.streams()[2].is_data);
        // still inside the window, flag already cleared
        step(&mut game, capture());
        assert_eq!(game.captured(), 1);
    }

    #[test]
    fn noise_tokens_never_count() {
        let mut streams = parked();
        streams[1] = stream(CAPTURE_LINE - 1, 1, false);
        let mut game = DataExtractor::with_streams(0, streams);
        let (_, events) = step(&mut game, capture());
        assert!(events.is_empty());
        assert_eq!(game.captured(), 0);
    }

    #[test]
    fn simultaneous_tokens_all_count() {
        let mut streams = parked();
        streams[0] = stream(CAPTURE_LINE - 3, 1, true);
        streams[1] = stream(CAPTURE_LINE + 1, 1, true);
        streams[3] = stream(CAPTURE_LINE - 1, 2, true);
        let mut game = DataExtractor::with_streams(0, streams);
        let (_, events) = step(&mut game, capture());
        assert_eq!(game.captured(), 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn winning_capture_stops_at_required() {
        let mut streams = parked();
        streams[0] = stream(CAPTURE_LINE - 1, 1, true);
        streams[1] = stream(CAPTURE_LINE, 1, true);
        let mut game = DataExtractor::with_streams(0, streams);
        game.captured = game.required() - 1;

        let (outcome, events) = step(&mut game, capture());
        assert_eq!(outcome, Outcome::Won);
        assert_eq!(game.captured(), game.required());
        assert_eq!(events, vec![GameEvent::DataCaptured]);
        assert!(game.streams()[1].is_data);
    }

    #[test]
    fn capture_window_is_strict() {
        let mut streams = parked();
        // after falling: y = line + 4, one row outside the window
        streams[0] = stream(CAPTURE_LINE + 3, 1, true);
        let mut game = DataExtractor::with_streams(0, streams);
        step(&mut game, capture());
        assert_eq!(game.captured(), 0);
    }

    #[test]
    fn capture_ignores_cursor_column() {
        let mut game = DataExtractor::with_streams(0, parked());
        for _ in 0..5 {
            step(&mut game, FrameInput::only(Button::Right));
        }
        assert_eq!(game.cursor_x(), 40);
        game.streams[0] = stream(CAPTURE_LINE - 1, 1, true);
        step(&mut game, capture());
        assert_eq!(game.captured(), 1);
    }

    #[test]
    fn cursor_clamps_to_screen() {
        let mut game = DataExtractor::with_streams(0, parked());
        let (_, events) = step(&mut game, FrameInput::only(Button::Left));
        assert_eq!(game.cursor_x(), 0);
        assert!(events.is_empty());
        for _ in 0..20 {
            step(&mut game, FrameInput::only(Button::Right));
        }
        assert_eq!(game.cursor_x(), SCREEN_WIDTH - 8);
    }

    #[test]
    fn move_takes_priority_over_capture() {
        let mut streams = parked();
        streams[0] = stream(CAPTURE_LINE - 1, 1, true);
        let mut game = DataExtractor::with_streams(0, streams);
        let mut input = capture();
        input.set(Button::Right, true);
        step(&mut game, input);
        assert_eq!(game.cursor_x(), 8);
        assert_eq!(game.captured(), 0);
    }

    #[test]
    fn blocked_move_lets_capture_through() {
        let mut streams = parked();
        streams[0] = stream(CAPTURE_LINE - 1, 1, true);
        let mut game = DataExtractor::with_streams(0, streams);
        let mut input = capture();
        input.set(Button::Left, true);
        step(&mut game, input);
        assert_eq!(game.cursor_x(), 0);
        assert_eq!(game.captured(), 1);
    }

    #[test]
    fn tokens_wrap_above_screen() {
        let mut streams = parked();
        streams[0] = stream(SCREEN_HEIGHT, 3, true);
        let mut game = DataExtractor::with_streams(0, streams);
        step(&mut game, FrameInput::default());
        assert_eq!(game.streams()[0].y, -8);
        assert_eq!(game.streams()[0].speed, 3);
    }

    #[test]
    fn timeout_loses_with_capture_pending() {
        let mut game = DataExtractor::with_streams(0, parked());
        for _ in 0..TIME_LIMIT - 1 {
            assert_eq!(step(&mut game, FrameInput::default()).0, Outcome::Running);
        }
        assert_eq!(step(&mut game, capture()).0, Outcome::Lost);
    }

    #[test]
    fn tokens_render_in_cursor_column() {
        use crate::domain::surface::Canvas;
        let mut streams = parked();
        streams[0] = stream(28, 1, false);
        let mut game = DataExtractor::with_streams(0, streams);
        game.cursor_x = 48;
        let mut canvas = Canvas::new();
        game.draw(&mut canvas);
        // "0" glyph occupies its full 5-column cell
        assert!(canvas.pixel(48, 30));
        assert!(!canvas.pixel(0, 30));
        assert!(canvas.pixel(0, CAPTURE_LINE));
    }
}
