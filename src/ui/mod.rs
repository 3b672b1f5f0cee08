/// Terminal host: everything that touches the real terminal, speaker or
/// gamepad. Game logic never imports from here.

pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sound;
pub mod terminal;
