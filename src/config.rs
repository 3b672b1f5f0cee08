/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or
/// `~/.local/share/thumbhack`. Falls back to defaults if the file is
/// missing or incomplete; problems are logged, never fatal.
///
/// Only host-side settings live here. Game rules (difficulties, countdowns,
/// frame rate) are fixed.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub audio: AudioConfig,
    pub gamepad: GamepadConfig,
    /// Fixed RNG seed for a reproducible run; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub pixel_width: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_pixel_width")]
    pixel_width: usize,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_audio_enabled")]
    enabled: bool,
    #[serde(default = "default_volume")]
    volume: f32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_pixel_width() -> usize { 1 }
fn default_audio_enabled() -> bool { true }
fn default_volume() -> f32 { 0.25 }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into()] }

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { pixel_width: default_pixel_width() }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio {
            enabled: default_audio_enabled(),
            volume: default_volume(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), None)
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/thumbhack.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        match find_config(&search_dirs) {
            Some(path) => {
                let cfg = load_file(&path);
                match &cfg.source {
                    Some(source) => log::info!("config: loaded {}", source.display()),
                    None => log::info!("config: {} unusable, using defaults", path.display()),
                }
                cfg
            }
            None => {
                log::info!("config: no config.toml found, using defaults");
                GameConfig::default()
            }
        }
    }

    /// Parse config text. Errors fall back to defaults with a warning.
    pub fn parse(text: &str, source: Option<&Path>) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(raw) => GameConfig::from_toml(raw, source.map(Path::to_path_buf)),
            Err(e) => {
                log::warn!("config: parse error, using defaults: {e}");
                GameConfig::default()
            }
        }
    }

    fn from_toml(raw: TomlConfig, source: Option<PathBuf>) -> Self {
        let pixel_width = raw.display.pixel_width;
        if !(1..=2).contains(&pixel_width) {
            log::warn!("config: display.pixel_width {pixel_width} out of range, clamping to 1..=2");
        }
        let volume = raw.audio.volume;
        if !(0.0..=1.0).contains(&volume) {
            log::warn!("config: audio.volume {volume} out of range, clamping to 0..=1");
        }

        GameConfig {
            display: DisplayConfig { pixel_width: pixel_width.clamp(1, 2) },
            audio: AudioConfig {
                enabled: raw.audio.enabled,
                volume: volume.clamp(0.0, 1.0),
            },
            gamepad: GamepadConfig {
                confirm: raw.gamepad.confirm,
                cancel: raw.gamepad.cancel,
            },
            seed: raw.game.seed,
            source,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/thumbhack)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/thumbhack");
        if xdg.is_dir() && !dirs.contains(&xdg) {
            dirs.push(xdg);
        }
    }

    dirs
}

fn find_config(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs.iter()
        .map(|dir| dir.join("config.toml"))
        .find(|path| path.is_file())
}

fn load_file(path: &Path) -> GameConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => GameConfig::parse(&text, Some(path)),
        Err(e) => {
            log::warn!("config: could not read {}: {e}", path.display());
            GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = GameConfig::parse("", None);
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.display.pixel_width, 1);
        assert!(cfg.audio.enabled);
        assert_eq!(cfg.audio.volume, 0.25);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.gamepad.confirm, vec!["A", "Start"]);
        assert_eq!(cfg.gamepad.cancel, vec!["B"]);
    }

    #[test]
    fn partial_tables_keep_missing_defaults() {
        let cfg = GameConfig::parse("[audio]\nvolume = 0.5\n\n[game]\nseed = 42\n", None);
        assert!(cfg.audio.enabled);
        assert_eq!(cfg.audio.volume, 0.5);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.display.pixel_width, 1);
    }

    #[test]
    fn gamepad_lists_override() {
        let cfg = GameConfig::parse("[gamepad]\nconfirm = [\"X\"]\n", None);
        assert_eq!(cfg.gamepad.confirm, vec!["X"]);
        assert_eq!(cfg.gamepad.cancel, vec!["B"]);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let cfg = GameConfig::parse("[display]\npixel_width = 5\n[audio]\nvolume = 3.0\n", None);
        assert_eq!(cfg.display.pixel_width, 2);
        assert_eq!(cfg.audio.volume, 1.0);
    }

    #[test]
    fn malformed_file_falls_back() {
        let cfg = GameConfig::parse("[audio\nvolume = ", Some(Path::new("broken.toml")));
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.source, None);
    }

    #[test]
    fn source_is_recorded() {
        let cfg = GameConfig::parse("", Some(Path::new("/tmp/config.toml")));
        assert_eq!(cfg.source.as_deref(), Some(Path::new("/tmp/config.toml")));
    }

    #[test]
    fn finds_first_existing_file() {
        let dir = std::env::temp_dir().join(format!("thumbhack-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[audio]\nenabled = false\n").unwrap();

        let missing = dir.join("nope");
        let found = find_config(&[missing, dir.clone()]).unwrap();
        assert_eq!(found, dir.join("config.toml"));
        let cfg = load_file(&found);
        assert!(!cfg.audio.enabled);
        assert_eq!(cfg.source.as_deref(), Some(found.as_path()));

        // a file that won't parse leaves no source behind
        std::fs::write(dir.join("config.toml"), "[audio\n").unwrap();
        assert_eq!(load_file(&found).source, None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
