/// Entry point: logging, config, terminal setup, then the endless session loop.

mod config;
mod domain;
mod scene;
mod sim;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use config::GameConfig;
use domain::rng::GameRng;
use scene::{session, Context, HostError};
use ui::terminal::TerminalHost;

/// `$THUMBHACK_LOG`, or `thumbhack.log` in the temp directory.
fn log_path() -> PathBuf {
    std::env::var_os("THUMBHACK_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("thumbhack.log"))
}

/// The terminal is in raw mode while playing, so logs go to a file.
/// A log file that can't be created just means no logging.
fn init_logging() -> Option<PathBuf> {
    let path = log_path();
    let file = File::create(&path).ok()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Some(path)
}

fn main() {
    let log_file = init_logging();
    log::info!("thumbhack {} starting", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load();

    let rng = match config.seed {
        Some(seed) => GameRng::seeded(seed),
        None => GameRng::from_entropy(),
    };
    log::info!("rng seed {}", rng.seed());

    let host = match TerminalHost::new(&config) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let mut ctx = Context::new(host, rng);
    let result = session::run(&mut ctx);

    if let Err(e) = ctx.host.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) | Err(HostError::Quit) => log::info!("player quit after {} frames", ctx.frame),
        Err(e) => {
            log::error!("host error: {e}");
            eprintln!("Game error: {e}");
        }
    }

    println!();
    println!("Thanks for playing ThumbHack Zero!");
    if let Some(path) = log_file {
        println!("Log: {}", path.display());
    }
}
