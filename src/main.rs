mod shared;
mod tui;
mod audio_api;
mod audio;
mod config;
mod loader;
mod middle;
mod pipeline;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use audio::{EngineBackend, SilentBackend};
use audio_api::AudioBackend;
use config::Config;
use middle::Middle;
use pipeline::persistence::LoadOutcome;
use pipeline::storage::FileStorage;
use shared::Intent;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// stderr belongs to the tui, so the log goes next to the saved board
fn init_logging(log_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// no device (or --mute) still gives a working board, just a quiet one
fn open_backend(config: &Config) -> Box<dyn AudioBackend> {
    if config.mute {
        log::info!("--mute given, not opening an audio device");
        return Box::new(SilentBackend);
    }
    match audio::start_audio() {
        Ok(handle) => Box::new(EngineBackend::new(handle, config.resolver())),
        Err(e) => {
            log::warn!("no audio output, continuing silently: {e:#}");
            Box::new(SilentBackend)
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::parse();
    let project_dir = config.project_dir();
    init_logging(&config.log_path())?;
    log::info!("padboard starting in {}", project_dir.display());

    let backend = open_backend(&config);
    let mut middle = Middle::new(Box::new(FileStorage::new(&project_dir)), backend);
    if let LoadOutcome::Recovered(e) = middle.load() {
        log::warn!("started from defaults: {e:#}");
    }

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    crossterm::execute!(std::io::stdout(), terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    let mut last_tick = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let ds = middle.display_state();
        tui_state.sync(&ds);

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &tui_state);
        })?;

        let intents = tui::input::poll_input(tick_rate, &mut tui_state, &ds)?;
        for intent in intents {
            if intent == Intent::Quit {
                log::info!("quit");
                return Ok(());
            }
            middle.handle_intent(intent);
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        middle.tick(elapsed);
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
