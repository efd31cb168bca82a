// Saves the board after every persistent change and rebuilds it on startup.
use crate::audio_api::AudioBackend;

use super::board::Board;
use super::layout::Theme;
use super::project::PersistedRecord;
use super::storage::Storage;

pub const RECORD_KEY: &str = "soundboardState";
pub const THEME_KEY: &str = "currentLayout";

#[derive(Debug)]
pub enum LoadOutcome {
    FirstRun,
    Restored { pads: usize, tracks: usize },
    // the stored record was unusable; the board got the first-run defaults instead
    Recovered(anyhow::Error),
}

// Snapshot the board and overwrite the stored record
pub fn save_board(storage: &mut dyn Storage, board: &Board) -> anyhow::Result<()> {
    let json = board.snapshot().to_json()?;
    storage.set(RECORD_KEY, &json)?;
    log::debug!("saved {} pads, {} tracks", board.pads.len(), board.tracks.len());
    Ok(())
}

pub fn load_board(storage: &dyn Storage, board: &mut Board, backend: &mut dyn AudioBackend) -> LoadOutcome {
    let text = match storage.get(RECORD_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            log::info!("no saved board, starting with {} empty pads", crate::shared::DEFAULT_PAD_COUNT);
            board.reset_to_defaults();
            return LoadOutcome::FirstRun;
        }
        Err(e) => {
            log::warn!("couldn't read saved board, using defaults: {e:#}");
            board.reset_to_defaults();
            return LoadOutcome::Recovered(e);
        }
    };

    let record = match PersistedRecord::parse(&text) {
        Ok(record) => record,
        Err(e) => {
            log::warn!("saved board is unusable, using defaults: {e}");
            board.reset_to_defaults();
            return LoadOutcome::Recovered(e.into());
        }
    };

    board.restore(&record, backend);
    log::info!("restored {} pads, {} tracks", record.pads.len(), record.tracks.len());
    LoadOutcome::Restored {
        pads: record.pads.len(),
        tracks: record.tracks.len(),
    }
}

// Unknown or missing names fall back to the default theme.
pub fn load_theme(storage: &dyn Storage) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(name)) => Theme::from_name(name.trim()).unwrap_or_else(|| {
            log::warn!("unknown theme '{name}', using {}", Theme::default().name());
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            log::warn!("couldn't read theme: {e:#}");
            Theme::default()
        }
    }
}

pub fn save_theme(storage: &mut dyn Storage, theme: Theme) -> anyhow::Result<()> {
    storage.set(THEME_KEY, theme.name())
}
