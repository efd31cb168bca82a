use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::loader::library::{sound_library, DropPayload, FileDrop};
use crate::pipeline::layout::{ContentBlock, Zone};
use crate::shared::{DisplayState, EditMode, Intent};

use super::grid::{next_color, PAD_COLS};
use super::mode::{Prompt, PromptPurpose, TuiState};

const VOLUME_STEP: f32 = 0.05;
pub const DIVIDER_STEP_PX: u32 = 8; // one terminal column

// poll for input from tui, tracks focus/selection in tuistate,
// resolves keys into intents for the middle layer to handle
pub fn poll_input(timeout: Duration, ts: &mut TuiState, ds: &DisplayState) -> anyhow::Result<Vec<Intent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key, ts, ds));
    }
    Ok(vec![])
}

pub fn handle_key(key: KeyEvent, ts: &mut TuiState, ds: &DisplayState) -> Vec<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Intent::Quit];
    }
    if ts.prompt.is_some() {
        return handle_prompt(key.code, ts);
    }
    if ts.resizing {
        return handle_resize(key.code, ts, ds);
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => vec![Intent::Quit],
        KeyCode::Tab | KeyCode::BackTab => {
            ts.focus = ts.focus.other();
            vec![]
        }
        KeyCode::Char('s') => {
            // drop the focused block onto the other zone; the blocks trade places
            let zone = if ds.left.block == ts.focus { Zone::Left } else { Zone::Right };
            vec![Intent::MoveBlock(ts.focus, zone.other())]
        }
        KeyCode::Char('r') => {
            ts.resizing = true;
            vec![Intent::BeginResize]
        }
        KeyCode::Char('L') => vec![Intent::CycleTheme],
        code => match ts.focus {
            ContentBlock::PadBank => handle_pad_key(code, ts, ds),
            ContentBlock::TrackList => handle_track_key(code, ts, ds),
        },
    }
}

fn handle_prompt(code: KeyCode, ts: &mut TuiState) -> Vec<Intent> {
    let Some(prompt) = ts.prompt.as_mut() else {
        return vec![];
    };
    match code {
        KeyCode::Char(c) => prompt.text.push(c),
        KeyCode::Backspace => {
            prompt.text.pop();
        }
        KeyCode::Esc => ts.prompt = None,
        KeyCode::Enter => {
            let Some(prompt) = ts.prompt.take() else {
                return vec![];
            };
            let path = prompt.text.trim();
            if path.is_empty() {
                return vec![];
            }
            // typed paths are relative to where padboard was started, not the board dir
            let file = FileDrop::from_path(std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path)));
            return match prompt.purpose {
                PromptPurpose::AddTrack => vec![Intent::AddTrack(file)],
                PromptPurpose::DropOnPad(id) => match DropPayload::from_transfer(None, Some(file)) {
                    Some(payload) => vec![Intent::DropOnPad(id, payload)],
                    None => vec![],
                },
            };
        }
        _ => {}
    }
    vec![]
}

// the board clamps, so stepping always starts from where the divider really is
fn handle_resize(code: KeyCode, ts: &mut TuiState, ds: &DisplayState) -> Vec<Intent> {
    match code {
        KeyCode::Left | KeyCode::Char('h') => vec![Intent::ResizeTo(ds.divider_px.saturating_sub(DIVIDER_STEP_PX))],
        KeyCode::Right | KeyCode::Char('l') => vec![Intent::ResizeTo(ds.divider_px.saturating_add(DIVIDER_STEP_PX))],
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('r') => {
            ts.resizing = false;
            vec![Intent::EndResize]
        }
        _ => vec![],
    }
}

fn handle_pad_key(code: KeyCode, ts: &mut TuiState, ds: &DisplayState) -> Vec<Intent> {
    let count = ds.pads.len();
    let selected = ds.pads.get(ts.selected_pad);
    match code {
        KeyCode::Left => {
            ts.selected_pad = ts.selected_pad.saturating_sub(1);
            vec![]
        }
        KeyCode::Right => {
            ts.selected_pad = (ts.selected_pad + 1).min(count.saturating_sub(1));
            vec![]
        }
        KeyCode::Up => {
            ts.selected_pad = ts.selected_pad.saturating_sub(PAD_COLS);
            vec![]
        }
        KeyCode::Down => {
            if ts.selected_pad + PAD_COLS < count {
                ts.selected_pad += PAD_COLS;
            }
            vec![]
        }
        KeyCode::Char('a') => vec![Intent::AddPad],
        KeyCode::Char('m') => vec![Intent::ToggleRemoveMode],
        KeyCode::Char('c') => vec![Intent::ToggleColorMode],
        KeyCode::Char('f') => {
            if let Some(pad) = selected {
                ts.prompt = Some(Prompt {
                    purpose: PromptPurpose::DropOnPad(pad.id.clone()),
                    text: String::new(),
                });
            }
            vec![]
        }
        KeyCode::Enter | KeyCode::Char(' ') => match (selected, ds.edit_mode) {
            (Some(pad), EditMode::Normal) => vec![Intent::ClickPad(pad.id.clone())],
            (Some(pad), EditMode::Color) => vec![Intent::SetPadColor(pad.id.clone(), next_color(&pad.color).to_string())],
            (Some(pad), EditMode::Remove) => vec![Intent::RemovePad(pad.id.clone())],
            (None, _) => vec![],
        },
        KeyCode::Char('x') if ds.edit_mode == EditMode::Remove => match selected {
            Some(pad) => vec![Intent::RemovePad(pad.id.clone())],
            None => vec![],
        },
        KeyCode::Char('+') | KeyCode::Char('=') => match selected {
            Some(pad) => vec![Intent::SetPadVolume(pad.id.clone(), pad.volume + VOLUME_STEP)],
            None => vec![],
        },
        KeyCode::Char('-') => match selected {
            Some(pad) => vec![Intent::SetPadVolume(pad.id.clone(), pad.volume - VOLUME_STEP)],
            None => vec![],
        },
        KeyCode::Char(c @ '1'..='9') => {
            // library sounds travel as a text payload, same as a drag would
            let n = c as usize - '1' as usize;
            match (selected, sound_library().get(n)) {
                (Some(pad), Some(sound)) => {
                    let text = sound.to_payload();
                    match DropPayload::from_transfer(Some(&text), None) {
                        Some(payload) => vec![Intent::DropOnPad(pad.id.clone(), payload)],
                        None => vec![],
                    }
                }
                _ => vec![],
            }
        }
        _ => vec![],
    }
}

fn handle_track_key(code: KeyCode, ts: &mut TuiState, ds: &DisplayState) -> Vec<Intent> {
    let count = ds.tracks.len();
    let i = ts.selected_track;
    let selected = ds.tracks.get(i);
    match code {
        KeyCode::Up => {
            ts.selected_track = i.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            ts.selected_track = (i + 1).min(count.saturating_sub(1));
            vec![]
        }
        KeyCode::Char('o') => {
            ts.prompt = Some(Prompt { purpose: PromptPurpose::AddTrack, text: String::new() });
            vec![]
        }
        _ if selected.is_none() => vec![],
        KeyCode::Enter | KeyCode::Char(' ') => vec![Intent::ToggleTrackPlay(i)],
        KeyCode::Char('0') => vec![Intent::RestartTrack(i)],
        KeyCode::Char('l') => vec![Intent::ToggleTrackLoop(i)],
        KeyCode::Char('x') => vec![Intent::RemoveTrack(i)],
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = selected.map_or(1.0, |t| t.volume);
            vec![Intent::SetTrackVolume(i, volume + VOLUME_STEP)]
        }
        KeyCode::Char('-') => {
            let volume = selected.map_or(1.0, |t| t.volume);
            vec![Intent::SetTrackVolume(i, volume - VOLUME_STEP)]
        }
        _ => vec![],
    }
}
