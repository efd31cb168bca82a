// Types shared between the tui, the middle layer and the board.
//
// The tui never touches the board directly. It turns key presses into `Intent`s,
// hands them to the middle layer, and draws whatever `DisplayState` comes back.
//
// Pads:
//   arrows        //  move the selection
//   Enter         //  ClickPad (or SetPadColor / RemovePad in the edit modes)
//   a             //  AddPad
//   m / c         //  ToggleRemoveMode / ToggleColorMode
//   + / -         //  SetPadVolume(+-0.05)
//   1 2 3         //  DropOnPad with Bumbo / Caixa / Prato
//   f             //  DropOnPad with a file (path prompt)
//
// Tracks:
//   arrows        //  move the selection
//   Enter, Space  //  ToggleTrackPlay
//   0 / l         //  RestartTrack / ToggleTrackLoop
//   + / -         //  SetTrackVolume(+-0.05)
//   x             //  RemoveTrack
//   o             //  AddTrack (path prompt)
//
// Layout:
//   Tab           //  focus the other zone (tui only)
//   s             //  MoveBlock, swapping the zones
//   r, arrows     //  BeginResize / ResizeTo / EndResize
//   L             //  CycleTheme
//   q, Esc        //  Quit

use std::fmt;

use crate::loader::library::{DropPayload, FileDrop};
use crate::pipeline::layout::{ContentBlock, Theme, Zone};

pub const DEFAULT_PAD_COUNT: usize = 4;
pub const DEFAULT_PAD_COLOR: &str = "#282828";
pub const DEFAULT_VOLUME: f32 = 1.0;
pub const FLASH_SECS: f64 = 0.2; // how long a pad stays lit after a hit

// Stable pad identity. Survives save/load, unlike the pad's position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PadId(pub String);

impl PadId {
    pub fn generate() -> Self {
        PadId(format!("pad-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Normal,
    Remove,
    Color,
}

// What an intent did to the board, which decides whether it gets saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Change {
    None,
    Transient, // visible, but nothing the record holds
    Persistent,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    // pads
    AddPad,
    ClickPad(PadId),
    DropOnPad(PadId, DropPayload),
    RemovePad(PadId),
    SetPadColor(PadId, String),
    SetPadVolume(PadId, f32),
    ToggleRemoveMode,
    ToggleColorMode,

    // tracks, addressed by position
    AddTrack(FileDrop),
    ToggleTrackPlay(usize),
    RestartTrack(usize),
    ToggleTrackLoop(usize),
    SetTrackVolume(usize, f32),
    RemoveTrack(usize),

    // layout
    MoveBlock(ContentBlock, Zone),
    BeginResize,
    ResizeTo(u32), // divider position in px
    EndResize,
    CycleTheme,

    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PadView {
    pub id: PadId,
    pub label: String,
    pub color: String,
    pub accent: String,
    pub volume: f32,
    pub bound: bool,
    pub flashing: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackView {
    pub name: String,
    pub playing: bool,
    pub looping: bool,
    pub volume: f32,
    pub progress: f64, // percent
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZoneView {
    pub block: ContentBlock,
    pub weight: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub pads: Vec<PadView>,
    pub tracks: Vec<TrackView>,
    pub left: ZoneView,
    pub right: ZoneView,
    pub edit_mode: EditMode,
    pub theme: Theme,
    pub resizing: bool,
    pub divider_px: u32,
    pub status: String, // one line of feedback for the footer
}
