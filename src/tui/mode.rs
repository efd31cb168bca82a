use crate::pipeline::layout::ContentBlock;
use crate::shared::{DisplayState, PadId};

// what a finished path prompt turns into
#[derive(Clone, Debug, PartialEq)]
pub enum PromptPurpose {
    AddTrack,
    DropOnPad(PadId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub purpose: PromptPurpose,
    pub text: String,
}

// state local to tui: focus, selection, and the half-typed file path.
// resizing is synced from DisplayState per loop
#[derive(Clone, Debug)]
pub struct TuiState {
    pub focus: ContentBlock,
    pub selected_pad: usize,
    pub selected_track: usize,
    pub prompt: Option<Prompt>,
    pub resizing: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            focus: ContentBlock::PadBank,
            selected_pad: 0,
            selected_track: 0,
            prompt: None,
            resizing: false,
        }
    }
}

impl TuiState {
    // keep selections inside the lists after pads/tracks come and go
    pub fn sync(&mut self, ds: &DisplayState) {
        self.selected_pad = self.selected_pad.min(ds.pads.len().saturating_sub(1));
        self.selected_track = self.selected_track.min(ds.tracks.len().saturating_sub(1));
        self.resizing = ds.resizing;
    }
}
