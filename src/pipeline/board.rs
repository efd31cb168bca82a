// Live state of the whole soundboard.
// Every op returns a `Change` so the middle layer knows whether to save.
// Bindings belong to their pad or track and are never looked up any other way.

use crate::audio_api::{AudioBackend, SoundSource};
use crate::loader::library::{DropPayload, FileDrop};
use crate::shared::{Change, EditMode, PadId, DEFAULT_PAD_COUNT};

use super::layout::{ContentBlock, FlexWeight, Layout, Zone};
use super::pad::{clamp_volume, Pad};
use super::project::{LayoutRecord, PersistedRecord};
use super::track::Track;

#[derive(Default)]
pub struct Board {
    pub pads: Vec<Pad>,
    pub tracks: Vec<Track>,
    pub layout: Layout,
    pub edit_mode: EditMode,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    fn pad_mut(&mut self, id: &PadId) -> Option<&mut Pad> {
        self.pads.iter_mut().find(|p| &p.id == id)
    }

    pub fn pad(&self, id: &PadId) -> Option<&Pad> {
        self.pads.iter().find(|p| &p.id == id)
    }

    // ── pads ──────────────────────────────────────────────────────

    pub fn add_pad(&mut self) -> (PadId, Change) {
        let pad = Pad::new();
        let id = pad.id.clone();
        self.pads.push(pad);
        (id, Change::Persistent)
    }

    pub fn click_pad(&mut self, id: &PadId) -> Change {
        if self.edit_mode != EditMode::Normal {
            return Change::None;
        }
        let Some(pad) = self.pad_mut(id) else {
            return Change::None;
        };
        if pad.hit() { Change::Transient } else { Change::None }
    }

    pub fn drop_on_pad(&mut self, id: &PadId, payload: DropPayload, backend: &mut dyn AudioBackend) -> Change {
        if self.pad(id).is_none() {
            return Change::None;
        }
        let Some((source, name)) = payload.into_sound() else {
            return Change::None;
        };
        let binding = backend.open(&source);
        if let Some(pad) = self.pad_mut(id) {
            log::info!("{id} bound to {name}");
            pad.bind(source, name, binding);
        }
        Change::Persistent
    }

    pub fn remove_pad(&mut self, id: &PadId) -> Change {
        let Some(idx) = self.pads.iter().position(|p| &p.id == id) else {
            return Change::None;
        };
        let mut pad = self.pads.remove(idx);
        pad.release();
        log::info!("removed {id}");
        Change::Persistent
    }

    // Recolouring an empty pad does nothing: unbound pads keep the default look.
    pub fn set_pad_color(&mut self, id: &PadId, color: &str) -> Change {
        match self.pad_mut(id) {
            Some(pad) if pad.is_bound() && pad.color != color => {
                pad.set_color(color);
                Change::Persistent
            }
            _ => Change::None,
        }
    }

    pub fn set_pad_volume(&mut self, id: &PadId, volume: f32) -> Change {
        let volume = clamp_volume(volume);
        match self.pad_mut(id) {
            Some(pad) if pad.is_bound() && pad.volume != volume => {
                pad.set_volume(volume);
                Change::Persistent
            }
            _ => Change::None,
        }
    }

    // the two edit modes shut each other off
    pub fn toggle_remove_mode(&mut self) -> Change {
        self.edit_mode = match self.edit_mode {
            EditMode::Remove => EditMode::Normal,
            _ => EditMode::Remove,
        };
        Change::Transient
    }

    pub fn toggle_color_mode(&mut self) -> Change {
        self.edit_mode = match self.edit_mode {
            EditMode::Color => EditMode::Normal,
            _ => EditMode::Color,
        };
        Change::Transient
    }

    // ── tracks ────────────────────────────────────────────────────

    pub fn add_track(&mut self, file: FileDrop, backend: &mut dyn AudioBackend) -> Change {
        let Some((source, name)) = DropPayload::File(file).into_sound() else {
            return Change::None;
        };
        let binding = backend.open(&source);
        log::info!("added track {name}");
        self.tracks.push(Track::new(name, source, binding));
        Change::Persistent
    }

    fn with_track(&mut self, index: usize, f: impl FnOnce(&mut Track)) -> Change {
        match self.tracks.get_mut(index) {
            Some(track) => {
                f(track);
                Change::Transient
            }
            None => Change::None,
        }
    }

    pub fn toggle_track_play(&mut self, index: usize) -> Change {
        self.with_track(index, Track::toggle_play)
    }

    pub fn restart_track(&mut self, index: usize) -> Change {
        self.with_track(index, Track::restart)
    }

    pub fn toggle_track_loop(&mut self, index: usize) -> Change {
        self.with_track(index, Track::toggle_loop)
    }

    pub fn set_track_volume(&mut self, index: usize, volume: f32) -> Change {
        self.with_track(index, |t| t.set_volume(volume))
    }

    pub fn remove_track(&mut self, index: usize) -> Change {
        if index >= self.tracks.len() {
            return Change::None;
        }
        let mut track = self.tracks.remove(index);
        track.stop();
        log::info!("removed track {}", track.name);
        Change::Persistent
    }

    // ── layout ────────────────────────────────────────────────────

    pub fn move_block(&mut self, block: ContentBlock, zone: Zone) -> Change {
        self.layout.move_block(block, zone)
    }

    pub fn begin_resize(&mut self) -> Change {
        self.layout.begin_resize()
    }

    pub fn resize_to(&mut self, px: u32) -> Change {
        self.layout.resize_to(px)
    }

    pub fn end_resize(&mut self) -> Change {
        self.layout.end_resize()
    }

    // ── lifecycle ─────────────────────────────────────────────────

    pub fn tick(&mut self, elapsed: f64) {
        for pad in self.pads.iter_mut() {
            pad.tick(elapsed);
        }
        for track in self.tracks.iter_mut() {
            track.pump_events();
        }
    }

    // Stop and drop everything. Bindings are paused before they go.
    pub fn clear(&mut self) {
        for pad in self.pads.iter_mut() {
            pad.release();
        }
        for track in self.tracks.iter_mut() {
            track.stop();
        }
        self.pads.clear();
        self.tracks.clear();
        self.edit_mode = EditMode::Normal;
    }

    // First run: clear, then the default bank. Never appends, so running it twice is harmless.
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        self.layout = Layout::default();
        for _ in 0..DEFAULT_PAD_COUNT {
            self.add_pad();
        }
    }

    // ── record ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> PersistedRecord {
        PersistedRecord {
            layout: LayoutRecord {
                left: self.layout.left.0.clone(),
                right: self.layout.right.0.clone(),
                left_content: self.layout.content(Zone::Left).id().to_string(),
                right_content: self.layout.content(Zone::Right).id().to_string(),
            },
            pads: self.pads.iter().map(Pad::to_record).collect(),
            tracks: self.tracks.iter().map(Track::to_record).collect(),
        }
    }

    // rebuild from a validated record, fresh binding per stored source
    pub fn restore(&mut self, record: &PersistedRecord, backend: &mut dyn AudioBackend) {
        self.clear();

        for rec in &record.pads {
            self.add_pad();
            let Some(pad) = self.pads.last_mut() else { continue };
            pad.id = PadId(rec.id.clone());
            let Some(src) = rec.audio_src.as_deref() else {
                continue; // empty pads keep the defaults
            };
            let source = SoundSource::new(src);
            let binding = backend.open(&source);
            let name = rec.file_name.clone().unwrap_or_else(|| src.to_string());
            pad.bind(source, name, binding);
            pad.set_color(&rec.color);
            pad.set_volume(rec.volume);
        }

        for rec in &record.tracks {
            let source = SoundSource::new(rec.audio_src.as_str());
            let binding = backend.open(&source);
            self.tracks.push(Track::new(rec.file_name.clone(), source, binding));
        }

        self.layout.left = FlexWeight(record.layout.left.clone());
        self.layout.right = FlexWeight(record.layout.right.clone());
        // validated already; only moves the blocks when the record disagrees
        if let Ok(left) = record.layout.left_block() {
            self.layout.move_block(left, Zone::Left);
        }
    }
}
