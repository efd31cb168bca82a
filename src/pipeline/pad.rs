use crate::audio_api::{AudioBinding, SoundSource};
use crate::loader::library::pad_label;
use crate::shared::{PadId, PadView, DEFAULT_PAD_COLOR, DEFAULT_VOLUME, FLASH_SECS};

use super::project::PadRecord;

const EMPTY_LABEL: &str = "Drop a sound";

pub struct BoundSound {
    pub source: SoundSource,
    pub name: String,
    pub binding: Box<dyn AudioBinding>,
}

pub struct Pad {
    pub id: PadId,
    pub sound: Option<BoundSound>,
    pub color: String,
    pub accent: String, // glow/border colour, follows `color`
    pub volume: f32,
    flash: f64, // seconds left of the "hit" highlight
}

impl Pad {
    pub fn new() -> Self {
        Self {
            id: PadId::generate(),
            sound: None,
            color: DEFAULT_PAD_COLOR.to_string(),
            accent: DEFAULT_PAD_COLOR.to_string(),
            volume: DEFAULT_VOLUME,
            flash: 0.0,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.sound.is_some()
    }

    // Replace whatever was bound. The old binding is paused before it is dropped.
    pub fn bind(&mut self, source: SoundSource, name: String, mut binding: Box<dyn AudioBinding>) {
        self.release();
        binding.set_volume(self.volume);
        self.sound = Some(BoundSound { source, name, binding });
    }

    pub fn release(&mut self) {
        if let Some(mut sound) = self.sound.take() {
            sound.binding.pause();
        }
    }

    pub fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
        self.accent = color.to_string();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        if let Some(sound) = self.sound.as_mut() {
            sound.binding.set_volume(self.volume);
        }
    }

    // Restart from the top, like hitting a real pad. False when there's nothing to play.
    pub fn hit(&mut self) -> bool {
        let Some(sound) = self.sound.as_mut() else {
            return false;
        };
        sound.binding.rewind();
        sound.binding.play();
        self.flash = FLASH_SECS;
        true
    }

    pub fn tick(&mut self, elapsed: f64) {
        self.flash = (self.flash - elapsed).max(0.0);
        if let Some(sound) = self.sound.as_mut() {
            // pads have no progress bar; just keep the queue from piling up
            let _ = sound.binding.poll_events();
        }
    }

    pub fn to_record(&self) -> PadRecord {
        PadRecord {
            id: self.id.0.clone(),
            audio_src: self.sound.as_ref().map(|s| s.source.0.clone()),
            file_name: self.sound.as_ref().map(|s| s.name.clone()),
            color: self.color.clone(),
            volume: self.volume,
        }
    }

    pub fn view(&self) -> PadView {
        PadView {
            id: self.id.clone(),
            label: match &self.sound {
                Some(sound) => pad_label(&sound.name),
                None => EMPTY_LABEL.to_string(),
            },
            color: self.color.clone(),
            accent: self.accent.clone(),
            volume: self.volume,
            bound: self.is_bound(),
            flashing: self.flash > 0.0,
        }
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}

pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return DEFAULT_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}
