use crate::audio_api::{AudioBinding, PlaybackEvent, SoundSource};
use crate::shared::{TrackView, DEFAULT_VOLUME};

use super::pad::clamp_volume;
use super::project::TrackRecord;

// A player row. Source and name are fixed for life; to change them remove and re-add.
pub struct Track {
    pub name: String,
    pub source: SoundSource,
    binding: Box<dyn AudioBinding>,
    // transport state, never saved; loop and volume are read off the binding
    pub playing: bool,
    pub progress: f64,
}

impl Track {
    pub fn new(name: String, source: SoundSource, mut binding: Box<dyn AudioBinding>) -> Self {
        binding.set_volume(DEFAULT_VOLUME);
        binding.set_looping(false);
        Self {
            name,
            source,
            binding,
            playing: false,
            progress: 0.0,
        }
    }

    pub fn toggle_play(&mut self) {
        if self.binding.is_paused() {
            self.binding.play();
            self.playing = true;
        } else {
            self.binding.pause();
            self.playing = false;
        }
    }

    pub fn restart(&mut self) {
        self.binding.rewind();
    }

    pub fn toggle_loop(&mut self) {
        let looping = !self.binding.looping();
        self.binding.set_looping(looping);
    }

    pub fn looping(&self) -> bool {
        self.binding.looping()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.binding.set_volume(clamp_volume(volume));
    }

    pub fn volume(&self) -> f32 {
        self.binding.volume()
    }

    // must run before the track is dropped so nothing keeps playing
    pub fn stop(&mut self) {
        self.binding.pause();
        self.playing = false;
    }

    pub fn pump_events(&mut self) {
        for event in self.binding.poll_events() {
            match event {
                PlaybackEvent::TimeUpdate { position, duration } => {
                    self.progress = progress_percent(position, duration);
                }
                // back to the "play" button; no auto-restart, no auto-remove
                PlaybackEvent::Ended => self.playing = false,
            }
        }
    }

    pub fn to_record(&self) -> TrackRecord {
        TrackRecord {
            file_name: self.name.clone(),
            audio_src: self.source.0.clone(),
        }
    }

    pub fn view(&self) -> TrackView {
        TrackView {
            name: self.name.clone(),
            playing: self.playing,
            looping: self.looping(),
            volume: self.volume(),
            progress: self.progress,
        }
    }
}

// position / duration as a percentage; 0 until the duration is actually known
pub fn progress_percent(position: f64, duration: f64) -> f64 {
    if !position.is_finite() || !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    (position / duration * 100.0).clamp(0.0, 100.0)
}
