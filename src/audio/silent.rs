// Stand-in used when there is no output device (or `--mute`), and for sources
// that failed to decode. Keeps transport state so the UI behaves, plays nothing.

use crate::audio_api::{AudioBackend, AudioBinding, PlaybackEvent, SoundSource};

#[derive(Debug)]
pub struct SilentBinding {
    volume: f32,
    looping: bool,
    pending: Vec<PlaybackEvent>,
}

impl Default for SilentBinding {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: false,
            pending: Vec::new(),
        }
    }
}

impl AudioBinding for SilentBinding {
    fn play(&mut self) {
        // nothing to play, so it ends straight away and the transport resets
        self.pending.push(PlaybackEvent::TimeUpdate { position: 0.0, duration: f64::NAN });
        self.pending.push(PlaybackEvent::Ended);
    }

    fn pause(&mut self) {}

    fn rewind(&mut self) {}

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn looping(&self) -> bool {
        self.looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn is_paused(&self) -> bool {
        true
    }

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn open(&mut self, source: &SoundSource) -> Box<dyn AudioBinding> {
        log::debug!("silent binding for {source}");
        Box::new(SilentBinding::default())
    }
}
