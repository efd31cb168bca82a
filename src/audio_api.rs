// The seam between the board and whatever actually makes sound.
// The board only ever talks to `AudioBackend` / `AudioBinding`; the cpal engine,
// the silent fallback and the test fakes all live behind these two traits.

use std::fmt;

pub use crate::audio::{BindingId, SampleBuffer};

// Where a sound comes from: a path on disk, or a library url relative to the sounds dir.
// Opaque to the board; only the backend knows how to resolve it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SoundSource(pub String);

impl SoundSource {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// What a binding reports back, the terminal version of `timeupdate` / `ended`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackEvent {
    TimeUpdate { position: f64, duration: f64 },
    Ended,
}

// A live, playable sound owned by exactly one pad or track.
// Dropping a binding releases it; callers pause first so nothing keeps ringing.
pub trait AudioBinding {
    fn play(&mut self);
    fn pause(&mut self);
    // back to the start, paused state untouched
    fn rewind(&mut self);
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn looping(&self) -> bool;
    fn set_looping(&mut self, looping: bool);
    fn is_paused(&self) -> bool;
    // everything reported since the last call
    fn poll_events(&mut self) -> Vec<PlaybackEvent>;
}

pub trait AudioBackend {
    // Never fails: a source that can't be decoded gets a binding that plays nothing.
    fn open(&mut self, source: &SoundSource) -> Box<dyn AudioBinding>;

    // housekeeping once per ui tick, off the audio thread
    fn maintain(&mut self) {}
}

// Commands the engine understands. Samples have to be decoded off the audio
// thread first, then handed over with `Register`.
#[derive(Debug)]
pub enum AudioCommand {
    Register {
        id: BindingId,
        buffer: SampleBuffer,
        events: crossbeam_channel::Sender<PlaybackEvent>,
    },
    Play(BindingId),
    Pause(BindingId),
    Rewind(BindingId),
    SetVolume(BindingId, f32),
    SetLoop(BindingId, bool),
    Release(BindingId),
}
