// Purely for testing: in-memory storage and an audio backend whose bindings
// can be inspected after the board has taken ownership of them.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::audio_api::{AudioBackend, AudioBinding, PlaybackEvent, SoundSource};

use super::storage::Storage;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryStorage {
    pub fn with(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.entries.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

// storage that can be read but refuses every write
pub struct ReadOnlyStorage(pub MemoryStorage);

impl Storage for ReadOnlyStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("read-only storage")
    }
}

#[derive(Debug)]
pub struct FakeState {
    pub source: SoundSource,
    pub volume: f32,
    pub looping: bool,
    pub paused: bool,
    pub plays: usize,
    pub rewinds: usize,
    pub released: bool,
    pending: Vec<PlaybackEvent>,
}

impl FakeState {
    pub fn emit(&mut self, event: PlaybackEvent) {
        self.pending.push(event);
    }
}

pub type Spy = Rc<RefCell<FakeState>>;

pub struct FakeBinding {
    state: Spy,
}

impl AudioBinding for FakeBinding {
    fn play(&mut self) {
        let mut s = self.state.borrow_mut();
        s.paused = false;
        s.plays += 1;
    }

    fn pause(&mut self) {
        self.state.borrow_mut().paused = true;
    }

    fn rewind(&mut self) {
        self.state.borrow_mut().rewinds += 1;
    }

    fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn looping(&self) -> bool {
        self.state.borrow().looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.borrow_mut().looping = looping;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        let mut s = self.state.borrow_mut();
        if s.pending.contains(&PlaybackEvent::Ended) {
            s.paused = true;
        }
        std::mem::take(&mut s.pending)
    }
}

impl Drop for FakeBinding {
    fn drop(&mut self) {
        self.state.borrow_mut().released = true;
    }
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    opened: Rc<RefCell<Vec<Spy>>>,
    maintained: Rc<Cell<usize>>,
}

impl FakeBackend {
    pub fn spy(&self, index: usize) -> Spy {
        self.opened.borrow()[index].clone()
    }

    pub fn opened(&self) -> usize {
        self.opened.borrow().len()
    }

    pub fn maintained(&self) -> usize {
        self.maintained.get()
    }
}

impl AudioBackend for FakeBackend {
    fn open(&mut self, source: &SoundSource) -> Box<dyn AudioBinding> {
        let state = Rc::new(RefCell::new(FakeState {
            source: source.clone(),
            volume: 1.0,
            looping: false,
            paused: true,
            plays: 0,
            rewinds: 0,
            released: false,
            pending: Vec::new(),
        }));
        self.opened.borrow_mut().push(state.clone());
        Box::new(FakeBinding { state })
    }

    fn maintain(&mut self) {
        self.maintained.set(self.maintained.get() + 1);
    }
}
