use crossbeam_channel::Sender;

use crate::audio_api::{AudioCommand, PlaybackEvent};

use super::binding_id::BindingId;
use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::voice::Voice;

// slot vec and retire queue are sized up front; released slots are freed on the main thread
pub const MAX_BINDINGS: usize = 512;
const REPORTS_PER_SECOND: u32 = 4; // browsers fire timeupdate about this often

pub struct Slot {
    id: BindingId,
    buffer: SampleBuffer,
    voice: Voice,
    events: Sender<PlaybackEvent>,
    since_report: usize, // frames played since the last TimeUpdate
}

impl Slot {
    fn position_secs(&self) -> f64 {
        self.voice.pos as f64 / self.buffer.sample_rate.max(1) as f64
    }

    fn report(&mut self) {
        self.since_report = 0;
        let _ = self.events.try_send(PlaybackEvent::TimeUpdate {
            position: self.position_secs(),
            duration: self.buffer.duration_secs(),
        });
    }
}

pub struct Engine {
    slots: Vec<Slot>,
    retired: Sender<Slot>,
    report_every: usize,
}

impl Engine {
    pub fn new(sample_rate: u32, retired: Sender<Slot>) -> Self {
        Self {
            slots: Vec::with_capacity(MAX_BINDINGS),
            retired,
            report_every: (sample_rate / REPORTS_PER_SECOND).max(1) as usize,
        }
    }

    fn slot_mut(&mut self, id: BindingId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Register { id, buffer, events } => {
                if self.slots.len() < MAX_BINDINGS {
                    self.slots.push(Slot {
                        id,
                        buffer,
                        voice: Voice::default(),
                        events,
                        since_report: 0,
                    });
                }
            }
            AudioCommand::Play(id) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.voice.play(&slot.buffer);
                }
            }
            AudioCommand::Pause(id) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.voice.playing = false;
                }
            }
            AudioCommand::Rewind(id) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.voice.rewind();
                    slot.report();
                }
            }
            AudioCommand::SetVolume(id, volume) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.voice.gain = volume;
                }
            }
            AudioCommand::SetLoop(id, looping) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.voice.looping = looping;
                }
            }
            AudioCommand::Release(id) => {
                if let Some(idx) = self.slots.iter().position(|s| s.id == id) {
                    let slot = self.slots.swap_remove(idx);
                    // a full queue means the main thread stopped draining; then it drops here
                    let _ = self.retired.try_send(slot);
                }
            }
        }
    }

    // Fill one output block with every playing binding mixed together
    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        let block = out.len();
        for slot in self.slots.iter_mut() {
            if !slot.voice.playing {
                continue;
            }
            let ended = slot.voice.render_into(&slot.buffer, out);
            if ended {
                slot.report();
                let _ = slot.events.try_send(PlaybackEvent::Ended);
                continue;
            }
            slot.since_report += block;
            if slot.since_report >= self.report_every {
                slot.report();
            }
        }
    }
}
