use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio_api::{AudioBackend, AudioBinding, AudioCommand, PlaybackEvent, SoundSource};
use crate::loader::sample_loader::{self, SourceResolver};

mod binding_id;
mod engine;
mod frame;
mod sample_buffer;
mod silent;
mod voice;

pub use binding_id::{next_binding_id, BindingId};
pub use frame::StereoFrame;
pub use sample_buffer::SampleBuffer;
pub use silent::{SilentBackend, SilentBinding};

use engine::{Engine, Slot, MAX_BINDINGS};

const EVENT_QUEUE: usize = 64;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    retired: Receiver<Slot>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.tx.try_send(cmd);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    // drop whatever the engine let go of since last time; returns how many
    pub fn free_retired(&self) -> usize {
        self.retired.try_iter().count()
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);
    let (retired_tx, retired) = crossbeam_channel::bounded::<Slot>(MAX_BINDINGS);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream = build_output_stream_f32(&device, &config.into(), rx, retired_tx, sample_rate, channels)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!("audio output running at {sample_rate} Hz, {channels} channels");

            Ok(AudioHandle {
                tx,
                retired,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    retired: Sender<Slot>,
    sample_rate: u32,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(sample_rate, retired);
    let mut scratch: Vec<StereoFrame> = Vec::with_capacity(8192);

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            let n_frames = data.len() / channels.max(1);
            if channels == 2 {
                let frames: &mut [StereoFrame] = unsafe { // casting raw floats to StereoFrames
                    std::slice::from_raw_parts_mut(data.as_mut_ptr() as *mut StereoFrame, n_frames)
                };
                engine.render_block(frames);
                return;
            }

            // not interleaved stereo: render into scratch and spread it over the device channels
            scratch.resize(n_frames, StereoFrame::zero());
            engine.render_block(&mut scratch);
            for (out, frame) in data.chunks_exact_mut(channels).zip(scratch.iter()) {
                for (ch, sample) in out.iter_mut().enumerate() {
                    *sample = match ch {
                        0 if channels == 1 => (frame.left + frame.right) * 0.5,
                        0 => frame.left,
                        1 => frame.right,
                        _ => 0.0,
                    };
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

// ── Bindings ──────────────────────────────────────────────────────

// Main-thread half of a registered voice. Keeps a mirror of the transport
// state so queries never have to wait on the audio thread.
pub struct EngineBinding {
    id: BindingId,
    tx: Sender<AudioCommand>,
    events: Receiver<PlaybackEvent>,
    volume: f32,
    looping: bool,
    paused: bool,
}

impl EngineBinding {
    fn send(&self, cmd: AudioCommand) {
        let _ = self.tx.try_send(cmd);
    }
}

impl AudioBinding for EngineBinding {
    fn play(&mut self) {
        self.paused = false;
        self.send(AudioCommand::Play(self.id));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.send(AudioCommand::Pause(self.id));
    }

    fn rewind(&mut self) {
        self.send(AudioCommand::Rewind(self.id));
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.send(AudioCommand::SetVolume(self.id, volume));
    }

    fn looping(&self) -> bool {
        self.looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        self.send(AudioCommand::SetLoop(self.id, looping));
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        let events: Vec<PlaybackEvent> = self.events.try_iter().collect();
        if events.contains(&PlaybackEvent::Ended) {
            self.paused = true;
        }
        events
    }
}

impl Drop for EngineBinding {
    fn drop(&mut self) {
        self.send(AudioCommand::Release(self.id));
    }
}

pub struct EngineBackend {
    handle: AudioHandle,
    resolver: SourceResolver,
}

impl EngineBackend {
    pub fn new(handle: AudioHandle, resolver: SourceResolver) -> Self {
        Self { handle, resolver }
    }
}

impl AudioBackend for EngineBackend {
    fn open(&mut self, source: &SoundSource) -> Box<dyn AudioBinding> {
        self.maintain();
        let path = self.resolver.resolve(source);
        let (id, buffer) = match sample_loader::load(&path, self.handle.sample_rate()) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("can't play {source}: {e:#}");
                return Box::new(SilentBinding::default());
            }
        };
        log::debug!("registered {source} as binding {}", id.0);

        let (events_tx, events_rx) = crossbeam_channel::bounded(EVENT_QUEUE);
        self.handle.send(AudioCommand::Register { id, buffer, events: events_tx });

        Box::new(EngineBinding {
            id,
            tx: self.handle.tx.clone(),
            events: events_rx,
            volume: 1.0,
            looping: false,
            paused: true,
        })
    }

    fn maintain(&mut self) {
        let freed = self.handle.free_retired();
        if freed > 0 {
            log::debug!("freed {freed} released sample buffers");
        }
    }
}
