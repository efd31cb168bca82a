use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

// Playback cursor for one binding. Buffers are resampled on load, so the
// cursor always advances one frame per output frame.
#[derive(Clone, Debug)]
pub struct Voice {
    pub pos: usize,
    pub gain: f32,
    pub looping: bool,
    pub playing: bool,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            pos: 0,
            gain: 1.0,
            looping: false,
            playing: false,
        }
    }
}

impl Voice {
    pub fn play(&mut self, buffer: &SampleBuffer) {
        // a finished voice starts over, like an ended <audio> does on play()
        if self.pos >= buffer.data.len() {
            self.pos = 0;
        }
        self.playing = true;
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    // Mix this voice into `out`. Returns true when it ran off the end this block.
    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) -> bool {
        if !self.playing {
            return false;
        }
        let len = buffer.data.len();
        if len == 0 {
            self.playing = false;
            return true;
        }

        for frame in out.iter_mut() {
            if self.pos >= len {
                if self.looping {
                    self.pos = 0;
                } else {
                    self.playing = false;
                    return true;
                }
            }
            frame.add_scaled(buffer.data[self.pos], self.gain);
            self.pos += 1;
        }

        // landing exactly on the end counts as ended now, not next block
        if self.pos >= len && !self.looping {
            self.playing = false;
            return true;
        }
        false
    }
}
