use std::fs::File;
use std::path::Path;

use anyhow::Context;
use symphonia::core::audio::SampleBuffer as DecodeBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as DecodeError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::frame::StereoFrame;

#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // the audio data array, already at the engine rate
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn from_frames(data: Vec<StereoFrame>, sample_rate: u32) -> Self {
        Self { data, sample_rate }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return f64::NAN;
        }
        self.data.len() as f64 / self.sample_rate as f64
    }

    // hound for wav, symphonia for everything else; both end up at the engine rate
    pub fn load(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if is_wav {
            Self::load_wav(path, target_rate)
        } else {
            Self::load_decoded(path, target_rate)
        }
    }

    // Load a WAV file from disk, resampled to the engine rate
    pub fn load_wav(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("failed to open wav {}", path.display()))?;
        let spec = reader.spec();
        let file_rate = spec.sample_rate;
        let file_channels = spec.channels.max(1) as usize;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, scale into -1.0..1.0
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(Self::from_interleaved(samples, file_channels, file_rate, target_rate))
    }

    // mp3, ogg/vorbis, flac, m4a, aac, aiff: sniff the container, decode the first audio track
    pub fn load_decoded(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let opened = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .with_context(|| format!("unrecognised audio format {}", path.display()))?;
        let mut format = opened.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .with_context(|| format!("no audio track in {}", path.display()))?;
        let track_id = track.id;
        let mut file_rate = track.codec_params.sample_rate.unwrap_or(target_rate);
        let mut file_channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .with_context(|| format!("no decoder for {}", path.display()))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut decode_buf: Option<DecodeBuffer<f32>> = None;
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(DecodeError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(DecodeError::ResetRequired) => break,
                Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(DecodeError::DecodeError(e)) => { // a bad packet, skip it
                    log::debug!("skipping packet in {}: {e}", path.display());
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("failed to decode {}", path.display())),
            };

            let spec = *decoded.spec();
            file_rate = spec.rate;
            file_channels = spec.channels.count();
            let buf = decode_buf.get_or_insert_with(|| DecodeBuffer::new(decoded.capacity() as u64, spec));
            if buf.capacity() < decoded.capacity() * file_channels {
                *buf = DecodeBuffer::new(decoded.capacity() as u64, spec);
            }
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }

        Ok(Self::from_interleaved(samples, file_channels.max(1), file_rate, target_rate))
    }

    fn from_interleaved(samples: Vec<f32>, channels: usize, file_rate: u32, target_rate: u32) -> Self {
        let mut frames: Vec<StereoFrame> = if channels == 1 {
            samples.into_iter().map(StereoFrame::mono).collect() // mono, duplicate
        } else {
            // anything past the first two channels is dropped
            samples
                .chunks_exact(channels)
                .map(|c| StereoFrame { left: c[0], right: c[1] })
                .collect()
        };

        if file_rate != target_rate {
            frames = resample_linear(&frames, file_rate, target_rate);
        }

        Self::from_frames(frames, target_rate)
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || source_rate == 0 {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 / ratio; // ex. 3.7
        let idx = src_pos.floor() as usize; // ex. 3
        let frac = (src_pos - idx as f64) as f32; // ex. 0.7
        if idx >= frames.len().saturating_sub(1) { // edge case
            out.push(*frames.last().unwrap_or(&StereoFrame::zero()));
        } else {
            let a = frames[idx];
            let b = frames[idx + 1];
            out.push(StereoFrame {
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_follows_frame_count() {
        let buf = SampleBuffer::from_frames(vec![StereoFrame::zero(); 22050], 44100);
        assert!((buf.duration_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn resampling_doubles_length_when_rate_doubles() {
        let frames: Vec<StereoFrame> = (0..100).map(|i| StereoFrame::mono(i as f32)).collect();
        let out = resample_linear(&frames, 22050, 44100);
        assert_eq!(out.len(), 200);
        assert_eq!(out[0], StereoFrame::mono(0.0));
        assert!((out[1].left - 0.5).abs() < 1e-6);
    }

    #[test]
    fn loads_a_mono_wav_as_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..800 {
            writer.write_sample(i16::MAX / 2).unwrap();
        }
        writer.finalize().unwrap();

        let buf = SampleBuffer::load_wav(&path, 8000).unwrap();
        assert_eq!(buf.data.len(), 800);
        assert_eq!(buf.data[10].left, buf.data[10].right);
        assert!((buf.duration_secs() - 0.1).abs() < 1e-9);
    }

    // 16-bit mono AIFF, every sample at half scale
    fn write_aiff(path: &Path, frames: u32) {
        let data_len = frames * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"FORM");
        bytes.extend_from_slice(&(4 + 26 + 16 + data_len).to_be_bytes());
        bytes.extend_from_slice(b"AIFF");

        bytes.extend_from_slice(b"COMM");
        bytes.extend_from_slice(&18u32.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&frames.to_be_bytes());
        bytes.extend_from_slice(&16u16.to_be_bytes());
        bytes.extend_from_slice(&[0x40, 0x0B]); // 8000 Hz as an 80-bit float
        bytes.extend_from_slice(&(8000u64 << 51).to_be_bytes());

        bytes.extend_from_slice(b"SSND");
        bytes.extend_from_slice(&(8 + data_len).to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        for _ in 0..frames {
            bytes.extend_from_slice(&16384i16.to_be_bytes());
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn decodes_non_wav_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hat.aiff");
        write_aiff(&path, 400);

        let buf = SampleBuffer::load(&path, 8000).unwrap();
        assert_eq!(buf.data.len(), 400);
        assert!((buf.data[10].left - 0.5).abs() < 1e-4);
        assert_eq!(buf.data[10].left, buf.data[10].right);

        let upsampled = SampleBuffer::load(&path, 16000).unwrap();
        assert_eq!(upsampled.data.len(), 800);
    }

    #[test]
    fn undecodable_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"definitely not an mpeg stream").unwrap();
        assert!(SampleBuffer::load(&path, 44100).is_err());
    }
}
