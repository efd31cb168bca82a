use std::path::{Path, PathBuf};

use crate::audio::{next_binding_id, BindingId, SampleBuffer};
use crate::audio_api::SoundSource;

use super::library::LIBRARY_PREFIX;

// Decode a sound from disk, prepare for registration with the engine
pub fn load(path: &Path, target_rate: u32) -> anyhow::Result<(BindingId, SampleBuffer)> {
    let buffer = SampleBuffer::load(path, target_rate)?;
    let id = next_binding_id();
    Ok((id, buffer))
}

// Turns the opaque sources stored in the record back into files.
// Library urls live under the sounds dir, other relative paths under the project dir.
#[derive(Clone, Debug)]
pub struct SourceResolver {
    pub project_dir: PathBuf,
    pub sounds_dir: PathBuf,
}

impl SourceResolver {
    pub fn resolve(&self, source: &SoundSource) -> PathBuf {
        let src = source.as_str();
        if let Some(rest) = src.strip_prefix(LIBRARY_PREFIX) {
            return self.sounds_dir.join(rest);
        }
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}
