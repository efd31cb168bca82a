// The built-in percussion samples, and the two ways a sound can land on a pad:
// dragged from the library (a small text payload) or dropped as a file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio_api::SoundSource;

// library urls start with this and resolve into the sounds dir
pub const LIBRARY_PREFIX: &str = "sounds/";

const LABEL_MAX: usize = 15;
const LABEL_KEEP: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySound {
    pub name: String,
    pub url: String,
}

impl LibrarySound {
    fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            url: format!("{LIBRARY_PREFIX}{file}"),
        }
    }

    // the text payload a library drag carries
    pub fn to_payload(&self) -> String {
        serde_json::json!({ "name": self.name, "url": self.url }).to_string()
    }
}

pub fn sound_library() -> Vec<LibrarySound> {
    vec![
        LibrarySound::new("Bumbo", "bumbo.wav"),
        LibrarySound::new("Caixa", "caixa.wav"),
        LibrarySound::new("Prato", "prato.wav"),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileDrop {
    pub path: PathBuf,
    pub mime: String,
}

impl FileDrop {
    // what a file picker would hand us: the path plus a type guessed from the extension
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mime_for_path(&path).to_string();
        Self { path, mime }
    }

    pub fn is_audio(&self) -> bool {
        self.mime.starts_with("audio/")
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DropPayload {
    Library(LibrarySound),
    File(FileDrop),
}

impl DropPayload {
    // A library drag is recognised by its text payload; anything else falls back to the file.
    pub fn from_transfer(text: Option<&str>, file: Option<FileDrop>) -> Option<Self> {
        if let Some(text) = text {
            match serde_json::from_str::<LibrarySound>(text) {
                Ok(sound) => return Some(DropPayload::Library(sound)),
                Err(e) => log::debug!("drop text is not a library sound: {e}"),
            }
        }
        file.map(DropPayload::File)
    }

    // Normalise to (source, display name). None when the dropped thing isn't audio.
    pub fn into_sound(self) -> Option<(SoundSource, String)> {
        match self {
            DropPayload::Library(sound) => Some((SoundSource::new(sound.url), sound.name)),
            DropPayload::File(file) if file.is_audio() => {
                let name = file.file_name();
                Some((SoundSource::new(file.path.to_string_lossy()), name))
            }
            DropPayload::File(file) => {
                log::debug!("ignoring non-audio drop {} ({})", file.path.display(), file.mime);
                None
            }
        }
    }
}

// only formats the engine can decode get an audio/ type
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "aif" | "aiff" => "audio/aiff",
        "txt" => "text/plain",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

// long names get cut to fit on a pad
pub fn pad_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX {
        let head: String = name.chars().take(LABEL_KEEP).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
