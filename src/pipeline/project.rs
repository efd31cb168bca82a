// The persisted record: one flat snapshot of pads, tracks and layout.
// Field names match what the board has always written (camelCase json).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::{DEFAULT_PAD_COLOR, DEFAULT_VOLUME};

use super::layout::ContentBlock;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zone content '{0}' is neither pad-container nor track-list")]
    UnknownContent(String),
    #[error("both zones hold '{0}'")]
    DuplicateContent(String),
    #[error("pad id '{0}' appears more than once")]
    DuplicatePadId(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub left: String,
    pub right: String,
    pub left_content: String,
    pub right_content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadRecord {
    pub id: String,
    pub audio_src: Option<String>,
    pub file_name: Option<String>,
    // older records have neither of these
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub file_name: String,
    pub audio_src: String,
}

// No playback position, loop flag or track volume in here: transport is session-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub layout: LayoutRecord,
    #[serde(default)]
    pub pads: Vec<PadRecord>,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

fn default_color() -> String {
    DEFAULT_PAD_COLOR.to_string()
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl PersistedRecord {
    // Parse and check everything the loader relies on before any live state is touched.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let record: PersistedRecord = serde_json::from_str(text)?;
        record.validate()?;
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        let left = self.layout.left_block()?;
        let right = self.layout.right_block()?;
        if left == right {
            return Err(RecordError::DuplicateContent(left.id().to_string()));
        }

        let mut seen = HashSet::new();
        for pad in &self.pads {
            if !seen.insert(pad.id.as_str()) {
                return Err(RecordError::DuplicatePadId(pad.id.clone()));
            }
        }
        Ok(())
    }
}

impl LayoutRecord {
    pub fn left_block(&self) -> Result<ContentBlock, RecordError> {
        ContentBlock::from_id(&self.left_content)
            .ok_or_else(|| RecordError::UnknownContent(self.left_content.clone()))
    }

    pub fn right_block(&self) -> Result<ContentBlock, RecordError> {
        ContentBlock::from_id(&self.right_content)
            .ok_or_else(|| RecordError::UnknownContent(self.right_content.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r##"{
        "layout": {"left": "0 0 300px", "right": "1 1 auto",
                   "leftContent": "pad-container", "rightContent": "track-list"},
        "pads": [{"id": "p1", "audioSrc": null, "fileName": null, "color": "#282828", "volume": 1}],
        "tracks": []
    }"##;

    #[test]
    fn parses_the_documented_shape() {
        let record = PersistedRecord::parse(SCENARIO).unwrap();
        assert_eq!(record.pads.len(), 1);
        assert_eq!(record.pads[0].id, "p1");
        assert_eq!(record.pads[0].audio_src, None);
        assert_eq!(record.pads[0].volume, 1.0);
        assert_eq!(record.layout.left_block().unwrap(), ContentBlock::PadBank);
        assert!(record.tracks.is_empty());
    }

    #[test]
    fn writes_camel_case_fields() {
        let record = PersistedRecord::parse(SCENARIO).unwrap();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"leftContent\""));
        assert!(json.contains("\"audioSrc\": null"));
        assert!(json.contains("\"fileName\""));
        assert!(!json.contains("left_content"));
    }

    #[test]
    fn older_pads_default_color_and_volume() {
        let text = r#"{
            "layout": {"left": "0 0 300px", "right": "1 1 auto",
                       "leftContent": "track-list", "rightContent": "pad-container"},
            "pads": [{"id": "old", "audioSrc": "kick.wav", "fileName": "kick.wav"}]
        }"#;
        let record = PersistedRecord::parse(text).unwrap();
        assert_eq!(record.pads[0].color, DEFAULT_PAD_COLOR);
        assert_eq!(record.pads[0].volume, DEFAULT_VOLUME);
        assert!(record.tracks.is_empty());
    }

    #[test]
    fn same_content_in_both_zones_is_rejected() {
        let text = SCENARIO.replace("\"track-list\"", "\"pad-container\"");
        let err = PersistedRecord::parse(&text).unwrap_err();
        assert!(matches!(err, RecordError::DuplicateContent(id) if id == "pad-container"));
    }

    #[test]
    fn unknown_content_is_rejected() {
        let text = SCENARIO.replace("\"track-list\"", "\"sidebar\"");
        assert!(matches!(
            PersistedRecord::parse(&text),
            Err(RecordError::UnknownContent(id)) if id == "sidebar"
        ));
    }

    #[test]
    fn duplicate_pad_ids_are_rejected() {
        let text = SCENARIO.replace(
            "\"volume\": 1}]",
            "\"volume\": 1}, {\"id\": \"p1\", \"audioSrc\": null, \"fileName\": null}]",
        );
        assert!(matches!(PersistedRecord::parse(&text), Err(RecordError::DuplicatePadId(_))));
    }

    #[test]
    fn missing_layout_is_a_parse_error() {
        let err = PersistedRecord::parse(r#"{"pads": [], "tracks": []}"#).unwrap_err();
        assert!(matches!(err, RecordError::Parse(_)));
    }
}
