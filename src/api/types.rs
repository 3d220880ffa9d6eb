//! Listing payload as parsed from the media server's JSON API.
//!
//! Every field is optional so one odd entry never fails the whole container;
//! required-field checks happen in [`crate::transform`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Plex stream type for subtitle tracks
pub const SUBTITLE_STREAM_TYPE: u32 = 3;

// Ids arrive as strings from Plex but as numbers from some proxies
fn deserialize_optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom("expected string or number")),
    }
}

/// Top-level `{"MediaContainer": {...}}` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaContainerResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: MediaContainer,
}

/// A listing: one section, one show's seasons, or one item's detail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContainer {
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub title1: Option<String>,
    #[serde(default)]
    pub title2: Option<String>,
    #[serde(default)]
    pub parent_title: Option<String>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<MetadataEntry>,
}

impl MediaContainer {
    /// Languages of every subtitle stream in the container
    pub fn subtitle_languages(&self) -> BTreeSet<String> {
        self.metadata
            .iter()
            .flat_map(|entry| entry.media.iter())
            .flat_map(|media| media.parts.iter())
            .flat_map(|part| part.streams.iter())
            .filter(|stream| stream.stream_type == Some(SUBTITLE_STREAM_TYPE))
            .map(|stream| {
                stream
                    .language_code
                    .clone()
                    .or_else(|| stream.language.clone())
                    .unwrap_or_else(|| "und".to_string())
            })
            .collect()
    }
}

/// One listed item (movie, season, episode...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataEntry {
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub rating_key: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub parent_title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub content_rating: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub view_offset: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub leaf_count: Option<u64>,
    #[serde(default)]
    pub viewed_leaf_count: Option<u64>,
    #[serde(rename = "Media", default)]
    pub media: Vec<MediaEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaEntry {
    #[serde(rename = "Part", default)]
    pub parts: Vec<PartEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartEntry {
    #[serde(rename = "Stream", default)]
    pub streams: Vec<StreamEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEntry {
    #[serde(default)]
    pub stream_type: Option<u32>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub codec: Option<String>,
}
