//! # Metadata Module
//!
//! In-memory model of the exported metadata and the loader reading it.
//!
//! ## Export Layout
//! - `photo_<id>.json` - one record per photo (name, tags, date taken)
//! - `albums.json` - every album with its ordered photo ids
//!
//! Dates are recorded as `YYYY-MM-DD hh:mm:ss` on a 24-hour clock.

mod loader;

pub use loader::MetadataLoader;

use crate::error::MetadataError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Textual format of `date_taken` in the export
pub const DATE_TAKEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One photo's metadata record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    /// Display name, may be blank
    pub name: String,
    pub description: String,
    /// Raw capture time, `None` when the export left it empty
    pub date_taken_raw: Option<String>,
    pub tags: BTreeSet<String>,
    /// Filename of the original upload as recorded by the export
    pub original_filename: String,
}

impl PhotoRecord {
    /// Parse `date_taken_raw`.
    ///
    /// An absent date is `Ok(None)`; a present but malformed one is an error.
    pub fn date_taken(&self) -> Result<Option<NaiveDateTime>, MetadataError> {
        parse_date_taken(&self.id, self.date_taken_raw.as_deref())
    }
}

/// Parse a raw `date_taken` value belonging to `photo_id`
pub fn parse_date_taken(
    photo_id: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, MetadataError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDateTime::parse_from_str(value, DATE_TAKEN_FORMAT)
            .map(Some)
            .map_err(|_| MetadataError::InvalidDateTaken {
                photo_id: photo_id.to_string(),
                value: value.to_string(),
            }),
    }
}

/// One album and its member photo ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// May contain duplicates and ids without a metadata record
    pub photo_ids: Vec<String>,
    pub photo_count: Option<u64>,
    pub created: Option<String>,
    pub last_updated: Option<String>,
}

/// `photo_<id>.json` as written by the export
#[derive(Debug, Deserialize)]
pub(crate) struct PhotoJson {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date_taken: Option<String>,
    #[serde(default)]
    tags: Vec<TagJson>,
    #[serde(default)]
    original: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagJson {
    tag: String,
}

impl From<PhotoJson> for PhotoRecord {
    fn from(json: PhotoJson) -> Self {
        let original_filename = json
            .original
            .as_deref()
            .and_then(|o| o.rsplit('/').next())
            .unwrap_or_default()
            .to_string();

        Self {
            id: json.id,
            name: json.name.unwrap_or_default(),
            description: json.description.unwrap_or_default(),
            date_taken_raw: json.date_taken.filter(|d| !d.trim().is_empty()),
            tags: json.tags.into_iter().map(|t| t.tag).collect(),
            original_filename,
        }
    }
}

/// `albums.json` as written by the export
#[derive(Debug, Deserialize)]
pub(crate) struct AlbumsJson {
    #[serde(default)]
    albums: Vec<AlbumJson>,
}

#[derive(Debug, Deserialize)]
struct AlbumJson {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_count")]
    photo_count: Option<u64>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default, rename = "photos")]
    photo_ids: Vec<String>,
}

impl From<AlbumJson> for AlbumRecord {
    fn from(json: AlbumJson) -> Self {
        Self {
            id: json.id,
            title: json.title.unwrap_or_default(),
            description: json.description.unwrap_or_default(),
            photo_ids: json.photo_ids,
            photo_count: json.photo_count,
            created: json.created,
            last_updated: json.last_updated,
        }
    }
}

/// Ids are strings in the export, but tolerate bare numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

/// `photo_count` is written as a quoted number
fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
