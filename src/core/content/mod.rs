//! # Content Module
//!
//! Recognizes content files of a photo export and joins them to metadata
//! through the stable id embedded in their filename.
//!
//! ## Filename Grammar
//! Tried in order, first match wins:
//! 1. `<11 digits>_<10 chars>(_o)?.<ext>` - short id naming
//!    (e.g. `19259555944_1777a52f53_o.jpg`)
//! 2. `<name>_<digits>(_o)?.<ext>` - named upload
//!    (e.g. `050602-136_3977224776_o.jpg`)
//!
//! Pattern 2 also matches every pattern 1 name with the wrong id/name split,
//! so the order is significant.

mod index;

pub use index::ContentIndex;

use crate::error::ContentError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// `(id group, name group)` for each pattern, in matching order
const ID_PATTERNS: &[(&str, usize, usize)] = &[
    (r"^([0-9]{11})_(.{10})(_o)?\.(.+)$", 1, 2),
    (r"^(.+)_([0-9]+)(_o)?\.(.+)$", 2, 1),
];

/// Capture group holding the extension in every pattern
const EXTENSION_GROUP: usize = 4;

static COMPILED_PATTERNS: OnceLock<Vec<(Regex, usize, usize)>> = OnceLock::new();

fn patterns() -> &'static [(Regex, usize, usize)] {
    COMPILED_PATTERNS.get_or_init(|| {
        ID_PATTERNS
            .iter()
            .map(|(pattern, id, name)| {
                (Regex::new(pattern).expect("content pattern is valid"), *id, *name)
            })
            .collect()
    })
}

/// The parts recovered from a content filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentName {
    /// Stable id shared with the metadata record
    pub id: String,
    /// The name segment of the filename
    pub base_name: String,
    /// Lowercase file extension
    pub extension: String,
}

/// Parse a content filename into its id, name and extension.
///
/// The `_o` suffix marking an original-quality export is accepted and dropped.
pub fn parse_file_name(file_name: &str) -> Option<ContentName> {
    patterns().iter().find_map(|(regex, id_group, name_group)| {
        let caps = regex.captures(file_name)?;
        Some(ContentName {
            id: caps.get(*id_group)?.as_str().to_string(),
            base_name: caps.get(*name_group)?.as_str().to_string(),
            extension: caps.get(EXTENSION_GROUP)?.as_str().to_lowercase(),
        })
    })
}

/// One content file on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub base_name: String,
    pub extension: String,
    pub path: PathBuf,
}

impl ContentItem {
    /// Recognize a content file from its path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ContentError> {
        let path = path.into();
        let parsed = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_file_name);

        match parsed {
            Some(name) => Ok(Self {
                id: name.id,
                base_name: name.base_name,
                extension: name.extension,
                path,
            }),
            None => Err(ContentError::UnrecognizedFilename { path }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
