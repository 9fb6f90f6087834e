//! Photo descriptors: a metadata record plus everything derived from it.

use crate::core::content::ContentItem;
use crate::core::metadata::{parse_date_taken, PhotoRecord};
use crate::core::naming;
use crate::error::MetadataError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Stand-in name for a blank-named photo that has no content file either
const UNTITLED: &str = "untitled";

/// A photo ready to be placed in the organized tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDescriptor {
    pub id: String,
    /// Display name; blank until an album assigns one
    pub name: String,
    pub description: String,
    pub date_taken_raw: Option<String>,
    pub date_taken: Option<NaiveDateTime>,
    pub tags: BTreeSet<String>,
    pub original_filename: String,
    /// Lowercase extension the content file carries
    pub extension: Option<String>,
    /// Name used for the filename while `name` is blank
    pub fallback_name: String,
    pub destination_file_name: String,
}

impl PhotoDescriptor {
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// The same photo under another display name, destination filename rebuilt
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut renamed = self.clone();
        renamed.name = name.into();
        renamed.destination_file_name = renamed.derive_file_name();
        renamed
    }

    fn derive_file_name(&self) -> String {
        let name = if self.has_blank_name() {
            &self.fallback_name
        } else {
            &self.name
        };
        naming::destination_file_name(
            name,
            &self.id,
            self.tags.iter().map(String::as_str),
            self.extension.as_deref(),
        )
    }
}

/// Independently settable fields of a [`PhotoDescriptor`].
///
/// `build` is the single step that parses the date and derives the filename.
#[derive(Debug, Clone, Default)]
pub struct PhotoDescriptorBuilder {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date_taken_raw: Option<String>,
    pub tags: BTreeSet<String>,
    pub original_filename: String,
    /// Extension of the content file, if one was found
    pub content_extension: Option<String>,
    /// Name segment of the content file, if one was found
    pub content_base_name: Option<String>,
}

impl PhotoDescriptorBuilder {
    /// Start from a metadata record and its content file, if any
    pub fn from_record(record: &PhotoRecord, content: Option<&ContentItem>) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            date_taken_raw: record.date_taken_raw.clone(),
            tags: record.tags.clone(),
            original_filename: record.original_filename.clone(),
            content_extension: content.map(|c| c.extension.clone()),
            content_base_name: content.map(|c| c.base_name.clone()),
        }
    }

    pub fn build(self) -> Result<PhotoDescriptor, MetadataError> {
        let date_taken = parse_date_taken(&self.id, self.date_taken_raw.as_deref())?;

        let extension = self.content_extension.or_else(|| {
            Path::new(&self.original_filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
        });

        let fallback_name = self
            .content_base_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let mut descriptor = PhotoDescriptor {
            id: self.id,
            name: self.name,
            description: self.description,
            date_taken_raw: self.date_taken_raw,
            date_taken,
            tags: self.tags,
            original_filename: self.original_filename,
            extension,
            fallback_name,
            destination_file_name: String::new(),
        };
        descriptor.destination_file_name = descriptor.derive_file_name();
        Ok(descriptor)
    }
}
