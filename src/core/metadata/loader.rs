//! Reads photo records and albums from an export's metadata directory.

use super::{AlbumRecord, AlbumsJson, PhotoJson, PhotoRecord};
use crate::error::MetadataError;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ALBUMS_FILE: &str = "albums.json";

/// Loads the JSON metadata of a photo export
#[derive(Debug, Clone)]
pub struct MetadataLoader {
    metadata_dir: PathBuf,
    photo_file_pattern: Regex,
}

impl MetadataLoader {
    pub fn new(metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
            photo_file_pattern: Regex::new(r"^photo_([0-9]+)\.json$")
                .expect("photo file pattern is valid"),
        }
    }

    /// Load every `photo_<id>.json` record, keyed by photo id.
    ///
    /// Fails on the first unreadable file, malformed date or repeated id:
    /// planning depends on every record being trustworthy.
    pub fn load_photo_records(&self) -> Result<HashMap<String, PhotoRecord>, MetadataError> {
        if !self.metadata_dir.is_dir() {
            return Err(MetadataError::DirectoryNotFound {
                path: self.metadata_dir.clone(),
            });
        }

        let mut records = HashMap::new();
        let walker = WalkDir::new(&self.metadata_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| MetadataError::ReadFile {
                path: self.metadata_dir.clone(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory loop")),
            })?;

            if !entry.file_type().is_file() || !self.is_photo_metadata_file(entry.path()) {
                continue;
            }

            let record = self.load_photo_record(entry.path())?;
            record.date_taken()?;

            if records.contains_key(&record.id) {
                return Err(MetadataError::DuplicatePhotoId { id: record.id });
            }
            tracing::trace!("{} : OK", entry.path().display());
            records.insert(record.id.clone(), record);
        }

        tracing::info!(
            "Loaded {} photo records from {}",
            records.len(),
            self.metadata_dir.display()
        );
        Ok(records)
    }

    /// Load a single photo record file
    pub fn load_photo_record(&self, path: &Path) -> Result<PhotoRecord, MetadataError> {
        let json: PhotoJson = read_json(path)?;
        Ok(json.into())
    }

    /// Load `albums.json`, in export order.
    ///
    /// An export without albums yields an empty list.
    pub fn load_albums(&self) -> Result<Vec<AlbumRecord>, MetadataError> {
        let path = self.metadata_dir.join(ALBUMS_FILE);
        if !path.exists() {
            tracing::warn!("No {} found at {}", ALBUMS_FILE, path.display());
            return Ok(Vec::new());
        }

        let json: AlbumsJson = read_json(&path)?;
        let albums: Vec<AlbumRecord> = json.albums.into_iter().map(Into::into).collect();
        tracing::info!("Loaded {} albums from {}", albums.len(), path.display());
        Ok(albums)
    }

    fn is_photo_metadata_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.photo_file_pattern.is_match(name))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, MetadataError> {
    let contents = fs::read_to_string(path).map_err(|source| MetadataError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| MetadataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
