//! # Config Module
//!
//! Folder locations and run options.
//!
//! Values come from a JSON file (by default
//! `<config dir>/photo-export-organizer/config.json`) and are overridden by
//! whatever the command line sets.

use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "photo-export-organizer";
const CONFIG_FILE: &str = "config.json";

/// Configuration for an organize run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Directory holding `albums.json` and `photo_<id>.json`
    #[serde(default)]
    pub metadata_dir: Option<PathBuf>,
    /// Flat directory of exported content files
    #[serde(default)]
    pub content_dir: Option<PathBuf>,
    /// Root of the organized tree
    #[serde(default)]
    pub destination_root: Option<PathBuf>,
    /// Plan only, touch nothing
    #[serde(default)]
    pub dry_run: bool,
}

/// A configuration with every folder known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub metadata_dir: PathBuf,
    pub content_dir: PathBuf,
    pub destination_root: PathBuf,
    pub dry_run: bool,
}

impl OrganizerConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            OrganizerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            OrganizerError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load `path`, or the default config file if it exists, or nothing.
    ///
    /// An explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => {
                    tracing::debug!("Using config file {}", default.display());
                    Self::from_file(&default)
                }
                None => Ok(Self::default()),
            },
        }
    }

    /// Overlay the values set in `other`
    pub fn merge(self, other: OrganizerConfig) -> Self {
        Self {
            metadata_dir: other.metadata_dir.or(self.metadata_dir),
            content_dir: other.content_dir.or(self.content_dir),
            destination_root: other.destination_root.or(self.destination_root),
            dry_run: self.dry_run || other.dry_run,
        }
    }

    /// Check that every folder is known and the layout is sane
    pub fn validate(&self) -> Result<ResolvedConfig> {
        let metadata_dir = require(&self.metadata_dir, "metadata folder (--metadata)")?;
        let content_dir = require(&self.content_dir, "content folder (--content)")?;
        let destination_root = require(&self.destination_root, "destination folder (--destination)")?;

        if destination_root.starts_with(&content_dir) {
            return Err(OrganizerError::Config(format!(
                "Destination {} must not be inside the content folder {}",
                destination_root.display(),
                content_dir.display()
            )));
        }

        Ok(ResolvedConfig {
            metadata_dir,
            content_dir,
            destination_root,
            dry_run: self.dry_run,
        })
    }
}

fn require(value: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    value
        .clone()
        .ok_or_else(|| OrganizerError::Config(format!("No {} configured", what)))
}
