//! # Error Module
//!
//! Error types for the export organizer.
//!
//! ## Design Principles
//! - **Never panic** on export data - return errors instead
//! - **Include context** - paths, photo ids, what went wrong
//! - **Fail per item** during transfers, fail the run while loading metadata
//! - **Recovery hints** - say when manual correction is needed

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while indexing the content directory
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read content directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not match any known content filename pattern")]
    UnrecognizedFilename { path: PathBuf },
}

/// Errors that occur while loading the exported metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Photo {photo_id} has an unparseable date_taken '{value}' (expected YYYY-MM-DD hh:mm:ss)")]
    InvalidDateTaken { photo_id: String, value: String },

    #[error("Photo id {id} appears in more than one metadata record")]
    DuplicatePhotoId { id: String },
}

/// Errors that occur while copying or moving a content file
#[derive(Error, Debug)]
pub enum TransferError {
    #[error(
        "Destination {destination} already exists as target for {source_path}, \
         but sizes differ ({destination_size} vs {source_size} bytes). Manual correction required!"
    )]
    SizeMismatch {
        source_path: PathBuf,
        destination: PathBuf,
        source_size: u64,
        destination_size: u64,
    },

    #[error("Failed to {operation} {source_path} -> {destination}: {source}")]
    Io {
        operation: &'static str,
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to obtain file size of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, OrganizerError>;
