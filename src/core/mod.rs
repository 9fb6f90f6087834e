//! # Core Module
//!
//! The UI-agnostic organizer engine.
//!
//! ## Modules
//! - `content` - Recognizes exported content files by their embedded id
//! - `metadata` - Loads photo records and albums from the export
//! - `naming` - Sanitizes names and encodes tags into filenames
//! - `structure` - Plans the year/album target tree
//! - `transfer` - Copies and moves content into the planned tree
//! - `report` - Read-only checks over a loaded export
//! - `pipeline` - Orchestrates the full workflow

pub mod content;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod structure;
pub mod transfer;

// Re-export commonly used types
pub use content::{ContentIndex, ContentItem};
pub use metadata::{AlbumRecord, MetadataLoader, PhotoRecord};
pub use structure::{AlbumDescriptor, AlbumStructurePlanner, PhotoDescriptor, TransferPlan};
pub use transfer::{TransferEngine, TransferOperation, TransferSummary};
