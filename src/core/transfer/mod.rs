//! # Transfer Module
//!
//! Carries out a [`TransferPlan`](crate::core::structure::TransferPlan)
//! against the filesystem.
//!
//! Every step is idempotent: an interrupted run is recovered by running the
//! whole pipeline again. A photo in several albums is copied to every extra
//! album first and only then moved into its first album.

mod engine;
mod operation;

pub use engine::TransferEngine;
pub use operation::TransferOperation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a single copy or move ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    /// The file was copied or moved
    Transferred,
    /// An equally sized file was already at the destination
    AlreadyPresent,
}

/// A placement that could not be completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferFailure {
    pub photo_id: String,
    pub operation: TransferOperation,
    pub destination: PathBuf,
    pub message: String,
}

/// Counts for one transfer run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferSummary {
    /// Photos in the plan
    pub total: usize,
    /// Photos whose every placement is done
    pub processed: usize,
    pub moved: usize,
    pub copied: usize,
    /// Placements skipped because the destination already held the file
    pub already_present: usize,
    /// Photos without a content file (already moved, or never exported)
    pub missing_content: usize,
    /// Photos with at least one failed placement
    pub failed: usize,
    pub folders_created: usize,
    pub failures: Vec<TransferFailure>,
    pub duration_ms: u64,
}

impl TransferSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
