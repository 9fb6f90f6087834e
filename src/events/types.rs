//! Event type definitions for progress reporting.

use crate::core::transfer::{TransferOperation, TransferSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the organizer pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Content indexing events
    Content(ContentEvent),
    /// Planning events
    Plan(PlanEvent),
    /// Transfer events
    Transfer(TransferEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while indexing the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContentEvent {
    Started { path: PathBuf },
    /// A file matched no content filename pattern and was left out
    Unrecognized { path: PathBuf },
    /// A file carried an id already claimed by an earlier file
    DuplicateId { id: String, path: PathBuf },
    Completed { total_items: usize, unrecognized: usize },
}

/// Events while planning the target structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanEvent {
    Started { albums: usize, photos: usize },
    /// An album references a photo without metadata
    MissingMetadata { album_title: String, photo_id: String },
    Completed {
        albums: usize,
        photos: usize,
        uncategorized: usize,
    },
}

/// Events while transferring files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransferEvent {
    Started { total_photos: usize },
    Progress(TransferProgress),
    Transferred {
        photo_id: String,
        operation: TransferOperation,
        destination: PathBuf,
    },
    AlreadyPresent { photo_id: String, destination: PathBuf },
    /// No content file for the photo, nothing to transfer
    MissingContent { photo_id: String },
    /// A placement failed; the batch continues
    Failed { photo_id: String, message: String },
    Completed(TransferSummary),
}

/// Progress information during transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferProgress {
    /// Photos handled so far
    pub completed: usize,
    pub total: usize,
    /// Photo currently being transferred
    pub photo_id: String,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Started,
    PhaseChanged { phase: PipelinePhase },
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Indexing,
    Loading,
    Planning,
    Transferring,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub albums: usize,
    pub photos: usize,
    /// Photos processed by the transfer, `None` on a dry run
    pub processed: Option<usize>,
    pub failed: usize,
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Indexing => write!(f, "Indexing content"),
            PipelinePhase::Loading => write!(f, "Loading metadata"),
            PipelinePhase::Planning => write!(f, "Planning structure"),
            PipelinePhase::Transferring => write!(f, "Transferring files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Transfer(TransferEvent::Progress(TransferProgress {
            completed: 10,
            total: 50,
            photo_id: "3977224776".to_string(),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Transfer(TransferEvent::Progress(p)) => {
                assert_eq!(p.total, 50);
                assert_eq!(p.photo_id, "3977224776");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn phase_display_is_human_readable() {
        assert_eq!(PipelinePhase::Transferring.to_string(), "Transferring files");
    }

    #[test]
    fn transfer_summary_travels_in_events() {
        let summary = TransferSummary {
            total: 3,
            processed: 2,
            failed: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&Event::Transfer(TransferEvent::Completed(summary))).unwrap();
        assert!(json.contains("\"processed\":2"));
    }
}
