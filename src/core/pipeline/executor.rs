//! Pipeline execution implementation.

use crate::config::ResolvedConfig;
use crate::core::content::ContentIndex;
use crate::core::metadata::MetadataLoader;
use crate::core::report::{albums_without_content, AlbumWithoutContent};
use crate::core::structure::{AlbumStructurePlanner, TransferPlan};
use crate::core::transfer::{TransferEngine, TransferSummary};
use crate::error::OrganizerError;
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
};
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    pub run_id: Uuid,
    /// The computed target structure
    pub plan: TransferPlan,
    /// Transfer counts, `None` on a dry run
    pub transfer: Option<TransferSummary>,
    /// Content files left out because their name matched no pattern
    pub unrecognized_content: Vec<PathBuf>,
    /// Albums that will stay empty because none of their photos has content
    pub albums_without_content: Vec<AlbumWithoutContent>,
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn has_failures(&self) -> bool {
        self.transfer.as_ref().is_some_and(TransferSummary::has_failures)
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub metadata_dir: PathBuf,
    pub content_dir: PathBuf,
    pub destination_root: PathBuf,
    /// Plan without touching the filesystem
    pub dry_run: bool,
}

impl From<ResolvedConfig> for PipelineConfig {
    fn from(config: ResolvedConfig) -> Self {
        Self {
            metadata_dir: config.metadata_dir,
            content_dir: config.content_dir,
            destination_root: config.destination_root,
            dry_run: config.dry_run,
        }
    }
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a validated configuration
    pub fn config(mut self, config: impl Into<PipelineConfig>) -> Self {
        self.config = config.into();
        self
    }

    pub fn metadata_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.metadata_dir = path.into();
        self
    }

    pub fn content_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.content_dir = path.into();
        self
    }

    pub fn destination_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.destination_root = path.into();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

/// The index, load, plan and transfer pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, OrganizerError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, OrganizerError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("organize", %run_id);
        let _guard = span.enter();

        events.send(Event::Pipeline(PipelineEvent::Started));
        let result = self.execute(run_id, events);
        if let Err(e) = &result {
            tracing::error!("{}", e);
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
        }
        result
    }

    fn execute(&self, run_id: Uuid, events: &EventSender) -> Result<PipelineResult, OrganizerError> {
        let start_time = Instant::now();

        // Phase 1: Indexing content
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Indexing,
        }));
        let content = ContentIndex::load_with_events(&self.config.content_dir, events)?;

        // Phase 2: Loading metadata
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Loading,
        }));
        let loader = MetadataLoader::new(&self.config.metadata_dir);
        let records = loader.load_photo_records()?;
        let albums = loader.load_albums()?;

        // Phase 3: Planning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Planning,
        }));
        let planner = AlbumStructurePlanner::new(&self.config.destination_root);
        let plan = planner.plan_with_events(&albums, &records, &content, events)?;
        let empty_albums = albums_without_content(&plan, &content);
        for album in &empty_albums {
            tracing::warn!(
                "No content for any of the {} photos of album {} (@{})",
                album.photos,
                album.name,
                album.id
            );
        }

        // Phase 4: Transferring
        let transfer = if self.config.dry_run {
            tracing::info!("Dry run, nothing transferred");
            None
        } else {
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Transferring,
            }));
            Some(TransferEngine::execute_with_events(&plan, &content, events))
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                albums: plan.albums.len(),
                photos: records.len(),
                processed: transfer.as_ref().map(|t| t.processed),
                failed: transfer.as_ref().map_or(0, |t| t.failed),
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            run_id,
            plan,
            transfer,
            unrecognized_content: content.unrecognized().to_vec(),
            albums_without_content: empty_albums,
            duration_ms,
        })
    }
}
