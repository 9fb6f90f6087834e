//! # Pipeline Module
//!
//! Orchestrates a full organize run.
//!
//! ## Pipeline Stages
//! 1. **Index** - Recognize content files by their embedded id
//! 2. **Load** - Read photo records and albums
//! 3. **Plan** - Compute album folders and destination filenames
//! 4. **Transfer** - Copy and move content into place (skipped on a dry run)
//!
//! Runs are single threaded and safe to repeat after an interruption.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
