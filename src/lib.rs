//! # Photo Export Organizer
//!
//! Turns a flat photo-service export (content files plus JSON metadata) into a
//! browsable `<year>/<album>` folder tree.
//!
//! ## Core Philosophy
//! - **Never lose a file** - Content is only moved after every copy landed
//! - **Safe to rerun** - Files already in place are recognized and skipped
//! - **Searchable names** - Titles, ids and tags end up in the filenames
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Indexing, planning and transfer
//! - `events` - Event-driven progress reporting
//! - `config` - Folder locations and run options
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface (binary only)

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the library
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this a second
/// time leaves the first subscriber in place.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
