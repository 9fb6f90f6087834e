//! # Structure Module
//!
//! Computes the organized layout of an export:
//!
//! ```text
//! <destination>/
//! ├── 2009/
//! │   └── Summer_holiday/
//! │       └── Beach+3977224776___#sea.jpg
//! ├── UNKNOWN/
//! │   └── Old_scans/
//! └── Uncategorized_Photos/
//! ```
//!
//! Each album lands under the year of its earliest photo. A photo in several
//! albums is placed in all of them; the first album in export order is the
//! one that receives the original file.

mod descriptor;
mod planner;
mod types;

pub use descriptor::{PhotoDescriptor, PhotoDescriptorBuilder};
pub use planner::AlbumStructurePlanner;
pub use types::*;
