//! # photo-export CLI
//!
//! Command-line interface for the photo export organizer.
//!
//! ## Usage
//! ```bash
//! photo-export --metadata ~/export/meta --content ~/export/photos --destination ~/Pictures plan
//! photo-export --config organizer.json run --output json
//! ```

mod cli;

use photo_export_organizer::Result;

fn main() -> Result<()> {
    cli::run()
}
