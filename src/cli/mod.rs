//! # CLI Module
//!
//! Command-line interface for the photo export organizer.
//!
//! ## Usage
//! ```bash
//! # Show the target structure without touching anything
//! photo-export --metadata meta --content photos --destination ~/Pictures plan
//!
//! # Organize for real
//! photo-export --metadata meta --content photos --destination ~/Pictures run
//!
//! # Sanity checks on the export
//! photo-export --metadata meta --content photos check
//! photo-export --metadata meta albums
//! photo-export --metadata meta tags --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_export_organizer::config::{OrganizerConfig, ResolvedConfig};
use photo_export_organizer::core::content::ContentIndex;
use photo_export_organizer::core::metadata::{AlbumRecord, MetadataLoader, PhotoRecord};
use photo_export_organizer::core::pipeline::{Pipeline, PipelineResult};
use photo_export_organizer::core::report::{
    self, AlbumWithoutContent, ConsistencyReport, MultiAlbumPhoto, TagUsage,
};
use photo_export_organizer::core::structure::AlbumStructurePlanner;
use photo_export_organizer::error::{OrganizerError, Result};
use photo_export_organizer::events::{Event, EventChannel, PipelineEvent, TransferEvent};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;

/// Photo Export Organizer - Sort a flat export into year and album folders
#[derive(Parser, Debug)]
#[command(name = "photo-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder with albums.json and photo_<id>.json files
    #[arg(long, global = true)]
    metadata: Option<PathBuf>,

    /// Folder with the exported content files
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Root of the organized tree
    #[arg(long, global = true)]
    destination: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the planned structure without touching any file
    Plan {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Plan and transfer every photo into place
    Run {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Compare content files against metadata records
    Check {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// List photos that appear in several albums
    Albums {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// List distinct tags
    Tags {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

impl Cli {
    fn config(&self) -> Result<OrganizerConfig> {
        let from_flags = OrganizerConfig {
            metadata_dir: self.metadata.clone(),
            content_dir: self.content.clone(),
            destination_root: self.destination.clone(),
            dry_run: false,
        };
        Ok(OrganizerConfig::load(self.config.as_deref())?.merge(from_flags))
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    photo_export_organizer::init_tracing(default_log_level(cli.verbose));

    let config = cli.config()?;
    let term = Term::stderr();

    match cli.command {
        Commands::Plan { output } => {
            let config = OrganizerConfig {
                dry_run: true,
                ..config
            };
            run_plan(&term, config.validate()?, output)
        }
        Commands::Run { output } => run_organize(&term, config.validate()?, output, cli.verbose),
        Commands::Check { output } => {
            let content = ContentIndex::load(&require(&config.content_dir, "--content")?)?;
            let records = load_records(&config)?;
            let albums = load_albums(&config)?;
            let consistency = report::consistency_report(&content, &records);
            let plan = AlbumStructurePlanner::new(config.destination_root.clone().unwrap_or_default())
                .plan(&albums, &records, &content)?;
            let empty_albums = report::albums_without_content(&plan, &content);
            match output {
                OutputFormat::Pretty => {
                    print_pretty_check(&term, &consistency);
                    print_albums_without_content(&term, &empty_albums);
                }
                OutputFormat::Json => println!(
                    "{:#}",
                    serde_json::json!({
                        "consistency": consistency,
                        "albums_without_content": empty_albums,
                    })
                ),
            }
            Ok(())
        }
        Commands::Albums { output } => {
            let albums = load_albums(&config)?;
            let multi = report::multi_album_photos(&albums);
            match output {
                OutputFormat::Pretty => print_pretty_albums(&term, &albums, &multi),
                OutputFormat::Json => println!("{:#}", serde_json::json!(multi)),
            }
            Ok(())
        }
        Commands::Tags { output } => {
            let tags = report::distinct_tags(&load_records(&config)?);
            match output {
                OutputFormat::Pretty => print_pretty_tags(&term, &tags),
                OutputFormat::Json => println!("{:#}", serde_json::json!(tags)),
            }
            Ok(())
        }
    }
}

fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn require(value: &Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    value
        .clone()
        .ok_or_else(|| OrganizerError::Config(format!("No folder given, pass {}", flag)))
}

fn loader(config: &OrganizerConfig) -> Result<MetadataLoader> {
    Ok(MetadataLoader::new(require(&config.metadata_dir, "--metadata")?))
}

fn load_records(config: &OrganizerConfig) -> Result<HashMap<String, PhotoRecord>> {
    Ok(loader(config)?.load_photo_records()?)
}

fn load_albums(config: &OrganizerConfig) -> Result<Vec<AlbumRecord>> {
    Ok(loader(config)?.load_albums()?)
}

fn print_header(term: &Term) {
    term.write_line(&format!(
        "{} {}",
        style("Photo Export Organizer").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();
}

fn run_plan(term: &Term, config: ResolvedConfig, output: OutputFormat) -> Result<()> {
    if matches!(output, OutputFormat::Pretty) {
        print_header(term);
    }

    let result = Pipeline::builder().config(config).build().run()?;

    match output {
        OutputFormat::Pretty => print_pretty_plan(term, &result),
        OutputFormat::Json => println!(
            "{:#}",
            serde_json::json!({
                "run_id": result.run_id.to_string(),
                "destination_root": result.plan.destination_root,
                "albums": result.plan.albums.iter().map(|album| {
                    serde_json::json!({
                        "id": album.id,
                        "name": album.name,
                        "year": album.year,
                        "path": album.target_path,
                        "files": album.photos.iter().map(|p| &p.destination_file_name).collect::<Vec<_>>(),
                    })
                }).collect::<Vec<_>>(),
                "photos": result.plan.photo_count(),
                "unrecognized_content": result.unrecognized_content,
                "albums_without_content": result.albums_without_content,
                "duration_ms": result.duration_ms,
            })
        ),
    }
    Ok(())
}

fn run_organize(term: &Term, config: ResolvedConfig, output: OutputFormat, verbose: bool) -> Result<()> {
    if matches!(output, OutputFormat::Pretty) {
        print_header(term);
    }

    let pipeline = Pipeline::builder().config(config).build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let Some(pb) = progress else {
            return;
        };
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Transfer(TransferEvent::Started { total_photos }) => {
                    pb.set_length(total_photos as u64);
                }
                Event::Transfer(TransferEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!("photo {}", p.photo_id));
                    }
                }
                Event::Transfer(TransferEvent::Failed { photo_id, message }) => {
                    pb.println(format!("{} {}: {}", style("✗").red(), photo_id, message));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;
    match output {
        OutputFormat::Pretty => print_pretty_transfer(term, &result, verbose),
        OutputFormat::Json => println!(
            "{:#}",
            serde_json::json!({
                "run_id": result.run_id.to_string(),
                "albums": result.plan.albums.len(),
                "transfer": result.transfer,
                "unrecognized_content": result.unrecognized_content,
                "duration_ms": result.duration_ms,
            })
        ),
    }

    if result.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_pretty_plan(term: &Term, result: &PipelineResult) {
    term.write_line(&format!(
        "{} Plan for {}",
        style("✓").green().bold(),
        display_path(&result.plan.destination_root)
    ))
    .ok();
    term.write_line("").ok();

    for album in &result.plan.albums {
        term.write_line(&format!(
            "  {} ({} photos)",
            style(display_path(&album.target_path)).bold(),
            style(album.photos.len()).cyan()
        ))
        .ok();
        for photo in &album.photos {
            term.write_line(&format!("    {} {}", style("○").dim(), photo.destination_file_name))
                .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} albums, {} photos, {} placements",
        style(result.plan.albums.len()).cyan(),
        style(result.plan.photo_count()).cyan(),
        style(result.plan.placement_count()).cyan()
    ))
    .ok();
    print_albums_without_content(term, &result.albums_without_content);
    print_unrecognized(term, &result.unrecognized_content);
    term.write_line(&format!("{}", style("Dry run: no files were touched.").dim()))
        .ok();
}

fn print_pretty_transfer(term: &Term, result: &PipelineResult, verbose: bool) {
    let Some(summary) = &result.transfer else {
        print_pretty_plan(term, result);
        return;
    };

    let mark = if summary.has_failures() {
        style("!").yellow().bold()
    } else {
        style("✓").green().bold()
    };
    term.write_line(&format!("{} Organize Complete", mark)).ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} of {} photos processed in {:.1}s",
        style(summary.processed).cyan(),
        style(summary.total).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} moved, {} copied, {} already in place",
        style(summary.moved).cyan(),
        style(summary.copied).cyan(),
        style(summary.already_present).dim()
    ))
    .ok();
    if summary.missing_content > 0 {
        term.write_line(&format!(
            "  {} photos without content file",
            style(summary.missing_content).yellow()
        ))
        .ok();
    }

    if summary.has_failures() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style(format!("{} photos failed:", summary.failed)).red().bold()
        ))
        .ok();
        for failure in &summary.failures {
            term.write_line(&format!(
                "  {} {} {}: {}",
                style("✗").red(),
                failure.operation.action(),
                display_path(&failure.destination),
                failure.message
            ))
            .ok();
        }
    }

    if verbose {
        print_unrecognized(term, &result.unrecognized_content);
    }
}

fn print_unrecognized(term: &Term, unrecognized: &[PathBuf]) {
    if unrecognized.is_empty() {
        return;
    }
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} content files with unrecognized names were left alone:",
        style(unrecognized.len()).yellow()
    ))
    .ok();
    for path in unrecognized {
        term.write_line(&format!("    {}", display_path(path))).ok();
    }
    term.write_line("").ok();
}

fn print_albums_without_content(term: &Term, albums: &[AlbumWithoutContent]) {
    if albums.is_empty() {
        return;
    }
    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Albums without any content file:").bold().underlined()
    ))
    .ok();
    for album in albums {
        term.write_line(&format!(
            "  {} {} ({} photos missing)",
            style("!").yellow(),
            display_path(&album.target_path),
            album.photos
        ))
        .ok();
    }
}

fn print_pretty_check(term: &Term, consistency: &ConsistencyReport) {
    term.write_line(&format!(
        "  {} content files, {} metadata records",
        style(consistency.content_items).cyan(),
        style(consistency.metadata_records).cyan()
    ))
    .ok();

    if consistency.is_consistent() {
        term.write_line(&format!("{} Every photo has content and metadata", style("✓").green().bold()))
            .ok();
        return;
    }

    if !consistency.content_without_metadata.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Content without metadata:").bold().underlined()))
            .ok();
        for (id, path) in &consistency.content_without_metadata {
            term.write_line(&format!("  {} {}", style(id).yellow(), display_path(path))).ok();
        }
    }

    if !consistency.metadata_without_content.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Metadata without content:").bold().underlined()))
            .ok();
        for (id, name) in &consistency.metadata_without_content {
            term.write_line(&format!("  {} {}", style(id).yellow(), name)).ok();
        }
    }
}

fn print_pretty_albums(term: &Term, albums: &[AlbumRecord], multi: &[MultiAlbumPhoto]) {
    term.write_line(&format!(
        "  {} albums, {} photos in more than one",
        style(albums.len()).cyan(),
        style(multi.len()).cyan()
    ))
    .ok();
    term.write_line("").ok();

    for photo in multi {
        term.write_line(&format!(
            "  {} {}",
            style(&photo.photo_id).bold(),
            photo.albums.join(", ")
        ))
        .ok();
    }
}

fn print_pretty_tags(term: &Term, tags: &[TagUsage]) {
    for tag in tags {
        let marker = if tag.ignored {
            style("ignored").dim().to_string()
        } else {
            String::new()
        };
        term.write_line(&format!("  {:>5}  {} {}", tag.photos, tag.tag, marker))
            .ok();
    }
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} distinct tags, {} ignored in filenames",
        style(tags.len()).cyan(),
        style(tags.iter().filter(|t| t.ignored).count()).dim()
    ))
    .ok();
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
