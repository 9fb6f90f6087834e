//! Executor for transfer plans.

use super::{TransferFailure, TransferOperation, TransferOutcome, TransferSummary};
use crate::core::content::ContentIndex;
use crate::core::structure::{Placement, PhotoPlacements, TransferPlan};
use crate::error::TransferError;
use crate::events::{null_sender, Event, EventSender, TransferEvent, TransferProgress};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Album folders after [`TransferEngine::prepare_directories`]
#[derive(Debug, Default)]
pub struct PreparedFolders {
    /// Folders that did not exist yet
    pub created: usize,
    /// Folders that could not be created, with the reason
    pub unavailable: HashMap<PathBuf, String>,
}

impl PreparedFolders {
    fn unavailable_reason(&self, folder: &Path) -> Option<&str> {
        self.unavailable.get(folder).map(String::as_str)
    }
}

/// Executes transfer plans
pub struct TransferEngine;

impl TransferEngine {
    /// Create every album folder of the plan, empty albums included.
    ///
    /// A folder that cannot be created is recorded; placements into it fail
    /// later, photo by photo.
    pub fn prepare_directories(plan: &TransferPlan) -> PreparedFolders {
        let mut folders = PreparedFolders::default();
        for album in &plan.albums {
            let path = &album.target_path;
            if path.is_dir() {
                tracing::debug!("{} already exists. Continuing in that folder...", path.display());
                continue;
            }
            match fs::create_dir_all(path) {
                Ok(()) => {
                    tracing::debug!("Created {}", path.display());
                    folders.created += 1;
                }
                Err(source) => {
                    let error = TransferError::CreateDirectory {
                        path: path.clone(),
                        source,
                    };
                    tracing::error!("{}", error);
                    folders.unavailable.insert(path.clone(), error.to_string());
                }
            }
        }
        folders
    }

    pub fn execute(plan: &TransferPlan, content: &ContentIndex) -> TransferSummary {
        Self::execute_with_events(plan, content, &null_sender())
    }

    /// Move or copy every photo of the plan into its album folders.
    ///
    /// Nothing aborts the run. A failing photo, including one whose album
    /// folder could not be created, is reported and the remaining photos are
    /// still processed.
    pub fn execute_with_events(
        plan: &TransferPlan,
        content: &ContentIndex,
        events: &EventSender,
    ) -> TransferSummary {
        let start = Instant::now();
        let mut last_progress = Instant::now();

        let folders = Self::prepare_directories(plan);

        let photos = plan.photo_to_albums();
        let mut summary = TransferSummary {
            total: photos.len(),
            folders_created: folders.created,
            ..Default::default()
        };

        events.send(Event::Transfer(TransferEvent::Started {
            total_photos: summary.total,
        }));

        for (i, photo) in photos.iter().enumerate() {
            let now = Instant::now();
            if now.duration_since(last_progress) >= PROGRESS_INTERVAL {
                events.send(Event::Transfer(TransferEvent::Progress(TransferProgress {
                    completed: i,
                    total: summary.total,
                    photo_id: photo.photo_id.to_string(),
                })));
                last_progress = now;
            }

            Self::transfer_photo(photo, content, &folders, &mut summary, events);
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Processed {}/{} photos ({} moved, {} copied, {} already present, {} without content, {} failed)",
            summary.processed,
            summary.total,
            summary.moved,
            summary.copied,
            summary.already_present,
            summary.missing_content,
            summary.failed
        );
        events.send(Event::Transfer(TransferEvent::Completed(summary.clone())));

        summary
    }

    fn transfer_photo(
        photo: &PhotoPlacements<'_>,
        content: &ContentIndex,
        folders: &PreparedFolders,
        summary: &mut TransferSummary,
        events: &EventSender,
    ) {
        let Some(item) = content.get(photo.photo_id) else {
            // Most likely moved by an earlier run
            tracing::debug!("No source for photo {}", photo.photo_id);
            summary.missing_content += 1;
            events.send(Event::Transfer(TransferEvent::MissingContent {
                photo_id: photo.photo_id.to_string(),
            }));
            return;
        };
        let Some(move_target) = photo.move_target() else {
            return;
        };

        let mut copies_ok = true;
        for placement in photo.copy_targets() {
            copies_ok &= Self::place(TransferOperation::Copy, item.path(), placement, folders, summary, events);
        }

        if !copies_ok {
            tracing::error!(
                "Not moving {} into {}: a copy failed and the source must remain for the next run",
                item.path().display(),
                move_target.album.target_path.display()
            );
            summary.failed += 1;
            return;
        }

        if Self::place(TransferOperation::Move, item.path(), move_target, folders, summary, events) {
            summary.processed += 1;
        } else {
            summary.failed += 1;
        }
    }

    /// Returns whether the placement is done
    fn place(
        operation: TransferOperation,
        source: &Path,
        placement: &Placement<'_>,
        folders: &PreparedFolders,
        summary: &mut TransferSummary,
        events: &EventSender,
    ) -> bool {
        let destination = placement.destination();
        let outcome = match folders.unavailable_reason(&placement.album.target_path) {
            Some(reason) => Err(reason.to_string()),
            None => operation.transfer(source, &destination).map_err(|e| {
                tracing::error!("{}", e);
                e.to_string()
            }),
        };

        match outcome {
            Ok(TransferOutcome::Transferred) => {
                match operation {
                    TransferOperation::Copy => summary.copied += 1,
                    TransferOperation::Move => summary.moved += 1,
                }
                events.send(Event::Transfer(TransferEvent::Transferred {
                    photo_id: placement.photo.id.clone(),
                    operation,
                    destination,
                }));
                true
            }
            Ok(TransferOutcome::AlreadyPresent) => {
                summary.already_present += 1;
                events.send(Event::Transfer(TransferEvent::AlreadyPresent {
                    photo_id: placement.photo.id.clone(),
                    destination,
                }));
                true
            }
            Err(message) => {
                events.send(Event::Transfer(TransferEvent::Failed {
                    photo_id: placement.photo.id.clone(),
                    message: message.clone(),
                }));
                summary.failures.push(TransferFailure {
                    photo_id: placement.photo.id.clone(),
                    operation,
                    destination,
                    message,
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::ContentItem;
    use crate::core::structure::{AlbumDescriptor, PhotoDescriptorBuilder};
    use crate::core::metadata::PhotoRecord;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        content_dir: std::path::PathBuf,
        dest: std::path::PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let content_dir = temp.path().join("content");
            let dest = temp.path().join("dest");
            fs::create_dir_all(&content_dir).unwrap();
            Self {
                _temp: temp,
                content_dir,
                dest,
            }
        }

        fn content_file(&self, id: &str, bytes: &[u8]) -> ContentItem {
            let path = self.content_dir.join(format!("pic_{}_o.jpg", id));
            fs::write(&path, bytes).unwrap();
            ContentItem::from_path(path).unwrap()
        }

        fn album(&self, id: &str, photo_ids: &[&str]) -> AlbumDescriptor {
            let photos = photo_ids
                .iter()
                .map(|pid| {
                    let record = PhotoRecord {
                        id: pid.to_string(),
                        name: format!("Photo {}", pid),
                        ..Default::default()
                    };
                    let mut builder = PhotoDescriptorBuilder::from_record(&record, None);
                    builder.content_extension = Some("jpg".to_string());
                    builder.build().unwrap()
                })
                .collect();
            AlbumDescriptor {
                id: id.to_string(),
                name: id.to_string(),
                year: Some("2020".to_string()),
                target_path: self.dest.join("2020").join(id),
                photos,
            }
        }
    }

    #[test]
    fn single_album_photo_is_moved() {
        let fx = Fixture::new();
        let item = fx.content_file("1", b"one");
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &["1"])],
        };

        let summary = TransferEngine::execute(&plan, &ContentIndex::from_items([item.clone()]));

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.processed, 1);
        assert!(!item.path().exists());
        assert!(fx.dest.join("2020/A/Photo 1+1.jpg").exists());
    }

    #[test]
    fn multi_album_photo_is_copied_then_moved() {
        let fx = Fixture::new();
        let item = fx.content_file("1", b"one");
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &["1"]), fx.album("B", &["1"]), fx.album("C", &["1"])],
        };

        let summary = TransferEngine::execute(&plan, &ContentIndex::from_items([item.clone()]));

        assert_eq!(summary.copied, 2);
        assert_eq!(summary.moved, 1);
        assert!(!item.path().exists());
        for album in ["A", "B", "C"] {
            assert!(fx.dest.join("2020").join(album).join("Photo 1+1.jpg").exists());
        }
    }

    #[test]
    fn missing_content_is_skipped() {
        let fx = Fixture::new();
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &["1"])],
        };

        let summary = TransferEngine::execute(&plan, &ContentIndex::default());

        assert_eq!(summary.missing_content, 1);
        assert_eq!(summary.failed, 0);
        assert!(fx.dest.join("2020/A").is_dir());
    }

    #[test]
    fn failed_copy_keeps_source_for_next_run() {
        let fx = Fixture::new();
        let item = fx.content_file("1", b"one");
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &["1"]), fx.album("B", &["1"])],
        };
        fs::create_dir_all(fx.dest.join("2020/B")).unwrap();
        fs::write(fx.dest.join("2020/B/Photo 1+1.jpg"), b"something else").unwrap();

        let summary = TransferEngine::execute(&plan, &ContentIndex::from_items([item.clone()]));

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].operation, TransferOperation::Copy);
        assert!(item.path().exists());
        assert!(!fx.dest.join("2020/A/Photo 1+1.jpg").exists());
    }

    #[test]
    fn one_failure_does_not_block_the_batch() {
        let fx = Fixture::new();
        let bad = fx.content_file("1", b"one");
        let good = fx.content_file("2", b"two");
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &["1", "2"])],
        };
        fs::create_dir_all(fx.dest.join("2020/A")).unwrap();
        fs::write(fx.dest.join("2020/A/Photo 1+1.jpg"), b"longer content").unwrap();

        let summary =
            TransferEngine::execute(&plan, &ContentIndex::from_items([bad, good.clone()]));

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 1);
        assert!(!good.path().exists());
    }

    #[test]
    fn prepare_directories_is_idempotent() {
        let fx = Fixture::new();
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &[]), fx.album("B", &[])],
        };

        assert_eq!(TransferEngine::prepare_directories(&plan).created, 2);
        assert_eq!(TransferEngine::prepare_directories(&plan).created, 0);
    }

    #[test]
    fn unusable_album_folder_fails_only_its_photos() {
        let fx = Fixture::new();
        let stuck = fx.content_file("1", b"one");
        let fine = fx.content_file("2", b"two");
        let shared = fx.content_file("3", b"three");
        let long_title = "a".repeat(300);
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album(&long_title, &["1", "3"]), fx.album("Ok", &["2", "3"])],
        };

        let (sender, receiver) = crate::events::EventChannel::new();
        let summary = TransferEngine::execute_with_events(
            &plan,
            &ContentIndex::from_items([stuck.clone(), fine.clone(), shared.clone()]),
            &sender,
        );
        drop(sender);

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.processed, 1);
        assert!(summary.failures.iter().all(|f| f.message.contains("Failed to create directory")));
        // Move target unusable: source stays
        assert!(stuck.path().exists());
        // Copy went through, but the move into the unusable folder did not
        assert!(shared.path().exists());
        assert!(fx.dest.join("2020/Ok/Photo 3+3.jpg").exists());
        assert!(!fine.path().exists());
        assert!(fx.dest.join("2020/Ok/Photo 2+2.jpg").exists());

        let failed_events = receiver
            .iter()
            .filter(|e| matches!(e, Event::Transfer(TransferEvent::Failed { .. })))
            .count();
        assert_eq!(failed_events, 2);
    }

    #[test]
    fn transfer_events_report_copy_before_move() {
        let fx = Fixture::new();
        let item = fx.content_file("1", b"one");
        let plan = TransferPlan {
            destination_root: fx.dest.clone(),
            albums: vec![fx.album("A", &["1"]), fx.album("B", &["1"])],
        };

        let (sender, receiver) = crate::events::EventChannel::new();
        TransferEngine::execute_with_events(&plan, &ContentIndex::from_items([item]), &sender);
        drop(sender);

        let operations: Vec<TransferOperation> = receiver
            .iter()
            .filter_map(|e| match e {
                Event::Transfer(TransferEvent::Transferred { operation, .. }) => Some(operation),
                _ => None,
            })
            .collect();
        assert_eq!(operations, vec![TransferOperation::Copy, TransferOperation::Move]);
    }
}
