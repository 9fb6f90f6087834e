//! Content directory indexing using walkdir.

use super::ContentItem;
use crate::error::ContentError;
use crate::events::{null_sender, ContentEvent, Event, EventSender};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content files of a flat export directory, keyed by stable id
#[derive(Debug, Default, Clone)]
pub struct ContentIndex {
    items: HashMap<String, ContentItem>,
    unrecognized: Vec<PathBuf>,
    duplicates: Vec<ContentItem>,
}

impl ContentIndex {
    /// Index every recognizable file directly inside `dir`
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        Self::load_with_events(dir, &null_sender())
    }

    /// Index `dir`, reporting unrecognized and duplicate files as events.
    ///
    /// Files are visited in name order; when two files carry the same id the
    /// first one wins.
    pub fn load_with_events(dir: &Path, events: &EventSender) -> Result<Self, ContentError> {
        if !dir.is_dir() {
            return Err(ContentError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        events.send(Event::Content(ContentEvent::Started {
            path: dir.to_path_buf(),
        }));

        let mut index = Self::default();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| ContentError::ReadDirectory {
                path: dir.to_path_buf(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory loop")),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            match ContentItem::from_path(entry.path()) {
                Ok(item) => index.insert(item, events),
                Err(e) => {
                    tracing::warn!("{}", e);
                    events.send(Event::Content(ContentEvent::Unrecognized {
                        path: entry.path().to_path_buf(),
                    }));
                    index.unrecognized.push(entry.into_path());
                }
            }
        }

        tracing::info!(
            "Indexed {} content items in {} ({} unrecognized, {} duplicates)",
            index.items.len(),
            dir.display(),
            index.unrecognized.len(),
            index.duplicates.len()
        );
        events.send(Event::Content(ContentEvent::Completed {
            total_items: index.items.len(),
            unrecognized: index.unrecognized.len(),
        }));

        Ok(index)
    }

    fn insert(&mut self, item: ContentItem, events: &EventSender) {
        if let Some(existing) = self.items.get(&item.id) {
            tracing::warn!(
                "Content {} has the same id {} as {}. Ignoring it...",
                item.path.display(),
                item.id,
                existing.path.display()
            );
            events.send(Event::Content(ContentEvent::DuplicateId {
                id: item.id.clone(),
                path: item.path.clone(),
            }));
            self.duplicates.push(item);
        } else {
            self.items.insert(item.id.clone(), item);
        }
    }

    /// Build an index from already recognized items (first id wins)
    pub fn from_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let sender = null_sender();
        let mut index = Self::default();
        for item in items {
            index.insert(item, &sender);
        }
        index
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.values()
    }

    /// Files skipped because their name matched no pattern
    pub fn unrecognized(&self) -> &[PathBuf] {
        &self.unrecognized
    }

    /// Files skipped because an earlier file already claimed their id
    pub fn duplicates(&self) -> &[ContentItem] {
        &self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), b"content").unwrap();
    }

    #[test]
    fn indexes_recognized_files_by_id() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "19259555944_1777a52f53_o.jpg");
        touch(&dir, "050602-136_3977224776_o.jpg");

        let index = ContentIndex::load(dir.path()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("3977224776").unwrap().base_name, "050602-136");
        assert!(index.contains("19259555944"));
    }

    #[test]
    fn unrecognized_files_are_excluded_not_fatal() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "050602-136_3977224776_o.jpg");
        touch(&dir, "notes.txt");

        let index = ContentIndex::load(dir.path()).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.unrecognized().len(), 1);
        assert!(index.unrecognized()[0].ends_with("notes.txt"));
    }

    #[test]
    fn subdirectories_are_not_indexed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested_12345678901")).unwrap();
        fs::write(
            dir.path().join("nested_12345678901").join("a_3977224776.jpg"),
            b"x",
        )
        .unwrap();

        let index = ContentIndex::load(dir.path()).unwrap();
        assert!(index.is_empty());
        assert!(index.unrecognized().is_empty());
    }

    #[test]
    fn first_file_in_name_order_wins_duplicate_id() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "b_3977224776.jpg");
        touch(&dir, "a_3977224776_o.jpg");

        let index = ContentIndex::load(dir.path()).unwrap();

        assert_eq!(index.get("3977224776").unwrap().base_name, "a");
        assert_eq!(index.duplicates().len(), 1);
        assert_eq!(index.duplicates()[0].base_name, "b");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ContentIndex::load(&dir.path().join("missing"));
        assert!(matches!(result, Err(ContentError::DirectoryNotFound { .. })));
    }
}
