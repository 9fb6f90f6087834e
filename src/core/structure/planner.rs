//! Plan generator assigning every photo to its album folders.

use super::types::*;
use super::{PhotoDescriptor, PhotoDescriptorBuilder};
use crate::core::content::ContentIndex;
use crate::core::metadata::{AlbumRecord, PhotoRecord};
use crate::core::naming::sanitize_folder_name;
use crate::error::MetadataError;
use crate::events::{null_sender, Event, EventSender, PlanEvent};
use chrono::Datelike;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

const UNTITLED_ALBUM_FOLDER: &str = "Untitled_Album";

/// Generates the target folder structure
pub struct AlbumStructurePlanner {
    destination_root: PathBuf,
}

impl AlbumStructurePlanner {
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
        }
    }

    pub fn plan(
        &self,
        albums: &[AlbumRecord],
        records: &HashMap<String, PhotoRecord>,
        content: &ContentIndex,
    ) -> Result<TransferPlan, MetadataError> {
        self.plan_with_events(albums, records, content, &null_sender())
    }

    /// Build the plan: one descriptor per album in the given order, followed
    /// by the uncategorized album.
    pub fn plan_with_events(
        &self,
        albums: &[AlbumRecord],
        records: &HashMap<String, PhotoRecord>,
        content: &ContentIndex,
        events: &EventSender,
    ) -> Result<TransferPlan, MetadataError> {
        events.send(Event::Plan(PlanEvent::Started {
            albums: albums.len(),
            photos: records.len(),
        }));

        let photos = Self::build_photo_descriptors(records, content)?;

        let mut album_descriptors: Vec<AlbumDescriptor> = albums
            .iter()
            .map(|album| self.build_album(album, &photos, events))
            .collect();

        let referenced: HashSet<&str> = albums
            .iter()
            .flat_map(|a| a.photo_ids.iter().map(String::as_str))
            .collect();
        let uncategorized = self.build_uncategorized(&photos, &referenced);
        let uncategorized_count = uncategorized.photos.len();

        album_descriptors = album_descriptors
            .into_iter()
            .map(Self::name_blank_photos)
            .collect();
        album_descriptors.push(uncategorized);

        tracing::info!(
            "Planned {} albums for {} photos ({} uncategorized)",
            albums.len(),
            photos.len(),
            uncategorized_count
        );
        events.send(Event::Plan(PlanEvent::Completed {
            albums: album_descriptors.len(),
            photos: photos.len(),
            uncategorized: uncategorized_count,
        }));

        Ok(TransferPlan {
            destination_root: self.destination_root.clone(),
            albums: album_descriptors,
        })
    }

    fn build_photo_descriptors(
        records: &HashMap<String, PhotoRecord>,
        content: &ContentIndex,
    ) -> Result<HashMap<String, PhotoDescriptor>, MetadataError> {
        records
            .values()
            .map(|record| {
                PhotoDescriptorBuilder::from_record(record, content.get(&record.id))
                    .build()
                    .map(|photo| (photo.id.clone(), photo))
            })
            .collect()
    }

    fn build_album(
        &self,
        album: &AlbumRecord,
        photos: &HashMap<String, PhotoDescriptor>,
        events: &EventSender,
    ) -> AlbumDescriptor {
        tracing::debug!("Creating album structure for {} (@{})", album.title, album.id);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut album_photos = Vec::new();
        for photo_id in &album.photo_ids {
            match photos.get(photo_id) {
                Some(photo) => {
                    if seen.insert(photo_id.as_str()) {
                        album_photos.push(photo.clone());
                    }
                }
                None => {
                    tracing::warn!(
                        "No photo metadata found for photo id {} in album {}",
                        photo_id,
                        album.title
                    );
                    events.send(Event::Plan(PlanEvent::MissingMetadata {
                        album_title: album.title.clone(),
                        photo_id: photo_id.clone(),
                    }));
                }
            }
        }

        let year = Self::derive_year(&album_photos);
        let target_path = self
            .destination_root
            .join(&year)
            .join(album_folder_name(&album.id, &album.title));

        AlbumDescriptor {
            id: album.id.clone(),
            name: album.title.clone(),
            year: Some(year),
            target_path,
            photos: album_photos,
        }
    }

    fn build_uncategorized(
        &self,
        photos: &HashMap<String, PhotoDescriptor>,
        referenced: &HashSet<&str>,
    ) -> AlbumDescriptor {
        let mut unassigned: Vec<PhotoDescriptor> = photos
            .values()
            .filter(|p| !referenced.contains(p.id.as_str()))
            .cloned()
            .collect();
        unassigned.sort_by(|a, b| a.id.cmp(&b.id));

        AlbumDescriptor {
            id: UNCATEGORIZED_ALBUM_ID.to_string(),
            name: UNCATEGORIZED_ALBUM_NAME.to_string(),
            year: None,
            target_path: self.destination_root.join(UNCATEGORIZED_FOLDER),
            photos: unassigned,
        }
    }

    /// Year of the earliest dated photo, or `UNKNOWN`
    fn derive_year(photos: &[PhotoDescriptor]) -> String {
        photos
            .iter()
            .filter_map(|p| p.date_taken)
            .min()
            .map(|d| d.year().to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
    }

    /// Name every blank-named photo after the album and its position in it
    fn name_blank_photos(album: AlbumDescriptor) -> AlbumDescriptor {
        let folder_name = album_folder_name(&album.id, &album.name);
        let photos = album
            .photos
            .iter()
            .enumerate()
            .map(|(index, photo)| {
                if photo.has_blank_name() {
                    photo.renamed(format!("{}-{:03}", folder_name, index + 1))
                } else {
                    photo.clone()
                }
            })
            .collect();

        AlbumDescriptor { photos, ..album }
    }
}

/// Folder segment of an album: the sanitized title, or the sanitized id
/// when the title is blank
fn album_folder_name(id: &str, title: &str) -> String {
    [title, id]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .map(sanitize_folder_name)
        .unwrap_or_else(|| UNTITLED_ALBUM_FOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::ContentItem;
    use std::path::Path;

    fn record(id: &str, name: &str, date: Option<&str>) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            name: name.to_string(),
            date_taken_raw: date.map(str::to_string),
            ..Default::default()
        }
    }

    fn album(id: &str, title: &str, photo_ids: &[&str]) -> AlbumRecord {
        AlbumRecord {
            id: id.to_string(),
            title: title.to_string(),
            photo_ids: photo_ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn records(list: Vec<PhotoRecord>) -> HashMap<String, PhotoRecord> {
        list.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    fn content(ids: &[&str]) -> ContentIndex {
        ContentIndex::from_items(
            ids.iter()
                .map(|id| ContentItem::from_path(format!("/export/img_{}_o.jpg", id)).unwrap()),
        )
    }

    #[test]
    fn album_path_uses_earliest_year_and_folder_sanitizer() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![
            record("1", "a", Some("2011-03-01 10:00:00")),
            record("2", "b", Some("2009-12-31 23:59:59")),
            record("3", "c", None),
        ]);
        let albums = vec![album("A", "Road trip: USA", &["1", "2", "3"])];

        let plan = planner.plan(&albums, &recs, &content(&[])).unwrap();

        assert_eq!(plan.albums[0].target_path, Path::new("/dest/2009/Road_trip__USA"));
        assert_eq!(plan.albums[0].year.as_deref(), Some("2009"));
    }

    #[test]
    fn album_without_dates_is_unknown_year() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![record("1", "a", None)]);
        let albums = vec![album("A", "Scans", &["1"])];

        let plan = planner.plan(&albums, &recs, &content(&[])).unwrap();
        assert_eq!(plan.albums[0].target_path, Path::new("/dest/UNKNOWN/Scans"));
    }

    #[test]
    fn empty_album_is_kept() {
        let planner = AlbumStructurePlanner::new("/dest");
        let albums = vec![album("A", "Gone", &["404"])];

        let plan = planner.plan(&albums, &HashMap::new(), &content(&[])).unwrap();

        assert_eq!(plan.albums.len(), 2);
        assert!(plan.albums[0].photos.is_empty());
        assert_eq!(plan.albums[0].year.as_deref(), Some(UNKNOWN_YEAR));
    }

    #[test]
    fn blank_title_falls_back_to_album_id() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![
            record("1", "", Some("2010-05-01 09:00:00")),
            record("2", "b", Some("2010-06-01 09:00:00")),
        ]);
        let albums = vec![album("721575", "", &["1"]), album("721576", "  ", &["2"])];

        let plan = planner.plan(&albums, &recs, &content(&["1"])).unwrap();

        assert_eq!(plan.albums[0].target_path, Path::new("/dest/2010/721575"));
        assert_eq!(plan.albums[1].target_path, Path::new("/dest/2010/721576"));
        assert_eq!(plan.albums[0].photos[0].destination_file_name, "721575-001+1.jpg");
    }

    #[test]
    fn blank_title_and_id_use_placeholder_folder() {
        assert_eq!(album_folder_name("", ""), UNTITLED_ALBUM_FOLDER);
        assert_eq!(album_folder_name("9", "Trip. 2"), "Trip__2");
    }

    #[test]
    fn unknown_and_duplicate_ids_are_tolerated() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![record("1", "a", None), record("2", "b", None)]);
        let albums = vec![album("A", "Mixed", &["2", "0", "1", "2"])];

        let plan = planner.plan(&albums, &recs, &content(&[])).unwrap();
        let ids: Vec<&str> = plan.albums[0].photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn unreferenced_photos_go_to_uncategorized_last() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![
            record("1", "a", Some("2010-01-01 00:00:00")),
            record("3", "c", None),
            record("2", "b", None),
        ]);
        let albums = vec![album("A", "One", &["1"])];

        let plan = planner.plan(&albums, &recs, &content(&[])).unwrap();
        let last = plan.albums.last().unwrap();

        assert!(last.is_uncategorized());
        assert_eq!(last.target_path, Path::new("/dest/Uncategorized_Photos"));
        let ids: Vec<&str> = last.photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn blank_names_are_synthesized_per_album() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![record("1", "Named", None), record("2", "", None)]);
        let albums = vec![
            album("A", "Day out", &["1", "2"]),
            album("B", "Best of", &["2"]),
        ];

        let plan = planner.plan(&albums, &recs, &content(&["1", "2"])).unwrap();

        assert_eq!(plan.albums[0].photos[0].destination_file_name, "Named+1.jpg");
        assert_eq!(plan.albums[0].photos[1].name, "Day_out-002");
        assert_eq!(plan.albums[0].photos[1].destination_file_name, "Day_out-002+2.jpg");
        assert_eq!(plan.albums[1].photos[0].destination_file_name, "Best_of-001+2.jpg");
    }

    #[test]
    fn uncategorized_blank_names_keep_placeholder() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![record("7", "", None)]);

        let plan = planner.plan(&[], &recs, &content(&["7"])).unwrap();
        let photo = &plan.uncategorized().unwrap().photos[0];
        assert_eq!(photo.destination_file_name, "img+7.jpg");
    }

    #[test]
    fn photo_to_albums_follows_album_order() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![record("1", "x", None), record("2", "y", None)]);
        let albums = vec![
            album("A", "First", &["2"]),
            album("B", "Second", &["1", "2"]),
        ];

        let plan = planner.plan(&albums, &recs, &content(&[])).unwrap();
        let index = plan.photo_to_albums();

        assert_eq!(index.len(), 2);
        assert_eq!(plan.photo_count(), 2);
        assert_eq!(index[0].photo_id, "2");
        let album_ids: Vec<&str> = index[0].placements.iter().map(|p| p.album.id.as_str()).collect();
        assert_eq!(album_ids, vec!["A", "B"]);
        assert_eq!(index[0].move_target().unwrap().album.id, "A");
        assert_eq!(index[0].copy_targets().len(), 1);
        assert_eq!(index[1].photo_id, "1");
        assert!(index[1].copy_targets().is_empty());
    }

    #[test]
    fn malformed_date_fails_planning() {
        let planner = AlbumStructurePlanner::new("/dest");
        let recs = records(vec![record("1", "x", Some("not a date"))]);
        assert!(planner.plan(&[], &recs, &content(&[])).is_err());
    }
}
