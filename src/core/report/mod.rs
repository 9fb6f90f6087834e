//! # Report Module
//!
//! Read-only views over a loaded export, used to sanity check it before
//! anything is moved.

use crate::core::content::ContentIndex;
use crate::core::metadata::{AlbumRecord, PhotoRecord};
use crate::core::naming::is_ignored_tag;
use crate::core::structure::TransferPlan;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Mismatches between content files and metadata records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub content_items: usize,
    pub metadata_records: usize,
    /// Content files nobody describes, `(id, path)` sorted by id
    pub content_without_metadata: Vec<(String, PathBuf)>,
    /// Records without a content file, `(id, name)` sorted by id
    pub metadata_without_content: Vec<(String, String)>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.content_without_metadata.is_empty() && self.metadata_without_content.is_empty()
    }
}

/// Compare the content index against the metadata records
pub fn consistency_report(
    content: &ContentIndex,
    records: &HashMap<String, PhotoRecord>,
) -> ConsistencyReport {
    let mut content_without_metadata: Vec<(String, PathBuf)> = content
        .items()
        .filter(|item| !records.contains_key(&item.id))
        .map(|item| (item.id.clone(), item.path.clone()))
        .collect();
    content_without_metadata.sort();

    let mut metadata_without_content: Vec<(String, String)> = records
        .values()
        .filter(|record| !content.contains(&record.id))
        .map(|record| (record.id.clone(), record.name.clone()))
        .collect();
    metadata_without_content.sort();

    ConsistencyReport {
        content_items: content.len(),
        metadata_records: records.len(),
        content_without_metadata,
        metadata_without_content,
    }
}

/// A planned album none of whose photos has a content file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumWithoutContent {
    pub id: String,
    pub name: String,
    pub target_path: PathBuf,
    /// Photos the album lists, all of them missing
    pub photos: usize,
}

/// Real albums that will end up as empty folders.
///
/// Usually a sign of an incomplete download. The uncategorized album is
/// not reported.
pub fn albums_without_content(plan: &TransferPlan, content: &ContentIndex) -> Vec<AlbumWithoutContent> {
    plan.albums
        .iter()
        .filter(|album| !album.is_uncategorized())
        .filter(|album| !album.photos.iter().any(|photo| content.contains(&photo.id)))
        .map(|album| AlbumWithoutContent {
            id: album.id.clone(),
            name: album.name.clone(),
            target_path: album.target_path.clone(),
            photos: album.photos.len(),
        })
        .collect()
}

/// A photo referenced by more than one album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAlbumPhoto {
    pub photo_id: String,
    /// Album titles in export order
    pub albums: Vec<String>,
}

/// Photos that appear in several albums, in order of first appearance
pub fn multi_album_photos(albums: &[AlbumRecord]) -> Vec<MultiAlbumPhoto> {
    let mut order: Vec<&str> = Vec::new();
    let mut appearances: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, album) in albums.iter().enumerate() {
        for photo_id in album.photo_ids.iter().map(String::as_str) {
            let in_albums = appearances.entry(photo_id).or_insert_with(|| {
                order.push(photo_id);
                Vec::new()
            });
            if in_albums.last() != Some(&index) {
                in_albums.push(index);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let in_albums = appearances.remove(id)?;
            (in_albums.len() > 1).then(|| MultiAlbumPhoto {
                photo_id: id.to_string(),
                albums: in_albums.iter().map(|&i| albums[i].title.clone()).collect(),
            })
        })
        .collect()
}

/// A distinct tag and whether the filename encoding drops it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag: String,
    pub photos: usize,
    pub ignored: bool,
}

/// Every distinct raw tag, sorted
pub fn distinct_tags(records: &HashMap<String, PhotoRecord>) -> Vec<TagUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records.values() {
        for tag in &record.tags {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }

    let mut tags: Vec<TagUsage> = counts
        .into_iter()
        .map(|(tag, photos)| TagUsage {
            tag: tag.to_string(),
            photos,
            ignored: is_ignored_tag(tag),
        })
        .collect();
    tags.sort_by(|a, b| a.tag.cmp(&b.tag));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::ContentItem;

    fn record(id: &str, tags: &[&str]) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            name: format!("photo {}", id),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn album(title: &str, ids: &[&str]) -> AlbumRecord {
        AlbumRecord {
            id: title.to_lowercase(),
            title: title.to_string(),
            photo_ids: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn reports_both_directions_of_mismatch() {
        let content = ContentIndex::from_items(
            ["a_1.jpg", "b_2.jpg"]
                .iter()
                .map(|n| ContentItem::from_path(format!("/export/{}", n)).unwrap()),
        );
        let records: HashMap<_, _> = [record("2", &[]), record("3", &[])]
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        let report = consistency_report(&content, &records);

        assert!(!report.is_consistent());
        assert_eq!(report.content_without_metadata.len(), 1);
        assert_eq!(report.content_without_metadata[0].0, "1");
        assert_eq!(report.metadata_without_content, vec![("3".to_string(), "photo 3".to_string())]);
    }

    #[test]
    fn flags_albums_whose_content_is_all_missing() {
        use crate::core::structure::AlbumStructurePlanner;

        let records: HashMap<_, _> = [record("1", &[]), record("2", &[]), record("3", &[])]
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        let albums = vec![
            album("Partial", &["1", "2"]),
            album("Missing", &["2", "3"]),
            album("Empty", &[]),
        ];
        let content = ContentIndex::from_items([ContentItem::from_path("/export/a_1.jpg").unwrap()]);
        let plan = AlbumStructurePlanner::new("/dest")
            .plan(&albums, &records, &content)
            .unwrap();

        let flagged = albums_without_content(&plan, &content);

        let names: Vec<&str> = flagged.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Missing", "Empty"]);
        assert_eq!(flagged[0].photos, 2);
        assert_eq!(flagged[0].target_path, PathBuf::from("/dest/UNKNOWN/Missing"));
    }

    #[test]
    fn finds_photos_in_multiple_albums() {
        let albums = vec![
            album("Beach", &["1", "2", "2"]),
            album("Family", &["2", "3"]),
            album("Best", &["2", "1"]),
        ];

        let multi = multi_album_photos(&albums);

        assert_eq!(multi.len(), 2);
        assert_eq!(multi[0].photo_id, "1");
        assert_eq!(multi[0].albums, vec!["Beach", "Best"]);
        assert_eq!(multi[1].albums, vec!["Beach", "Family", "Best"]);
    }

    #[test]
    fn lists_distinct_tags_with_ignore_flag() {
        let records: HashMap<_, _> = [record("1", &["sea", "square"]), record("2", &["sea"])]
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        let tags = distinct_tags(&records);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], TagUsage { tag: "sea".to_string(), photos: 2, ignored: false });
        assert!(tags[1].ignored);
    }
}
