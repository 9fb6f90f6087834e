//! Plan types produced by the album structure planner.

use super::PhotoDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Id of the synthetic album collecting photos no album references
pub const UNCATEGORIZED_ALBUM_ID: &str = "UNCATEGORIZED";
pub const UNCATEGORIZED_ALBUM_NAME: &str = "Uncategorized Photos";
pub const UNCATEGORIZED_FOLDER: &str = "Uncategorized_Photos";

/// Year segment of albums without a single dated photo
pub const UNKNOWN_YEAR: &str = "UNKNOWN";

/// One target folder of the organized tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDescriptor {
    pub id: String,
    /// Album title as exported, unsanitized
    pub name: String,
    /// Earliest capture year, `UNKNOWN`, or `None` for the uncategorized album
    pub year: Option<String>,
    pub target_path: PathBuf,
    /// Photos in album order, at most once each
    pub photos: Vec<PhotoDescriptor>,
}

impl AlbumDescriptor {
    pub fn is_uncategorized(&self) -> bool {
        self.id == UNCATEGORIZED_ALBUM_ID && self.year.is_none()
    }
}

/// Where one photo ends up inside one album
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub album: &'a AlbumDescriptor,
    pub photo: &'a PhotoDescriptor,
}

impl Placement<'_> {
    pub fn destination(&self) -> PathBuf {
        self.album.target_path.join(&self.photo.destination_file_name)
    }
}

/// Every album a photo appears in, in album processing order.
///
/// The first placement receives the moved file, the rest receive copies.
#[derive(Debug, Clone)]
pub struct PhotoPlacements<'a> {
    pub photo_id: &'a str,
    pub placements: Vec<Placement<'a>>,
}

impl<'a> PhotoPlacements<'a> {
    pub fn move_target(&self) -> Option<&Placement<'a>> {
        self.placements.first()
    }

    pub fn copy_targets(&self) -> &[Placement<'a>] {
        self.placements.get(1..).unwrap_or_default()
    }
}

/// The complete target layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferPlan {
    pub destination_root: PathBuf,
    /// Albums in processing order, uncategorized last
    pub albums: Vec<AlbumDescriptor>,
}

impl TransferPlan {
    /// Group the plan by photo, photos ordered by first appearance
    pub fn photo_to_albums(&self) -> Vec<PhotoPlacements<'_>> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut result: Vec<PhotoPlacements<'_>> = Vec::new();

        for album in &self.albums {
            for photo in &album.photos {
                let placement = Placement { album, photo };
                match positions.get(photo.id.as_str()) {
                    Some(&pos) => result[pos].placements.push(placement),
                    None => {
                        positions.insert(photo.id.as_str(), result.len());
                        result.push(PhotoPlacements {
                            photo_id: photo.id.as_str(),
                            placements: vec![placement],
                        });
                    }
                }
            }
        }
        result
    }

    pub fn album(&self, id: &str) -> Option<&AlbumDescriptor> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn uncategorized(&self) -> Option<&AlbumDescriptor> {
        self.albums.iter().find(|a| a.is_uncategorized())
    }

    /// Number of distinct photos in the plan
    pub fn photo_count(&self) -> usize {
        self.photo_to_albums().len()
    }

    /// Number of file placements (moves plus copies)
    pub fn placement_count(&self) -> usize {
        self.albums.iter().map(|a| a.photos.len()).sum()
    }
}
