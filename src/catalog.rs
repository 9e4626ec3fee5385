//! Album catalog data model and the JSON manifests it is loaded from.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A photo entry in `photos.json`: either a bare filename or an object with
/// optional pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Photo {
    Filename(String),
    Detailed {
        filename: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
}

impl Photo {
    pub fn filename(&self) -> &str {
        match self {
            Photo::Filename(filename) | Photo::Detailed { filename, .. } => filename,
        }
    }

    /// Width and height, only when both are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Photo::Detailed {
                width: Some(w),
                height: Some(h),
                ..
            } if *w > 0 && *h > 0 => Some((*w, *h)),
            _ => None,
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.dimensions().map(|(w, h)| h > w).unwrap_or(false)
    }
}

/// Top-level `albums.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumsManifest {
    pub albums: Vec<String>,
}

/// Per-album `photos.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotosManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// An album as held by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub name: String,
    pub photos: Vec<Photo>,
    pub created: Option<String>,
}

impl Album {
    /// Builds an album from its manifest; a missing name falls back to the id.
    pub fn from_manifest(id: &str, manifest: PhotosManifest) -> Self {
        Self {
            name: manifest.name.filter(|n| !n.is_empty()).unwrap_or_else(|| id.to_string()),
            photos: manifest.photos,
            created: manifest.created.filter(|c| !c.is_empty()),
        }
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Photo by 1-based number.
    pub fn photo(&self, number: usize) -> Option<&Photo> {
        number.checked_sub(1).and_then(|i| self.photos.get(i))
    }

    pub fn cover(&self) -> Option<&Photo> {
        self.photos.first()
    }

    /// Parsed creation time, if present and in a recognised format.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created.as_deref().and_then(parse_timestamp)
    }

    /// Creation time in milliseconds since the epoch; unknown dates sort as 0.
    pub fn sort_timestamp(&self) -> i64 {
        self.created_at()
            .map(|t| t.and_utc().timestamp_millis())
            .unwrap_or(0)
    }
}

/// Accepts RFC 3339, naive ISO-8601 date-times and bare dates.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Ordered mapping from album id to album.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(String, Album)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an album, replacing an existing one with the same id in place.
    pub fn insert(&mut self, id: impl Into<String>, album: Album) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&pos) => self.entries[pos].1 = album,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, album));
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Album> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn photo_count(&self, id: &str) -> Option<usize> {
        self.get(id).map(Album::photo_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Album)> {
        self.entries.iter().map(|(id, album)| (id.as_str(), album))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_photos(&self) -> usize {
        self.entries.iter().map(|(_, a)| a.photo_count()).sum()
    }
}

impl FromIterator<(String, Album)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Album)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (id, album) in iter {
            catalog.insert(id, album);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_accepts_both_json_shapes() {
        let photos: Vec<Photo> = serde_json::from_str(
            r#"["a.jpg", {"filename": "b.jpg", "width": 4000, "height": 3000}, {"filename": "c.jpg"}]"#,
        )
        .unwrap();

        assert_eq!(photos[0], Photo::Filename("a.jpg".into()));
        assert_eq!(photos[1].filename(), "b.jpg");
        assert_eq!(photos[1].dimensions(), Some((4000, 3000)));
        assert!(!photos[1].is_portrait());
        assert_eq!(photos[2].filename(), "c.jpg");
        assert_eq!(photos[2].dimensions(), None);
    }

    #[test]
    fn zero_dimensions_count_as_unknown() {
        let photo = Photo::Detailed {
            filename: "x.jpg".into(),
            width: Some(0),
            height: Some(10),
        };
        assert_eq!(photo.dimensions(), None);
    }

    #[test]
    fn album_name_defaults_to_id() {
        let manifest: PhotosManifest = serde_json::from_str(r#"{"photos": ["a.jpg"]}"#).unwrap();
        let album = Album::from_manifest("summer-2024", manifest);
        assert_eq!(album.name, "summer-2024");
        assert_eq!(album.photo_count(), 1);
        assert_eq!(album.created, None);
        assert_eq!(album.photo(1).map(Photo::filename), Some("a.jpg"));
        assert_eq!(album.photo(0), None);
        assert_eq!(album.photo(2), None);
    }

    #[test]
    fn timestamps_in_several_formats() {
        assert!(parse_timestamp("2024-05-01T12:00:00Z").is_some());
        assert!(parse_timestamp("2024-05-01T12:00:00+02:00").is_some());
        assert!(parse_timestamp("2024-05-01T12:00:00.123456").is_some());
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());

        let early = parse_timestamp("2024-05-01").unwrap();
        let late = parse_timestamp("2024-05-01T00:00:01").unwrap();
        assert!(early < late);
    }

    #[test]
    fn unknown_dates_sort_as_epoch() {
        let album = Album {
            name: "n".into(),
            photos: vec![],
            created: Some("not a date".into()),
        };
        assert_eq!(album.sort_timestamp(), 0);
    }

    #[test]
    fn catalog_keeps_insertion_order_and_replaces_in_place() {
        let album = |name: &str| Album {
            name: name.into(),
            photos: vec![Photo::Filename("1.jpg".into())],
            created: None,
        };
        let mut catalog = Catalog::new();
        catalog.insert("b", album("B"));
        catalog.insert("a", album("A"));
        catalog.insert("b", album("B2"));

        let ids: Vec<_> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(catalog.get("b").unwrap().name, "B2");
        assert_eq!(catalog.photo_count("a"), Some(1));
        assert_eq!(catalog.photo_count("zzz"), None);
        assert_eq!(catalog.total_photos(), 2);
    }
}
