//! Generates `albums.json` and per-album `photos.json` from a folder tree.
//!
//! Every sub-directory holding at least one image becomes an album. An
//! existing `photos.json` keeps its `created` date across regenerations.

use crate::catalog::{AlbumsManifest, Photo, PhotosManifest};
use crate::config::{ALBUMS_MANIFEST, PHOTOS_MANIFEST};
use crate::error::{AppError, Result};
use crate::file_utils;
use chrono::Local;
use log::{info, warn};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::Path;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Alphabetic}+").expect("valid regex"));

/// Turns a folder name into a display name: dashes become spaces and every
/// run of letters is capitalised (`"new-york-2024"` -> `"New York 2024"`).
pub fn display_name(folder: &str) -> String {
    let spaced = folder.replace('-', " ");
    WORD.replace_all(&spaced, |caps: &regex::Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect::<String>(),
            None => String::new(),
        }
    })
    .into_owned()
}

/// Current local time in the naive ISO-8601 form used for `created`.
fn now_timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Reads the `created` value of an existing manifest, if any.
fn existing_created(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<PhotosManifest>(&text) {
        Ok(manifest) => manifest.created,
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            None
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .map_err(|e| AppError::Manifest(format!("{}: {}", path.display(), e)))
}

/// Summary of one generated album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAlbum {
    pub id: String,
    pub photo_count: usize,
}

/// Writes `photos.json` for one album folder. Returns `None` when the folder
/// has no images.
fn generate_album(folder: &Path) -> Result<Option<GeneratedAlbum>> {
    let Some(id) = file_utils::file_name_str(folder).map(str::to_string) else {
        warn!("Skipping folder with a non UTF-8 name: {}", folder.display());
        return Ok(None);
    };

    let photos: Vec<Photo> = file_utils::scan_directory(folder)?
        .iter()
        .filter_map(|path| file_utils::file_name_str(path))
        .map(|name| Photo::Filename(name.to_string()))
        .collect();
    if photos.is_empty() {
        return Ok(None);
    }

    let manifest_path = folder.join(PHOTOS_MANIFEST);
    let created = existing_created(&manifest_path).unwrap_or_else(now_timestamp);
    let manifest = PhotosManifest {
        name: Some(display_name(&id)),
        photos,
        created: Some(created),
    };
    write_json(&manifest_path, &manifest)?;

    info!("Generated {}/{} with {} photos", id, PHOTOS_MANIFEST, manifest.photos.len());
    Ok(Some(GeneratedAlbum {
        id,
        photo_count: manifest.photos.len(),
    }))
}

/// Regenerates every manifest below `albums_dir` and returns the albums in
/// id order.
pub fn generate_manifests(albums_dir: &Path) -> Result<Vec<GeneratedAlbum>> {
    let folders = file_utils::scan_subdirectories(albums_dir)?;

    let results: Vec<Result<Option<GeneratedAlbum>>> =
        folders.par_iter().map(|folder| generate_album(folder)).collect();

    let mut albums = Vec::new();
    for result in results {
        if let Some(album) = result? {
            albums.push(album);
        }
    }
    albums.sort_by(|a, b| a.id.cmp(&b.id));

    let manifest = AlbumsManifest {
        albums: albums.iter().map(|a| a.id.clone()).collect(),
    };
    write_json(&albums_dir.join(ALBUMS_MANIFEST), &manifest)?;
    info!("Generated {} with {} albums", ALBUMS_MANIFEST, albums.len());

    Ok(albums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog_service::{DirectorySource, load_catalog};

    #[test]
    fn display_names_are_title_cased() {
        assert_eq!(display_name("new-york-2024"), "New York 2024");
        assert_eq!(display_name("PARIS"), "Paris");
        assert_eq!(display_name("rome_2nd-trip"), "Rome_2Nd Trip");
        assert_eq!(display_name("été-à-nice"), "Été À Nice");
    }

    #[test]
    fn generates_manifests_that_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for (folder, file) in [
            ("summer-trip", "b.jpg"),
            ("summer-trip", "a.JPG"),
            ("summer-trip", "notes.txt"),
            ("city", "x.webp"),
            ("no-photos", "readme.md"),
        ] {
            fs::create_dir_all(root.join(folder)).unwrap();
            fs::write(root.join(folder).join(file), b"x").unwrap();
        }

        let albums = generate_manifests(root).unwrap();
        assert_eq!(
            albums,
            vec![
                GeneratedAlbum {
                    id: "city".into(),
                    photo_count: 1,
                },
                GeneratedAlbum {
                    id: "summer-trip".into(),
                    photo_count: 2,
                },
            ]
        );
        assert!(!root.join("no-photos").join(PHOTOS_MANIFEST).exists());

        let catalog = load_catalog(&DirectorySource::new(root)).unwrap();
        let trip = catalog.get("summer-trip").unwrap();
        assert_eq!(trip.name, "Summer Trip");
        let names: Vec<_> = trip.photos.iter().map(Photo::filename).collect();
        assert_eq!(names, vec!["a.JPG", "b.jpg"]);
        assert!(trip.created_at().is_some());
    }

    #[test]
    fn keeps_existing_created_date() {
        let dir = tempfile::tempdir().unwrap();
        let album = dir.path().join("old");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("1.png"), b"x").unwrap();
        fs::write(
            album.join(PHOTOS_MANIFEST),
            r#"{"name": "Old", "photos": [], "created": "2019-07-04T08:00:00"}"#,
        )
        .unwrap();

        generate_manifests(dir.path()).unwrap();

        let text = fs::read_to_string(album.join(PHOTOS_MANIFEST)).unwrap();
        let manifest: PhotosManifest = serde_json::from_str(&text).unwrap();
        assert_eq!(manifest.created.as_deref(), Some("2019-07-04T08:00:00"));
        assert_eq!(manifest.photos, vec![Photo::Filename("1.png".into())]);
    }
}
