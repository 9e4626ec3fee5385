//! Loading the album catalog from a directory or over HTTP.
//!
//! The top-level `albums.json` must load; a broken per-album manifest only
//! drops that album.

use crate::catalog::{Album, AlbumsManifest, Catalog, PhotosManifest};
use crate::config::{ALBUMS_MANIFEST, HTTP_TIMEOUT_SECS, PHOTOS_MANIFEST};
use crate::error::CatalogError;
use crate::state::location::encode_component;
use log::{debug, error, info};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use ureq::Agent;
use url::Url;

/// Largest photo body accepted over HTTP.
const MAX_PHOTO_BYTES: u64 = 64 * 1024 * 1024;

/// Where catalog manifests and photos come from.
pub trait CatalogSource: Send + Sync {
    /// Human-readable location for log messages.
    fn describe(&self) -> String;

    /// Fetches `albums.json`.
    fn albums(&self) -> Result<AlbumsManifest, CatalogError>;

    /// Fetches `<id>/photos.json`.
    fn photos(&self, id: &str) -> Result<PhotosManifest, CatalogError>;

    /// Fetches the raw bytes of one photo.
    fn photo_bytes(&self, id: &str, filename: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Manifests stored on the local filesystem.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
        let location = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| CatalogError::fetch(&location, e))?;
        serde_json::from_str(&text).map_err(|e| CatalogError::parse(&location, e))
    }
}

/// An album id must name exactly one directory below the root.
fn is_plain_component(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !id.contains(['/', '\\'])
}

impl CatalogSource for DirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn albums(&self) -> Result<AlbumsManifest, CatalogError> {
        Self::read_json(&self.root.join(ALBUMS_MANIFEST))
    }

    fn photos(&self, id: &str) -> Result<PhotosManifest, CatalogError> {
        if !is_plain_component(id) {
            return Err(CatalogError::fetch(id, "album id is not a plain folder name"));
        }
        Self::read_json(&self.root.join(id).join(PHOTOS_MANIFEST))
    }

    fn photo_bytes(&self, id: &str, filename: &str) -> Result<Vec<u8>, CatalogError> {
        if !is_plain_component(id) || !is_plain_component(filename) {
            return Err(CatalogError::fetch(
                format!("{}/{}", id, filename),
                "not a plain file below the album folder",
            ));
        }
        let path = self.root.join(id).join(filename);
        fs::read(&path).map_err(|e| CatalogError::fetch(path.display().to_string(), e))
    }
}

/// Manifests served over HTTP below a base URL.
pub struct HttpSource {
    base: Url,
    agent: Agent,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self, CatalogError> {
        let mut base =
            Url::parse(base).map_err(|e| CatalogError::InvalidSource(format!("{}: {}", base, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into();

        Ok(Self { base, agent })
    }

    fn url_for(&self, relative: &str) -> Result<Url, CatalogError> {
        self.base
            .join(relative)
            .map_err(|e| CatalogError::InvalidSource(format!("{}: {}", relative, e)))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| CatalogError::fetch(url.as_str(), e))?;
        response
            .body_mut()
            .read_json::<T>()
            .map_err(|e| CatalogError::parse(url.as_str(), e))
    }
}

impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    fn albums(&self) -> Result<AlbumsManifest, CatalogError> {
        let url = self.url_for(ALBUMS_MANIFEST)?;
        self.get_json(&url)
    }

    fn photos(&self, id: &str) -> Result<PhotosManifest, CatalogError> {
        let url = self.url_for(&format!("{}/{}", encode_component(id), PHOTOS_MANIFEST))?;
        self.get_json(&url)
    }

    fn photo_bytes(&self, id: &str, filename: &str) -> Result<Vec<u8>, CatalogError> {
        let url = self.url_for(&format!(
            "{}/{}",
            encode_component(id),
            encode_component(filename)
        ))?;
        debug!("GET {}", url);
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| CatalogError::fetch(url.as_str(), e))?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_PHOTO_BYTES)
            .read_to_vec()
            .map_err(|e| CatalogError::fetch(url.as_str(), e))
    }
}

/// Picks an HTTP source for `http(s)://` locations and a directory otherwise.
pub fn open_source(location: &str) -> Result<Box<dyn CatalogSource>, CatalogError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        let root = PathBuf::from(location);
        if !root.is_dir() {
            return Err(CatalogError::InvalidSource(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Box::new(DirectorySource::new(root)))
    }
}

/// Loads the whole catalog. Per-album manifests are fetched in parallel and
/// kept in `albums.json` order; albums that fail to load are logged and
/// skipped.
pub fn load_catalog(source: &dyn CatalogSource) -> Result<Catalog, CatalogError> {
    let start = Instant::now();
    let manifest = source.albums()?;

    let loaded: Vec<Option<(String, Album)>> = manifest
        .albums
        .par_iter()
        .map(|id| match source.photos(id) {
            Ok(photos) => Some((id.clone(), Album::from_manifest(id, photos))),
            Err(e) => {
                error!("Failed to load album {}: {}", id, e);
                None
            }
        })
        .collect();

    let catalog: Catalog = loaded.into_iter().flatten().collect();
    info!(
        "Loaded {} of {} albums from {} in {:?}",
        catalog.len(),
        manifest.albums.len(),
        source.describe(),
        start.elapsed()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Photo;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn loads_albums_in_manifest_order_and_skips_broken_ones() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "albums.json", r#"{"albums": ["zeta", "broken", "missing", "alpha"]}"#);
        write(
            root,
            "zeta/photos.json",
            r#"{"name": "Zeta", "created": "2024-01-01T00:00:00", "photos": ["1.jpg", {"filename": "2.jpg", "width": 3, "height": 4}]}"#,
        );
        write(root, "broken/photos.json", "{ not json");
        write(root, "alpha/photos.json", r#"{"photos": ["a.jpg"]}"#);

        let catalog = load_catalog(&DirectorySource::new(root)).unwrap();

        let ids: Vec<_> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
        let zeta = catalog.get("zeta").unwrap();
        assert_eq!(zeta.name, "Zeta");
        assert_eq!(zeta.photos[1].dimensions(), Some((3, 4)));
        assert_eq!(catalog.get("alpha").unwrap().name, "alpha");
        assert_eq!(catalog.get("alpha").unwrap().photos, vec![Photo::Filename("a.jpg".into())]);
    }

    #[test]
    fn missing_top_level_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&DirectorySource::new(dir.path())).unwrap_err();
        assert!(matches!(err, CatalogError::Fetch { .. }), "{err}");
    }

    #[test]
    fn malformed_top_level_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "albums.json", r#"{"albums": "nope"}"#);
        let err = load_catalog(&DirectorySource::new(dir.path())).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }), "{err}");
    }

    #[test]
    fn directory_source_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        for id in ["../etc", "a/b", "..", ""] {
            assert!(source.photos(id).is_err(), "{id}");
        }
        assert!(source.photo_bytes("trip", "../albums.json").is_err());
    }

    #[test]
    fn directory_source_reads_photo_bytes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "trip/1.jpg", "pixels");
        let source = DirectorySource::new(dir.path());
        assert_eq!(source.photo_bytes("trip", "1.jpg").unwrap(), b"pixels");
        assert!(matches!(
            source.photo_bytes("trip", "2.jpg"),
            Err(CatalogError::Fetch { .. })
        ));
    }

    #[test]
    fn http_source_builds_encoded_urls() {
        let source = HttpSource::new("https://example.com/site/albums").unwrap();
        assert_eq!(source.describe(), "https://example.com/site/albums/");
        assert_eq!(
            source.url_for(ALBUMS_MANIFEST).unwrap().as_str(),
            "https://example.com/site/albums/albums.json"
        );
        let url = source
            .url_for(&format!("{}/{}", encode_component("New York"), PHOTOS_MANIFEST))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/site/albums/New%20York/photos.json");
    }

    #[test]
    fn open_source_picks_by_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let local = open_source(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(local.describe(), dir.path().display().to_string());

        assert!(open_source("https://example.com/albums/").is_ok());
        assert!(open_source("/no/such/dir/anywhere").is_err());
    }
}
