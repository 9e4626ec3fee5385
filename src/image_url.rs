//! Image CDN URL scheme.
//!
//! `<cdn>/tr:w-<width>,h-<height>,q-<quality>,f-<format><path>`

use crate::catalog::{Album, Photo};
use crate::config::{DEFAULT_IMAGE_FORMAT, DEFAULT_IMAGE_QUALITY, PRELOAD_AHEAD};
use crate::state::location::{decode_component, encode_component};

/// Widths offered to the browser for the full-size viewer image.
pub const VIEWER_WIDTHS: [u32; 3] = [800, 1200, 1920];
/// Widths offered for grid cover images.
pub const COVER_WIDTHS: [u32; 4] = [200, 400, 600, 800];
/// Quality of grid covers and overlay thumbnails.
pub const THUMBNAIL_QUALITY: u32 = 80;
/// Width of the plain `src` of a grid cover.
const COVER_FALLBACK_WIDTH: u32 = 400;
/// Width of an overlay thumbnail.
const THUMBNAIL_WIDTH: u32 = 200;
/// Widths prefetched when hovering an album.
pub const PREFETCH_WIDTHS: [u32; 5] = [800, 1200, 1920, 2560, 3840];

/// CDN transformation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u32,
    pub format: String,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: DEFAULT_IMAGE_QUALITY,
            format: DEFAULT_IMAGE_FORMAT.to_string(),
        }
    }
}

impl Transform {
    pub fn width(width: u32, quality: u32) -> Self {
        Self {
            width: Some(width),
            quality,
            ..Self::default()
        }
    }
}

/// Site-relative path of a photo: `/albums/<encoded id>/<filename>`.
pub fn photo_path(album_id: &str, photo: &Photo) -> String {
    format!("/albums/{}/{}", encode_component(album_id), photo.filename())
}

/// Splits a photo path back into the album id and the file name.
pub fn split_photo_path(path: &str) -> Option<(String, &str)> {
    let (encoded, filename) = path.strip_prefix("/albums/")?.split_once('/')?;
    if filename.is_empty() {
        return None;
    }
    Some((decode_component(encoded)?, filename))
}

/// Full CDN URL for a path.
pub fn image_url(cdn_base: &str, path: &str, transform: &Transform) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(width) = transform.width {
        parts.push(format!("w-{}", width));
    }
    if let Some(height) = transform.height {
        parts.push(format!("h-{}", height));
    }
    parts.push(format!("q-{}", transform.quality));
    parts.push(format!("f-{}", transform.format));

    format!("{}/tr:{}{}", cdn_base, parts.join(","), path)
}

/// Responsive `srcset` attribute for the given widths.
pub fn srcset(cdn_base: &str, path: &str, widths: &[u32], quality: u32) -> String {
    widths
        .iter()
        .map(|&width| {
            format!(
                "{} {}w",
                image_url(cdn_base, path, &Transform::width(width, quality)),
                width
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `src` and `srcset` of an album's grid cover, its first photo.
pub fn cover_image(cdn_base: &str, album_id: &str, album: &Album) -> Option<(String, String)> {
    let path = photo_path(album_id, album.cover()?);
    Some((
        image_url(
            cdn_base,
            &path,
            &Transform::width(COVER_FALLBACK_WIDTH, THUMBNAIL_QUALITY),
        ),
        srcset(cdn_base, &path, &COVER_WIDTHS, THUMBNAIL_QUALITY),
    ))
}

/// URL of a photo's thumbnail in the overlay.
pub fn thumbnail_url(cdn_base: &str, album_id: &str, photo: &Photo) -> String {
    image_url(
        cdn_base,
        &photo_path(album_id, photo),
        &Transform::width(THUMBNAIL_WIDTH, THUMBNAIL_QUALITY),
    )
}

/// Paths of the photos after `current_photo` (1-based) worth preloading.
pub fn preload_paths(album_id: &str, album: &Album, current_photo: usize) -> Vec<String> {
    album
        .photos
        .iter()
        .skip(current_photo)
        .take(PRELOAD_AHEAD)
        .map(|photo| photo_path(album_id, photo))
        .collect()
}

/// Paths of the first photos of an album, prefetched on hover.
pub fn prefetch_paths(album_id: &str, album: &Album) -> Vec<String> {
    album
        .photos
        .iter()
        .take(3)
        .map(|photo| photo_path(album_id, photo))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CDN: &str = "https://ik.example.com/me";

    fn album(count: usize) -> Album {
        Album {
            name: "Trip".into(),
            photos: (1..=count).map(|i| Photo::Filename(format!("{i}.jpg"))).collect(),
            created: None,
        }
    }

    #[test]
    fn url_omits_unset_dimensions() {
        assert_eq!(
            image_url(CDN, "/albums/a/1.jpg", &Transform::default()),
            "https://ik.example.com/me/tr:q-85,f-auto/albums/a/1.jpg"
        );
        let t = Transform {
            width: Some(400),
            height: Some(300),
            quality: 80,
            format: "webp".into(),
        };
        assert_eq!(
            image_url(CDN, "/p.jpg", &t),
            "https://ik.example.com/me/tr:w-400,h-300,q-80,f-webp/p.jpg"
        );
    }

    #[test]
    fn srcset_lists_each_width() {
        assert_eq!(
            srcset("", "/p.jpg", &[800, 1200], 85),
            "/tr:w-800,q-85,f-auto/p.jpg 800w, /tr:w-1200,q-85,f-auto/p.jpg 1200w"
        );
    }

    #[test]
    fn photo_path_encodes_album_id() {
        let photo = Photo::Filename("IMG 1.jpg".into());
        assert_eq!(photo_path("New York", &photo), "/albums/New%20York/IMG 1.jpg");
    }

    #[test]
    fn photo_path_splits_back() {
        let path = photo_path("New York", &Photo::Filename("IMG 1.jpg".into()));
        assert_eq!(split_photo_path(&path), Some(("New York".to_string(), "IMG 1.jpg")));
        assert_eq!(split_photo_path("/albums/a/"), None);
        assert_eq!(split_photo_path("/other/a/1.jpg"), None);
    }

    #[test]
    fn preloads_up_to_five_following_photos() {
        let album = album(8);
        assert_eq!(
            preload_paths("a", &album, 1),
            vec![
                "/albums/a/2.jpg",
                "/albums/a/3.jpg",
                "/albums/a/4.jpg",
                "/albums/a/5.jpg",
                "/albums/a/6.jpg"
            ]
        );
        assert_eq!(preload_paths("a", &album, 7), vec!["/albums/a/8.jpg"]);
        assert!(preload_paths("a", &album, 8).is_empty());
    }

    #[test]
    fn cover_and_thumbnail_urls() {
        let (src, set) = cover_image(CDN, "a", &album(2)).unwrap();
        assert_eq!(src, "https://ik.example.com/me/tr:w-400,q-80,f-auto/albums/a/1.jpg");
        assert_eq!(set.matches("q-80").count(), 4);
        assert!(set.ends_with("/albums/a/1.jpg 800w"));
        assert_eq!(cover_image(CDN, "a", &album(0)), None);

        assert_eq!(
            thumbnail_url("", "a", &Photo::Filename("2.jpg".into())),
            "/tr:w-200,q-80,f-auto/albums/a/2.jpg"
        );
    }

    #[test]
    fn prefetches_first_three() {
        assert_eq!(prefetch_paths("a", &album(2)).len(), 2);
        assert_eq!(prefetch_paths("a", &album(9)).len(), 3);
    }
}
