//! Grouped page properties derived from the application state.
//!
//! Instead of the host asking for the title, Open Graph tags and counters one
//! by one, these helpers compute each related group at once.

use crate::catalog::{Album, Photo};
use crate::image_url::{self, Transform};
use crate::state::{AppState, View};

/// Width of the Open Graph preview image.
pub const OG_IMAGE_WIDTH: u32 = 1200;
/// Height used when a photo's dimensions are unknown.
pub const OG_DEFAULT_HEIGHT: u32 = 630;
const OG_IMAGE_QUALITY: u32 = 85;

/// Title and Open Graph properties of the current page.
///
/// Groups: title, og:title, og:image, og:image:width, og:image:height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    /// Empty on the index.
    pub og_image: String,
    pub og_image_width: u32,
    pub og_image_height: u32,
}

/// Scales photo dimensions down to the preview width, never up.
fn og_dimensions(photo: &Photo) -> (u32, u32) {
    match photo.dimensions() {
        Some((width, height)) => {
            let scale = (f64::from(OG_IMAGE_WIDTH) / f64::from(width)).min(1.0);
            (
                (f64::from(width) * scale).round() as u32,
                (f64::from(height) * scale).round() as u32,
            )
        }
        None => (OG_IMAGE_WIDTH, OG_DEFAULT_HEIGHT),
    }
}

/// Computes the metadata for whatever page is showing.
pub fn page_metadata(state: &AppState) -> PageMetadata {
    let site_title = &state.settings.site_title;
    let index = PageMetadata {
        title: site_title.clone(),
        og_image: String::new(),
        og_image_width: OG_IMAGE_WIDTH,
        og_image_height: OG_DEFAULT_HEIGHT,
    };

    let Some((id, album)) = current_album(state) else {
        return index;
    };
    let title = format!("{} | {}", album.name, site_title);

    match album.photo(state.view.current_photo()) {
        Some(photo) => {
            let path = image_url::photo_path(id, photo);
            let (og_image_width, og_image_height) = og_dimensions(photo);
            PageMetadata {
                title,
                og_image: image_url::image_url(
                    &state.settings.cdn_base,
                    &path,
                    &Transform::width(OG_IMAGE_WIDTH, OG_IMAGE_QUALITY),
                ),
                og_image_width,
                og_image_height,
            }
        }
        None => PageMetadata { title, ..index },
    }
}

fn current_album(state: &AppState) -> Option<(&str, &Album)> {
    if state.view.view() != View::Viewer {
        return None;
    }
    let id = state.view.current_album()?;
    state.catalog.get(id).map(|album| (id, album))
}

/// Viewer counter, e.g. `(3 / 12)`. `None` on the index.
pub fn photo_counter(state: &AppState) -> Option<String> {
    current_album(state)
        .map(|(_, album)| format!("({} / {})", state.view.current_photo(), album.photo_count()))
}

/// Index header counts.
///
/// Groups: album count, total photo count
pub fn index_counts(state: &AppState) -> (usize, usize) {
    (state.catalog.len(), state.catalog.total_photos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Settings;

    fn state() -> AppState {
        let mut catalog = Catalog::new();
        catalog.insert(
            "trip",
            Album {
                name: "Summer Trip".into(),
                photos: vec![
                    Photo::Detailed {
                        filename: "wide.jpg".into(),
                        width: Some(4000),
                        height: Some(3000),
                    },
                    Photo::Detailed {
                        filename: "small.jpg".into(),
                        width: Some(800),
                        height: Some(600),
                    },
                    Photo::Filename("plain.jpg".into()),
                ],
                created: None,
            },
        );
        let settings = Settings {
            cdn_base: "https://cdn.example".into(),
            site_title: "Albums by Me".into(),
            ..Settings::default()
        };
        AppState::new(catalog, settings)
    }

    #[test]
    fn index_metadata() {
        let state = state();
        let meta = page_metadata(&state);
        assert_eq!(meta.title, "Albums by Me");
        assert_eq!(meta.og_image, "");
        assert_eq!((meta.og_image_width, meta.og_image_height), (1200, 630));
        assert_eq!(photo_counter(&state), None);
        assert_eq!(index_counts(&state), (1, 3));
    }

    #[test]
    fn viewer_metadata_scales_dimensions() {
        let mut state = state();
        state.view.parse_location("trip/1", &state.catalog);

        let meta = page_metadata(&state);
        assert_eq!(meta.title, "Summer Trip | Albums by Me");
        assert_eq!(
            meta.og_image,
            "https://cdn.example/tr:w-1200,q-85,f-auto/albums/trip/wide.jpg"
        );
        assert_eq!((meta.og_image_width, meta.og_image_height), (1200, 900));
        assert_eq!(photo_counter(&state).as_deref(), Some("(1 / 3)"));

        state.view.parse_location("trip/2", &state.catalog);
        let meta = page_metadata(&state);
        assert_eq!((meta.og_image_width, meta.og_image_height), (800, 600));

        state.view.parse_location("trip/3", &state.catalog);
        let meta = page_metadata(&state);
        assert_eq!((meta.og_image_width, meta.og_image_height), (1200, 630));
    }
}
