//! State management for the album browser.

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::services::ambient_service::Theme;
use crate::services::navigation_service;

pub mod listing;
pub mod location;
pub mod view_state;

pub use listing::{AlbumListing, SortBy};
pub use location::Location;
pub use view_state::{Snapshot, View, ViewState};

/// Application-wide state container, owned by the controller.
pub struct AppState {
    pub catalog: Catalog,
    pub view: ViewState,
    /// Album order currently shown on the index.
    pub listing: AlbumListing,
    pub settings: Settings,
    pub theme: Theme,
    /// Whether the host reports the page as fullscreen.
    pub fullscreen: bool,
}

impl AppState {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self {
            catalog,
            view: ViewState::new(),
            listing: AlbumListing::default(),
            settings,
            theme: Theme::Light,
            fullscreen: false,
        }
    }

    /// Listing positions matching the current search query.
    pub fn visible_albums(&self) -> Vec<usize> {
        self.listing.visible(&self.catalog, self.view.search_query())
    }

    pub fn grid_columns(&self) -> usize {
        navigation_service::grid_columns(self.settings.viewport_width)
    }

    /// Id of the selected album on the index, if any.
    pub fn selected_album_id(&self) -> Option<&str> {
        self.view
            .selected_album_index()
            .and_then(|position| self.listing.get(position))
    }
}
