//! What the browser is showing and how it maps to the URL fragment.

use crate::catalog::Catalog;
use crate::services::navigation_service::{self, Axis, Direction};
use crate::state::listing::SortBy;
use crate::state::location::Location;
use log::debug;

/// Top-level page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Index,
    Viewer,
}

/// The part of the view state persisted in the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub view: View,
    pub album: Option<String>,
    pub photo: usize,
}

/// View state of the browser. Every mutation goes through a method so the
/// album/photo invariants hold at all times:
///
/// - `current_album` is `Some` only in [`View::Viewer`].
/// - `current_photo` is at least 1 and never exceeds the album's photo count.
/// - the overlay selection, when set, lies inside `[1, photo_count]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    view: View,
    current_album: Option<String>,
    current_photo: usize,
    sort_by: SortBy,
    search_query: String,
    selected_album_index: Option<usize>,
    selected_overlay_index: Option<usize>,
    overlay_open: bool,
    nav_visible: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: View::Index,
            current_album: None,
            current_photo: 1,
            sort_by: SortBy::default(),
            search_query: String::new(),
            selected_album_index: None,
            selected_overlay_index: None,
            overlay_open: false,
            nav_visible: true,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn current_album(&self) -> Option<&str> {
        self.current_album.as_deref()
    }

    pub fn current_photo(&self) -> usize {
        self.current_photo
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_album_index(&self) -> Option<usize> {
        self.selected_album_index
    }

    pub fn selected_overlay_index(&self) -> Option<usize> {
        self.selected_overlay_index
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn nav_visible(&self) -> bool {
        self.nav_visible
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            view: self.view,
            album: self.current_album.clone(),
            photo: self.current_photo,
        }
    }

    /// Photo count of the open album, 0 on the index.
    pub fn photo_count(&self, catalog: &Catalog) -> usize {
        self.current_album
            .as_deref()
            .and_then(|id| catalog.photo_count(id))
            .unwrap_or(0)
    }

    pub fn is_first_photo(&self) -> bool {
        self.current_photo <= 1
    }

    pub fn is_last_photo(&self, catalog: &Catalog) -> bool {
        self.current_photo >= self.photo_count(catalog)
    }

    /// Applies a location fragment.
    ///
    /// An empty fragment always returns to the index. A fragment naming a
    /// known album and a positive photo number opens the viewer with the
    /// number clamped to the album. Anything else leaves the state as it
    /// was. Returns whether the persisted part of the state changed; when it
    /// did, the overlay is closed.
    pub fn parse_location(&mut self, fragment: &str, catalog: &Catalog) -> bool {
        let before = self.snapshot();

        match Location::parse(fragment) {
            Some(Location::Index) => {
                self.view = View::Index;
                self.current_album = None;
                self.current_photo = 1;
                self.selected_album_index = None;
            }
            Some(Location::Photo { album, number }) if number > 0 => {
                match catalog.photo_count(&album) {
                    Some(count) => {
                        let number = usize::try_from(number).unwrap_or(usize::MAX);
                        self.current_photo = number.min(count).max(1);
                        self.current_album = Some(album);
                        self.view = View::Viewer;
                    }
                    None => debug!("Ignoring location for unknown album: {:?}", album),
                }
            }
            _ => debug!("Ignoring malformed location: {:?}", fragment),
        }

        let changed = self.snapshot() != before;
        if changed {
            self.close_overlay();
        }
        changed
    }

    /// Location describing the current state.
    pub fn location(&self) -> Location {
        match (self.view, &self.current_album) {
            (View::Viewer, Some(album)) => Location::Photo {
                album: album.clone(),
                number: self.current_photo as u64,
            },
            _ => Location::Index,
        }
    }

    /// Fragment to write for the current state (without the `#`).
    pub fn write_location(&self) -> String {
        self.location().to_string()
    }

    /// Opens an album at its first photo. Unknown ids are ignored.
    pub fn open_album(&mut self, id: &str, catalog: &Catalog) -> bool {
        if !catalog.contains(id) {
            debug!("Cannot open unknown album: {:?}", id);
            return false;
        }
        self.current_album = Some(id.to_string());
        self.current_photo = 1;
        self.view = View::Viewer;
        self.nav_visible = true;
        self.close_overlay();
        true
    }

    pub fn back_to_index(&mut self) {
        self.view = View::Index;
        self.current_album = None;
        self.current_photo = 1;
        self.selected_album_index = None;
        self.nav_visible = true;
        self.overlay_open = false;
        self.selected_overlay_index = None;
    }

    /// Advances one photo. At the last photo nothing happens; the caller
    /// decides whether to leave the album instead.
    pub fn next_photo(&mut self, catalog: &Catalog) -> bool {
        if self.view == View::Viewer && self.current_photo < self.photo_count(catalog) {
            self.current_photo += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one photo. At the first photo nothing happens.
    pub fn previous_photo(&mut self) -> bool {
        if self.view == View::Viewer && self.current_photo > 1 {
            self.current_photo -= 1;
            true
        } else {
            false
        }
    }

    pub fn first_photo(&mut self) -> bool {
        if self.view == View::Viewer {
            self.current_photo = 1;
            true
        } else {
            false
        }
    }

    /// Jumps to a 1-based photo number, clamped to the album.
    pub fn show_photo(&mut self, number: usize, catalog: &Catalog) -> bool {
        let count = self.photo_count(catalog);
        if self.view != View::Viewer || count == 0 {
            return false;
        }
        self.current_photo = number.clamp(1, count);
        true
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
    }

    pub fn select_album(&mut self, position: Option<usize>) {
        self.selected_album_index = position;
    }

    /// Moves the album selection across the visible grid.
    ///
    /// `visible` holds listing positions in display order. Without a
    /// selection, or when the selected album is filtered out, the first
    /// visible album is selected instead of moving.
    pub fn navigate_album_selection(
        &mut self,
        direction: Direction,
        axis: Axis,
        visible: &[usize],
        columns: usize,
    ) {
        let Some(&first) = visible.first() else {
            return;
        };

        let current = self
            .selected_album_index
            .and_then(|selected| visible.iter().position(|&p| p == selected));

        self.selected_album_index = Some(match current {
            None => first,
            Some(index) => {
                let target =
                    navigation_service::step_grid(index, visible.len(), columns, direction, axis);
                visible[target]
            }
        });
    }

    /// Opens the photo overlay with the current photo selected.
    pub fn open_overlay(&mut self) {
        self.overlay_open = true;
        self.selected_overlay_index = Some(self.current_photo);
    }

    pub fn close_overlay(&mut self) {
        self.overlay_open = false;
        self.selected_overlay_index = None;
    }

    /// Moves the overlay selection by one photo. Returns false when the move
    /// would leave the album.
    pub fn move_overlay_selection(&mut self, direction: Direction, catalog: &Catalog) -> bool {
        let count = self.photo_count(catalog);
        let Some(selected) = self.selected_overlay_index else {
            return false;
        };
        match navigation_service::step_overlay(selected, count, direction) {
            Some(next) => {
                self.selected_overlay_index = Some(next);
                true
            }
            None => false,
        }
    }

    /// Shows the overlay's selected photo and closes the overlay.
    pub fn confirm_overlay_selection(&mut self, catalog: &Catalog) -> bool {
        let count = self.photo_count(catalog);
        match self.selected_overlay_index {
            Some(selected) if selected >= 1 && selected <= count => {
                self.current_photo = selected;
                self.close_overlay();
                true
            }
            _ => false,
        }
    }

    pub fn set_nav_visible(&mut self, visible: bool) {
        self.nav_visible = visible;
    }
}
