//! Event handlers: the application controller.
//!
//! Every host callback (keys, gestures, clicks, location and theme changes,
//! finished image loads) arrives as an [`InputEvent`]. The controller
//! mutates the state and answers with the [`Effect`]s the host must carry
//! out, so all navigation rules live here and can be tested without a UI.

use crate::catalog::Catalog;
use crate::config::{
    AMBIENT_CACHE_CAPACITY, AMBIENT_TRANSITION, DEFAULT_IMAGE_QUALITY, MIN_SWIPE_DISTANCE,
    NAV_HIDE_DELAY_MS, PREVIOUS_CLICK_FRACTION, Settings,
};
use crate::image_cache::ImageCache;
use crate::image_loader::LoadedImage;
use crate::image_url::{self, PREFETCH_WIDTHS, Transform, VIEWER_WIDTHS};
use crate::services::ambient_service::{AmbientColor, Theme};
use crate::services::navigation_service::{Axis, Direction};
use crate::state::{AlbumListing, AppState, SortBy, View};
use crate::ui::ambient::AmbientLighting;
use crate::ui::input::{Effect, InputEvent, Key};
use crate::ui::load_tracker::{LoadTicket, LoadTracker};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// Width requested for the displayed photo.
const VIEWER_SRC_WIDTH: u32 = 1920;
/// Quality used for hover prefetches.
const PREFETCH_QUALITY: u32 = 100;

/// Owns all browser state and turns input events into effects.
pub struct App {
    state: AppState,
    ambient: AmbientLighting,
    loads: LoadTracker,
    colors: ImageCache,
    /// Bumped whenever the nav is shown; only the latest hide timer counts.
    nav_timer: u64,
    rng: StdRng,
}

impl App {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self::with_rng(catalog, settings, StdRng::from_os_rng())
    }

    /// Creates the controller with a given generator for random ordering.
    pub fn with_rng(catalog: Catalog, settings: Settings, mut rng: StdRng) -> Self {
        let mut state = AppState::new(catalog, settings);
        state.listing = AlbumListing::build(&state.catalog, state.view.sort_by(), &mut rng);
        Self {
            state,
            ambient: AmbientLighting::new(),
            loads: LoadTracker::new(),
            colors: ImageCache::new(AMBIENT_CACHE_CAPACITY),
            nav_timer: 0,
            rng,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn ambient(&self) -> &AmbientLighting {
        &self.ambient
    }

    /// Applies the initial location and renders the first page.
    pub fn start(&mut self, fragment: &str) -> Vec<Effect> {
        self.state.view.parse_location(fragment, &self.state.catalog);
        info!(
            "Starting at {:?} with {} albums",
            self.state.view.write_location(),
            self.state.catalog.len()
        );
        self.render()
    }

    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::Key(key) => match self.state.view.view() {
                View::Index => self.index_key(key),
                View::Viewer => self.viewer_key(key),
            },
            InputEvent::Swipe { dx, dy } => self.swipe(dx, dy),
            InputEvent::PhotoClick { fraction } => self.photo_click(fraction),
            InputEvent::BackgroundClick | InputEvent::NavHover => self.show_nav(),
            InputEvent::NavHideElapsed(timer) => self.hide_nav(timer),
            InputEvent::AlbumClick(id) => self.open_album(&id),
            InputEvent::AlbumHover(id) => self.prefetch(&id),
            InputEvent::AlbumNameClick => vec![Effect::ToggleFullscreen],
            InputEvent::BackClick => self.back_to_index(),
            InputEvent::CountClick => self.open_overlay(),
            InputEvent::BackdropClick => self.close_overlay(),
            InputEvent::ThumbnailClick(number) => self.thumbnail_click(number),
            InputEvent::SearchInput(query) => {
                self.state.view.set_search_query(query);
                vec![Effect::Render]
            }
            InputEvent::SortSelected(sort_by) => self.sort(sort_by),
            InputEvent::LocationChanged(fragment) => self.location_changed(&fragment),
            InputEvent::ThemeChanged(theme) => self.theme_changed(theme),
            InputEvent::Resize(width) => {
                self.state.settings.viewport_width = width;
                Vec::new()
            }
            InputEvent::ImageLoaded { ticket, image } => self.image_loaded(&ticket, &image),
            InputEvent::FullscreenChanged(fullscreen) => {
                self.state.fullscreen = fullscreen;
                Vec::new()
            }
            InputEvent::FullscreenRejected(reason) => {
                warn!("Could not change fullscreen: {}", reason);
                Vec::new()
            }
        }
    }

    fn index_key(&mut self, key: Key) -> Vec<Effect> {
        let step = match key {
            Key::ArrowRight => Some((Direction::Next, Axis::Horizontal)),
            Key::ArrowLeft => Some((Direction::Previous, Axis::Horizontal)),
            Key::ArrowDown => Some((Direction::Next, Axis::Vertical)),
            Key::ArrowUp => Some((Direction::Previous, Axis::Vertical)),
            _ => None,
        };
        if let Some((direction, axis)) = step {
            let visible = self.state.visible_albums();
            let columns = self.state.grid_columns();
            self.state
                .view
                .navigate_album_selection(direction, axis, &visible, columns);
            return vec![Effect::Render];
        }

        match key {
            Key::Enter => match self.state.selected_album_id().map(str::to_string) {
                Some(id) => self.open_album(&id),
                None => Vec::new(),
            },
            key if key.is_fullscreen() => vec![Effect::ToggleFullscreen],
            key if key.is_index() => self.back_to_index(),
            _ => Vec::new(),
        }
    }

    fn viewer_key(&mut self, key: Key) -> Vec<Effect> {
        let overlay_open = self.state.view.overlay_open();
        match key {
            Key::Space if overlay_open => self.close_overlay(),
            Key::Space => self.open_overlay(),
            Key::ArrowDown | Key::ArrowUp if overlay_open => {
                let direction = if key == Key::ArrowDown {
                    Direction::Next
                } else {
                    Direction::Previous
                };
                if self
                    .state
                    .view
                    .move_overlay_selection(direction, &self.state.catalog)
                {
                    overlay_selection_effects(self.state.view.selected_overlay_index())
                } else {
                    Vec::new()
                }
            }
            Key::Enter if overlay_open => {
                if self
                    .state
                    .view
                    .confirm_overlay_selection(&self.state.catalog)
                {
                    self.navigated()
                } else {
                    Vec::new()
                }
            }
            Key::ArrowRight => self.next_or_back(),
            Key::ArrowLeft => self.previous_or_back(),
            Key::ArrowDown => self.back_to_index(),
            Key::Escape if overlay_open => self.close_overlay(),
            Key::Escape if self.state.fullscreen => vec![Effect::ExitFullscreen],
            Key::Escape => self.back_to_index(),
            key if key.is_fullscreen() => vec![Effect::ToggleFullscreen],
            key if key.is_index() => self.back_to_index(),
            key if key.is_restart() => {
                self.state.view.first_photo();
                self.navigated()
            }
            _ => Vec::new(),
        }
    }

    fn swipe(&mut self, dx: f64, dy: f64) -> Vec<Effect> {
        if self.state.view.view() != View::Viewer || self.state.view.overlay_open() {
            return Vec::new();
        }

        if dx.abs() > dy.abs() {
            if dx.abs() <= MIN_SWIPE_DISTANCE {
                Vec::new()
            } else if dx > 0.0 {
                self.previous_or_back()
            } else {
                self.next_or_back()
            }
        } else if dy.abs() <= MIN_SWIPE_DISTANCE {
            Vec::new()
        } else if self.state.fullscreen {
            vec![Effect::ExitFullscreen]
        } else if dy < 0.0 {
            self.back_to_index()
        } else {
            Vec::new()
        }
    }

    fn photo_click(&mut self, fraction: f64) -> Vec<Effect> {
        if self.state.view.view() != View::Viewer {
            return Vec::new();
        }
        if fraction < PREVIOUS_CLICK_FRACTION {
            self.previous_or_back()
        } else {
            self.next_or_back()
        }
    }

    fn next_or_back(&mut self) -> Vec<Effect> {
        if self.state.view.is_last_photo(&self.state.catalog) {
            self.back_to_index()
        } else {
            self.state.view.next_photo(&self.state.catalog);
            self.navigated()
        }
    }

    fn previous_or_back(&mut self) -> Vec<Effect> {
        if self.state.view.is_first_photo() {
            self.back_to_index()
        } else {
            self.state.view.previous_photo();
            self.navigated()
        }
    }

    fn open_album(&mut self, id: &str) -> Vec<Effect> {
        if self.state.view.open_album(id, &self.state.catalog) {
            self.navigated()
        } else {
            Vec::new()
        }
    }

    fn back_to_index(&mut self) -> Vec<Effect> {
        self.state.view.back_to_index();
        self.navigated()
    }

    fn open_overlay(&mut self) -> Vec<Effect> {
        if self.state.view.view() != View::Viewer {
            return Vec::new();
        }
        self.state.view.open_overlay();
        overlay_selection_effects(self.state.view.selected_overlay_index())
    }

    fn close_overlay(&mut self) -> Vec<Effect> {
        if !self.state.view.overlay_open() {
            return Vec::new();
        }
        self.state.view.close_overlay();
        vec![Effect::Render]
    }

    fn thumbnail_click(&mut self, number: usize) -> Vec<Effect> {
        if !self.state.view.show_photo(number, &self.state.catalog) {
            return Vec::new();
        }
        self.state.view.close_overlay();
        self.navigated()
    }

    fn sort(&mut self, sort_by: SortBy) -> Vec<Effect> {
        self.state.view.set_sort_by(sort_by);
        self.state.listing = AlbumListing::build(&self.state.catalog, sort_by, &mut self.rng);
        self.state.view.select_album(None);
        debug!("Sorted {} albums by {}", self.state.listing.len(), sort_by);
        vec![Effect::Render]
    }

    fn show_nav(&mut self) -> Vec<Effect> {
        if self.state.view.view() != View::Viewer {
            return Vec::new();
        }
        self.state.view.set_nav_visible(true);
        self.nav_timer += 1;
        vec![
            Effect::ShowNav,
            Effect::ScheduleNavHide {
                timer: self.nav_timer,
                delay: Duration::from_millis(NAV_HIDE_DELAY_MS),
            },
        ]
    }

    fn hide_nav(&mut self, timer: u64) -> Vec<Effect> {
        if timer != self.nav_timer || self.state.view.view() != View::Viewer {
            return Vec::new();
        }
        self.state.view.set_nav_visible(false);
        vec![Effect::HideNav]
    }

    fn prefetch(&self, id: &str) -> Vec<Effect> {
        let Some(album) = self.state.catalog.get(id) else {
            return Vec::new();
        };
        let cdn = &self.state.settings.cdn_base;
        let srcsets: Vec<String> = image_url::prefetch_paths(id, album)
            .iter()
            .map(|path| image_url::srcset(cdn, path, &PREFETCH_WIDTHS, PREFETCH_QUALITY))
            .collect();
        if srcsets.is_empty() {
            Vec::new()
        } else {
            vec![Effect::Prefetch(srcsets)]
        }
    }

    /// Host notification that the location changed. A fragment that maps to
    /// the state already shown does nothing.
    fn location_changed(&mut self, fragment: &str) -> Vec<Effect> {
        if self
            .state
            .view
            .parse_location(fragment, &self.state.catalog)
        {
            self.render()
        } else {
            Vec::new()
        }
    }

    fn theme_changed(&mut self, theme: Theme) -> Vec<Effect> {
        self.state.theme = theme;
        if self.state.view.view() != View::Viewer {
            return Vec::new();
        }
        match self.current_path().and_then(|path| self.colors.get(&path)) {
            Some(average) => ambient_effects(self.ambient.apply_average(average, theme)),
            None => Vec::new(),
        }
    }

    fn image_loaded(&mut self, ticket: &LoadTicket, image: &LoadedImage) -> Vec<Effect> {
        if !self.loads.is_current(ticket) {
            debug!("Ignoring superseded load of {}", ticket.path);
            return Vec::new();
        }

        let theme = self.state.theme;
        if let Some(average) = self.colors.get(&ticket.path) {
            return ambient_effects(self.ambient.apply_average(average, theme));
        }
        match self.ambient.apply(image, theme) {
            Some(average) => {
                self.colors.put(ticket.path.clone(), average);
                self.ambient
                    .background()
                    .map(ambient_effects)
                    .unwrap_or_default()
            }
            None => Vec::new(),
        }
    }

    /// Effects after a user action moved the view: persist it, then render.
    fn navigated(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::WriteLocation(self.state.view.write_location())];
        effects.extend(self.render());
        effects
    }

    fn current_path(&self) -> Option<String> {
        let id = self.state.view.current_album()?;
        let album = self.state.catalog.get(id)?;
        let photo = album.photo(self.state.view.current_photo())?;
        Some(image_url::photo_path(id, photo))
    }

    fn render(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Render];

        if self.state.view.view() == View::Index {
            self.loads.cancel();
            self.ambient.reset();
            effects.push(Effect::AmbientReset {
                transition: AMBIENT_TRANSITION,
            });
            return effects;
        }

        if self.state.view.nav_visible() {
            effects.extend(self.show_nav());
        } else {
            effects.push(Effect::HideNav);
        }

        let Some(path) = self.current_path() else {
            self.loads.cancel();
            return effects;
        };

        if let Some(average) = self.colors.get(&path) {
            let color = self.ambient.apply_average(average, self.state.theme);
            effects.extend(ambient_effects(color));
        }

        let cdn = &self.state.settings.cdn_base;
        let url = image_url::image_url(
            cdn,
            &path,
            &Transform::width(VIEWER_SRC_WIDTH, DEFAULT_IMAGE_QUALITY),
        );
        let ticket = self.loads.begin(path);
        effects.push(Effect::LoadPhoto { ticket, url });

        let upcoming = self
            .state
            .view
            .current_album()
            .and_then(|id| Some((id, self.state.catalog.get(id)?)))
            .map(|(id, album)| {
                image_url::preload_paths(id, album, self.state.view.current_photo())
            })
            .unwrap_or_default();
        if !upcoming.is_empty() {
            effects.push(Effect::Preload(
                upcoming
                    .iter()
                    .map(|path| image_url::srcset(cdn, path, &VIEWER_WIDTHS, DEFAULT_IMAGE_QUALITY))
                    .collect(),
            ));
        }

        effects
    }
}

fn ambient_effects(color: AmbientColor) -> Vec<Effect> {
    vec![Effect::AmbientChanged {
        color,
        transition: AMBIENT_TRANSITION,
    }]
}

fn overlay_selection_effects(selected: Option<usize>) -> Vec<Effect> {
    let mut effects = vec![Effect::Render];
    if let Some(number) = selected {
        effects.push(Effect::ScrollIntoView(number));
    }
    effects
}
