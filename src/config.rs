//! Application configuration constants and runtime settings.

/// Supported image file extensions when scanning album folders.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Name of the top-level manifest listing album ids.
pub const ALBUMS_MANIFEST: &str = "albums.json";

/// Name of the per-album manifest.
pub const PHOTOS_MANIFEST: &str = "photos.json";

/// Side length of the sampling grid used for ambient lighting.
pub const AMBIENT_SAMPLE_SIZE: u32 = 50;

/// CSS transition used when the ambient background changes.
pub const AMBIENT_TRANSITION: &str = "background-color 0.4s ease";

/// Number of decoded average colors kept for quick theme switches.
pub const AMBIENT_CACHE_CAPACITY: usize = 64;

/// Minimum travel in pixels before a touch counts as a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Clicks left of this fraction of the photo width go backwards.
pub const PREVIOUS_CLICK_FRACTION: f64 = 0.30;

/// Delay before the viewer's top navigation hides itself.
pub const NAV_HIDE_DELAY_MS: u64 = 2000;

/// Viewport breakpoints (min width, column count), widest first.
pub const GRID_BREAKPOINTS: [(u32, usize); 3] = [(1024, 6), (768, 4), (640, 3)];

/// Column count below the smallest breakpoint.
pub const GRID_MIN_COLUMNS: usize = 1;

/// Default CDN quality parameter.
pub const DEFAULT_IMAGE_QUALITY: u32 = 85;

/// Default CDN format parameter.
pub const DEFAULT_IMAGE_FORMAT: &str = "auto";

/// How many photos after the current one are preloaded.
pub const PRELOAD_AHEAD: usize = 5;

/// Default title used for the index page.
pub const DEFAULT_SITE_TITLE: &str = "Albums";

/// Timeout for catalog requests over HTTP, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 5;

/// Runtime settings shared by the controller and its hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// CDN base prefixed to every image URL. Empty means same origin.
    pub cdn_base: String,
    /// Title shown on the index page and appended to album titles.
    pub site_title: String,
    /// Viewport width in CSS pixels, used for the grid column count.
    pub viewport_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cdn_base: String::new(),
            site_title: DEFAULT_SITE_TITLE.to_string(),
            viewport_width: 1280,
        }
    }
}
