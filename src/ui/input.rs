//! Events fed into the controller and the side effects it asks the host for.

use crate::image_loader::LoadedImage;
use crate::services::ambient_service::{AmbientColor, Theme};
use crate::state::SortBy;
use crate::ui::load_tracker::LoadTicket;
use std::time::Duration;

/// Keys the browser reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Space,
    Char(char),
}

impl Key {
    /// Letter keys match regardless of case.
    fn is_letter(self, letter: char) -> bool {
        matches!(self, Key::Char(c) if c.eq_ignore_ascii_case(&letter))
    }

    pub(crate) fn is_fullscreen(self) -> bool {
        self.is_letter('f')
    }

    pub(crate) fn is_index(self) -> bool {
        self.is_letter('i')
    }

    pub(crate) fn is_restart(self) -> bool {
        self.is_letter('r')
    }
}

/// Something that happened in the host.
pub enum InputEvent {
    Key(Key),
    /// A finished touch gesture, end minus start in screen pixels.
    Swipe { dx: f64, dy: f64 },
    /// Click on the displayed photo at a horizontal fraction of its width.
    PhotoClick { fraction: f64 },
    /// Click on the page outside the photo and the overlay.
    BackgroundClick,
    NavHover,
    /// A nav auto-hide timer fired.
    NavHideElapsed(u64),
    AlbumClick(String),
    AlbumHover(String),
    /// The album name in the viewer header.
    AlbumNameClick,
    BackClick,
    CountClick,
    BackdropClick,
    /// Overlay thumbnail, 1-based.
    ThumbnailClick(usize),
    SearchInput(String),
    SortSelected(SortBy),
    /// The location fragment changed, e.g. history navigation.
    LocationChanged(String),
    ThemeChanged(Theme),
    Resize(u32),
    ImageLoaded { ticket: LoadTicket, image: LoadedImage },
    FullscreenChanged(bool),
    FullscreenRejected(String),
}

/// Work the host performs on behalf of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Store this fragment as the current location.
    WriteLocation(String),
    /// Redraw the current view.
    Render,
    ToggleFullscreen,
    ExitFullscreen,
    /// Start loading the displayed photo and report back with the ticket.
    LoadPhoto { ticket: LoadTicket, url: String },
    /// Warm the cache for upcoming photos.
    Preload(Vec<String>),
    /// Warm the cache for a hovered album.
    Prefetch(Vec<String>),
    ShowNav,
    HideNav,
    /// Fire [`InputEvent::NavHideElapsed`] with `timer` after `delay`.
    ScheduleNavHide { timer: u64, delay: Duration },
    /// Scroll the overlay so the given photo is visible.
    ScrollIntoView(usize),
    /// New ambient color for the page background and the overlay panel.
    AmbientChanged {
        color: AmbientColor,
        transition: &'static str,
    },
    AmbientReset { transition: &'static str },
}
