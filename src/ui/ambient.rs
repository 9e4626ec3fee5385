//! Ambient lighting surfaces: the page background and the overlay panel.

use crate::config::AMBIENT_TRANSITION;
use crate::services::ambient_service::{self, AmbientColor, PixelSource, Rgb, Theme};
use log::{debug, warn};

/// Current ambient colors of the page.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AmbientLighting {
    background: Option<AmbientColor>,
    overlay_background: Option<AmbientColor>,
    transition: Option<&'static str>,
}

impl AmbientLighting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<AmbientColor> {
        self.background
    }

    pub fn overlay_background(&self) -> Option<AmbientColor> {
        self.overlay_background
    }

    pub fn transition(&self) -> Option<&'static str> {
        self.transition
    }

    /// Samples `source` and lights both surfaces with the result.
    ///
    /// Returns the sampled average so it can be cached. When sampling fails
    /// a warning is logged and the previous colors stay as they are.
    pub fn apply(&mut self, source: &dyn PixelSource, theme: Theme) -> Option<Rgb> {
        match ambient_service::average_color(source) {
            Ok(average) => {
                self.apply_average(average, theme);
                Some(average)
            }
            Err(e) => {
                warn!("Could not extract ambient color: {}", e);
                None
            }
        }
    }

    /// Lights both surfaces from an already sampled average.
    pub fn apply_average(&mut self, average: Rgb, theme: Theme) -> AmbientColor {
        let color = AmbientColor::from_average(average, theme);
        debug!("Ambient color {} ({:?})", color, theme);
        self.background = Some(color);
        self.overlay_background = Some(color);
        self.transition = Some(AMBIENT_TRANSITION);
        color
    }

    /// Clears the page background, keeping the transition.
    pub fn reset(&mut self) {
        self.background = None;
        self.transition = Some(AMBIENT_TRANSITION);
    }
}
