//! Photo album browser core.
//!
//! Models an album index and a single-photo viewer, keeps that view in sync
//! with a URL fragment, and derives an ambient background color from the
//! photo on screen. Hosts feed [`ui::InputEvent`]s into [`ui::App`] and carry
//! out the returned [`ui::Effect`]s.

pub mod catalog;
pub mod config;
pub mod error;
pub mod file_utils;
pub mod image_cache;
pub mod image_loader;
pub mod image_url;
pub mod services;
pub mod state;
pub mod ui;

pub use catalog::{Album, Catalog, Photo};
pub use error::{AppError, CatalogError, Result};
pub use ui::{App, Effect, InputEvent};
