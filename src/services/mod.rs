//! Service layer for business logic.
//!
//! Separates business logic from input handling for better testability and maintainability.

pub mod ambient_service;
pub mod catalog_service;
pub mod manifest_service;
pub mod navigation_service;

pub use ambient_service::{AmbientColor, PixelSource, SampleError, Theme};
pub use catalog_service::{CatalogSource, DirectorySource, HttpSource, load_catalog, open_source};
pub use manifest_service::generate_manifests;
pub use navigation_service::{Axis, Direction};
