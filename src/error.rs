//! Unified error types for the album browser.

use std::fmt;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error loading or decoding an image file
    ImageLoad(String),
    /// Error scanning an album folder
    DirectoryScan(String),
    /// Error reading or writing a JSON manifest
    Manifest(String),
    /// Error loading the album catalog
    Catalog(CatalogError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            AppError::DirectoryScan(msg) => write!(f, "Directory scan error: {}", msg),
            AppError::Manifest(msg) => write!(f, "Manifest error: {}", msg),
            AppError::Catalog(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::DirectoryScan(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Manifest(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Catalog(err)
    }
}

/// Errors raised while fetching catalog manifests.
#[derive(Debug)]
pub enum CatalogError {
    /// The manifest could not be fetched (missing file, HTTP failure).
    Fetch { location: String, reason: String },
    /// The manifest was fetched but is not valid JSON of the expected shape.
    Parse { location: String, reason: String },
    /// The configured source location is unusable.
    InvalidSource(String),
}

impl CatalogError {
    pub fn fetch(location: impl Into<String>, reason: impl fmt::Display) -> Self {
        CatalogError::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(location: impl Into<String>, reason: impl fmt::Display) -> Self {
        CatalogError::Parse {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Fetch { location, reason } => {
                write!(f, "Failed to fetch {}: {}", location, reason)
            }
            CatalogError::Parse { location, reason } => {
                write!(f, "Failed to parse {}: {}", location, reason)
            }
            CatalogError::InvalidSource(msg) => write!(f, "Invalid catalog source: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
