//! Unified error types for the gallery.

use thiserror::Error;

/// Gallery-specific errors.
///
/// Authorization denial is not an error; the permission gate returns it as a value.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The media index could not be opened or scanned.
    #[error("media index unavailable: {0}")]
    IndexUnavailable(String),
    /// A route parameter did not decode to a usable resource identifier.
    #[error("invalid route parameter: {0}")]
    RouteParameterInvalid(String),
    /// Error resolving or decoding an image.
    #[error("image load error: {0}")]
    ImageLoad(String),
    /// Error reading or writing the settings file.
    #[error("settings error: {0}")]
    Settings(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for GalleryError {
    fn from(err: image::ImageError) -> Self {
        GalleryError::ImageLoad(err.to_string())
    }
}

impl From<serde_yaml::Error> for GalleryError {
    fn from(err: serde_yaml::Error) -> Self {
        GalleryError::Settings(err.to_string())
    }
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GalleryError>;
