//! Error types for the paint engine.

use livery_raster::RasterError;
use thiserror::Error;

/// Errors that can occur while driving an editing session.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Color string is not a `#rgb` / `#rrggbb` hex value
    #[error("Invalid color '{value}': expected #rgb or #rrggbb")]
    InvalidColor {
        /// The rejected input
        value: String,
    },

    /// Part id not present in the session
    #[error("Unknown part: {id}")]
    UnknownPart {
        /// The missing part id
        id: String,
    },

    /// Part id already present in the session
    #[error("Duplicate part id: {id}")]
    DuplicatePart {
        /// The clashing part id
        id: String,
    },

    /// Polygon with fewer than three vertices
    #[error("Part '{id}' has {vertices} vertices, at least 3 are required")]
    InvalidPolygon {
        /// The offending part id
        id: String,
        /// Number of vertices received
        vertices: usize,
    },

    /// Raster buffer failure
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    /// Segmentation service reported a failure or could not be reached
    #[error("Segmentation failed: {message}")]
    Segmentation {
        /// Description from the service or transport
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed `data:` URL
    #[error("Invalid data URL: {message}")]
    InvalidDataUrl {
        /// What was wrong with the URL
        message: String,
    },

    /// Photo size differs from the session's logical size
    #[error("Image is {found_width}x{found_height}, session is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a segmentation error with a message.
    pub fn segmentation(message: impl Into<String>) -> Self {
        Self::Segmentation {
            message: message.into(),
        }
    }

    /// Create an invalid data URL error.
    pub fn invalid_data_url(message: impl Into<String>) -> Self {
        Self::InvalidDataUrl {
            message: message.into(),
        }
    }

    /// Create an unknown part error.
    pub fn unknown_part(id: impl Into<String>) -> Self {
        Self::UnknownPart { id: id.into() }
    }
}
