use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the user when an editing action cannot be carried out.
///
/// None of these are fatal. A failed action leaves the session and its
/// history exactly as they were before the action started.
#[derive(Debug, Error)]
pub enum EditError {
    /// The file is not a raster image the imaging library can decode
    #[error("{} is not a supported image file", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The file could not be read or written
    #[error("Failed to access {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A new image was requested with a non-positive width or height
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// The crop rectangle has no area once mapped into the image
    #[error("The selected crop area is empty")]
    InvalidCropArea,

    /// A picked point does not address a pixel of the image
    #[error("Point ({x}, {y}) is outside the image")]
    PointOutsideImage { x: i64, y: i64 },

    /// The operation needs an image but none is loaded
    #[error("No image is open")]
    NoActiveImage,

    /// Save was requested without a path and the session has none stored
    #[error("No file path set for this image")]
    NoPathSet,

    /// The canvas has not been laid out yet, so pointer positions cannot be mapped
    #[error("Canvas viewport is not ready yet")]
    ViewportPending,

    /// Unexpected failure inside the imaging library
    #[error("Image processing failed: {0}")]
    Imaging(#[from] image::ImageError),
}

impl EditError {
    /// Whether the error should be shown to the user or only logged.
    ///
    /// A pending viewport resolves itself on the next frame.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::ViewportPending)
    }
}

/// Result type for editing operations
pub type EditResult<T> = Result<T, EditError>;
