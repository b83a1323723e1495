//! Error types for geo-mask.

use thiserror::Error;

/// Result type alias using MaskError.
pub type MaskResult<T> = Result<T, MaskError>;

/// Primary error type for masking and overlay operations.
#[derive(Debug, Error)]
pub enum MaskError {
    // === Geometry Errors ===
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unknown mask kind: {0}")]
    UnknownMaskKind(String),

    // === Raster Errors ===
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("Overlay encoding failed: {0}")]
    Encode(String),

    // === Display Errors ===
    #[error("Overlay not found: {0}")]
    OverlayNotFound(u64),

    #[error("Display error: {0}")]
    Display(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl MaskError {
    /// Whether the error leaves the caller's state untouched and can simply be
    /// reported to the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MaskError::Display(_) | MaskError::Encode(_))
    }
}

// Conversion from common error types
impl From<std::io::Error> for MaskError {
    fn from(err: std::io::Error) -> Self {
        MaskError::Display(err.to_string())
    }
}
