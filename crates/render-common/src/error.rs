//! Error types for image rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Primary error type for rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    // === Configuration Errors ===
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Palette '{0}' has no colors")]
    EmptyPalette(String),

    #[error("Palette not found: {0}")]
    PaletteNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Surface Errors ===
    #[error("Failed to allocate a {width}x{height} drawing surface")]
    SurfaceAllocation { width: u32, height: u32 },

    // === Codec Errors ===
    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Decoding failed: {0}")]
    Decode(String),

    // === Filesystem Errors ===
    #[error("IO error: {0}")]
    Io(String),

    #[error("No {0} directory available for this user")]
    DirectoryUnavailable(String),
}

impl RenderError {
    /// Whether the error stems from caller-supplied configuration rather than
    /// the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RenderError::InvalidColor(_)
                | RenderError::EmptyPalette(_)
                | RenderError::PaletteNotFound(_)
                | RenderError::Config(_)
                | RenderError::UnsupportedFormat(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> Self {
        RenderError::Config(format!("YAML error: {}", err))
    }
}
