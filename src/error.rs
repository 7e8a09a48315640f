//! Error types for object-removal operations

use thiserror::Error;

/// Result type alias for object-removal operations
pub type Result<T> = std::result::Result<T, EraserError>;

/// Comprehensive error types for the object-removal pipeline
#[derive(Error, Debug)]
pub enum EraserError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or decoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid static configuration (e.g. a non-positive working dimension)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A user selection the pipeline cannot act on (point outside the image,
    /// zero-area brush layer)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Image and mask dimensions disagree at the inpaint boundary. Indicates
    /// an upstream pipeline bug; never coerced silently.
    #[error("Size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        /// Dimensions the operation required
        expected: (u32, u32),
        /// Dimensions it was given
        actual: (u32, u32),
    },

    /// Segmentation or inpainting engine failure, propagated unmodified
    #[error("Engine error: {0}")]
    Engine(String),

    /// Internal processing errors
    #[error("Processing error: {0}")]
    Processing(String),
}

impl EraserError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new invalid selection error
    pub fn invalid_selection<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Create a new engine error
    pub fn engine<S: Into<String>>(msg: S) -> Self {
        Self::Engine(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a size mismatch error from expected/actual dimensions
    #[must_use]
    pub fn size_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Create a processing error with pipeline stage context
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {info})"),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{stage}'{input_context}: {details}"
        ))
    }
}
