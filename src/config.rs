//! Configuration types for object-removal operations

use crate::error::{EraserError, Result};
use serde::{Deserialize, Serialize};

/// Default longest side of the working image, in pixels. Matches the
/// interactive editor's snappy-but-faithful trade-off.
pub const DEFAULT_MAX_WORKING_DIM: u32 = 1024;

/// Configuration for the object-removal pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Maximum length of the working image's longer side. Larger inputs are
    /// downscaled before segmentation/inpainting and restored afterwards.
    pub max_working_dim: u32,

    /// Grow the binary mask by this many pixels before inpainting. Slight
    /// over-selection avoids leaving a halo of the removed object. 0 = off.
    pub mask_dilation_px: u32,

    /// Cap on the session history length. `None` preserves the unbounded
    /// append-only behavior.
    pub history_limit: Option<usize>,

    /// Enable debug logging of intermediate mask statistics
    pub debug: bool,
}

impl RemovalConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::new()
    }
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            max_working_dim: DEFAULT_MAX_WORKING_DIM,
            mask_dilation_px: 0,
            history_limit: None,
            debug: false,
        }
    }
}

/// Builder for `RemovalConfig`
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RemovalConfig::default(),
        }
    }

    #[must_use]
    pub fn max_working_dim(mut self, max_working_dim: u32) -> Self {
        self.config.max_working_dim = max_working_dim;
        self
    }

    #[must_use]
    pub fn mask_dilation_px(mut self, radius: u32) -> Self {
        self.config.mask_dilation_px = radius;
        self
    }

    #[must_use]
    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.config.history_limit = limit;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `EraserError::InvalidConfig` for:
    /// - A zero maximum working dimension
    /// - A zero history limit (use `None` for unbounded instead)
    pub fn build(self) -> Result<RemovalConfig> {
        if self.config.max_working_dim == 0 {
            return Err(EraserError::invalid_config(
                "max working dimension must be positive",
            ));
        }
        if self.config.history_limit == Some(0) {
            return Err(EraserError::invalid_config(
                "history limit must be positive; use None for unbounded",
            ));
        }

        Ok(self.config)
    }
}

impl Default for RemovalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
