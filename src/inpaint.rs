//! Size-checked invocation of the inpainting engine
//!
//! Mask/image alignment is guaranteed upstream by the resolution transform
//! and the mask extractor; a mismatch here indicates a pipeline bug and is
//! reported rather than silently coerced.

use crate::{
    engines::InpaintingEngine,
    error::{EraserError, Result},
    types::BinaryMask,
};
use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

/// Validates image/mask compatibility and calls the inpainting engine.
/// The engine handle may be shared read-only across sessions.
#[derive(Clone)]
pub struct InpaintInvoker {
    engine: Arc<dyn InpaintingEngine>,
}

impl InpaintInvoker {
    /// Create an invoker over a shared inpainting engine
    #[must_use]
    pub fn new(engine: Arc<dyn InpaintingEngine>) -> Self {
        Self { engine }
    }

    /// Inpaint the masked region of `image`, returning a completed image of
    /// the same dimensions. The mask must already be strictly binary; the
    /// invoker does not re-binarize.
    ///
    /// # Errors
    ///
    /// - `EraserError::SizeMismatch` when image and mask dimensions disagree
    /// - `EraserError::Engine` when the engine fails or returns an image of
    ///   the wrong size (no partial results)
    pub fn inpaint(&self, image: &RgbImage, mask: &BinaryMask) -> Result<RgbImage> {
        let image_dimensions = image.dimensions();
        if mask.dimensions != image_dimensions {
            return Err(EraserError::size_mismatch(
                image_dimensions,
                mask.dimensions,
            ));
        }

        debug!(
            width = image_dimensions.0,
            height = image_dimensions.1,
            selected = mask.selected_pixels(),
            "Invoking inpainting engine"
        );

        let result = self.engine.infer(image, mask)?;
        if result.dimensions() != image_dimensions {
            return Err(EraserError::engine(format!(
                "inpainting engine returned {}x{} image for {}x{} input",
                result.dimensions().0,
                result.dimensions().1,
                image_dimensions.0,
                image_dimensions.1
            )));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::MockInpaintingEngine;
    use crate::types::MASK_ERASE;

    #[test]
    fn test_inpaint_same_size_contract() {
        let invoker = InpaintInvoker::new(Arc::new(MockInpaintingEngine::new()));
        let image = RgbImage::from_pixel(8, 6, image::Rgb([50, 50, 50]));
        let mut mask = BinaryMask::zeros((8, 6));
        mask.data[10] = MASK_ERASE;

        let result = invoker.inpaint(&image, &mask).unwrap();
        assert_eq!(result.dimensions(), (8, 6));
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let invoker = InpaintInvoker::new(Arc::new(MockInpaintingEngine::new()));
        let image = RgbImage::new(8, 6);
        let mask = BinaryMask::zeros((6, 8));

        let result = invoker.inpaint(&image, &mask);
        assert!(matches!(
            result,
            Err(EraserError::SizeMismatch {
                expected: (8, 6),
                actual: (6, 8),
            })
        ));
    }

    #[test]
    fn test_engine_failure_propagates() {
        let invoker = InpaintInvoker::new(Arc::new(MockInpaintingEngine::new_failing()));
        let image = RgbImage::new(4, 4);
        let mask = BinaryMask::zeros((4, 4));

        let result = invoker.inpaint(&image, &mask);
        assert!(matches!(result, Err(EraserError::Engine(_))));
    }

    #[test]
    fn test_wrong_size_output_is_engine_failure() {
        let invoker = InpaintInvoker::new(Arc::new(MockInpaintingEngine::new_wrong_size()));
        let image = RgbImage::new(4, 4);
        let mask = BinaryMask::zeros((4, 4));

        let result = invoker.inpaint(&image, &mask);
        assert!(matches!(result, Err(EraserError::Engine(_))));
    }
}
