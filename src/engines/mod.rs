//! Engine abstractions for the object-removal pipeline
//!
//! The pipeline consumes segmentation and inpainting as opaque, injected
//! capabilities. Real model bindings live behind these traits; the crate
//! ships deterministic mock engines for testing.

use crate::{
    error::Result,
    types::{BinaryMask, ClickPoint, SegmentationCandidate},
};
use image::RgbImage;

pub mod mock;

pub use self::mock::{MockInpaintingEngine, MockSegmentationEngine};

/// A segmentation engine that answers point queries with candidate masks.
///
/// The engine owns one precomputed embedding for the last image passed to
/// [`set_image`](Self::set_image); calling it again replaces that embedding.
/// `set_image` is expensive (seconds), `predict` against a loaded embedding
/// is cheap. Each editing session owns its engine instance.
pub trait SegmentationEngine {
    /// Precompute and cache embeddings for `image`. Replaces any previously
    /// loaded image.
    ///
    /// # Errors
    /// - Engine-internal failures (model not loaded, inference errors)
    fn set_image(&mut self, image: &RgbImage) -> Result<()>;

    /// Predict candidate region masks for a single foreground point, in the
    /// coordinates of the image passed to `set_image`.
    ///
    /// With `multimask` set, the engine returns several candidates at
    /// different granularities, each with a confidence score in [0, 1].
    /// Candidate order is deterministic for fixed input.
    ///
    /// # Errors
    /// - No image loaded
    /// - Engine-internal inference failures
    fn predict(&mut self, point: ClickPoint, multimask: bool)
        -> Result<Vec<SegmentationCandidate>>;
}

/// An inpainting engine that completes the masked region of an image.
///
/// Stateless from the caller's perspective; implementations must be safe to
/// share across sessions (`Send + Sync`) or serialize calls internally.
pub trait InpaintingEngine: Send + Sync {
    /// Fill the region marked 255 in `mask`, returning a completed image of
    /// the same dimensions. Either a full same-size image is returned or the
    /// call fails atomically; there are no partial results.
    ///
    /// Callers guarantee `image` and `mask` dimensions agree and that the
    /// mask is strictly binary.
    ///
    /// # Errors
    /// - Engine-internal inference failures
    fn infer(&self, image: &RgbImage, mask: &BinaryMask) -> Result<RgbImage>;
}
