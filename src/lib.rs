#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # Object Eraser Library
//!
//! An interactive object-removal pipeline: mark a region of a photograph by
//! freehand brushing or by a single click, and get the same photograph back
//! with that region plausibly filled in, as if the object never existed.
//!
//! The crate orchestrates the removal; the heavy lifting is done by two
//! injected engines behind traits:
//!
//! - A [`SegmentationEngine`]: given an image and a foreground point,
//!   returns candidate region masks with confidence scores.
//! - An [`InpaintingEngine`]: given an image and a binary mask, returns a
//!   completed image of the same dimensions.
//!
//! ## Pipeline
//!
//! Each invocation runs `shrink → mask → inpaint → restore`:
//!
//! 1. Downscale the image so segmentation/inpainting stay interactive
//!    ([`ResolutionTransform`]).
//! 2. Derive a strict binary mask from the selection: brush layers go
//!    through [`MaskExtractor`], clicks through [`PointToMaskAdapter`]
//!    (with an embedding cache so repeated clicks are near-instant).
//! 3. Call the inpainting engine ([`InpaintInvoker`]), with image/mask
//!    alignment checked rather than coerced.
//! 4. Restore the result to the original resolution exactly.
//!
//! An empty selection short-circuits before the inference call and echoes
//! the original image.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use object_eraser::{
//!     ClickPoint, RemovalConfig, RemovalPipeline, Selection,
//!     MockInpaintingEngine, MockSegmentationEngine,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = RemovalConfig::builder().max_working_dim(1024).build()?;
//!
//! // Real deployments inject model-backed engines here.
//! let mut pipeline = RemovalPipeline::new(
//!     config,
//!     Box::new(MockSegmentationEngine::new()),
//!     Arc::new(MockInpaintingEngine::new()),
//! )?;
//!
//! let photo = image::open("input.jpg")?.to_rgb8();
//! let result = pipeline.run(&photo, &Selection::Click(ClickPoint::new(420, 310)))?;
//! result.save_png("output.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Sessions
//!
//! [`EraserSession`] wraps a pipeline with a most-recent-first
//! [`HistoryStore`] of completed results, matching the interactive editor
//! flow. Each session owns its pipeline; the inpainting engine handle may
//! be shared across sessions.

pub mod config;
pub mod engines;
pub mod error;
pub mod history;
pub mod inpaint;
pub mod mask;
pub mod pipeline;
pub mod resolution;
pub mod segmentation;
pub mod session;
pub mod types;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use config::{RemovalConfig, RemovalConfigBuilder, DEFAULT_MAX_WORKING_DIM};
pub use engines::{
    InpaintingEngine, MockInpaintingEngine, MockSegmentationEngine, SegmentationEngine,
};
pub use error::{EraserError, Result};
pub use history::{HistoryEntry, HistoryStore};
pub use inpaint::InpaintInvoker;
pub use mask::MaskExtractor;
pub use pipeline::RemovalPipeline;
pub use resolution::{ResolutionTransform, WorkingImage};
pub use segmentation::PointToMaskAdapter;
pub use session::EraserSession;
pub use types::{
    BinaryMask, ClickPoint, MaskStatistics, ProcessingMetadata, ProcessingTimings, RawLayer,
    RemovalResult, SegmentationCandidate, Selection, MASK_ERASE, MASK_KEEP,
};

/// Remove an object from an image provided as encoded bytes
///
/// Decodes the image with the `image` crate and runs the supplied pipeline.
/// Suitable for web handlers and memory-based processing where no file is
/// available.
pub async fn remove_object_from_bytes(
    image_bytes: &[u8],
    selection: &Selection,
    pipeline: &mut RemovalPipeline,
) -> Result<RemovalResult> {
    let image = image::load_from_memory(image_bytes)
        .map_err(|e| EraserError::processing(format!("Failed to decode image from bytes: {e}")))?;

    remove_object_from_image(&image, selection, pipeline)
}

/// Remove an object from a pre-loaded `DynamicImage`
///
/// The image is converted to RGB; every transform downstream is
/// copy-producing, so the input is never mutated.
pub fn remove_object_from_image(
    image: &image::DynamicImage,
    selection: &Selection,
    pipeline: &mut RemovalPipeline,
) -> Result<RemovalResult> {
    let rgb_image = image.to_rgb8();
    pipeline.run(&rgb_image, selection)
}

/// Remove an object from an image read from an async stream
///
/// Accepts any async readable source (network stream, large file) and
/// decodes it in memory before processing.
pub async fn remove_object_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    selection: &Selection,
    pipeline: &mut RemovalPipeline,
) -> Result<RemovalResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
        .await
        .map_err(|e| EraserError::processing(format!("Failed to read from stream: {e}")))?;

    remove_object_from_bytes(&buffer, selection, pipeline).await
}
