//! The object-removal pipeline
//!
//! Composes the resolution transform, mask derivation, and the inpainting
//! engine into the end-to-end operation. Each invocation moves through four
//! strictly sequential states with no branching back:
//! Start → Shrunk → MaskReady → Inpainted → Restored.

use crate::{
    config::RemovalConfig,
    engines::{InpaintingEngine, SegmentationEngine},
    error::Result,
    inpaint::InpaintInvoker,
    mask::MaskExtractor,
    resolution::{ResolutionTransform, WorkingImage},
    segmentation::PointToMaskAdapter,
    types::{BinaryMask, ClickPoint, ProcessingMetadata, RemovalResult, Selection},
};
use image::RgbImage;
use instant::Instant;
use log::{debug, info};
use std::sync::Arc;
use tracing::{instrument, span, Level};

/// Turns a user selection on an image into the same image with the selected
/// object plausibly removed.
///
/// One pipeline per editing session: the embedded [`PointToMaskAdapter`]
/// holds a single-slot cache that must not be shared across images or
/// users. The inpainting engine handle may be shared between sessions.
pub struct RemovalPipeline {
    config: RemovalConfig,
    transform: ResolutionTransform,
    adapter: PointToMaskAdapter,
    invoker: InpaintInvoker,
}

impl RemovalPipeline {
    /// Create a pipeline from a validated configuration and injected engines
    ///
    /// # Errors
    ///
    /// Returns `EraserError::InvalidConfig` for an invalid working
    /// dimension.
    pub fn new(
        config: RemovalConfig,
        segmentation: Box<dyn SegmentationEngine>,
        inpainting: Arc<dyn InpaintingEngine>,
    ) -> Result<Self> {
        let transform = ResolutionTransform::from_config(&config)?;
        Ok(Self {
            config,
            transform,
            adapter: PointToMaskAdapter::new(segmentation),
            invoker: InpaintInvoker::new(inpainting),
        })
    }

    /// Get the pipeline configuration
    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Run the removal operation: downscale, derive the mask from the
    /// selection, inpaint, and restore to the original resolution.
    ///
    /// An empty selection (all-zero mask) short-circuits before the
    /// inpainting call and echoes the shrunk-then-restored original.
    /// Synchronous from the caller's point of view; engine calls block.
    ///
    /// # Errors
    ///
    /// - `EraserError::InvalidSelection` for out-of-bounds clicks or
    ///   zero-area brush layers
    /// - `EraserError::Engine` for segmentation/inpainting failures,
    ///   propagated unmodified and never retried
    /// - `EraserError::SizeMismatch` for internal alignment bugs
    #[instrument(
        skip(self, image, selection),
        fields(
            selection = selection.kind(),
            dimensions = %format!("{}x{}", image.width(), image.height())
        )
    )]
    pub fn run(&mut self, image: &RgbImage, selection: &Selection) -> Result<RemovalResult> {
        let total_start = Instant::now();
        let mut metadata = ProcessingMetadata::new(selection.kind());

        // Start -> Shrunk
        let shrink_start = Instant::now();
        let working = {
            let _span = span!(
                Level::DEBUG,
                "shrink",
                original_width = image.width(),
                original_height = image.height()
            )
            .entered();
            self.transform.shrink(image)
        };
        metadata.timings.shrink_ms = shrink_start.elapsed().as_millis() as u64;
        metadata.working_dimensions = working.dimensions();

        // Shrunk -> MaskReady
        let mask_start = Instant::now();
        let mask = {
            let _span = span!(Level::DEBUG, "derive_mask", kind = selection.kind()).entered();
            self.derive_mask(&working, selection)?
        };
        metadata.timings.mask_ms = mask_start.elapsed().as_millis() as u64;
        metadata.mask_statistics = mask.statistics();

        if self.config.debug {
            debug!(
                "Derived {}x{} mask selecting {} of {} pixels",
                mask.dimensions.0,
                mask.dimensions.1,
                metadata.mask_statistics.selected_pixels,
                metadata.mask_statistics.total_pixels
            );
        }

        // No-op fast path: nothing selected, skip the costly inference call.
        if mask.is_empty_selection() {
            info!("Empty selection; echoing original image");
            metadata.no_op = true;

            let restore_start = Instant::now();
            let restored = self
                .transform
                .restore(&working.image, working.original_dimensions);
            metadata.timings.restore_ms = restore_start.elapsed().as_millis() as u64;
            metadata.timings.total_ms = total_start.elapsed().as_millis() as u64;

            return Ok(RemovalResult::new(
                restored,
                mask,
                working.original_dimensions,
                metadata,
            ));
        }

        // MaskReady -> Inpainted
        let inpaint_start = Instant::now();
        let inpainted = {
            let _span = span!(
                Level::INFO,
                "inpaint",
                width = working.dimensions().0,
                height = working.dimensions().1
            )
            .entered();
            self.invoker.inpaint(&working.image, &mask)?
        };
        metadata.timings.inpaint_ms = inpaint_start.elapsed().as_millis() as u64;

        // Inpainted -> Restored
        let restore_start = Instant::now();
        let restored = {
            let _span = span!(
                Level::DEBUG,
                "restore",
                original_width = working.original_dimensions.0,
                original_height = working.original_dimensions.1
            )
            .entered();
            self.transform
                .restore(&inpainted, working.original_dimensions)
        };
        metadata.timings.restore_ms = restore_start.elapsed().as_millis() as u64;
        metadata.timings.total_ms = total_start.elapsed().as_millis() as u64;

        info!(
            "Removal complete in {}ms ({}ms inpainting)",
            metadata.timings.total_ms, metadata.timings.inpaint_ms
        );

        Ok(RemovalResult::new(
            restored,
            mask,
            working.original_dimensions,
            metadata,
        ))
    }

    /// Dispatch on the selection kind to produce a working-resolution mask
    fn derive_mask(&mut self, working: &WorkingImage, selection: &Selection) -> Result<BinaryMask> {
        let mask = match selection {
            Selection::Brush(layer) => MaskExtractor::extract(layer, working.dimensions())?,
            Selection::Click(point) => self.mask_from_click(working, *point)?,
        };

        if self.config.mask_dilation_px > 0 {
            return Ok(mask.dilate(self.config.mask_dilation_px));
        }
        Ok(mask)
    }

    /// Rescale the click into working coordinates and ask the adapter for a
    /// mask. The click arrives in original coordinates, so it must move by
    /// the same shrink factor as the pixels; coordinate and pixel spaces
    /// have to agree.
    fn mask_from_click(&mut self, working: &WorkingImage, point: ClickPoint) -> Result<BinaryMask> {
        let mapped = working.map_point(point).ok_or_else(|| {
            crate::error::EraserError::invalid_selection(format!(
                "click ({}, {}) outside {}x{} image",
                point.x,
                point.y,
                working.original_dimensions.0,
                working.original_dimensions.1
            ))
        })?;

        self.adapter.ensure_image_loaded(&working.image)?;
        self.adapter.mask_at_point(mapped)
    }
}
