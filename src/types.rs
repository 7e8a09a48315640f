//! Core types for object-removal operations

use crate::error::Result;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mask sample value for pixels to erase
pub const MASK_ERASE: u8 = 255;
/// Mask sample value for pixels to keep
pub const MASK_KEEP: u8 = 0;

/// A single foreground click in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPoint {
    /// Horizontal pixel coordinate
    pub x: u32,
    /// Vertical pixel coordinate
    pub y: u32,
}

impl ClickPoint {
    /// Create a new click point
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether this point falls inside an image of the given dimensions
    #[must_use]
    pub fn in_bounds(&self, dimensions: (u32, u32)) -> bool {
        self.x < dimensions.0 && self.y < dimensions.1
    }
}

/// Raw user-drawn layer data: a single-channel opacity grid, pre-binarization.
/// May have different dimensions than the image it targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLayer {
    /// Opacity samples (0 = untouched, non-zero = brushed)
    pub data: Vec<u8>,

    /// Layer dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl RawLayer {
    /// Create a new raw layer
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create a raw layer from the alpha channel of a grayscale image
    #[must_use]
    pub fn from_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.as_raw().clone(), (width, height))
    }

    /// Total number of samples the dimensions describe
    #[must_use]
    pub fn area(&self) -> usize {
        (self.dimensions.0 as usize) * (self.dimensions.1 as usize)
    }
}

/// User selection, validated at the pipeline boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Selection {
    /// Freehand brush strokes captured as an opacity layer
    Brush(RawLayer),
    /// A single foreground click, in original-image coordinates
    Click(ClickPoint),
}

impl Selection {
    /// Short human-readable kind, used in logs and metadata
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Brush(_) => "brush",
            Self::Click(_) => "click",
        }
    }
}

/// Strict binary mask: every sample is `MASK_KEEP` or `MASK_ERASE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMask {
    /// Mask samples, row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl BinaryMask {
    /// Create a new binary mask from raw samples
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create an all-keep mask of the given dimensions
    #[must_use]
    pub fn zeros(dimensions: (u32, u32)) -> Self {
        let len = (dimensions.0 as usize) * (dimensions.1 as usize);
        Self::new(vec![MASK_KEEP; len], dimensions)
    }

    /// Create a mask from a grayscale image without re-binarizing
    #[must_use]
    pub fn from_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.as_raw().clone(), (width, height))
    }

    /// Convert the mask to a grayscale image
    pub fn to_image(&self) -> Result<GrayImage> {
        let (width, height) = self.dimensions;
        GrayImage::from_raw(width, height, self.data.clone()).ok_or_else(|| {
            crate::error::EraserError::processing("Failed to create image from mask data")
        })
    }

    /// Whether every sample is exactly 0 or 255
    #[must_use]
    pub fn is_strictly_binary(&self) -> bool {
        self.data
            .iter()
            .all(|&v| v == MASK_KEEP || v == MASK_ERASE)
    }

    /// Whether the mask selects nothing (all samples are `MASK_KEEP`)
    #[must_use]
    pub fn is_empty_selection(&self) -> bool {
        self.data.iter().all(|&v| v == MASK_KEEP)
    }

    /// Number of samples marked for erasure
    #[must_use]
    pub fn selected_pixels(&self) -> usize {
        self.data.iter().filter(|&&v| v == MASK_ERASE).count()
    }

    /// Resize the mask with nearest-neighbor filtering. Nearest is the only
    /// resampling mode that cannot introduce intermediate (non-0/255) values.
    pub fn resize_nearest(&self, new_width: u32, new_height: u32) -> Result<BinaryMask> {
        let current_image = self.to_image()?;
        let resized = image::imageops::resize(
            &current_image,
            new_width,
            new_height,
            image::imageops::FilterType::Nearest,
        );

        Ok(BinaryMask::from_image(&resized))
    }

    /// Grow the selected region by `radius` pixels (square structuring
    /// element). Used to over-select slightly so the inpainter never sees a
    /// halo of the original object. Returns the mask unchanged for radius 0.
    #[must_use]
    pub fn dilate(&self, radius: u32) -> BinaryMask {
        if radius == 0 || self.data.is_empty() {
            return self.clone();
        }

        let (width, height) = self.dimensions;
        let w = width as usize;
        let h = height as usize;
        let r = radius as usize;

        // Separable max filter: rows first, then columns.
        let mut rows = vec![MASK_KEEP; self.data.len()];
        for y in 0..h {
            for x in 0..w {
                let lo = x.saturating_sub(r);
                let hi = (x + r).min(w - 1);
                let row = &self.data[y * w + lo..=y * w + hi];
                if row.iter().any(|&v| v == MASK_ERASE) {
                    rows[y * w + x] = MASK_ERASE;
                }
            }
        }

        let mut out = vec![MASK_KEEP; self.data.len()];
        for x in 0..w {
            for y in 0..h {
                let lo = y.saturating_sub(r);
                let hi = (y + r).min(h - 1);
                if (lo..=hi).any(|yy| rows[yy * w + x] == MASK_ERASE) {
                    out[y * w + x] = MASK_ERASE;
                }
            }
        }

        BinaryMask::new(out, self.dimensions)
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let selected_pixels = self.selected_pixels();

        MaskStatistics {
            total_pixels,
            selected_pixels,
            selected_ratio: if total_pixels == 0 {
                0.0
            } else {
                selected_pixels as f32 / total_pixels as f32
            },
        }
    }

    /// Save mask as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.to_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Statistics about a binary mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub selected_pixels: usize,
    pub selected_ratio: f32,
}

/// A candidate region mask with its confidence score, as returned by the
/// segmentation engine. Scores are in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationCandidate {
    /// Candidate region mask, aligned to the working image
    pub mask: BinaryMask,

    /// Engine confidence score in [0, 1]
    pub score: f32,
}

impl SegmentationCandidate {
    /// Create a new candidate
    #[must_use]
    pub fn new(mask: BinaryMask, score: f32) -> Self {
        Self { mask, score }
    }
}

/// Result of an object-removal operation
#[derive(Debug, Clone)]
pub struct RemovalResult {
    /// The completed image, restored to original resolution
    pub image: RgbImage,

    /// The binary mask used for removal, at working resolution
    pub mask: BinaryMask,

    /// Original image dimensions
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,
}

impl RemovalResult {
    /// Create a new removal result
    #[must_use]
    pub fn new(
        image: RgbImage,
        mask: BinaryMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
        }
    }

    /// Save the result as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Get the result image as PNG-encoded bytes
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image.write_to(&mut cursor, image::ImageFormat::Png)?;
        Ok(buffer)
    }

    /// Get image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }
}

/// Detailed timing breakdown for a removal operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Downscale to working resolution
    pub shrink_ms: u64,

    /// Mask extraction or point-to-mask derivation
    pub mask_ms: u64,

    /// Inpainting engine call
    pub inpaint_ms: u64,

    /// Upscale back to original resolution
    pub restore_ms: u64,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    /// Fraction of total time spent in the inpainting engine
    #[must_use]
    pub fn inpaint_ratio(&self) -> f64 {
        if self.total_ms == 0 {
            0.0
        } else {
            self.inpaint_ms as f64 / self.total_ms as f64
        }
    }
}

/// Metadata about a removal operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Detailed timing breakdown
    pub timings: ProcessingTimings,

    /// Which selection kind drove the operation ("brush" or "click")
    pub selection_kind: String,

    /// Dimensions of the working image fed to the engines
    pub working_dimensions: (u32, u32),

    /// Whether the pipeline short-circuited on an empty selection
    pub no_op: bool,

    /// Mask statistics at working resolution
    pub mask_statistics: MaskStatistics,
}

impl ProcessingMetadata {
    /// Create new processing metadata for a selection kind
    #[must_use]
    pub fn new(selection_kind: &str) -> Self {
        Self {
            timings: ProcessingTimings::default(),
            selection_kind: selection_kind.to_string(),
            working_dimensions: (0, 0),
            no_op: false,
            mask_statistics: MaskStatistics {
                total_pixels: 0,
                selected_pixels: 0,
                selected_ratio: 0.0,
            },
        }
    }

    /// Serialize the metadata as a JSON string, for display or logging
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::error::EraserError::processing(format!("metadata: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_mask_creation() {
        let data = vec![255, 0, 0, 255];
        let mask = BinaryMask::new(data, (2, 2));

        assert_eq!(mask.dimensions, (2, 2));
        assert_eq!(mask.data.len(), 4);
        assert!(mask.is_strictly_binary());
        assert!(!mask.is_empty_selection());
    }

    #[test]
    fn test_zeros_mask_is_empty_selection() {
        let mask = BinaryMask::zeros((4, 3));
        assert_eq!(mask.data.len(), 12);
        assert!(mask.is_empty_selection());
        assert_eq!(mask.selected_pixels(), 0);
    }

    #[test]
    fn test_mask_statistics() {
        let data = vec![255, 255, 0, 0];
        let mask = BinaryMask::new(data, (2, 2));

        let stats = mask.statistics();
        assert_eq!(stats.total_pixels, 4);
        assert_eq!(stats.selected_pixels, 2);
        assert_eq!(stats.selected_ratio, 0.5);
    }

    #[test]
    fn test_resize_nearest_stays_binary() {
        let mut data = vec![0_u8; 16];
        data[5] = 255;
        data[6] = 255;
        let mask = BinaryMask::new(data, (4, 4));

        let resized = mask.resize_nearest(9, 7).unwrap();
        assert_eq!(resized.dimensions, (9, 7));
        assert!(resized.is_strictly_binary());
    }

    #[test]
    fn test_dilate_grows_selection() {
        let mut data = vec![0_u8; 25];
        data[12] = 255; // center of a 5x5 grid
        let mask = BinaryMask::new(data, (5, 5));

        let dilated = mask.dilate(1);
        assert!(dilated.is_strictly_binary());
        assert_eq!(dilated.selected_pixels(), 9); // 3x3 block
        // Unreached corners stay keep
        assert_eq!(dilated.data[0], MASK_KEEP);
        assert_eq!(dilated.data[24], MASK_KEEP);
    }

    #[test]
    fn test_dilate_zero_radius_is_identity() {
        let mask = BinaryMask::new(vec![0, 255, 0, 255], (2, 2));
        assert_eq!(mask.dilate(0), mask);
    }

    #[test]
    fn test_click_point_bounds() {
        let p = ClickPoint::new(99, 49);
        assert!(p.in_bounds((100, 50)));
        assert!(!p.in_bounds((99, 50)));
        assert!(!p.in_bounds((100, 49)));
    }

    #[test]
    fn test_selection_kind() {
        assert_eq!(Selection::Click(ClickPoint::new(0, 0)).kind(), "click");
        let layer = RawLayer::new(vec![0; 4], (2, 2));
        assert_eq!(Selection::Brush(layer).kind(), "brush");
    }

    #[test]
    fn test_metadata_json_round_trip() {
        let metadata = ProcessingMetadata::new("brush");
        let json = metadata.to_json().unwrap();
        assert!(json.contains("\"selection_kind\":\"brush\""));
    }
}
