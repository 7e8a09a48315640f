//! Binary mask extraction from user brush strokes
//!
//! Converts a raw opacity layer into a strict binary mask aligned to the
//! working image. Any non-zero sample counts as selected: ambiguous
//! partial-opacity brush edges are treated as fully selected, since erasing
//! slightly more beats leaving a halo of the original object.

use crate::{
    error::{EraserError, Result},
    types::{BinaryMask, RawLayer, MASK_ERASE, MASK_KEEP},
};
use log::debug;

/// Extracts strict binary masks from raw user-drawn layers
pub struct MaskExtractor;

impl MaskExtractor {
    /// Convert `layer` into a binary mask sized to `target_size`.
    ///
    /// Binarization happens before any resize, and the resize (if the layer
    /// and target disagree on dimensions) is strictly nearest-neighbor, so
    /// every output sample is exactly 0 or 255. An all-zero layer yields an
    /// all-zero mask; the caller treats that as "nothing to remove", not an
    /// error.
    ///
    /// # Errors
    ///
    /// - `EraserError::InvalidSelection` for a zero-area layer
    /// - `EraserError::Processing` when the layer data does not match its
    ///   declared dimensions
    pub fn extract(layer: &RawLayer, target_size: (u32, u32)) -> Result<BinaryMask> {
        if layer.area() == 0 {
            return Err(EraserError::invalid_selection("raw layer has zero area"));
        }
        if layer.data.len() != layer.area() {
            return Err(EraserError::processing_stage_error(
                "mask-extraction",
                "layer data length does not match dimensions",
                Some(&format!(
                    "{}x{} layer with {} samples",
                    layer.dimensions.0,
                    layer.dimensions.1,
                    layer.data.len()
                )),
            ));
        }

        let binarized: Vec<u8> = layer
            .data
            .iter()
            .map(|&v| if v > 0 { MASK_ERASE } else { MASK_KEEP })
            .collect();
        let mask = BinaryMask::new(binarized, layer.dimensions);

        if layer.dimensions == target_size {
            return Ok(mask);
        }

        debug!(
            "Resizing {}x{} brush layer to match {}x{} working image",
            layer.dimensions.0, layer.dimensions.1, target_size.0, target_size.1
        );
        mask.resize_nearest(target_size.0, target_size.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binarization_threshold() {
        let layer = RawLayer::new(vec![0, 1, 127, 255], (2, 2));
        let mask = MaskExtractor::extract(&layer, (2, 2)).unwrap();

        assert_eq!(mask.data, vec![0, 255, 255, 255]);
        assert!(mask.is_strictly_binary());
    }

    #[test]
    fn test_all_zero_layer_yields_empty_selection() {
        let layer = RawLayer::new(vec![0; 16], (4, 4));
        let mask = MaskExtractor::extract(&layer, (4, 4)).unwrap();

        assert!(mask.is_empty_selection());
    }

    #[test]
    fn test_resize_keeps_strict_binarity() {
        // Soft-edged brush blob in a 10x10 layer, resized to 7x13
        let mut data = vec![0_u8; 100];
        for y in 3..7 {
            for x in 3..7 {
                data[y * 10 + x] = 40 + (x as u8) * 10;
            }
        }
        let layer = RawLayer::new(data, (10, 10));

        let mask = MaskExtractor::extract(&layer, (7, 13)).unwrap();
        assert_eq!(mask.dimensions, (7, 13));
        assert!(mask.is_strictly_binary());
        assert!(!mask.is_empty_selection());
    }

    #[test]
    fn test_full_canvas_layer_scales_to_target() {
        let layer = RawLayer::new(vec![255; 2000 * 1000], (2000, 1000));
        let mask = MaskExtractor::extract(&layer, (1024, 512)).unwrap();

        assert_eq!(mask.dimensions, (1024, 512));
        assert_eq!(mask.selected_pixels(), 1024 * 512);
    }

    #[test]
    fn test_zero_area_layer_is_invalid_selection() {
        let layer = RawLayer::new(Vec::new(), (0, 0));
        let result = MaskExtractor::extract(&layer, (4, 4));
        assert!(matches!(result, Err(EraserError::InvalidSelection(_))));
    }

    #[test]
    fn test_mismatched_data_length_is_processing_error() {
        let layer = RawLayer::new(vec![0; 5], (4, 4));
        let result = MaskExtractor::extract(&layer, (4, 4));
        assert!(matches!(result, Err(EraserError::Processing(_))));
    }
}
