//! Click-to-mask adaptation over a segmentation engine
//!
//! A single foreground click is ambiguous about granularity (shirt vs person
//! vs whole scene), so the engine is asked for multiple candidates and the
//! highest-confidence one wins. The adapter also owns an explicit
//! single-slot embedding cache so repeated clicks on one image skip the
//! expensive `set_image` call.

use crate::{
    engines::SegmentationEngine,
    error::{EraserError, Result},
    types::{BinaryMask, ClickPoint, SegmentationCandidate},
};
use image::RgbImage;
use log::debug;
use sha2::{Digest, Sha256};
use tracing::instrument;

/// Cache entry for the image currently embedded in the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CachedEmbedding {
    /// Content fingerprint of the embedded image
    fingerprint: [u8; 32],
    /// Dimensions of the embedded image, for click bounds checks
    dimensions: (u32, u32),
}

/// Converts a single foreground click into a binary mask via the
/// segmentation engine. One adapter per editing session; its embedding
/// cache holds exactly one slot.
pub struct PointToMaskAdapter {
    engine: Box<dyn SegmentationEngine>,
    cached: Option<CachedEmbedding>,
}

impl PointToMaskAdapter {
    /// Create an adapter over an injected segmentation engine
    #[must_use]
    pub fn new(engine: Box<dyn SegmentationEngine>) -> Self {
        Self {
            engine,
            cached: None,
        }
    }

    /// Whether an image is currently embedded
    #[must_use]
    pub fn has_loaded_image(&self) -> bool {
        self.cached.is_some()
    }

    /// Precompute embeddings for `image` unless the same image is already
    /// loaded. Embedding is expensive (seconds); on a fingerprint match this
    /// is a no-op so multiple clicks on one image stay near-instant.
    /// Loading a different image replaces the single cache slot.
    ///
    /// # Errors
    ///
    /// Propagates engine failures unmodified. On failure the cache slot is
    /// cleared so the next call retries the embedding.
    pub fn ensure_image_loaded(&mut self, image: &RgbImage) -> Result<()> {
        let entry = CachedEmbedding {
            fingerprint: Self::fingerprint(image),
            dimensions: image.dimensions(),
        };

        if self.cached == Some(entry) {
            debug!("Embedding cache hit; skipping set_image");
            return Ok(());
        }

        self.cached = None;
        self.engine.set_image(image)?;
        self.cached = Some(entry);
        Ok(())
    }

    /// Derive a binary mask from a foreground click in working-image
    /// coordinates. Requests multiple candidates and selects the one with
    /// the highest confidence score; ties go to the first-seen candidate.
    ///
    /// # Errors
    ///
    /// - `EraserError::Processing` when no image has been loaded
    /// - `EraserError::InvalidSelection` for a point outside the image
    /// - `EraserError::Engine` when the engine fails, returns zero
    ///   candidates, or returns a mask that does not match the image
    #[instrument(skip(self), fields(x = point.x, y = point.y))]
    pub fn mask_at_point(&mut self, point: ClickPoint) -> Result<BinaryMask> {
        let cached = self.cached.ok_or_else(|| {
            EraserError::processing("mask_at_point called before ensure_image_loaded")
        })?;

        if !point.in_bounds(cached.dimensions) {
            return Err(EraserError::invalid_selection(format!(
                "click ({}, {}) outside {}x{} image",
                point.x, point.y, cached.dimensions.0, cached.dimensions.1
            )));
        }

        let candidates = self.engine.predict(point, true)?;
        let best = Self::best_candidate(&candidates).ok_or_else(|| {
            EraserError::engine("segmentation engine returned zero candidates")
        })?;

        debug!(
            "Selected candidate with score {:.3} of {}",
            best.score,
            candidates.len()
        );

        if best.mask.dimensions != cached.dimensions {
            return Err(EraserError::engine(format!(
                "candidate mask is {}x{}, image is {}x{}",
                best.mask.dimensions.0,
                best.mask.dimensions.1,
                cached.dimensions.0,
                cached.dimensions.1
            )));
        }

        Ok(best.mask.clone())
    }

    /// Highest-scoring candidate; ties broken by first-seen order, which is
    /// deterministic because candidate order from the engine is itself
    /// deterministic for fixed input.
    fn best_candidate(candidates: &[SegmentationCandidate]) -> Option<&SegmentationCandidate> {
        let mut best: Option<&SegmentationCandidate> = None;
        for candidate in candidates {
            match best {
                Some(current) if candidate.score <= current.score => {},
                _ => best = Some(candidate),
            }
        }
        best
    }

    /// Content fingerprint: dimensions plus raw pixel bytes. Used only as
    /// the identity key of the single cache slot.
    fn fingerprint(image: &RgbImage) -> [u8; 32] {
        let (width, height) = image.dimensions();
        let mut hasher = Sha256::new();
        hasher.update(width.to_le_bytes());
        hasher.update(height.to_le_bytes());
        hasher.update(image.as_raw());
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::MockSegmentationEngine;
    use crate::types::MASK_ERASE;

    fn test_image(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb(color))
    }

    #[test]
    fn test_repeated_loads_skip_set_image() {
        let engine = MockSegmentationEngine::new();
        let history = engine.call_history_handle();
        let mut adapter = PointToMaskAdapter::new(Box::new(engine));

        let image = test_image(32, 32, [1, 2, 3]);
        adapter.ensure_image_loaded(&image).unwrap();
        adapter.ensure_image_loaded(&image).unwrap();
        adapter.ensure_image_loaded(&image).unwrap();

        let calls = history.lock().unwrap().clone();
        assert_eq!(calls, vec!["set_image"]);
    }

    #[test]
    fn test_new_image_replaces_cache_slot() {
        let engine = MockSegmentationEngine::new();
        let history = engine.call_history_handle();
        let mut adapter = PointToMaskAdapter::new(Box::new(engine));

        let first = test_image(32, 32, [1, 2, 3]);
        let second = test_image(32, 32, [9, 9, 9]);
        adapter.ensure_image_loaded(&first).unwrap();
        adapter.ensure_image_loaded(&second).unwrap();
        adapter.ensure_image_loaded(&first).unwrap();

        let calls = history.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);
    }

    #[test]
    fn test_failed_load_clears_cache() {
        let engine = MockSegmentationEngine::new_failing_set_image();
        let mut adapter = PointToMaskAdapter::new(Box::new(engine));

        let image = test_image(16, 16, [0, 0, 0]);
        assert!(adapter.ensure_image_loaded(&image).is_err());
        assert!(!adapter.has_loaded_image());
    }

    #[test]
    fn test_mask_at_point_requires_loaded_image() {
        let mut adapter = PointToMaskAdapter::new(Box::new(MockSegmentationEngine::new()));
        let result = adapter.mask_at_point(ClickPoint::new(1, 1));
        assert!(matches!(result, Err(EraserError::Processing(_))));
    }

    #[test]
    fn test_out_of_bounds_click_is_invalid_selection() {
        let mut adapter = PointToMaskAdapter::new(Box::new(MockSegmentationEngine::new()));
        adapter
            .ensure_image_loaded(&test_image(10, 10, [0, 0, 0]))
            .unwrap();

        let result = adapter.mask_at_point(ClickPoint::new(10, 5));
        assert!(matches!(result, Err(EraserError::InvalidSelection(_))));
    }

    #[test]
    fn test_zero_candidates_is_engine_failure() {
        let mut adapter =
            PointToMaskAdapter::new(Box::new(MockSegmentationEngine::new_empty_candidates()));
        adapter
            .ensure_image_loaded(&test_image(10, 10, [0, 0, 0]))
            .unwrap();

        let result = adapter.mask_at_point(ClickPoint::new(5, 5));
        assert!(matches!(result, Err(EraserError::Engine(_))));
    }

    #[test]
    fn test_mask_at_point_is_deterministic() {
        let mut adapter = PointToMaskAdapter::new(Box::new(MockSegmentationEngine::new()));
        let image = test_image(64, 64, [3, 3, 3]);
        adapter.ensure_image_loaded(&image).unwrap();

        let first = adapter.mask_at_point(ClickPoint::new(20, 30)).unwrap();
        let second = adapter.mask_at_point(ClickPoint::new(20, 30)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selected_mask_contains_click_point() {
        let mut adapter = PointToMaskAdapter::new(Box::new(MockSegmentationEngine::new()));
        adapter
            .ensure_image_loaded(&test_image(64, 64, [0, 0, 0]))
            .unwrap();

        let point = ClickPoint::new(40, 25);
        let mask = adapter.mask_at_point(point).unwrap();
        assert_eq!(mask.data[(point.y * 64 + point.x) as usize], MASK_ERASE);
    }

    #[test]
    fn test_best_candidate_prefers_max_score() {
        use crate::engines::mock::MockCandidateSpec;

        let specs = vec![
            MockCandidateSpec {
                radius_fraction: 0.1,
                score: 0.2,
            },
            MockCandidateSpec {
                radius_fraction: 0.5,
                score: 0.9,
            },
            MockCandidateSpec {
                radius_fraction: 0.3,
                score: 0.4,
            },
        ];
        let mut adapter =
            PointToMaskAdapter::new(Box::new(MockSegmentationEngine::with_candidates(specs)));
        let image = test_image(100, 100, [0, 0, 0]);
        adapter.ensure_image_loaded(&image).unwrap();

        // Score 0.9 maps to a radius-50 disc; a radius-10 or radius-30 disc
        // would select far fewer pixels.
        let mask = adapter.mask_at_point(ClickPoint::new(50, 50)).unwrap();
        let expected = MockSegmentationEngine::with_candidates(vec![MockCandidateSpec {
            radius_fraction: 0.5,
            score: 0.9,
        }]);
        let mut single = PointToMaskAdapter::new(Box::new(expected));
        single.ensure_image_loaded(&image).unwrap();
        let expected_mask = single.mask_at_point(ClickPoint::new(50, 50)).unwrap();
        assert_eq!(mask, expected_mask);
    }

    #[test]
    fn test_equal_scores_break_ties_first_seen() {
        use crate::engines::mock::MockCandidateSpec;

        let specs = vec![
            MockCandidateSpec {
                radius_fraction: 0.1,
                score: 0.7,
            },
            MockCandidateSpec {
                radius_fraction: 0.6,
                score: 0.7,
            },
        ];
        let mut adapter =
            PointToMaskAdapter::new(Box::new(MockSegmentationEngine::with_candidates(specs)));
        let image = test_image(100, 100, [0, 0, 0]);
        adapter.ensure_image_loaded(&image).unwrap();

        let mask = adapter.mask_at_point(ClickPoint::new(50, 50)).unwrap();

        // First-seen candidate is the small disc (radius 10); the radius-60
        // disc would cover far more pixels.
        let small_disc_area = mask.selected_pixels();
        assert!(small_disc_area < 500, "expected the first-seen candidate");
    }
}
