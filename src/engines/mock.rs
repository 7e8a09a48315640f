//! Mock engines for testing pipeline behavior
//!
//! These implementations are deterministic and run without model files,
//! so the full pipeline can be exercised in unit and integration tests.
//! They record call history for verification and can be configured to fail
//! at specific points.

use crate::{
    engines::{InpaintingEngine, SegmentationEngine},
    error::{EraserError, Result},
    types::{BinaryMask, ClickPoint, SegmentationCandidate, MASK_ERASE, MASK_KEEP},
};
use image::RgbImage;
use std::sync::{Arc, Mutex};

/// A candidate the mock segmentation engine will produce: a filled disc
/// centered on the click point.
#[derive(Debug, Clone, Copy)]
pub struct MockCandidateSpec {
    /// Disc radius as a fraction of the shorter image side
    pub radius_fraction: f32,
    /// Confidence score reported for the candidate
    pub score: f32,
}

/// Mock segmentation engine producing nested disc masks around the click
#[derive(Debug, Clone)]
pub struct MockSegmentationEngine {
    /// Dimensions of the image currently "embedded", if any
    loaded_dimensions: Option<(u32, u32)>,
    /// Candidates produced per prediction, in emission order
    candidate_specs: Vec<MockCandidateSpec>,
    /// Call history for verification in tests
    call_history: Arc<Mutex<Vec<String>>>,
    /// Whether to simulate `set_image` failure
    should_fail_set_image: bool,
    /// Whether to simulate `predict` failure
    should_fail_predict: bool,
    /// Whether to return zero candidates (engine-contract violation)
    return_empty: bool,
}

impl MockSegmentationEngine {
    /// Create a mock engine with three nested candidates; the middle one
    /// carries the highest score.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaded_dimensions: None,
            candidate_specs: vec![
                MockCandidateSpec {
                    radius_fraction: 0.15,
                    score: 0.65,
                },
                MockCandidateSpec {
                    radius_fraction: 0.35,
                    score: 0.95,
                },
                MockCandidateSpec {
                    radius_fraction: 0.60,
                    score: 0.80,
                },
            ],
            call_history: Arc::new(Mutex::new(Vec::new())),
            should_fail_set_image: false,
            should_fail_predict: false,
            return_empty: false,
        }
    }

    /// Create a mock engine with explicit candidate specs
    #[must_use]
    pub fn with_candidates(specs: Vec<MockCandidateSpec>) -> Self {
        let mut engine = Self::new();
        engine.candidate_specs = specs;
        engine
    }

    /// Create a mock engine that fails during `set_image`
    #[must_use]
    pub fn new_failing_set_image() -> Self {
        let mut engine = Self::new();
        engine.should_fail_set_image = true;
        engine
    }

    /// Create a mock engine that fails during `predict`
    #[must_use]
    pub fn new_failing_predict() -> Self {
        let mut engine = Self::new();
        engine.should_fail_predict = true;
        engine
    }

    /// Create a mock engine that returns zero candidates
    #[must_use]
    pub fn new_empty_candidates() -> Self {
        let mut engine = Self::new();
        engine.return_empty = true;
        engine
    }

    /// Get the call history for verification in tests
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    /// Handle to the shared call history, usable after the engine has been
    /// moved into a pipeline
    #[must_use]
    pub fn call_history_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.call_history)
    }

    fn record_call(&self, method: &str) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(method.to_string());
        }
    }

    /// Build a filled-disc mask centered at `point`
    fn disc_mask(dimensions: (u32, u32), point: ClickPoint, radius: f32) -> BinaryMask {
        let (width, height) = dimensions;
        let mut data = vec![MASK_KEEP; (width as usize) * (height as usize)];
        let cx = point.x as f32;
        let cy = point.y as f32;

        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if (dx * dx + dy * dy).sqrt() <= radius {
                    if let Some(sample) = data.get_mut((y * width + x) as usize) {
                        *sample = MASK_ERASE;
                    }
                }
            }
        }

        BinaryMask::new(data, dimensions)
    }
}

impl Default for MockSegmentationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentationEngine for MockSegmentationEngine {
    fn set_image(&mut self, image: &RgbImage) -> Result<()> {
        self.record_call("set_image");

        if self.should_fail_set_image {
            return Err(EraserError::engine(
                "mock segmentation engine failed to embed image",
            ));
        }

        self.loaded_dimensions = Some(image.dimensions());
        Ok(())
    }

    fn predict(
        &mut self,
        point: ClickPoint,
        multimask: bool,
    ) -> Result<Vec<SegmentationCandidate>> {
        self.record_call("predict");

        if self.should_fail_predict {
            return Err(EraserError::engine("mock segmentation inference failed"));
        }

        let dimensions = self
            .loaded_dimensions
            .ok_or_else(|| EraserError::engine("predict called before set_image"))?;

        if self.return_empty {
            return Ok(Vec::new());
        }

        let shorter = dimensions.0.min(dimensions.1) as f32;
        let specs = if multimask {
            self.candidate_specs.clone()
        } else {
            self.candidate_specs.first().copied().into_iter().collect()
        };

        Ok(specs
            .iter()
            .map(|spec| {
                let radius = (spec.radius_fraction * shorter).max(1.0);
                SegmentationCandidate::new(Self::disc_mask(dimensions, point, radius), spec.score)
            })
            .collect())
    }
}

/// Mock inpainting engine that fills the masked region with the mean color
/// of the unmasked pixels
#[derive(Debug, Clone)]
pub struct MockInpaintingEngine {
    /// Call history for verification in tests
    call_history: Arc<Mutex<Vec<String>>>,
    /// Fixed fill color instead of the computed mean
    fill_color: Option<[u8; 3]>,
    /// Whether to simulate inference failure
    should_fail: bool,
    /// Whether to return an image of the wrong size (contract violation)
    return_wrong_size: bool,
}

impl MockInpaintingEngine {
    /// Create a new mock inpainting engine
    #[must_use]
    pub fn new() -> Self {
        Self {
            call_history: Arc::new(Mutex::new(Vec::new())),
            fill_color: None,
            should_fail: false,
            return_wrong_size: false,
        }
    }

    /// Create a mock engine that fills with a fixed color
    #[must_use]
    pub fn with_fill_color(color: [u8; 3]) -> Self {
        let mut engine = Self::new();
        engine.fill_color = Some(color);
        engine
    }

    /// Create a mock engine that fails during inference
    #[must_use]
    pub fn new_failing() -> Self {
        let mut engine = Self::new();
        engine.should_fail = true;
        engine
    }

    /// Create a mock engine that violates the same-size contract
    #[must_use]
    pub fn new_wrong_size() -> Self {
        let mut engine = Self::new();
        engine.return_wrong_size = true;
        engine
    }

    /// Get the call history for verification in tests
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    /// Handle to the shared call history, usable after the engine has been
    /// moved into a pipeline
    #[must_use]
    pub fn call_history_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.call_history)
    }

    fn record_call(&self, method: &str) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(method.to_string());
        }
    }

    /// Mean color of the unmasked pixels, or mid-gray when everything is
    /// masked
    fn mean_keep_color(image: &RgbImage, mask: &BinaryMask) -> [u8; 3] {
        let mut sums = [0_u64; 3];
        let mut count = 0_u64;

        for (i, pixel) in image.pixels().enumerate() {
            if mask.data.get(i).copied().unwrap_or(MASK_KEEP) == MASK_KEEP {
                sums[0] += u64::from(pixel[0]);
                sums[1] += u64::from(pixel[1]);
                sums[2] += u64::from(pixel[2]);
                count += 1;
            }
        }

        if count == 0 {
            return [128, 128, 128];
        }
        [
            (sums[0] / count) as u8,
            (sums[1] / count) as u8,
            (sums[2] / count) as u8,
        ]
    }
}

impl Default for MockInpaintingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InpaintingEngine for MockInpaintingEngine {
    fn infer(&self, image: &RgbImage, mask: &BinaryMask) -> Result<RgbImage> {
        self.record_call("infer");

        if self.should_fail {
            return Err(EraserError::engine("mock inpainting inference failed"));
        }

        if self.return_wrong_size {
            return Ok(RgbImage::new(1, 1));
        }

        let fill = self
            .fill_color
            .unwrap_or_else(|| Self::mean_keep_color(image, mask));

        let (width, height) = image.dimensions();
        let mut result = image.clone();
        for y in 0..height {
            for x in 0..width {
                let index = (y * width + x) as usize;
                if mask.data.get(index).copied().unwrap_or(MASK_KEEP) == MASK_ERASE {
                    result.put_pixel(x, y, image::Rgb(fill));
                }
            }
        }

        Ok(result)
    }
}
