//! Mapping between original and working resolution
//!
//! Segmentation and inpainting run at a bounded working resolution for
//! interactive latency; results are restored to the input's true size for
//! display. The two directions must round-trip exactly on dimensions.

use crate::{
    config::RemovalConfig,
    error::{EraserError, Result},
    types::ClickPoint,
};
use image::RgbImage;
use log::debug;

/// Reversible, deterministic transform between original and working
/// coordinate spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTransform {
    max_dim: u32,
}

/// A downscaled image together with the information needed to map back to
/// the original space
#[derive(Debug, Clone)]
pub struct WorkingImage {
    /// The image at working resolution
    pub image: RgbImage,

    /// Dimensions of the original input
    pub original_dimensions: (u32, u32),
}

impl WorkingImage {
    /// Dimensions of the working image
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Uniform scale factor applied during shrinking (1.0 when the input was
    /// small enough to pass through unchanged)
    #[must_use]
    pub fn scale(&self) -> f32 {
        let (orig_w, orig_h) = self.original_dimensions;
        let longer = orig_w.max(orig_h);
        if longer == 0 {
            return 1.0;
        }
        self.dimensions().0.max(self.dimensions().1) as f32 / longer as f32
    }

    /// Map a point from original coordinates into working coordinates.
    /// Returns `None` when the point lies outside the original image.
    /// Points on the far edge of the original can round past the working
    /// edge, so results are clamped into bounds.
    #[must_use]
    pub fn map_point(&self, point: ClickPoint) -> Option<ClickPoint> {
        if !point.in_bounds(self.original_dimensions) {
            return None;
        }

        let scale = self.scale();
        let (work_w, work_h) = self.dimensions();
        let x = ((point.x as f32 * scale).round() as u32).min(work_w.saturating_sub(1));
        let y = ((point.y as f32 * scale).round() as u32).min(work_h.saturating_sub(1));
        Some(ClickPoint::new(x, y))
    }
}

impl ResolutionTransform {
    /// Create a transform bounded by `max_dim`
    ///
    /// # Errors
    ///
    /// Returns `EraserError::InvalidConfig` when `max_dim` is zero.
    pub fn new(max_dim: u32) -> Result<Self> {
        if max_dim == 0 {
            return Err(EraserError::invalid_config(
                "max working dimension must be positive",
            ));
        }
        Ok(Self { max_dim })
    }

    /// Create a transform from a pipeline configuration
    pub fn from_config(config: &RemovalConfig) -> Result<Self> {
        Self::new(config.max_working_dim)
    }

    /// The configured bound on the working image's longer side
    #[must_use]
    pub fn max_dim(&self) -> u32 {
        self.max_dim
    }

    /// Downscale `image` so its longer side is at most `max_dim`, preserving
    /// aspect ratio. Small images pass through unchanged. Uses Lanczos
    /// resampling since shrinking discards detail permanently.
    #[must_use]
    pub fn shrink(&self, image: &RgbImage) -> WorkingImage {
        let (width, height) = image.dimensions();

        if width.max(height) <= self.max_dim {
            return WorkingImage {
                image: image.clone(),
                original_dimensions: (width, height),
            };
        }

        let (new_width, new_height) = if width >= height {
            let scaled = ((height as f32 * self.max_dim as f32 / width as f32).round() as u32)
                .max(1);
            (self.max_dim, scaled)
        } else {
            let scaled = ((width as f32 * self.max_dim as f32 / height as f32).round() as u32)
                .max(1);
            (scaled, self.max_dim)
        };

        debug!(
            "Shrinking {}x{} image to working resolution {}x{}",
            width, height, new_width, new_height
        );

        let working = image::imageops::resize(
            image,
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        );

        WorkingImage {
            image: working,
            original_dimensions: (width, height),
        }
    }

    /// Scale a working-resolution result back to `original_dimensions`
    /// exactly. Uses smooth resampling; the result is photographic and
    /// smooth interpolation minimizes visible seams.
    #[must_use]
    pub fn restore(&self, result: &RgbImage, original_dimensions: (u32, u32)) -> RgbImage {
        let (orig_w, orig_h) = original_dimensions;
        if result.dimensions() == original_dimensions {
            return result.clone();
        }

        image::imageops::resize(result, orig_w, orig_h, image::imageops::FilterType::Lanczos3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_image_passes_through() {
        let transform = ResolutionTransform::new(1024).unwrap();
        let image = RgbImage::new(800, 600);

        let working = transform.shrink(&image);
        assert_eq!(working.dimensions(), (800, 600));
        assert_eq!(working.original_dimensions, (800, 600));
        assert_eq!(working.scale(), 1.0);
    }

    #[test]
    fn test_shrink_bounds_longer_side() {
        let transform = ResolutionTransform::new(1024).unwrap();
        let image = RgbImage::new(2000, 1000);

        let working = transform.shrink(&image);
        assert_eq!(working.dimensions(), (1024, 512));
        assert_eq!(working.original_dimensions, (2000, 1000));
    }

    #[test]
    fn test_shrink_portrait_orientation() {
        let transform = ResolutionTransform::new(100).unwrap();
        let image = RgbImage::new(300, 600);

        let working = transform.shrink(&image);
        assert_eq!(working.dimensions(), (50, 100));
    }

    #[test]
    fn test_restore_round_trips_dimensions() {
        let transform = ResolutionTransform::new(256).unwrap();

        for (w, h) in [(1, 1), (255, 257), (1000, 333), (2000, 1000), (257, 4096)] {
            let image = RgbImage::new(w, h);
            let working = transform.shrink(&image);
            let restored = transform.restore(&working.image, working.original_dimensions);
            assert_eq!(restored.dimensions(), (w, h), "round trip for {w}x{h}");
        }
    }

    #[test]
    fn test_zero_max_dim_fails_fast() {
        assert!(matches!(
            ResolutionTransform::new(0),
            Err(EraserError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_map_point_scales_coordinates() {
        let transform = ResolutionTransform::new(1024).unwrap();
        let image = RgbImage::new(2000, 1000);
        let working = transform.shrink(&image);

        let mapped = working.map_point(ClickPoint::new(1000, 500)).unwrap();
        assert_eq!(mapped, ClickPoint::new(512, 256));
    }

    #[test]
    fn test_map_point_clamps_far_edge() {
        let transform = ResolutionTransform::new(1024).unwrap();
        let image = RgbImage::new(2000, 1000);
        let working = transform.shrink(&image);

        let mapped = working.map_point(ClickPoint::new(1999, 999)).unwrap();
        assert!(mapped.in_bounds(working.dimensions()));
    }

    #[test]
    fn test_map_point_rejects_out_of_bounds() {
        let transform = ResolutionTransform::new(1024).unwrap();
        let image = RgbImage::new(100, 100);
        let working = transform.shrink(&image);

        assert!(working.map_point(ClickPoint::new(100, 50)).is_none());
        assert!(working.map_point(ClickPoint::new(50, 100)).is_none());
    }

    #[test]
    fn test_identity_restore_keeps_pixels() {
        let transform = ResolutionTransform::new(64).unwrap();
        let image = RgbImage::from_pixel(32, 16, image::Rgb([10, 20, 30]));

        let restored = transform.restore(&image, (32, 16));
        assert_eq!(restored.get_pixel(5, 5).0, [10, 20, 30]);
    }
}
