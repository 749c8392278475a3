use deskew_imgproc::{
    interpolation::{BorderMode, InterpolationMode},
    parallel::ExecutionStrategy,
};
use serde::{Deserialize, Serialize};

use crate::RectifyError;

/// Smallest output side produced by size estimation.
pub const DEFAULT_MIN_SIZE: usize = 10;

/// Largest output accepted by default, in pixels.
pub const DEFAULT_MAX_OUTPUT_PIXELS: usize = 100_000_000;

/// Keeps estimated output sizes close to an expected document shape.
///
/// The ratio is orientation free: it always compares the long side with the short side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectRatioPolicy {
    /// expected `long / short` ratio of the rectified document
    pub expected_ratio: f64,
    /// accepted relative deviation from the expected ratio
    pub tolerance: f64,
}

impl Default for AspectRatioPolicy {
    /// An ID-1 card (85.60 x 53.98 mm) with a 15% tolerance band.
    fn default() -> Self {
        Self {
            expected_ratio: 1.586,
            tolerance: 0.15,
        }
    }
}

impl AspectRatioPolicy {
    /// The accepted `[min, max]` ratio band.
    pub fn band(&self) -> (f64, f64) {
        (
            self.expected_ratio * (1.0 - self.tolerance),
            self.expected_ratio * (1.0 + self.tolerance),
        )
    }

    fn validate(&self) -> Result<(), RectifyError> {
        if !(self.expected_ratio.is_finite() && self.expected_ratio >= 1.0) {
            return Err(RectifyError::InvalidInput(format!(
                "expected aspect ratio must be a finite long/short ratio >= 1, got {}",
                self.expected_ratio
            )));
        }
        if !(0.0..1.0).contains(&self.tolerance) {
            return Err(RectifyError::InvalidInput(format!(
                "aspect ratio tolerance must be in [0, 1), got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Options of a [`crate::PerspectiveRectifier`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifierConfig {
    /// how source pixels are sampled
    pub interpolation: InterpolationMode,
    /// what is written where the source has no pixel
    pub border: BorderMode,
    /// optional correction of estimated sizes
    pub aspect_ratio: Option<AspectRatioPolicy>,
    /// lower bound for estimated output sides
    pub min_size: usize,
    /// upper bound for `width * height` of the output, estimated or requested
    pub max_output_pixels: usize,
    /// serial or row parallel resampling
    pub strategy: ExecutionStrategy,
}

impl Default for RectifierConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::default(),
            border: BorderMode::default(),
            aspect_ratio: None,
            min_size: DEFAULT_MIN_SIZE,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl RectifierConfig {
    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the border mode.
    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }

    /// Set or clear the aspect ratio policy.
    pub fn with_aspect_ratio(mut self, aspect_ratio: Option<AspectRatioPolicy>) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the lower bound for estimated output sides.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the upper bound for the number of output pixels.
    pub fn with_max_output_pixels(mut self, max_output_pixels: usize) -> Self {
        self.max_output_pixels = max_output_pixels;
        self
    }

    /// Set the execution strategy of the resampler.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check that the options describe a usable rectifier.
    ///
    /// # Errors
    ///
    /// Returns [`RectifyError::InvalidInput`] if `min_size` is below 2, `max_output_pixels`
    /// cannot hold a `min_size` square or the aspect ratio policy is malformed.
    pub fn validate(&self) -> Result<(), RectifyError> {
        if self.min_size < 2 {
            return Err(RectifyError::InvalidInput(format!(
                "min_size must be at least 2, got {}",
                self.min_size
            )));
        }
        if self
            .min_size
            .checked_mul(self.min_size)
            .map_or(true, |area| area > self.max_output_pixels)
        {
            return Err(RectifyError::InvalidInput(format!(
                "max_output_pixels {} is smaller than a {}x{} output",
                self.max_output_pixels, self.min_size, self.min_size
            )));
        }
        if let Some(policy) = &self.aspect_ratio {
            policy.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = RectifierConfig::default();
        assert_eq!(config.interpolation, InterpolationMode::Bilinear);
        assert_eq!(config.border, BorderMode::Transparent);
        assert_eq!(config.aspect_ratio, None);
        assert_eq!(config.min_size, 10);
        assert_eq!(config.max_output_pixels, DEFAULT_MAX_OUTPUT_PIXELS);
        assert_eq!(config.strategy, ExecutionStrategy::ParallelRows);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_from_partial_json() -> Result<(), serde_json::Error> {
        let config: RectifierConfig = serde_json::from_str(
            r#"{
                "interpolation": "bicubic",
                "border": { "constant": [255.0, 255.0, 255.0, 255.0] },
                "aspect_ratio": { "tolerance": 0.1 }
            }"#,
        )?;
        assert_eq!(config.interpolation, InterpolationMode::Bicubic);
        assert_eq!(config.border, BorderMode::Constant([255.0; 4]));
        assert_eq!(
            config.aspect_ratio,
            Some(AspectRatioPolicy {
                expected_ratio: 1.586,
                tolerance: 0.1
            })
        );
        assert_eq!(config.min_size, 10);
        Ok(())
    }

    #[test]
    fn config_validate() {
        let config = RectifierConfig::default().with_min_size(1);
        assert!(matches!(
            config.validate(),
            Err(RectifyError::InvalidInput(_))
        ));

        let config = RectifierConfig::default().with_max_output_pixels(99);
        assert!(matches!(
            config.validate(),
            Err(RectifyError::InvalidInput(_))
        ));

        let config = RectifierConfig::default().with_aspect_ratio(Some(AspectRatioPolicy {
            expected_ratio: 0.5,
            tolerance: 0.1,
        }));
        assert!(matches!(
            config.validate(),
            Err(RectifyError::InvalidInput(_))
        ));
    }
}
