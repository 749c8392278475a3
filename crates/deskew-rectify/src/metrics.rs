use std::time::Duration;

use deskew_image::ImageSize;
use serde::{Deserialize, Serialize};

/// Report attached to every rectified image.
///
/// Serializes as
/// `{ width, height, dimensions: { width, height }, fast_rate, rack_cooling_rate, processing_time }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "MetricsReport", from = "MetricsReport")]
pub struct RectifyMetrics {
    /// output width in pixels
    pub width: usize,
    /// output height in pixels
    pub height: usize,
    /// output area in megapixels
    pub fast_rate: f64,
    /// output half perimeter divided by 1000
    pub rack_cooling_rate: f64,
    /// wall clock seconds spent ordering, sizing, solving and resampling
    pub processing_time: f64,
}

impl RectifyMetrics {
    /// Derive the metrics of an output of the given size.
    pub fn new(size: ImageSize, processing_time: Duration) -> Self {
        let (w, h) = (size.width, size.height);
        Self {
            width: w,
            height: h,
            fast_rate: (w * h) as f64 / 1_000_000.0,
            rack_cooling_rate: (w + h) as f64 / 1000.0,
            processing_time: processing_time.as_secs_f64(),
        }
    }

    /// The output size.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Dimensions {
    width: usize,
    height: usize,
}

#[derive(Serialize, Deserialize)]
struct MetricsReport {
    width: usize,
    height: usize,
    dimensions: Dimensions,
    fast_rate: f64,
    rack_cooling_rate: f64,
    processing_time: f64,
}

impl From<RectifyMetrics> for MetricsReport {
    fn from(m: RectifyMetrics) -> Self {
        Self {
            width: m.width,
            height: m.height,
            dimensions: Dimensions {
                width: m.width,
                height: m.height,
            },
            fast_rate: m.fast_rate,
            rack_cooling_rate: m.rack_cooling_rate,
            processing_time: m.processing_time,
        }
    }
}

impl From<MetricsReport> for RectifyMetrics {
    fn from(r: MetricsReport) -> Self {
        Self {
            width: r.dimensions.width,
            height: r.dimensions.height,
            fast_rate: r.fast_rate,
            rack_cooling_rate: r.rack_cooling_rate,
            processing_time: r.processing_time,
        }
    }
}
