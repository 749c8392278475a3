#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// rectifier configuration.
pub mod config;

/// capability interface for corner detectors.
pub mod detector;

/// output size estimation.
pub mod dimensions;

/// Error types for the rectify module.
pub mod error;

/// rectification report.
pub mod metrics;

/// corner visualization.
pub mod overlay;

/// the perspective rectifier.
pub mod rectifier;

pub use crate::config::{AspectRatioPolicy, RectifierConfig};
pub use crate::detector::{DocumentEdgeDetector, FixedQuadDetector, MarginDetector};
pub use crate::error::RectifyError;
pub use crate::metrics::RectifyMetrics;
pub use crate::overlay::draw_quadrilateral_overlay;
pub use crate::rectifier::{PerspectiveRectifier, RectificationPlan, RectifiedImage, Rectifier};
