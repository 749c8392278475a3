#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the geometry module.
pub mod error;

/// homography estimation from point correspondences.
pub mod homography;

/// small fixed-size linear algebra helpers.
pub mod linalg;

/// 2d points.
pub mod point;

/// quadrilaterals and corner ordering.
pub mod quad;

pub use crate::error::GeometryError;
pub use crate::homography::Homography;
pub use crate::point::Point2;
pub use crate::quad::{order_points, CoordinateOrigin, OrderedQuad, Quadrilateral};
