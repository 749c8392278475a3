/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The input points are malformed, e.g. the wrong count or non-finite coordinates.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The points do not span a valid quadrilateral, e.g. collinear or coincident corners.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
