use deskew_geometry::GeometryError;
use deskew_image::ImageError;

/// An error type for the rectify module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RectifyError {
    /// The request is malformed, e.g. not exactly four points or an unusable target size.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No projective transform exists for the supplied corners.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The pixel format cannot be resampled without a prior conversion.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(&'static str),

    /// Error from the image container or the resampler.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl From<GeometryError> for RectifyError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidInput(msg) => RectifyError::InvalidInput(msg),
            GeometryError::DegenerateGeometry(msg) => RectifyError::DegenerateGeometry(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_keep_their_kind() {
        let err: RectifyError = GeometryError::InvalidInput("3 points".into()).into();
        assert_eq!(err, RectifyError::InvalidInput("3 points".into()));

        let err: RectifyError = GeometryError::DegenerateGeometry("collinear".into()).into();
        assert_eq!(err.to_string(), "Degenerate geometry: collinear");
    }
}
