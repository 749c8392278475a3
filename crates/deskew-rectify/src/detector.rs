use deskew_geometry::Quadrilateral;
use deskew_image::GenericImage;

/// Margin of the customary fallback region, as a fraction of each side.
pub const DEFAULT_MARGIN: f64 = 0.05;

/// A source of document corners.
///
/// Implementations backed by a native detector live outside this crate; the rectifier
/// only consumes the returned quadrilateral.
pub trait DocumentEdgeDetector {
    /// Find the corners of the most prominent document in `image`, if any.
    fn detect(&self, image: &GenericImage) -> Option<Quadrilateral>;
}

/// Detector returning a fixed result, whatever the image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedQuadDetector {
    quad: Option<Quadrilateral>,
}

impl FixedQuadDetector {
    /// Create a detector that always reports `quad`.
    pub fn new(quad: Option<Quadrilateral>) -> Self {
        Self { quad }
    }
}

impl DocumentEdgeDetector for FixedQuadDetector {
    fn detect(&self, _image: &GenericImage) -> Option<Quadrilateral> {
        self.quad
    }
}

/// Detector reporting the image bounds shrunk by a margin on every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarginDetector {
    margin: f64,
}

impl Default for MarginDetector {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
        }
    }
}

impl MarginDetector {
    /// Create a detector with the given margin, a fraction in `[0, 0.5)`.
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }
}

impl DocumentEdgeDetector for MarginDetector {
    fn detect(&self, image: &GenericImage) -> Option<Quadrilateral> {
        let size = image.size();
        if size.width < 2 || size.height < 2 {
            return None;
        }
        Quadrilateral::inset(size, self.margin).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskew_geometry::Point2;
    use deskew_image::{Image, ImageError, ImageSize};

    fn image(width: usize, height: usize) -> Result<GenericImage, ImageError> {
        Ok(GenericImage::Mono8(Image::from_size_val(
            ImageSize { width, height },
            0,
        )?))
    }

    #[test]
    fn fixed_detector() -> Result<(), ImageError> {
        let quad = Quadrilateral::new([
            Point2::new(1.0, 1.0),
            Point2::new(5.0, 1.0),
            Point2::new(5.0, 5.0),
            Point2::new(1.0, 5.0),
        ]);
        let img = image(8, 8)?;
        assert_eq!(FixedQuadDetector::new(Some(quad)).detect(&img), Some(quad));
        assert_eq!(FixedQuadDetector::default().detect(&img), None);
        Ok(())
    }

    #[test]
    fn margin_detector() -> Result<(), ImageError> {
        let quad = MarginDetector::default().detect(&image(101, 201)?);
        let expected = Quadrilateral::new([
            Point2::new(5.0, 10.0),
            Point2::new(95.0, 10.0),
            Point2::new(95.0, 190.0),
            Point2::new(5.0, 190.0),
        ]);
        let quad = quad.map(|q| q.points).unwrap_or_default();
        for (p, e) in quad.iter().zip(expected.points.iter()) {
            approx::assert_relative_eq!(p.x, e.x, epsilon = 1e-9);
            approx::assert_relative_eq!(p.y, e.y, epsilon = 1e-9);
        }

        assert_eq!(MarginDetector::new(0.7).detect(&image(10, 10)?), None);
        assert_eq!(MarginDetector::default().detect(&image(1, 10)?), None);
        Ok(())
    }
}
