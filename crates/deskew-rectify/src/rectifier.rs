use std::time::Instant;

use deskew_geometry::{order_points, Homography, OrderedQuad, Point2};
use deskew_image::{GenericImage, Image, ImageDtype, ImageSize};
use deskew_imgproc::warp::warp_perspective;

use crate::{dimensions, RectifierConfig, RectifyError, RectifyMetrics};

/// Maps a quadrilateral region of an image onto an axis aligned rectangle.
pub trait Rectifier {
    /// Rectify the region bounded by `points`.
    ///
    /// # Arguments
    ///
    /// * `image` - The source image.
    /// * `points` - The four corners of the region, in any order.
    /// * `target_width` - The output width, estimated from the corners when `None`.
    /// * `target_height` - The output height, estimated from the corners when `None`.
    ///
    /// # Errors
    ///
    /// See [`RectifyError`] for the failure taxonomy.
    fn rectify(
        &self,
        image: &GenericImage,
        points: &[Point2],
        target_width: Option<usize>,
        target_height: Option<usize>,
    ) -> Result<RectifiedImage, RectifyError>;
}

/// The geometric part of a rectification: ordered corners, output size and transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectificationPlan {
    /// the source corners in top-left, top-right, bottom-right, bottom-left order
    pub corners: OrderedQuad,
    /// the output size
    pub size: ImageSize,
    /// the transform from source to output pixel coordinates
    pub homography: Homography,
}

impl RectificationPlan {
    /// The output corners `(0, 0), (W-1, 0), (W-1, H-1), (0, H-1)`.
    pub fn destination_corners(&self) -> [Point2; 4] {
        destination_corners(self.size)
    }
}

fn destination_corners(size: ImageSize) -> [Point2; 4] {
    let (w, h) = ((size.width - 1) as f64, (size.height - 1) as f64);
    [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ]
}

/// The result of a rectification.
#[derive(Clone, Debug, PartialEq)]
pub struct RectifiedImage {
    /// the rectified pixels, in the pixel format of the source
    pub image: GenericImage,
    /// size and timing report
    pub metrics: RectifyMetrics,
    /// the source corners that were used, in canonical order
    pub corners: OrderedQuad,
    /// the transform from source to output pixel coordinates
    pub homography: Homography,
}

/// Rectifier that solves a homography from the four corners and resamples the image
/// through it.
///
/// # Example
///
/// ```
/// use deskew_geometry::Point2;
/// use deskew_image::{GenericImage, Image, ImageSize};
/// use deskew_rectify::{PerspectiveRectifier, Rectifier};
///
/// let size = ImageSize { width: 64, height: 48 };
/// let image = GenericImage::Rgb8(Image::from_size_val(size, 128u8).unwrap());
///
/// let points = [
///     Point2::new(50.0, 40.0),
///     Point2::new(4.0, 2.0),
///     Point2::new(60.0, 5.0),
///     Point2::new(2.0, 44.0),
/// ];
///
/// let rectified = PerspectiveRectifier::default()
///     .rectify(&image, &points, None, None)
///     .unwrap();
///
/// assert_eq!(rectified.image.format_name(), "rgb8");
/// assert!(rectified.metrics.width >= 10 && rectified.metrics.height >= 10);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerspectiveRectifier {
    config: RectifierConfig,
}

impl PerspectiveRectifier {
    /// Create a rectifier with the given options.
    pub fn new(config: RectifierConfig) -> Self {
        Self { config }
    }

    /// The options of the rectifier.
    pub fn config(&self) -> &RectifierConfig {
        &self.config
    }

    /// Order the corners, decide the output size and solve the homography.
    ///
    /// # Errors
    ///
    /// Returns [`RectifyError::InvalidInput`] for a malformed request and
    /// [`RectifyError::DegenerateGeometry`] if the corners do not span a quadrilateral.
    pub fn plan(
        &self,
        points: &[Point2],
        target_width: Option<usize>,
        target_height: Option<usize>,
    ) -> Result<RectificationPlan, RectifyError> {
        self.config.validate()?;

        let corners = order_points(points)?;
        corners.ensure_non_degenerate()?;

        let size = dimensions::resolve_output_size(
            &corners,
            target_width,
            target_height,
            &self.config,
        )?;
        log::debug!("output size {size}");

        let homography =
            Homography::from_correspondences(&corners.to_array(), &destination_corners(size))?;
        log::debug!("homography {:?}", homography.matrix());

        Ok(RectificationPlan {
            corners,
            size,
            homography,
        })
    }

    fn warp<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        plan: &RectificationPlan,
    ) -> Result<Image<T, C>, RectifyError> {
        let mut dst = Image::from_size_val(plan.size, T::default())?;
        warp_perspective(
            src,
            &mut dst,
            plan.homography.matrix(),
            self.config.interpolation,
            self.config.border,
            self.config.strategy,
        )?;
        Ok(dst)
    }

    fn warp_generic(
        &self,
        image: &GenericImage,
        plan: &RectificationPlan,
    ) -> Result<GenericImage, RectifyError> {
        let out = match image {
            GenericImage::Mono8(img) => GenericImage::Mono8(self.warp(img, plan)?),
            GenericImage::MonoAlpha8(img) => GenericImage::MonoAlpha8(self.warp(img, plan)?),
            GenericImage::Rgb8(img) => GenericImage::Rgb8(self.warp(img, plan)?),
            GenericImage::Rgba8(img) => GenericImage::Rgba8(self.warp(img, plan)?),
            GenericImage::Mono16(img) => GenericImage::Mono16(self.warp(img, plan)?),
            GenericImage::Rgb16(img) => GenericImage::Rgb16(self.warp(img, plan)?),
            GenericImage::Rgba16(img) => GenericImage::Rgba16(self.warp(img, plan)?),
            GenericImage::Rgb32F(img) => GenericImage::Rgb32F(self.warp(img, plan)?),
            GenericImage::Rgba32F(img) => GenericImage::Rgba32F(self.warp(img, plan)?),
            GenericImage::Indexed8 { .. } => {
                return Err(RectifyError::UnsupportedPixelFormat(image.format_name()))
            }
        };
        Ok(out)
    }
}

impl Rectifier for PerspectiveRectifier {
    fn rectify(
        &self,
        image: &GenericImage,
        points: &[Point2],
        target_width: Option<usize>,
        target_height: Option<usize>,
    ) -> Result<RectifiedImage, RectifyError> {
        // palette indices cannot be interpolated, fail before doing any work
        if let GenericImage::Indexed8 { .. } = image {
            return Err(RectifyError::UnsupportedPixelFormat(image.format_name()));
        }

        let start = Instant::now();

        let plan = self.plan(points, target_width, target_height)?;
        let rectified = self.warp_generic(image, &plan)?;

        let elapsed = start.elapsed();
        log::debug!(
            "rectified {} {} image to {} in {:.3} ms",
            image.size(),
            image.format_name(),
            plan.size,
            elapsed.as_secs_f64() * 1e3
        );

        Ok(RectifiedImage {
            image: rectified,
            metrics: RectifyMetrics::new(plan.size, elapsed),
            corners: plan.corners,
            homography: plan.homography,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_points() -> [Point2; 4] {
        [
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 0.0),
        ]
    }

    #[test]
    fn plan_square() -> Result<(), RectifyError> {
        let plan = PerspectiveRectifier::default().plan(&square_points(), None, None)?;
        assert_eq!(plan.size, ImageSize::from([100usize, 100]));
        assert_eq!(plan.corners.top_right, Point2::new(100.0, 0.0));

        let inv = plan.homography.inverse()?;
        for (d, s) in plan
            .destination_corners()
            .iter()
            .zip(plan.corners.to_array().iter())
        {
            let p = inv.transform_point(d);
            assert_relative_eq!(p.x, s.x, epsilon = 1e-6);
            assert_relative_eq!(p.y, s.y, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn plan_rejects_bad_config() {
        let rectifier = PerspectiveRectifier::new(RectifierConfig::default().with_min_size(0));
        let res = rectifier.plan(&square_points(), None, None);
        assert!(matches!(res, Err(RectifyError::InvalidInput(_))));
    }

    #[test]
    fn rectify_keeps_format() -> Result<(), RectifyError> {
        let size = ImageSize {
            width: 120,
            height: 120,
        };
        let rectifier = PerspectiveRectifier::default();
        let images = [
            GenericImage::Mono8(Image::from_size_val(size, 1)?),
            GenericImage::MonoAlpha8(Image::from_size_val(size, 1)?),
            GenericImage::Mono16(Image::from_size_val(size, 1)?),
            GenericImage::Rgb16(Image::from_size_val(size, 1)?),
            GenericImage::Rgba16(Image::from_size_val(size, 1)?),
            GenericImage::Rgb32F(Image::from_size_val(size, 0.5)?),
            GenericImage::Rgba32F(Image::from_size_val(size, 0.5)?),
        ];
        for image in images.iter() {
            let out = rectifier.rectify(image, &square_points(), Some(40), Some(30))?;
            assert_eq!(out.image.format_name(), image.format_name());
            assert_eq!(out.image.size(), ImageSize::from([40usize, 30]));
            assert_eq!(out.metrics.size(), out.image.size());
        }
        Ok(())
    }

    #[test]
    fn rectify_indexed_unsupported() -> Result<(), RectifyError> {
        let image = GenericImage::Indexed8 {
            indices: Image::from_size_val(
                ImageSize {
                    width: 4,
                    height: 4,
                },
                0,
            )?,
            palette: vec![[0, 0, 0, 255]],
        };
        let res = PerspectiveRectifier::default().rectify(&image, &square_points(), None, None);
        assert_eq!(res, Err(RectifyError::UnsupportedPixelFormat("indexed8")));
        Ok(())
    }
}
