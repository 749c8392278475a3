use crate::{
    interpolation::{interpolate_pixel, BorderMode, InterpolationMode},
    parallel::{self, ExecutionStrategy},
};

use deskew_geometry::linalg::inverse_mat33;
use deskew_image::{Image, ImageDtype, ImageError};

fn transform_point(x: f64, y: f64, m: &[[f64; 3]; 3]) -> (f64, f64) {
    let w = m[2][0] * x + m[2][1] * y + m[2][2];
    let xw = (m[0][0] * x + m[0][1] * y + m[0][2]) / w;
    let yw = (m[1][0] * x + m[1][1] * y + m[1][2]) / w;
    (xw, yw)
}

/// Whether a sample position lies on the source image, pixel centers being at integers.
fn in_bounds(x: f64, y: f64, cols: usize, rows: usize) -> bool {
    x >= -0.5 && x <= cols as f64 - 0.5 && y >= -0.5 && y <= rows as f64 - 0.5
}

/// Applies a perspective transformation to an image.
///
/// Every destination pixel `(x, y)` is mapped back into the source through the inverse of
/// `m` and sampled with the given interpolation. Samples landing outside the source are
/// filled according to `border`.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 3x3 perspective transformation matrix src -> dst, row-major.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - How to fill pixels without a source sample.
/// * `strategy` - Whether destination rows are processed in parallel.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the source image is empty and
/// [`ImageError::CannotComputeDeterminant`] if `m` is not invertible.
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[[f64; 3]; 3],
    interpolation: InterpolationMode,
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    if src.cols() == 0 || src.rows() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let inv_m = inverse_mat33(m).ok_or(ImageError::CannotComputeDeterminant)?;
    let fill = border.fill_value::<C>();
    let (src_cols, src_rows) = (src.cols(), src.rows());

    parallel::iter_rows_indexed(dst, strategy, |x, y, dst_pixel| {
        let (u, v) = transform_point(x as f64, y as f64, &inv_m);

        let value = match fill {
            _ if !(u.is_finite() && v.is_finite()) => fill.unwrap_or([0.0; C]),
            Some(fill) if !in_bounds(u, v, src_cols, src_rows) => fill,
            _ => interpolate_pixel(src, u as f32, v as f32, interpolation),
        };

        dst_pixel
            .iter_mut()
            .zip(value.iter())
            .for_each(|(p, &val)| *p = T::from_f32(val));
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskew_image::ImageSize;

    fn ramp4x4() -> Result<Image<f32, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (0..16).map(|v| v as f32).collect(),
        )
    }

    fn warp<T: ImageDtype, const C: usize>(
        src: &Image<T, C>,
        new_size: ImageSize,
        m: &[[f64; 3]; 3],
        border: BorderMode,
    ) -> Result<Image<T, C>, ImageError> {
        let mut dst = Image::from_size_val(new_size, T::default())?;
        warp_perspective(
            src,
            &mut dst,
            m,
            InterpolationMode::Bilinear,
            border,
            ExecutionStrategy::ParallelRows,
        )?;
        Ok(dst)
    }

    #[test]
    fn transform_point_shift() {
        let m = [[1.0, 0.0, -1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]];
        assert_eq!(transform_point(1.0, 1.0, &m), (0.0, 2.0));
    }

    #[test]
    fn warp_perspective_identity() -> Result<(), ImageError> {
        let image = ramp4x4()?;
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };
        let image_transformed = warp(&image, new_size, &m, BorderMode::Transparent)?;

        assert_eq!(image_transformed.num_channels(), 1);
        assert_eq!(image_transformed.size(), new_size);
        assert_eq!(image_transformed.as_slice(), &[0.0, 1.0, 4.0, 5.0, 8.0, 9.0]);

        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let m = [[-1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let image_transformed = warp(&image, image.size(), &m, BorderMode::Transparent)?;

        assert_eq!(image_transformed.as_slice(), &[1.0, 0.0, 3.0, 2.0, 5.0, 4.0]);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift() -> Result<(), ImageError> {
        let image = ramp4x4()?;

        // shift left by 1 pixel
        let m = [[1.0, 0.0, -1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

        let image_transformed = warp(&image, image.size(), &m, BorderMode::Transparent)?;
        assert_eq!(
            image_transformed.as_slice(),
            &[1.0, 2.0, 3.0, 0.0, 5.0, 6.0, 7.0, 0.0, 9.0, 10.0, 11.0, 0.0, 13.0, 14.0, 15.0, 0.0]
        );

        let image_transformed = warp(&image, image.size(), &m, BorderMode::Replicate)?;
        assert_eq!(
            image_transformed.as_slice(),
            &[1.0, 2.0, 3.0, 3.0, 5.0, 6.0, 7.0, 7.0, 9.0, 10.0, 11.0, 11.0, 13.0, 14.0, 15.0, 15.0]
        );

        let image_transformed =
            warp(&image, image.size(), &m, BorderMode::Constant([-1.0; 4]))?;
        assert_eq!(image_transformed.get([2, 3, 0]), Some(&-1.0));

        Ok(())
    }

    #[test]
    fn warp_perspective_downscale() -> Result<(), ImageError> {
        let image = ramp4x4()?;

        // maps the corner pixel centers of the source onto a 2x2 grid
        let m = [[1.0 / 3.0, 0.0, 0.0], [0.0, 1.0 / 3.0, 0.0], [0.0, 0.0, 1.0]];
        let new_size = ImageSize {
            width: 2,
            height: 2,
        };
        let image_transformed = warp(&image, new_size, &m, BorderMode::Transparent)?;

        let expected = [0.0f32, 3.0, 12.0, 15.0];
        for (a, b) in image_transformed.as_slice().iter().zip(expected.iter()) {
            approx::assert_relative_eq!(*a, *b, epsilon = 1e-4);
        }

        Ok(())
    }

    #[test]
    fn warp_perspective_rgba_transparent_border() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let image = Image::<u8, 4>::from_size_val(size, 200)?;

        let m = [[1.0, 0.0, 2.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let image_transformed = warp(&image, size, &m, BorderMode::Transparent)?;

        assert_eq!(image_transformed.get_pixel(0, 1)?, &[0, 0, 0, 0]);
        assert_eq!(image_transformed.get_pixel(2, 1)?, &[200, 200, 200, 200]);

        Ok(())
    }

    #[test]
    fn warp_perspective_singular() -> Result<(), ImageError> {
        let image = ramp4x4()?;
        let m = [[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]];
        let res = warp(&image, image.size(), &m, BorderMode::Transparent);
        assert_eq!(res, Err(ImageError::CannotComputeDeterminant));
        Ok(())
    }

    #[test]
    fn warp_perspective_empty_source() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 0,
                height: 0,
            },
            vec![],
        )?;
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let res = warp(
            &image,
            ImageSize {
                width: 2,
                height: 2,
            },
            &m,
            BorderMode::Transparent,
        );
        assert!(matches!(res, Err(ImageError::InvalidImageSize(..))));
        Ok(())
    }
}
