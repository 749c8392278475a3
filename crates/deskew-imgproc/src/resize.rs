use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::parallel::{self, ExecutionStrategy};
use deskew_image::{Image, ImageDtype, ImageError};

/// Evenly spaced sample positions covering `[0, src_len - 1]` with `dst_len` samples.
fn linspace_step(src_len: usize, dst_len: usize) -> f32 {
    if dst_len > 1 {
        (src_len - 1) as f32 / (dst_len - 1) as f32
    } else {
        0.0
    }
}

/// Resize an image to a new size.
///
/// The corner pixel centers of the source and the destination are aligned, and every
/// destination pixel is interpolated from the source with the given mode.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, whose size is the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if either image is empty.
///
/// # Example
///
/// ```
/// use deskew_image::{Image, ImageSize};
/// use deskew_imgproc::interpolation::InterpolationMode;
/// use deskew_imgproc::resize::resize_native;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size().area() == 0 || dst.size().area() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let step_x = linspace_step(src.cols(), dst.cols());
    let step_y = linspace_step(src.rows(), dst.rows());

    parallel::iter_rows_indexed(dst, ExecutionStrategy::ParallelRows, |x, y, dst_pixel| {
        let (u, v) = (x as f32 * step_x, y as f32 * step_y);
        let value = interpolate_pixel(src, u, v, interpolation);
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

    #[test]
    fn resize_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0u8; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0)?;
        resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.num_channels(), 3);
        assert_eq!(image_resized.size(), new_size);
        Ok(())
    }

    #[test]
    fn resize_corners_aligned() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (0..16).map(|v| v as f32).collect(),
        )?;

        let mut image_resized = Image::<_, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0.0,
        )?;
        resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.as_slice(), &[0.0, 3.0, 12.0, 15.0]);
        Ok(())
    }

    #[test]
    fn resize_upscale_interpolates() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0u8, 100],
        )?;

        let mut image_resized = Image::<_, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 1,
            },
            0,
        )?;
        resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.as_slice(), &[0, 50, 100]);
        Ok(())
    }
}
