use crate::parallel;
use deskew_image::{Image, ImageError};

fn check_same_size<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &Image<T2, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Convert a grayscale image to RGBA by replicating the gray value into the color channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGBA image.
/// * `alpha` - The alpha value written to every pixel, usually the opaque value of `T`.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use deskew_image::{Image, ImageSize};
/// use deskew_imgproc::color::rgba_from_gray;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![10, 20],
/// )
/// .unwrap();
///
/// let mut rgba = Image::<u8, 4>::from_size_val(image.size(), 0).unwrap();
///
/// rgba_from_gray(&image, &mut rgba, 255).unwrap();
/// assert_eq!(rgba.as_slice(), &[10, 10, 10, 255, 20, 20, 20, 255]);
/// ```
pub fn rgba_from_gray<T>(
    src: &Image<T, 1>,
    dst: &mut Image<T, 4>,
    alpha: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let gray = src_pixel[0];
        dst_pixel.copy_from_slice(&[gray, gray, gray, alpha]);
    });

    Ok(())
}

/// Convert a grayscale image with alpha to RGBA, keeping its alpha channel.
///
/// Precondition: the input and output images must have the same size.
pub fn rgba_from_gray_alpha<T>(
    src: &Image<T, 2>,
    dst: &mut Image<T, 4>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (gray, alpha) = (src_pixel[0], src_pixel[1]);
        dst_pixel.copy_from_slice(&[gray, gray, gray, alpha]);
    });

    Ok(())
}

/// Convert an RGB image to RGBA with a constant alpha value.
///
/// Precondition: the input and output images must have the same size.
pub fn rgba_from_rgb<T>(
    src: &Image<T, 3>,
    dst: &mut Image<T, 4>,
    alpha: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[..3].copy_from_slice(src_pixel);
        dst_pixel[3] = alpha;
    });

    Ok(())
}

/// Drop the alpha channel of an RGBA image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_rgba<T>(src: &Image<T, 4>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.copy_from_slice(&src_pixel[..3]);
    });

    Ok(())
}

/// Convert a 16 bit image to 8 bit by rescaling `[0, 65535]` onto `[0, 255]`.
///
/// Precondition: the input and output images must have the same size.
pub fn u8_from_u16<const C: usize>(
    src: &Image<u16, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter())
            .for_each(|(d, &s)| *d = ((s as u32 + 128) / 257) as u8);
    });

    Ok(())
}

/// Convert a float image with values in `[0, 1]` to 8 bit, saturating out of range values.
///
/// Precondition: the input and output images must have the same size.
pub fn u8_from_f32<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter())
            .for_each(|(d, &s)| *d = (s.clamp(0.0, 1.0) * 255.0).round() as u8);
    });

    Ok(())
}
