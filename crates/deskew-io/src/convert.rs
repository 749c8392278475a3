use deskew_image::{GenericImage, Image, ImageSize};
use deskew_imgproc::{color, interpolation::InterpolationMode, resize::resize_native};

use crate::error::IoError;

/// Longest accepted image side before downscaling.
pub const DEFAULT_MAX_DIMENSION: usize = 4000;

/// Convert any pixel format to 8 bit RGBA.
///
/// Gray values are replicated, missing alpha is opaque, 16 bit values are rescaled, float
/// values in `[0, 1]` are scaled by 255 and palettes are expanded.
pub fn to_rgba8(image: &GenericImage) -> Result<Image<u8, 4>, IoError> {
    let size = image.size();
    let mut rgba = Image::<u8, 4>::from_size_val(size, 0)?;

    match image {
        GenericImage::Mono8(img) => color::rgba_from_gray(img, &mut rgba, u8::MAX)?,
        GenericImage::MonoAlpha8(img) => color::rgba_from_gray_alpha(img, &mut rgba)?,
        GenericImage::Rgb8(img) => color::rgba_from_rgb(img, &mut rgba, u8::MAX)?,
        GenericImage::Rgba8(img) => rgba = img.clone(),
        GenericImage::Mono16(img) => {
            let mut gray = Image::from_size_val(size, 0)?;
            color::u8_from_u16(img, &mut gray)?;
            color::rgba_from_gray(&gray, &mut rgba, u8::MAX)?;
        }
        GenericImage::Rgb16(img) => {
            let mut rgb = Image::from_size_val(size, 0)?;
            color::u8_from_u16(img, &mut rgb)?;
            color::rgba_from_rgb(&rgb, &mut rgba, u8::MAX)?;
        }
        GenericImage::Rgba16(img) => color::u8_from_u16(img, &mut rgba)?,
        GenericImage::Rgb32F(img) => {
            let mut rgb = Image::from_size_val(size, 0)?;
            color::u8_from_f32(img, &mut rgb)?;
            color::rgba_from_rgb(&rgb, &mut rgba, u8::MAX)?;
        }
        GenericImage::Rgba32F(img) => color::u8_from_f32(img, &mut rgba)?,
        GenericImage::Indexed8 { indices, palette } => {
            rgba = GenericImage::expand_palette(indices, palette)?;
        }
    }

    Ok(rgba)
}

/// Convert any pixel format to 8 bit RGB, dropping alpha.
pub fn to_rgb8(image: &GenericImage) -> Result<Image<u8, 3>, IoError> {
    if let GenericImage::Rgb8(img) = image {
        return Ok(img.clone());
    }

    let rgba = to_rgba8(image)?;
    let mut rgb = Image::from_size_val(rgba.size(), 0)?;
    color::rgb_from_rgba(&rgba, &mut rgb)?;
    Ok(rgb)
}

/// The size of `size` scaled down so that its longest side is `max_dimension`, if needed.
fn bounded_size(size: ImageSize, max_dimension: usize) -> Option<ImageSize> {
    let longest = size.width.max(size.height);
    if longest <= max_dimension {
        return None;
    }

    let scale = max_dimension as f64 / longest as f64;
    let side = |len: usize| ((len as f64 * scale).round() as usize).max(1);
    Some(ImageSize {
        width: side(size.width),
        height: side(size.height),
    })
}

/// Bring an image into a pixel format and size the rectifier is expected to receive.
///
/// RGB8 and RGBA8 images are kept as they are and every other format is converted to
/// RGBA8. Images whose longest side exceeds `max_dimension` are then downscaled with
/// bilinear interpolation, keeping their aspect ratio.
///
/// # Errors
///
/// Returns [`IoError::InvalidArgument`] if `max_dimension` is zero.
pub fn convert_to_supported_format(
    image: GenericImage,
    max_dimension: usize,
) -> Result<GenericImage, IoError> {
    if max_dimension == 0 {
        return Err(IoError::InvalidArgument(
            "max_dimension must be positive".to_string(),
        ));
    }

    let image = match image {
        GenericImage::Rgb8(_) | GenericImage::Rgba8(_) => image,
        other => {
            log::debug!("converting {} image to rgba8", other.format_name());
            GenericImage::Rgba8(to_rgba8(&other)?)
        }
    };

    let Some(new_size) = bounded_size(image.size(), max_dimension) else {
        return Ok(image);
    };
    log::debug!("downscaling {} image to {new_size}", image.size());

    let resized = match &image {
        GenericImage::Rgb8(img) => {
            let mut dst = Image::from_size_val(new_size, 0)?;
            resize_native(img, &mut dst, InterpolationMode::Bilinear)?;
            GenericImage::Rgb8(dst)
        }
        _ => {
            let rgba = to_rgba8(&image)?;
            let mut dst = Image::from_size_val(new_size, 0)?;
            resize_native(&rgba, &mut dst, InterpolationMode::Bilinear)?;
            GenericImage::Rgba8(dst)
        }
    };

    Ok(resized)
}
