use std::{io::Cursor, path::Path};

use deskew_image::{GenericImage, Image, ImageError, ImageSize};
use image::{DynamicImage, ImageBuffer, ImageFormat, Pixel};

use crate::error::IoError;

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate and keeps
/// the decoded pixel format whenever [`GenericImage`] has a matching variant.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    decode_image_bytes(&bytes)
}

/// Decodes an encoded image held in memory, guessing the format from its content.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<GenericImage, IoError> {
    let img = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    from_dynamic(img)
}

fn image_from_buffer<P, const C: usize>(
    buf: ImageBuffer<P, Vec<P::Subpixel>>,
) -> Result<Image<P::Subpixel, C>, ImageError>
where
    P: Pixel,
{
    let size = ImageSize {
        width: buf.width() as usize,
        height: buf.height() as usize,
    };
    Image::new(size, buf.into_raw())
}

fn from_dynamic(img: DynamicImage) -> Result<GenericImage, IoError> {
    let image = match img {
        DynamicImage::ImageLuma8(buf) => GenericImage::Mono8(image_from_buffer(buf)?),
        DynamicImage::ImageLumaA8(buf) => GenericImage::MonoAlpha8(image_from_buffer(buf)?),
        DynamicImage::ImageRgb8(buf) => GenericImage::Rgb8(image_from_buffer(buf)?),
        DynamicImage::ImageRgba8(buf) => GenericImage::Rgba8(image_from_buffer(buf)?),
        DynamicImage::ImageLuma16(buf) => GenericImage::Mono16(image_from_buffer(buf)?),
        DynamicImage::ImageRgb16(buf) => GenericImage::Rgb16(image_from_buffer(buf)?),
        DynamicImage::ImageRgba16(buf) => GenericImage::Rgba16(image_from_buffer(buf)?),
        DynamicImage::ImageRgb32F(buf) => GenericImage::Rgb32F(image_from_buffer(buf)?),
        DynamicImage::ImageRgba32F(buf) => GenericImage::Rgba32F(image_from_buffer(buf)?),
        // 16 bit gray with alpha and future layouts
        other => {
            log::debug!("converting {:?} image to rgba16", other.color());
            GenericImage::Rgba16(image_from_buffer(other.into_rgba16())?)
        }
    };
    Ok(image)
}

fn buffer_from_image<P, const C: usize>(
    image: &Image<P::Subpixel, C>,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, IoError>
where
    P: Pixel,
{
    let to_u32 = |len: usize| {
        u32::try_from(len).map_err(|_| {
            IoError::InvalidArgument(format!(
                "image size {} does not fit the encoder limits",
                image.size()
            ))
        })
    };
    let (width, height) = (to_u32(image.width())?, to_u32(image.height())?);
    ImageBuffer::from_raw(width, height, image.as_slice().to_vec()).ok_or_else(|| {
        IoError::ImageCreationError(ImageError::InvalidChannelShape(
            image.as_slice().len(),
            image.size().area() * P::CHANNEL_COUNT as usize,
        ))
    })
}

/// Converts an image into the `image` crate representation.
///
/// Palette images are expanded to RGBA8.
pub fn to_dynamic(image: &GenericImage) -> Result<DynamicImage, IoError> {
    let img = match image {
        GenericImage::Mono8(img) => DynamicImage::ImageLuma8(buffer_from_image(img)?),
        GenericImage::MonoAlpha8(img) => DynamicImage::ImageLumaA8(buffer_from_image(img)?),
        GenericImage::Rgb8(img) => DynamicImage::ImageRgb8(buffer_from_image(img)?),
        GenericImage::Rgba8(img) => DynamicImage::ImageRgba8(buffer_from_image(img)?),
        GenericImage::Mono16(img) => DynamicImage::ImageLuma16(buffer_from_image(img)?),
        GenericImage::Rgb16(img) => DynamicImage::ImageRgb16(buffer_from_image(img)?),
        GenericImage::Rgba16(img) => DynamicImage::ImageRgba16(buffer_from_image(img)?),
        GenericImage::Rgb32F(img) => DynamicImage::ImageRgb32F(buffer_from_image(img)?),
        GenericImage::Rgba32F(img) => DynamicImage::ImageRgba32F(buffer_from_image(img)?),
        GenericImage::Indexed8 { indices, palette } => {
            let rgba = GenericImage::expand_palette(indices, palette)?;
            DynamicImage::ImageRgba8(buffer_from_image(&rgba)?)
        }
    };
    Ok(img)
}

/// Adapt the pixel layout to what the encoder of `format` can store.
fn fit_to_format(img: DynamicImage, format: ImageFormat) -> DynamicImage {
    let color = img.color();
    let is_float = matches!(
        img,
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)
    );
    let is_8bit = color.bytes_per_pixel() == color.channel_count();

    match format {
        ImageFormat::OpenExr if !is_float => {
            if color.has_alpha() {
                DynamicImage::ImageRgba32F(img.into_rgba32f())
            } else {
                DynamicImage::ImageRgb32F(img.into_rgb32f())
            }
        }
        ImageFormat::OpenExr => img,
        ImageFormat::Jpeg if color.has_alpha() || !is_8bit => {
            if color.has_color() {
                DynamicImage::ImageRgb8(img.into_rgb8())
            } else {
                DynamicImage::ImageLuma8(img.into_luma8())
            }
        }
        _ if is_float => {
            if color.has_alpha() {
                DynamicImage::ImageRgba8(img.into_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.into_rgb8())
            }
        }
        _ => img,
    }
}

/// Encodes an image in memory.
///
/// Pixel layouts the encoder cannot store are converted first, e.g. alpha is dropped for
/// JPEG and float images are written with 8 bits per channel to PNG.
pub fn encode_image(image: &GenericImage, format: ImageFormat) -> Result<Vec<u8>, IoError> {
    let img = fit_to_format(to_dynamic(image)?, format);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)?;
    Ok(out.into_inner())
}

/// Writes an image to the given file path, choosing the encoder from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output file.
/// * `image` - The image to write.
pub fn write_image_any(file_path: impl AsRef<Path>, image: &GenericImage) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let format = ImageFormat::from_path(file_path)
        .map_err(|_| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    let bytes = encode_image(image, format)?;
    std::fs::write(file_path, bytes)?;

    Ok(())
}
