use crate::{Image, ImageError, ImageSize};

/// A generic image type that can be any of the supported pixel formats.
///
/// Every variant except [`GenericImage::Indexed8`] stores directly sampleable values.
#[derive(Clone, Debug, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    Mono8(Image<u8, 1>),
    /// 8-bit grayscale image with alpha channel
    MonoAlpha8(Image<u8, 2>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
    /// 16-bit grayscale image
    Mono16(Image<u16, 1>),
    /// 16-bit RGB image
    Rgb16(Image<u16, 3>),
    /// 16-bit RGB image with alpha channel
    Rgba16(Image<u16, 4>),
    /// 32-bit float RGB image
    Rgb32F(Image<f32, 3>),
    /// 32-bit float RGB image with alpha channel
    Rgba32F(Image<f32, 4>),
    /// 8-bit palette indices together with an RGBA palette.
    Indexed8 {
        /// one palette index per pixel
        indices: Image<u8, 1>,
        /// RGBA palette entries
        palette: Vec<[u8; 4]>,
    },
}

impl GenericImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::Mono8(img) => img.size(),
            GenericImage::MonoAlpha8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
            GenericImage::Mono16(img) => img.size(),
            GenericImage::Rgb16(img) => img.size(),
            GenericImage::Rgba16(img) => img.size(),
            GenericImage::Rgb32F(img) => img.size(),
            GenericImage::Rgba32F(img) => img.size(),
            GenericImage::Indexed8 { indices, .. } => indices.size(),
        }
    }

    /// A short lowercase name of the pixel format.
    pub fn format_name(&self) -> &'static str {
        match self {
            GenericImage::Mono8(_) => "mono8",
            GenericImage::MonoAlpha8(_) => "mono_alpha8",
            GenericImage::Rgb8(_) => "rgb8",
            GenericImage::Rgba8(_) => "rgba8",
            GenericImage::Mono16(_) => "mono16",
            GenericImage::Rgb16(_) => "rgb16",
            GenericImage::Rgba16(_) => "rgba16",
            GenericImage::Rgb32F(_) => "rgb32f",
            GenericImage::Rgba32F(_) => "rgba32f",
            GenericImage::Indexed8 { .. } => "indexed8",
        }
    }

    /// Whether the pixel format carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            GenericImage::MonoAlpha8(_)
                | GenericImage::Rgba8(_)
                | GenericImage::Rgba16(_)
                | GenericImage::Rgba32F(_)
                | GenericImage::Indexed8 { .. }
        )
    }

    /// Expand a palette image into RGBA8 pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if an index points past the end of the palette.
    pub fn expand_palette(
        indices: &Image<u8, 1>,
        palette: &[[u8; 4]],
    ) -> Result<Image<u8, 4>, ImageError> {
        let mut data = Vec::with_capacity(indices.as_slice().len() * 4);
        for &idx in indices.as_slice() {
            let entry = palette
                .get(idx as usize)
                .ok_or(ImageError::PaletteIndexOutOfBounds(idx, palette.len()))?;
            data.extend_from_slice(entry);
        }
        Image::new(indices.size(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::GenericImage;
    use crate::{Image, ImageError, ImageSize};

    #[test]
    fn generic_image_metadata() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let rgb = GenericImage::Rgb8(Image::from_size_val(size, 0u8)?);
        assert_eq!(rgb.size(), size);
        assert_eq!(rgb.format_name(), "rgb8");
        assert!(!rgb.has_alpha());

        let rgba = GenericImage::Rgba32F(Image::from_size_val(size, 0.0f32)?);
        assert!(rgba.has_alpha());
        Ok(())
    }

    #[test]
    fn expand_palette() -> Result<(), ImageError> {
        let indices = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 0],
        )?;
        let palette = [[1, 2, 3, 255], [4, 5, 6, 128]];
        let rgba = GenericImage::expand_palette(&indices, &palette)?;
        assert_eq!(rgba.as_slice(), &[4, 5, 6, 128, 1, 2, 3, 255]);

        let res = GenericImage::expand_palette(&indices, &palette[..1]);
        assert_eq!(res, Err(ImageError::PaletteIndexOutOfBounds(1, 1)));
        Ok(())
    }
}
