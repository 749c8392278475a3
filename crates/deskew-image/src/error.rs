/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size. Got: {0}x{1}, expected: {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel coordinate is out of bounds.
    #[error("Pixel coordinate ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the pixel buffer of an image size is not addressable.
    #[error("Image size {0}x{1} with {2} channels overflows the pixel buffer")]
    ImageSizeOverflow(usize, usize, usize),

    /// Error when a transform matrix cannot be inverted.
    #[error("Cannot compute the determinant of the transform matrix")]
    CannotComputeDeterminant,

    /// Error when a palette index has no palette entry.
    #[error("Palette index {0} is out of bounds for a palette of {1} entries")]
    PaletteIndexOutOfBounds(u8, usize),
}
