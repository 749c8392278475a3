#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// pixel-format tagged images.
pub mod generic;

pub use crate::error::ImageError;
pub use crate::generic::GenericImage;
pub use crate::image::{Image, ImageDtype, ImageSize};
