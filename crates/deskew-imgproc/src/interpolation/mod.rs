//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation kernels used when resampling images during
//! geometric transformations like resizing or perspective warping.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//! - **Bicubic**: Cubic convolution over a 4x4 neighbourhood
//!
//! Coordinates follow the pixel-center convention: pixel `(i, j)` is centered at `(i, j)`.
//! All kernels clamp the sample coordinate into the image, so callers decide what happens
//! outside of it through a [`BorderMode`].

mod bicubic;
mod bilinear;
mod border;
pub(crate) mod interpolate;
mod nearest;

pub use border::BorderMode;
pub use interpolate::{interpolate_pixel, InterpolationMode};
