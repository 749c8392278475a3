//! Geometric image transformations.
//!
//! # Examples
//!
//! Resampling an image through a translation:
//!
//! ```
//! use deskew_image::{Image, ImageSize};
//! use deskew_imgproc::interpolation::{BorderMode, InterpolationMode};
//! use deskew_imgproc::parallel::ExecutionStrategy;
//! use deskew_imgproc::warp::warp_perspective;
//!
//! let size = ImageSize { width: 4, height: 4 };
//! let src = Image::<u8, 3>::from_size_val(size, 7).unwrap();
//! let mut dst = Image::<u8, 3>::from_size_val(size, 0).unwrap();
//! let m = [[1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
//!
//! warp_perspective(
//!     &src,
//!     &mut dst,
//!     &m,
//!     InterpolationMode::Bilinear,
//!     BorderMode::Transparent,
//!     ExecutionStrategy::Serial,
//! )
//! .unwrap();
//!
//! // the first column has no source pixel
//! assert_eq!(dst.get_pixel(0, 0).unwrap(), &[0, 0, 0]);
//! assert_eq!(dst.get_pixel(1, 0).unwrap(), &[7, 7, 7]);
//! ```

mod perspective;

pub use perspective::warp_perspective;
