#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use deskew_image as image;

#[doc(inline)]
pub use deskew_geometry as geometry;

#[doc(inline)]
pub use deskew_imgproc as imgproc;

#[doc(inline)]
pub use deskew_io as io;

#[doc(inline)]
pub use deskew_rectify as rectify;
