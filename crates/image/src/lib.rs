//! Raster types for the media pipeline.
//!
//! A `Frame` is the picture as a decoder produces it: one to three planes with
//! padded rows, in whatever layout the codec emits. An `Image` is the packed
//! RGB or gray raster the application works with. `Image::assign` bridges the
//! two, and `FrameAllocator` hands out frames while counting the live ones.

mod allocator;
pub use allocator::*;

mod convert;
use convert::*;

pub mod error;
pub use error::ImageError;

mod frame;
pub use frame::*;

mod image;
pub use image::*;

pub mod jpeg;
pub use jpeg::{decode_jpeg, encode_jpeg};

mod pixelformat;
pub use pixelformat::*;

pub use base::Vec2;
