//! Raster image pipeline
//!
//! Decode, optional resize, and re-encode to a target codec.

pub mod convert;
pub mod encode;
pub mod resize;

pub use convert::ImageConverter;
pub use encode::{ImageCodec, ImageEncoder, DEFAULT_LOSSY_QUALITY};
pub use resize::{ImageResize, ResizeRequest};
