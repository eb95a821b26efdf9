//! Watermark compositing
//!
//! Builds an overlay buffer sized to the base image (vector-rendered text
//! or a scaled/rotated raster mark, optionally tiled) and merges it with an
//! alpha "over" blend.

pub mod composer;
pub mod markup;
pub mod overlay;
pub mod spec;

pub use composer::Watermarker;
pub use overlay::{Overlay, CORNER_INSET};
pub use spec::{WatermarkKind, WatermarkPosition, WatermarkSpec};
