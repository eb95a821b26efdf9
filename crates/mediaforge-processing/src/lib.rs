//! Mediaforge Processing Library
//!
//! Media transformation pipeline: format conversion dispatch (raster image
//! codecs plus office-document formats via a headless converter subprocess),
//! batch processing with per-item failure isolation, and watermark
//! compositing.

pub mod batch;
pub mod converter;
pub mod document;
pub mod fsops;
pub mod image;
pub mod metadata;
pub mod svg;
pub mod watermark;

// Re-export commonly used types
pub use batch::{apply_watermark_batch, BatchInput, BatchItem};
pub use converter::{ConversionOptions, FileConverter};
pub use document::DocumentConverter;
pub use image::{ImageCodec, ImageConverter, ImageEncoder, ImageResize, ResizeRequest};
pub use watermark::{Overlay, Watermarker, WatermarkKind, WatermarkPosition, WatermarkSpec};
