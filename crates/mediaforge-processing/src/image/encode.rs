//! Target codec encoding.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use mediaforge_core::{ConvertError, Result};
use std::io::Cursor;

/// Default quality for lossy codecs when the caller passes none.
pub const DEFAULT_LOSSY_QUALITY: u8 = 80;

/// Raster codec a conversion can encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCodec {
    Jpeg,
    Png,
    WebP,
    Gif,
    Tiff,
}

impl ImageCodec {
    /// Map a lowercase file extension to its codec.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(ImageCodec::Jpeg),
            "png" => Some(ImageCodec::Png),
            "webp" => Some(ImageCodec::WebP),
            "gif" => Some(ImageCodec::Gif),
            "tiff" => Some(ImageCodec::Tiff),
            _ => None,
        }
    }

    /// Whether the codec takes a meaningful quality parameter.
    pub fn is_lossy(self) -> bool {
        matches!(self, ImageCodec::Jpeg | ImageCodec::WebP)
    }
}

/// Codec encoding service
pub struct ImageEncoder;

impl ImageEncoder {
    /// Encode an image to `codec`. `quality` applies to lossy codecs
    /// (default 80); PNG and GIF are encoded losslessly and ignore it.
    pub fn encode(img: &DynamicImage, codec: ImageCodec, quality: Option<u8>) -> Result<Bytes> {
        let quality = quality.unwrap_or(DEFAULT_LOSSY_QUALITY).clamp(1, 100);
        match codec {
            ImageCodec::Jpeg => Self::encode_jpeg(img, quality),
            ImageCodec::WebP => Self::encode_webp(img, quality),
            ImageCodec::Png => Self::encode_with(img, ImageFormat::Png),
            ImageCodec::Gif => Self::encode_with(img, ImageFormat::Gif),
            ImageCodec::Tiff => Self::encode_with(img, ImageFormat::Tiff),
        }
    }

    /// Encode to JPEG using mozjpeg.
    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .map_err(|e| ConvertError::ImageProcessing(format!("jpeg encoder: {e}")))?;
        comp.write_scanlines(&rgb_img)
            .map_err(|e| ConvertError::ImageProcessing(format!("jpeg encoder: {e}")))?;
        let jpeg_data = comp
            .finish()
            .map_err(|e| ConvertError::ImageProcessing(format!("jpeg encoder: {e}")))?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Encode to WebP.
    fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    fn encode_with(img: &DynamicImage, format: ImageFormat) -> Result<Bytes> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, format)
            .map_err(|e| ConvertError::ImageProcessing(e.to_string()))?;
        Ok(Bytes::from(buffer))
    }
}
