//! Image codec conversion: decode, optional resize, encode.

use crate::converter::ConversionOptions;
use crate::fsops;
use crate::image::encode::{ImageCodec, ImageEncoder};
use crate::image::resize::{ImageResize, ResizeRequest};
use crate::svg;
use image::{DynamicImage, GenericImageView};
use mediaforge_core::{formats, ConvertError, Result};
use std::path::{Path, PathBuf};

/// Raster image converter
pub struct ImageConverter;

impl ImageConverter {
    /// Re-encode `input` as `codec` at `output`, applying the optional
    /// resize first. Exactly one file is written, atomically; a failure
    /// leaves no partial output.
    pub fn convert(
        input: &Path,
        output: &Path,
        codec: ImageCodec,
        options: &ConversionOptions,
    ) -> Result<PathBuf> {
        let img = Self::decode(input, options.density)?;

        let resize = ResizeRequest {
            width: options.width,
            height: options.height,
        };
        let img = if resize.is_noop() {
            img
        } else {
            ImageResize::apply(&img, resize)
        };

        tracing::debug!(
            input = %input.display(),
            codec = ?codec,
            quality = ?options.quality,
            width = img.width(),
            height = img.height(),
            "encoding image"
        );

        let data = ImageEncoder::encode(&img, codec, options.quality)?;
        fsops::write_atomic(output, &data)?;
        Ok(output.to_path_buf())
    }

    /// Decode a source image. SVG sources are rasterized at the requested
    /// density (DPI, default 96); everything else goes through the `image`
    /// decoders.
    fn decode(input: &Path, density: Option<u32>) -> Result<DynamicImage> {
        if formats::source_extension(input) == "svg" {
            let data = std::fs::read(input)?;
            let scale = density.unwrap_or(svg::BASE_DPI as u32) as f32 / svg::BASE_DPI;
            let rasterized = svg::render_scaled(&data, scale)?;
            return Ok(DynamicImage::ImageRgba8(rasterized));
        }

        image::ImageReader::open(input)
            .map_err(ConvertError::Io)?
            .with_guessed_format()
            .map_err(ConvertError::Io)?
            .decode()
            .map_err(|e| ConvertError::ImageProcessing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn png_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", 60, 40);
        let output = dir.path().join("out.jpg");

        let result = ImageConverter::convert(
            &input,
            &output,
            ImageCodec::Jpeg,
            &ConversionOptions::default(),
        )
        .unwrap();

        assert_eq!(result, output);
        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (60, 40));
    }

    #[test]
    fn resize_to_exact_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", 100, 100);
        let output = dir.path().join("out.webp");

        let options = ConversionOptions {
            width: Some(50),
            height: Some(30),
            ..Default::default()
        };
        ImageConverter::convert(&input, &output, ImageCodec::WebP, &options).unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (50, 30));
    }

    #[test]
    fn resize_single_dimension_preserves_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", 200, 100);
        let output = dir.path().join("out.png");

        let options = ConversionOptions {
            width: Some(100),
            ..Default::default()
        };
        ImageConverter::convert(&input, &output, ImageCodec::Png, &options).unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 50));
    }

    #[test]
    fn round_trip_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", 80, 45);

        let jpg = dir.path().join("mid.jpg");
        ImageConverter::convert(&input, &jpg, ImageCodec::Jpeg, &ConversionOptions::default())
            .unwrap();

        let back = dir.path().join("back.png");
        ImageConverter::convert(&jpg, &back, ImageCodec::Png, &ConversionOptions::default())
            .unwrap();

        let decoded = image::open(&back).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (80, 45));
    }

    #[test]
    fn svg_source_is_rasterized() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mark.svg");
        std::fs::write(
            &input,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="12">
<rect width="24" height="12" fill="#0000ff"/></svg>"##,
        )
        .unwrap();

        let output = dir.path().join("mark.png");
        ImageConverter::convert(&input, &output, ImageCodec::Png, &ConversionOptions::default())
            .unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 12));
    }

    #[test]
    fn undecodable_input_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"definitely not a png").unwrap();
        let output = dir.path().join("out.jpg");

        let result = ImageConverter::convert(
            &input,
            &output,
            ImageCodec::Jpeg,
            &ConversionOptions::default(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
