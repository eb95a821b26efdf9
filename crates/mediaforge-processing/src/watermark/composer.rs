//! Watermark application: overlay construction and merge.

use crate::fsops;
use crate::image::encode::{ImageCodec, ImageEncoder};
use crate::image::resize::ImageResize;
use crate::metadata;
use crate::svg;
use crate::watermark::markup;
use crate::watermark::overlay::{self, Overlay};
use crate::watermark::spec::{WatermarkKind, WatermarkPosition, WatermarkSpec};
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use mediaforge_core::{formats, ConvertError, Result};
use std::path::{Path, PathBuf};

/// Watermark composer
pub struct Watermarker;

impl Watermarker {
    /// Apply `spec` to the image at `input`, writing
    /// `{basename}_watermarked{ext}` next to it.
    pub fn apply(input: &Path, spec: &WatermarkSpec) -> Result<PathBuf> {
        spec.validate()?;
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }

        let (width, height) = metadata::probe_dimensions(input)?;

        let overlay = match spec.kind {
            WatermarkKind::Text => Self::text_overlay(width, height, spec)?,
            WatermarkKind::Image => Self::image_overlay(width, height, spec)?,
        };

        let mut base = image::open(input)
            .map_err(|e| ConvertError::ImageProcessing(e.to_string()))?
            .to_rgba8();
        overlay.merge_onto(&mut base);

        let output = fsops::watermarked_output_path(input);
        let codec = ImageCodec::from_extension(&formats::source_extension(input))
            .unwrap_or(ImageCodec::Png);
        let data = ImageEncoder::encode(&DynamicImage::ImageRgba8(base), codec, None)?;
        fsops::write_atomic(&output, &data)?;

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            kind = ?spec.kind,
            position = ?spec.position,
            "applied watermark"
        );
        Ok(output)
    }

    /// Render the text mark as vector markup sized to the base image.
    fn text_overlay(width: u32, height: u32, spec: &WatermarkSpec) -> Result<Overlay> {
        let markup = if spec.position == WatermarkPosition::Tile {
            markup::tiled_text_svg(width, height, spec)
        } else {
            markup::text_overlay_svg(width, height, spec)
        };
        let canvas = svg::render_fixed(markup.as_bytes(), width, height)?;
        Ok(Overlay::from_canvas(canvas, width, height))
    }

    /// Scale, rotate, and fade the raster mark, then stamp it.
    fn image_overlay(width: u32, height: u32, spec: &WatermarkSpec) -> Result<Overlay> {
        let path = spec
            .image_path
            .as_ref()
            .ok_or_else(|| {
                ConvertError::InvalidWatermarkSpec("image watermark requires an image path".into())
            })?;
        let mark = image::open(path)
            .map_err(|e| ConvertError::ImageProcessing(e.to_string()))?
            .to_rgba8();
        let mark = Self::prepare_mark(&mark, width, spec);

        let (mark_w, mark_h) = mark.dimensions();
        let mut overlay = Overlay::new(width, height);
        if spec.position == WatermarkPosition::Tile {
            let cell = markup::TILE_CELL_SIZE;
            for cy in (0..height).step_by(cell as usize) {
                for cx in (0..width).step_by(cell as usize) {
                    let x = cx as i64 + (cell as i64 - mark_w as i64) / 2;
                    let y = cy as i64 + (cell as i64 - mark_h as i64) / 2;
                    overlay.place(&mark, x, y);
                }
            }
        } else {
            let (x, y) = overlay::resolve_position(width, height, mark_w, mark_h, spec.position);
            overlay.place(&mark, x, y);
        }
        Ok(overlay)
    }

    /// Resize the mark to `scale` of the base width (its own aspect ratio
    /// preserved), rotate with transparent corner fill, and multiply its
    /// alpha by the spec opacity.
    fn prepare_mark(mark: &RgbaImage, base_width: u32, spec: &WatermarkSpec) -> RgbaImage {
        let (orig_w, orig_h) = mark.dimensions();
        let new_w = ((base_width as f32 * spec.scale()).round() as u32).max(1);
        let new_h = (((orig_h as f32) * (new_w as f32) / (orig_w as f32)).round() as u32).max(1);

        let filter = ImageResize::select_filter(orig_w, orig_h, new_w, new_h);
        let mut mark = imageops::resize(mark, new_w, new_h, filter);

        let rotation = spec.rotation_degrees();
        if rotation.rem_euclid(360.0) != 0.0 {
            mark = Self::rotate_transparent(&mark, rotation);
        }

        let opacity = spec.opacity();
        if opacity < 1.0 {
            for pixel in mark.pixels_mut() {
                pixel[3] = (pixel[3] as f32 * opacity) as u8;
            }
        }

        mark
    }

    /// Rotate on a padded square canvas so no content is clipped; corners
    /// exposed by the rotation stay transparent.
    fn rotate_transparent(mark: &RgbaImage, degrees: f32) -> RgbaImage {
        let (w, h) = mark.dimensions();
        let diagonal = (((w * w + h * h) as f32).sqrt().ceil() as u32).max(1);
        let mut padded = RgbaImage::new(diagonal, diagonal);
        imageops::overlay(
            &mut padded,
            mark,
            ((diagonal - w) / 2) as i64,
            ((diagonal - h) / 2) as i64,
        );
        rotate_about_center(
            &padded,
            degrees.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        )
    }
}
