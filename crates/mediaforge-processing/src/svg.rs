//! SVG rasterization built on usvg/resvg.
//!
//! Used for two things: rasterizing SVG *source* images in the codec
//! pipeline, and rendering watermark overlay markup at an exact canvas size.

use image::RgbaImage;
use mediaforge_core::{ConvertError, Result};
use resvg::tiny_skia;
use std::sync::{Arc, OnceLock};
use usvg::fontdb;

/// Baseline DPI for vector sources; `density` scales relative to this.
pub const BASE_DPI: f32 = 96.0;

static FONTDB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System font database, loaded once per process.
fn shared_fontdb() -> Arc<fontdb::Database> {
    FONTDB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

fn parse_tree(data: &[u8]) -> Result<usvg::Tree> {
    let mut options = usvg::Options::default();
    options.fontdb = shared_fontdb();
    usvg::Tree::from_data(data, &options)
        .map_err(|e| ConvertError::ImageProcessing(format!("svg parse failed: {e}")))
}

/// Render SVG data at its intrinsic size scaled by `scale`.
pub fn render_scaled(data: &[u8], scale: f32) -> Result<RgbaImage> {
    let tree = parse_tree(data)?;
    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ConvertError::ImageProcessing("zero-sized svg canvas".to_string()))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    pixmap_to_rgba(pixmap)
}

/// Render SVG data into a canvas of exactly `width` x `height` pixels.
///
/// The markup's own width/height are expected to match; the pixmap pins the
/// output dimensions either way.
pub fn render_fixed(data: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
    let tree = parse_tree(data)?;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ConvertError::ImageProcessing("zero-sized svg canvas".to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    pixmap_to_rgba(pixmap)
}

/// Convert a premultiplied-alpha pixmap to a straight-alpha RGBA image.
fn pixmap_to_rgba(pixmap: tiny_skia::Pixmap) -> Result<RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| ConvertError::ImageProcessing("pixmap size mismatch".to_string()))
}
