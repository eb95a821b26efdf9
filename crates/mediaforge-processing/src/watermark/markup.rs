//! SVG markup generation for text overlays.
//!
//! The markup canvas is always exactly the base image's dimensions; the
//! rasterizer pins the pixel buffer to the same size.

use crate::watermark::overlay::CORNER_INSET;
use crate::watermark::spec::{WatermarkPosition, WatermarkSpec};

/// Default text size as a fraction of the base width.
pub const DEFAULT_FONT_SIZE_RATIO: f32 = 0.05;

/// Tile pattern cell edge in pixels. The pattern repeats with this period
/// regardless of base image size.
pub const TILE_CELL_SIZE: u32 = 300;
/// Font size fallback for tiled text marks.
pub const TILE_FONT_SIZE: f32 = 40.0;
/// Opacity fallback for tiled text marks.
pub const TILE_OPACITY: f32 = 0.3;
/// Rotation fallback for tiled text marks, in degrees.
pub const TILE_ROTATION_DEGREES: f32 = -45.0;

/// Escape a string for use in XML text content or attribute values.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text anchor attributes for a position: (x, y, text-anchor, baseline).
fn text_anchor(width: u32, height: u32, position: WatermarkPosition) -> (f32, f32, &'static str, &'static str) {
    let (w, h) = (width as f32, height as f32);
    let inset = CORNER_INSET as f32;
    match position {
        WatermarkPosition::Center | WatermarkPosition::Tile => {
            (w / 2.0, h / 2.0, "middle", "central")
        }
        WatermarkPosition::TopLeft => (inset, inset, "start", "hanging"),
        WatermarkPosition::TopRight => (w - inset, inset, "end", "hanging"),
        WatermarkPosition::BottomLeft => (inset, h - inset, "start", "auto"),
        WatermarkPosition::BottomRight => (w - inset, h - inset, "end", "auto"),
    }
}

/// SVG for a single (non-tiled) text mark on a `width` x `height` canvas,
/// rotated about its anchor point.
pub fn text_overlay_svg(width: u32, height: u32, spec: &WatermarkSpec) -> String {
    let text = escape_xml(spec.text.as_deref().unwrap_or_default());
    let font_size = spec
        .font_size
        .unwrap_or(width as f32 * DEFAULT_FONT_SIZE_RATIO);
    let (x, y, anchor, baseline) = text_anchor(width, height, spec.position);
    let rotation = spec.rotation_degrees();
    let color = escape_xml(spec.color());
    let opacity = spec.opacity();

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="{fs}" "#,
            r#"fill="{color}" fill-opacity="{op}" text-anchor="{anchor}" "#,
            r#"dominant-baseline="{baseline}" transform="rotate({rot} {x} {y})">{text}</text>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        x = x,
        y = y,
        fs = font_size,
        color = color,
        op = opacity,
        anchor = anchor,
        baseline = baseline,
        rot = rotation,
        text = text,
    )
}

/// SVG for a tiled text mark: a 300x300 pattern cell repeated across the
/// whole `width` x `height` canvas.
pub fn tiled_text_svg(width: u32, height: u32, spec: &WatermarkSpec) -> String {
    let text = escape_xml(spec.text.as_deref().unwrap_or_default());
    let font_size = spec.font_size.unwrap_or(TILE_FONT_SIZE);
    let opacity = spec.opacity.unwrap_or(TILE_OPACITY);
    let rotation = spec.rotation_degrees.unwrap_or(TILE_ROTATION_DEGREES);
    let color = escape_xml(spec.color());
    let cell = TILE_CELL_SIZE;
    let center = cell as f32 / 2.0;

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<defs><pattern id="mark" width="{cell}" height="{cell}" patternUnits="userSpaceOnUse">"#,
            r#"<text x="{c}" y="{c}" font-family="sans-serif" font-size="{fs}" "#,
            r#"fill="{color}" fill-opacity="{op}" text-anchor="middle" "#,
            r#"dominant-baseline="central" transform="rotate({rot} {c} {c})">{text}</text>"#,
            r#"</pattern></defs>"#,
            r#"<rect width="100%" height="100%" fill="url(#mark)"/>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        cell = cell,
        c = center,
        fs = font_size,
        color = color,
        op = opacity,
        rot = rotation,
        text = text,
    )
}
