//! Overlay buffers and position arithmetic.

use crate::watermark::spec::WatermarkPosition;
use image::{imageops, RgbaImage};

/// Inset in pixels from a named corner.
pub const CORNER_INSET: i64 = 20;

/// An overlay buffer whose dimensions always equal the base image's.
///
/// The dimension match is a construction-time invariant, not a runtime
/// condition: a mismatch is a programming error and asserts.
pub struct Overlay {
    canvas: RgbaImage,
}

impl Overlay {
    /// A fully transparent overlay sized to the base image.
    pub fn new(base_width: u32, base_height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(base_width, base_height),
        }
    }

    /// Wrap an already-rendered buffer, asserting it matches the base size.
    pub fn from_canvas(canvas: RgbaImage, base_width: u32, base_height: u32) -> Self {
        assert_eq!(
            canvas.dimensions(),
            (base_width, base_height),
            "overlay canvas must match base image dimensions"
        );
        Self { canvas }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Stamp a mark onto the overlay at the given offset.
    pub fn place(&mut self, mark: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.canvas, mark, x, y);
    }

    /// Alpha "over" blend onto the base image.
    pub fn merge_onto(self, base: &mut RgbaImage) {
        assert_eq!(
            self.canvas.dimensions(),
            base.dimensions(),
            "overlay canvas must match base image dimensions"
        );
        imageops::overlay(base, &self.canvas, 0, 0);
    }
}

/// Top-left offset for a mark of `mark_w` x `mark_h` on a base of
/// `base_w` x `base_h`. Corners sit `CORNER_INSET` pixels in; offsets are
/// clamped so oversized marks still anchor inside the canvas.
pub fn resolve_position(
    base_w: u32,
    base_h: u32,
    mark_w: u32,
    mark_h: u32,
    position: WatermarkPosition,
) -> (i64, i64) {
    let (bw, bh) = (base_w as i64, base_h as i64);
    let (mw, mh) = (mark_w as i64, mark_h as i64);

    match position {
        WatermarkPosition::Center => (((bw - mw) / 2).max(0), ((bh - mh) / 2).max(0)),
        WatermarkPosition::TopLeft => (CORNER_INSET, CORNER_INSET),
        WatermarkPosition::TopRight => ((bw - mw - CORNER_INSET).max(0), CORNER_INSET),
        WatermarkPosition::BottomLeft => (CORNER_INSET, (bh - mh - CORNER_INSET).max(0)),
        WatermarkPosition::BottomRight => (
            (bw - mw - CORNER_INSET).max(0),
            (bh - mh - CORNER_INSET).max(0),
        ),
        // Tiling never resolves to a single anchor.
        WatermarkPosition::Tile => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn new_overlay_matches_base_and_is_transparent() {
        let overlay = Overlay::new(320, 240);
        assert_eq!(overlay.dimensions(), (320, 240));
        assert_eq!(overlay.canvas.get_pixel(0, 0)[3], 0);
    }

    #[test]
    #[should_panic(expected = "overlay canvas must match base image dimensions")]
    fn mismatched_canvas_panics() {
        let canvas = RgbaImage::new(10, 10);
        let _ = Overlay::from_canvas(canvas, 20, 20);
    }

    #[test]
    fn merge_blends_mark_pixels() {
        let mut overlay = Overlay::new(10, 10);
        let mark = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        overlay.place(&mark, 4, 4);

        let mut base = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        overlay.merge_onto(&mut base);

        assert_eq!(base.get_pixel(4, 4), &Rgba([255, 0, 0, 255]));
        assert_eq!(base.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn resolve_center() {
        assert_eq!(
            resolve_position(200, 100, 40, 20, WatermarkPosition::Center),
            (80, 40)
        );
    }

    #[test]
    fn resolve_corners_with_inset() {
        assert_eq!(
            resolve_position(200, 100, 40, 20, WatermarkPosition::TopLeft),
            (20, 20)
        );
        assert_eq!(
            resolve_position(200, 100, 40, 20, WatermarkPosition::TopRight),
            (140, 20)
        );
        assert_eq!(
            resolve_position(200, 100, 40, 20, WatermarkPosition::BottomLeft),
            (20, 60)
        );
        assert_eq!(
            resolve_position(200, 100, 40, 20, WatermarkPosition::BottomRight),
            (140, 60)
        );
    }

    #[test]
    fn resolve_clamps_oversized_marks() {
        let (x, y) = resolve_position(50, 50, 100, 100, WatermarkPosition::BottomRight);
        assert_eq!((x, y), (0, 0));
    }
}
