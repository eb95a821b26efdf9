//! Image resize operations.

use image::{DynamicImage, GenericImageView};

/// Requested output dimensions. Omitting one dimension derives it from the
/// source aspect ratio; omitting both makes the resize a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeRequest {
    pub fn is_noop(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions for a resize request.
    ///
    /// When both dimensions are given they are used as-is (the image may
    /// stretch). When only one is given, the other preserves the source
    /// aspect ratio.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        request: ResizeRequest,
    ) -> (u32, u32) {
        match (request.width, request.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f32 / orig_width as f32;
                let h = (w as f32 * aspect_ratio).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f32 / orig_height as f32;
                let w = (h as f32 * aspect_ratio).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Select a filter type based on the downscale ratio.
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Apply a resize request, returning the image unchanged for a no-op.
    pub fn apply(img: &DynamicImage, request: ResizeRequest) -> DynamicImage {
        if request.is_noop() {
            return img.clone();
        }
        let (orig_width, orig_height) = img.dimensions();
        let (target_width, target_height) =
            Self::calculate_dimensions(orig_width, orig_height, request);
        if (target_width, target_height) == (orig_width, orig_height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, target_width, target_height);
        img.resize_exact(target_width, target_height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn calculate_dimensions_both_specified() {
        let request = ResizeRequest {
            width: Some(50),
            height: Some(75),
        };
        assert_eq!(ImageResize::calculate_dimensions(100, 100, request), (50, 75));
    }

    #[test]
    fn calculate_dimensions_width_only_preserves_aspect() {
        let request = ResizeRequest {
            width: Some(200),
            height: None,
        };
        // 100x50 at width 200 keeps the 2:1 ratio
        assert_eq!(ImageResize::calculate_dimensions(100, 50, request), (200, 100));
    }

    #[test]
    fn calculate_dimensions_height_only_preserves_aspect() {
        let request = ResizeRequest {
            width: None,
            height: Some(100),
        };
        assert_eq!(ImageResize::calculate_dimensions(100, 50, request), (200, 100));
    }

    #[test]
    fn calculate_dimensions_noop() {
        assert_eq!(
            ImageResize::calculate_dimensions(640, 480, ResizeRequest::default()),
            (640, 480)
        );
    }

    #[test]
    fn select_filter_by_ratio() {
        use image::imageops::FilterType;
        assert_eq!(ImageResize::select_filter(300, 300, 100, 100), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(180, 180, 100, 100), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(120, 120, 100, 100), FilterType::Lanczos3);
    }

    #[test]
    fn apply_resizes_exactly() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])));
        let resized = ImageResize::apply(
            &img,
            ResizeRequest {
                width: Some(50),
                height: Some(25),
            },
        );
        assert_eq!(resized.width(), 50);
        assert_eq!(resized.height(), 25);
    }

    #[test]
    fn apply_noop_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 40, Rgba([0, 255, 0, 255])));
        let resized = ImageResize::apply(&img, ResizeRequest::default());
        assert_eq!((resized.width(), resized.height()), (30, 40));
    }
}
