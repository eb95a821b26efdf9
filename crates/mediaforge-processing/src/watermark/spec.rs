//! Watermark specification types.

use mediaforge_core::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default opacity when the spec leaves it unset.
pub const DEFAULT_OPACITY: f32 = 0.5;
/// Default scale of an image mark relative to the base width.
pub const DEFAULT_SCALE: f32 = 0.2;
/// Default fill color for text marks.
pub const DEFAULT_COLOR: &str = "#000000";

/// What the mark is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    Text,
    Image,
}

/// Where the mark is anchored on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Tile,
}

impl WatermarkPosition {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "center" => Ok(WatermarkPosition::Center),
            "top-left" => Ok(WatermarkPosition::TopLeft),
            "top-right" => Ok(WatermarkPosition::TopRight),
            "bottom-left" => Ok(WatermarkPosition::BottomLeft),
            "bottom-right" => Ok(WatermarkPosition::BottomRight),
            "tile" => Ok(WatermarkPosition::Tile),
            _ => Err(ConvertError::InvalidWatermarkSpec(format!(
                "unknown position: {s}"
            ))),
        }
    }
}

/// Watermark configuration. Optional fields fall back to documented
/// defaults; `validate` enforces the payload the kind requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkSpec {
    pub kind: WatermarkKind,
    /// Mark text. Required non-empty for `Text`.
    #[serde(default)]
    pub text: Option<String>,
    /// Path to the mark image. Must exist for `Image`.
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    /// Mark opacity in `[0, 1]`. Default 0.5.
    #[serde(default)]
    pub opacity: Option<f32>,
    /// Rotation in degrees. Default 0.
    #[serde(default)]
    pub rotation_degrees: Option<f32>,
    #[serde(default)]
    pub position: WatermarkPosition,
    /// Image-mark width as a fraction of the base width, in `(0, 1]`.
    /// Default 0.2.
    #[serde(default)]
    pub scale: Option<f32>,
    /// Text fill color. Default `#000000`.
    #[serde(default)]
    pub color: Option<String>,
    /// Text font size in pixels. Default 5% of the base width.
    #[serde(default)]
    pub font_size: Option<f32>,
}

impl WatermarkSpec {
    /// A text mark with defaults for everything else.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: WatermarkKind::Text,
            text: Some(text.into()),
            image_path: None,
            opacity: None,
            rotation_degrees: None,
            position: WatermarkPosition::default(),
            scale: None,
            color: None,
            font_size: None,
        }
    }

    /// An image mark with defaults for everything else.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: WatermarkKind::Image,
            text: None,
            image_path: Some(path.into()),
            opacity: None,
            rotation_degrees: None,
            position: WatermarkPosition::default(),
            scale: None,
            color: None,
            font_size: None,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.unwrap_or(DEFAULT_OPACITY)
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees.unwrap_or(0.0)
    }

    pub fn scale(&self) -> f32 {
        self.scale.unwrap_or(DEFAULT_SCALE)
    }

    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Check the invariants the kind imposes.
    pub fn validate(&self) -> Result<()> {
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ConvertError::InvalidWatermarkSpec(format!(
                    "opacity {opacity} outside [0, 1]"
                )));
            }
        }
        if let Some(scale) = self.scale {
            if !(scale > 0.0 && scale <= 1.0) {
                return Err(ConvertError::InvalidWatermarkSpec(format!(
                    "scale {scale} outside (0, 1]"
                )));
            }
        }

        match self.kind {
            WatermarkKind::Text => match self.text.as_deref() {
                Some(text) if !text.is_empty() => Ok(()),
                _ => Err(ConvertError::InvalidWatermarkSpec(
                    "text watermark requires non-empty text".to_string(),
                )),
            },
            WatermarkKind::Image => match &self.image_path {
                Some(path) if path.exists() => Ok(()),
                Some(path) => Err(ConvertError::InvalidWatermarkSpec(format!(
                    "watermark image does not exist: {}",
                    path.display()
                ))),
                None => Err(ConvertError::InvalidWatermarkSpec(
                    "image watermark requires an image path".to_string(),
                )),
            },
        }
    }
}
