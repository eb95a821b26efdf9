//! File conversion dispatcher.
//!
//! Routes an input file and target format to the raster codec pipeline or
//! the external document converter.

use crate::document::DocumentConverter;
use crate::fsops;
use crate::image::{ImageCodec, ImageConverter};
use mediaforge_core::formats::{self, FormatClass};
use mediaforge_core::{ConverterConfig, ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-conversion options. Every field is optional with a documented
/// fallback: `quality` defaults to 80 for lossy codecs, absent dimensions
/// skip the resize, and `density` is the DPI for vector sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionOptions {
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub density: Option<u32>,
}

/// Routes conversions to the right strategy.
pub struct FileConverter {
    documents: DocumentConverter,
}

impl FileConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            documents: DocumentConverter::new(config),
        }
    }

    /// Convert `input` to `target_format`, returning the output path
    /// (`{basename}_converted.{format}` next to the input).
    pub async fn convert(
        &self,
        input: &Path,
        target_format: &str,
        options: &ConversionOptions,
    ) -> Result<PathBuf> {
        let target = target_format.to_ascii_lowercase();

        // Whitelist validation happens before any filesystem access.
        if !formats::is_allowed_target(&target) {
            return Err(ConvertError::UnsupportedFormat(target));
        }
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }

        let source = formats::source_extension(input);
        let source_class = formats::classify(&source);
        let target_class = formats::classify(&target);
        let output = fsops::converted_output_path(input, &target);

        let source_is_document = source_class == Some(FormatClass::Document);
        let target_is_document = target_class == Some(FormatClass::Document);

        if source_class == Some(FormatClass::Image) && target_class == Some(FormatClass::Image) {
            let codec = ImageCodec::from_extension(&target).ok_or_else(|| {
                ConvertError::UnsupportedConversion {
                    source_format: source.clone(),
                    target_format: target.clone(),
                }
            })?;
            tracing::info!(
                input = %input.display(),
                target = %target,
                "dispatching to image codec converter"
            );
            ImageConverter::convert(input, &output, codec, options)
        } else if source_is_document || target == "pdf" || (target_is_document && source == "pdf") {
            tracing::info!(
                input = %input.display(),
                target = %target,
                "dispatching to document converter"
            );
            self.documents.convert(input, &output, &target).await
        } else {
            Err(ConvertError::UnsupportedConversion {
                source_format: source,
                target_format: target,
            })
        }
    }

    /// Extract plain text from a document.
    pub async fn extract_text(&self, input: &Path) -> Result<String> {
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }
        self.documents.extract_text(input).await
    }
}
