//! Batch orchestration with per-item failure isolation.
//!
//! One failing item never aborts or skips its siblings; results preserve
//! input order. Items run sequentially, so at most one external subprocess
//! and one decoded image are alive at a time.

use crate::converter::{ConversionOptions, FileConverter};
use crate::watermark::{Watermarker, WatermarkSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One batch result: exactly one of a non-empty `path` or an `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn ok(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into().to_string_lossy().into_owned(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// One batch input with optional per-item overrides of the batch defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInput {
    pub path: PathBuf,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub options: Option<ConversionOptions>,
}

impl BatchInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            options: None,
        }
    }
}

impl FileConverter {
    /// Convert every input, collecting one result per item in input order.
    pub async fn convert_batch(
        &self,
        inputs: &[BatchInput],
        default_format: &str,
        default_options: &ConversionOptions,
    ) -> Vec<BatchItem> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let format = input.format.as_deref().unwrap_or(default_format);
            let options = input.options.as_ref().unwrap_or(default_options);
            match self.convert(&input.path, format, options).await {
                Ok(path) => results.push(BatchItem::ok(path)),
                Err(e) => {
                    tracing::warn!(
                        path = %input.path.display(),
                        error = %e,
                        "batch conversion item failed"
                    );
                    results.push(BatchItem::failed(e.to_string()));
                }
            }
        }
        results
    }
}

/// Apply the same watermark to every input, with the same isolation and
/// ordering contract as `convert_batch`.
pub fn apply_watermark_batch(inputs: &[PathBuf], spec: &WatermarkSpec) -> Vec<BatchItem> {
    let mut results = Vec::with_capacity(inputs.len());
    for input in inputs {
        match Watermarker::apply(input, spec) {
            Ok(path) => results.push(BatchItem::ok(path)),
            Err(e) => {
                tracing::warn!(
                    path = %input.display(),
                    error = %e,
                    "batch watermark item failed"
                );
                results.push(BatchItem::failed(e.to_string()));
            }
        }
    }
    results
}
