//! Error types for the conversion pipeline.
//!
//! Every fallible operation in the workspace returns `ConvertError`. The
//! taxonomy distinguishes validation failures (bad target format, missing
//! input, malformed watermark spec) from processing failures (codec errors,
//! external tool failures) so callers can map them to their own surfaces.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Requested target format is not in the frozen whitelist.
    #[error("unsupported target format: {0}")]
    UnsupportedFormat(String),

    /// Input file does not exist on disk.
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    /// No strategy can route this source/target pair.
    #[error("unsupported conversion: {source_format} -> {target_format}")]
    UnsupportedConversion {
        source_format: String,
        target_format: String,
    },

    /// Watermark spec is missing the payload its kind requires.
    #[error("invalid watermark spec: {0}")]
    InvalidWatermarkSpec(String),

    /// Image dimensions could not be determined.
    #[error("could not read image metadata from '{path}': {message}")]
    MetadataUnavailable { path: PathBuf, message: String },

    /// The headless document converter binary is not installed.
    #[error("document converter not found; install LibreOffice or set MEDIAFORGE_SOFFICE_PATH")]
    ConverterNotFound,

    /// The external converter exited non-zero or produced no output file.
    #[error("document conversion failed for '{path}': {message}")]
    ExternalToolFailure { path: PathBuf, message: String },

    /// The external converter exceeded the configured deadline.
    #[error("document conversion timed out after {timeout_secs}s for '{path}'")]
    Timeout { path: PathBuf, timeout_secs: u64 },

    /// Decode, transform, or encode failure in the raster pipeline.
    #[error("image processing error: {0}")]
    ImageProcessing(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Whether this error is a request-validation failure rather than a
    /// processing failure. Callers exposing an HTTP surface map validation
    /// errors to 400 and everything else to 500.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConvertError::UnsupportedFormat(_)
                | ConvertError::InputNotFound(_)
                | ConvertError::UnsupportedConversion { .. }
                | ConvertError::InvalidWatermarkSpec(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unsupported_format() {
        let err = ConvertError::UnsupportedFormat("bmp".to_string());
        assert!(format!("{}", err).contains("bmp"));
    }

    #[test]
    fn display_unsupported_conversion() {
        let err = ConvertError::UnsupportedConversion {
            source_format: "png".to_string(),
            target_format: "docx".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("png"));
        assert!(msg.contains("docx"));
    }

    #[test]
    fn display_external_tool_failure() {
        let err = ConvertError::ExternalToolFailure {
            path: PathBuf::from("/tmp/report.docx"),
            message: "source file could not be loaded".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/tmp/report.docx"));
        assert!(msg.contains("could not be loaded"));
    }

    #[test]
    fn display_timeout() {
        let err = ConvertError::Timeout {
            path: PathBuf::from("slides.pptx"),
            timeout_secs: 120,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("120"));
        assert!(msg.contains("slides.pptx"));
    }

    #[test]
    fn validation_classification() {
        assert!(ConvertError::UnsupportedFormat("exe".into()).is_validation());
        assert!(ConvertError::InputNotFound(PathBuf::from("x")).is_validation());
        assert!(ConvertError::InvalidWatermarkSpec("no text".into()).is_validation());
        assert!(!ConvertError::ConverterNotFound.is_validation());
        assert!(!ConvertError::ImageProcessing("decode failed".into()).is_validation());
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ConvertError = io_err.into();
        match err {
            ConvertError::Io(_) => {}
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
