//! Format registry
//!
//! Classifies file extensions as raster-image or office-document and
//! validates requested target formats against the frozen whitelist.

use std::path::Path;

/// Extensions handled by the raster image pipeline.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "svg", "tiff"];

/// Extensions handled by the external document converter.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "doc", "docx", "txt", "rtf", "odt", "csv", "xls", "xlsx", "ods", "ppt", "pptx", "odp", "pdf",
];

/// The frozen set of formats a conversion may target.
pub const TARGET_WHITELIST: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "pdf", "docx", "doc", "txt", "rtf", "odt", "csv", "xls",
    "xlsx", "ods", "ppt", "pptx", "odp",
];

/// Broad classification of a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    Image,
    Document,
}

/// Classify an extension (lowercase) as image or document.
///
/// The two membership sets are disjoint; unknown extensions return `None`.
pub fn classify(extension: &str) -> Option<FormatClass> {
    if IMAGE_EXTENSIONS.contains(&extension) {
        Some(FormatClass::Image)
    } else if DOCUMENT_EXTENSIONS.contains(&extension) {
        Some(FormatClass::Document)
    } else {
        None
    }
}

/// Whether `format` may be requested as a conversion target.
pub fn is_allowed_target(format: &str) -> bool {
    TARGET_WHITELIST.contains(&format)
}

/// Lowercased extension of `path`, or an empty string when it has none.
pub fn source_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}
