//! Image metadata probing.

use mediaforge_core::{ConvertError, Result};
use std::path::Path;

/// Read the pixel dimensions of an image from its header, without decoding
/// the full file.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| ConvertError::MetadataUnavailable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
