//! Filesystem conventions and atomic output writes.

use mediaforge_core::{ConvertError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Conversion output path: `{basename}_converted.{format}` next to the input.
///
/// Never collides with the original file, and repeated identical calls
/// overwrite the same path deterministically.
pub fn converted_output_path(input: &Path, target_format: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_converted.{target_format}"))
}

/// Watermark output path: `{basename}_watermarked{ext}` next to the input.
pub fn watermarked_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => input.with_file_name(format!("{stem}_watermarked.{ext}")),
        None => input.with_file_name(format!("{stem}_watermarked")),
    }
}

/// Write `data` to `path` atomically: stage in a temp file in the target
/// directory, then persist-rename. A failure part-way never leaves a
/// truncated file at `path`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut staged = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    staged.write_all(data)?;
    staged.flush()?;
    staged
        .persist(path)
        .map_err(|e| ConvertError::Io(e.error))?;
    Ok(())
}

/// Move `from` to `to`, falling back to copy+delete when a rename crosses
/// filesystems.
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    if let Err(e) = tokio::fs::remove_file(from).await {
        tracing::warn!(path = %from.display(), error = %e, "failed to remove moved source");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn converted_path_convention() {
        let out = converted_output_path(&PathBuf::from("/data/in/sample.png"), "webp");
        assert_eq!(out, PathBuf::from("/data/in/sample_converted.webp"));
    }

    #[test]
    fn converted_path_is_idempotent() {
        let first = converted_output_path(&PathBuf::from("a/report.docx"), "pdf");
        let second = converted_output_path(&PathBuf::from("a/report.docx"), "pdf");
        assert_eq!(first, second);
    }

    #[test]
    fn watermarked_path_convention() {
        let out = watermarked_output_path(&PathBuf::from("/img/sample.png"));
        assert_eq!(out, PathBuf::from("/img/sample_watermarked.png"));
    }

    #[test]
    fn watermarked_path_without_extension() {
        let out = watermarked_output_path(&PathBuf::from("/img/sample"));
        assert_eq!(out, PathBuf::from("/img/sample_watermarked"));
    }

    #[test]
    fn write_atomic_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        write_atomic(&target, b"payload").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    }

    #[test]
    fn write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"second");
    }
}
