//! DocumentConverter - office format transcoding through a headless
//! LibreOffice subprocess.
//!
//! Invocation shape: `soffice --headless --convert-to <fmt> <input>
//! --outdir <dir>`, always as an argv vector (no shell). The tool writes
//! `{basename}.{fmt}` into the output directory using its own naming; the
//! converter locates that file and moves it to the caller's path.

use crate::fsops;
use mediaforge_core::{ConverterConfig, ConvertError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;

/// Shell metacharacters stripped from paths before they reach the
/// subprocess. Upload-controlled filenames can carry any of these; argv
/// invocation already prevents word-splitting, stripping is the second
/// layer.
const SHELL_METACHARACTERS: &[char] = &['"', '$', '`', '\\'];

/// Well-known install locations checked before `PATH`.
const SOFFICE_CANDIDATES: &[&str] = &[
    "/usr/bin/soffice",
    "/usr/lib/libreoffice/program/soffice",
    "/opt/libreoffice/program/soffice",
    "/snap/bin/libreoffice.soffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
];

pub struct DocumentConverter {
    config: ConverterConfig,
}

impl DocumentConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Strip shell metacharacters from a path before subprocess use.
    pub fn sanitize_path(path: &Path) -> String {
        path.to_string_lossy()
            .chars()
            .filter(|c| !SHELL_METACHARACTERS.contains(c))
            .collect()
    }

    /// Argv for one conversion run, sanitized.
    fn build_args(input: &Path, outdir: &Path, format: &str) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--invisible".to_string(),
            "--nologo".to_string(),
            "--norestore".to_string(),
            "--convert-to".to_string(),
            format.to_string(),
            Self::sanitize_path(input),
            "--outdir".to_string(),
            Self::sanitize_path(outdir),
        ]
    }

    /// Locate the converter binary: explicit config path, well-known
    /// locations, then `PATH`.
    fn find_soffice(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.config.soffice_path {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(ConvertError::ConverterNotFound);
        }

        for candidate in SOFFICE_CANDIDATES {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }

        which::which("soffice")
            .or_else(|_| which::which("libreoffice"))
            .map_err(|_| ConvertError::ConverterNotFound)
    }

    /// Scratch directory for subprocess output, under the configured temp
    /// root when one is set.
    fn scratch_dir(&self) -> Result<TempDir> {
        let tmp = match &self.config.temp_dir {
            Some(root) => TempDir::new_in(root)?,
            None => TempDir::new()?,
        };
        Ok(tmp)
    }

    /// Convert `input` to `format`, placing the result at `output`.
    pub async fn convert(&self, input: &Path, output: &Path, format: &str) -> Result<PathBuf> {
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }

        // The subprocess gets its own scoped outdir so the tool's output
        // naming can never clobber the input or a sibling file.
        let outdir = self.scratch_dir()?;
        self.run_conversion(input, outdir.path(), format).await?;

        let produced = Self::locate_output(outdir.path(), input, format)?;
        if produced != output {
            fsops::move_file(&produced, output).await?;
        }
        Ok(output.to_path_buf())
    }

    async fn run_conversion(&self, input: &Path, outdir: &Path, format: &str) -> Result<()> {
        let soffice = self.find_soffice()?;
        let args = Self::build_args(input, outdir, format);

        tracing::debug!(
            tool = %soffice.display(),
            input = %input.display(),
            format = format,
            "running document conversion"
        );

        let mut cmd = Command::new(&soffice);
        cmd.args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Awaiting output() observes the exit fully before any output-file
        // inspection; on timeout the dropped future kills the child.
        let output = timeout(self.config.conversion_timeout, cmd.output())
            .await
            .map_err(|_| ConvertError::Timeout {
                path: input.to_path_buf(),
                timeout_secs: self.config.conversion_timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                input = %input.display(),
                status = ?output.status.code(),
                "document conversion failed: {}",
                stderr
            );
            return Err(ConvertError::ExternalToolFailure {
                path: input.to_path_buf(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    /// Find the file the tool wrote: `{basename}.{format}` by convention,
    /// else any file in the outdir carrying the target extension.
    fn locate_output(outdir: &Path, input: &Path, format: &str) -> Result<PathBuf> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let expected = outdir.join(format!("{stem}.{format}"));
        if expected.exists() {
            return Ok(expected);
        }

        let fallback = std::fs::read_dir(outdir)
            .ok()
            .and_then(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .find(|p| {
                        p.extension()
                            .and_then(|e| e.to_str())
                            .is_some_and(|e| e.eq_ignore_ascii_case(format))
                    })
            });

        fallback.ok_or_else(|| ConvertError::ExternalToolFailure {
            path: input.to_path_buf(),
            message: format!("expected output '{}' was not produced", expected.display()),
        })
    }

    /// Extract plain text by converting to a `txt` intermediate, reading it
    /// back as UTF-8, and deleting it. The intermediate lives in a scoped
    /// temp directory, so it is removed on every exit path; the explicit
    /// delete failing is logged, never propagated.
    pub async fn extract_text(&self, input: &Path) -> Result<String> {
        let scratch = self.scratch_dir()?;
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let txt_path = scratch.path().join(format!("{stem}.txt"));

        self.convert(input, &txt_path, "txt").await?;
        let contents = tokio::fs::read_to_string(&txt_path).await?;

        if let Err(e) = tokio::fs::remove_file(&txt_path).await {
            tracing::warn!(
                path = %txt_path.display(),
                error = %e,
                "failed to remove text extraction intermediate"
            );
        }

        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_metacharacters() {
        let path = PathBuf::from(r#"/tmp/evil"$`\name.docx"#);
        let sanitized = DocumentConverter::sanitize_path(&path);
        assert_eq!(sanitized, "/tmp/evilname.docx");
        for c in ['"', '$', '`', '\\'] {
            assert!(!sanitized.contains(c));
        }
    }

    #[test]
    fn sanitize_keeps_clean_paths() {
        let path = PathBuf::from("/data/reports/q3 summary.xlsx");
        assert_eq!(
            DocumentConverter::sanitize_path(&path),
            "/data/reports/q3 summary.xlsx"
        );
    }

    #[test]
    fn build_args_shape() {
        let args = DocumentConverter::build_args(
            &PathBuf::from("/in/report.docx"),
            &PathBuf::from("/out"),
            "pdf",
        );
        assert_eq!(
            args,
            vec![
                "--headless",
                "--invisible",
                "--nologo",
                "--norestore",
                "--convert-to",
                "pdf",
                "/in/report.docx",
                "--outdir",
                "/out",
            ]
        );
    }

    #[test]
    fn build_args_injection_attempt_stays_single_token() {
        let args = DocumentConverter::build_args(
            &PathBuf::from(r#"/in/x"; rm -rf \"$HOME".docx"#),
            &PathBuf::from("/out"),
            "pdf",
        );
        // One argv entry for the input, metacharacters gone, no new tokens.
        assert_eq!(args.len(), 9);
        assert_eq!(args[6], "/in/x; rm -rf HOME.docx");
    }

    #[test]
    fn missing_configured_binary_is_not_found() {
        let converter = DocumentConverter::new(ConverterConfig {
            soffice_path: Some(PathBuf::from("/nonexistent/soffice")),
            ..Default::default()
        });
        assert!(matches!(
            converter.find_soffice(),
            Err(ConvertError::ConverterNotFound)
        ));
    }

    #[test]
    fn locate_output_prefers_convention() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("report.pdf");
        std::fs::write(&expected, b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("other.pdf"), b"%PDF-1.4").unwrap();

        let found = DocumentConverter::locate_output(
            dir.path(),
            &PathBuf::from("/in/report.docx"),
            "pdf",
        )
        .unwrap();
        assert_eq!(found, expected);
    }

    #[test]
    fn locate_output_falls_back_to_extension_scan() {
        let dir = tempfile::tempdir().unwrap();
        let renamed = dir.path().join("report-1.pdf");
        std::fs::write(&renamed, b"%PDF-1.4").unwrap();

        let found = DocumentConverter::locate_output(
            dir.path(),
            &PathBuf::from("/in/report.docx"),
            "pdf",
        )
        .unwrap();
        assert_eq!(found, renamed);
    }

    #[test]
    fn locate_output_missing_is_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = DocumentConverter::locate_output(
            dir.path(),
            &PathBuf::from("/in/report.docx"),
            "pdf",
        );
        assert!(matches!(
            result,
            Err(ConvertError::ExternalToolFailure { .. })
        ));
    }

    #[tokio::test]
    async fn convert_missing_input_fails_fast() {
        let converter = DocumentConverter::new(ConverterConfig::default());
        let result = converter
            .convert(
                &PathBuf::from("/nonexistent/input.docx"),
                &PathBuf::from("/tmp/out.pdf"),
                "pdf",
            )
            .await;
        assert!(matches!(result, Err(ConvertError::InputNotFound(_))));
    }
}
