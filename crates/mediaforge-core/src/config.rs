//! Configuration module
//!
//! Runtime configuration for the conversion pipeline, loaded from the
//! environment with constant defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONVERSION_TIMEOUT_SECS: u64 = 120;

/// Converter configuration
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    /// Explicit path to the headless office converter binary. When unset,
    /// well-known install locations and `PATH` are searched.
    pub soffice_path: Option<PathBuf>,
    /// Deadline for a single external conversion subprocess.
    pub conversion_timeout: Duration,
    /// Directory for scratch files (subprocess output directories, text
    /// extraction intermediates). Defaults to the system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            soffice_path: None,
            conversion_timeout: Duration::from_secs(DEFAULT_CONVERSION_TIMEOUT_SECS),
            temp_dir: None,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from the environment.
    ///
    /// Recognized variables: `MEDIAFORGE_SOFFICE_PATH`,
    /// `MEDIAFORGE_TIMEOUT_SECS`, `MEDIAFORGE_TEMP_DIR`.
    pub fn from_env() -> Self {
        let soffice_path = env::var("MEDIAFORGE_SOFFICE_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let conversion_timeout = env::var("MEDIAFORGE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| match s.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %s, "ignoring invalid MEDIAFORGE_TIMEOUT_SECS");
                    None
                }
            })
            .unwrap_or(Duration::from_secs(DEFAULT_CONVERSION_TIMEOUT_SECS));

        let temp_dir = env::var("MEDIAFORGE_TEMP_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            soffice_path,
            conversion_timeout,
            temp_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ConverterConfig::default();
        assert!(config.soffice_path.is_none());
        assert_eq!(config.conversion_timeout, Duration::from_secs(120));
        assert!(config.temp_dir.is_none());
    }
}
