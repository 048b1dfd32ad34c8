//! Typed settings for decoding uploaded files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ConfigResult;

/// Default prefix for uploaded-file artifacts.
pub const DEFAULT_UPLOAD_PREFIX: &str = "param-upload-";

/// Top-level configuration document.
///
/// ```toml
/// [upload]
/// prefix = "my-app-"
/// max_bytes = 10485760
/// temp_dir = "/var/tmp/uploads"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamkitConfig {
    pub upload: UploadSettings,
}

/// Where and how uploaded payloads are materialized on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Directory for upload artifacts; the system temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    /// File-name prefix of every artifact.
    pub prefix: String,
    /// Largest decoded payload accepted, in bytes. Unlimited when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            temp_dir: None,
            prefix: DEFAULT_UPLOAD_PREFIX.to_string(),
            max_bytes: None,
        }
    }
}

impl UploadSettings {
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// The directory artifacts are created in.
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Reject settings that could never produce a usable artifact.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                key: "upload.prefix".into(),
                message: "must not contain a path separator".into(),
            });
        }
        if self.max_bytes == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "upload.max_bytes".into(),
                message: "must be greater than zero".into(),
            });
        }
        if let Some(dir) = self.temp_dir.as_deref() {
            check_directory(dir)?;
        }
        Ok(())
    }
}

fn check_directory(dir: &Path) -> ConfigResult<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ConfigError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    Ok(())
}
