//! paramkit configuration management using Figment
//!
//! Loads the settings that govern how uploaded files are materialized.
//! Sources merge in precedence order: defaults → `~/.paramkit/paramkit.*`
//! → `./.paramkit/paramkit.*` → `PARAMKIT_` environment variables.
//!
//! ```no_run
//! use paramkit_config::load_configuration;
//!
//! let config = load_configuration()?;
//! println!("uploads go to {}", config.upload.resolved_temp_dir().display());
//! # Ok::<(), paramkit_config::ConfigError>(())
//! ```
//!
//! # Environment Variables
//!
//! ```bash
//! export PARAMKIT_UPLOAD__PREFIX="my-app-"      # → upload.prefix
//! export PARAMKIT_UPLOAD__MAX_BYTES="1048576"   # → upload.max_bytes
//! export PARAMKIT_UPLOAD__TEMP_DIR="/var/tmp"   # → upload.temp_dir
//! ```

/// File discovery logic for configuration files
pub mod discovery;
/// Error types and handling
pub mod error;
/// Figment-backed loader
pub mod provider;
/// Typed settings
pub mod settings;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::ConfigError;
pub use provider::{load_configuration, ConfigProvider, ENV_PREFIX};
pub use settings::{ParamkitConfig, UploadSettings, DEFAULT_UPLOAD_PREFIX};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
