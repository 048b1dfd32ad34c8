//! Configuration provider using Figment

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::settings::ParamkitConfig;
use crate::ConfigResult;

/// Environment variable prefix. Nested keys are separated by `__`,
/// e.g. `PARAMKIT_UPLOAD__MAX_BYTES` → `upload.max_bytes`.
pub const ENV_PREFIX: &str = "PARAMKIT_";

/// Loads [`ParamkitConfig`] from all sources.
///
/// Precedence, later overriding earlier:
/// 1. Built-in defaults
/// 2. Discovered configuration files (global, then project)
/// 3. `PARAMKIT_` environment variables
///
/// Nothing is cached; every [`load`](Self::load) reads the sources again.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom discovery, typically pointing at scratch directories.
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate the configuration.
    pub fn load(&self) -> ConfigResult<ParamkitConfig> {
        let config: ParamkitConfig = self.build_figment().extract()?;
        config.upload.validate()?;
        debug!(
            prefix = %config.upload.prefix,
            max_bytes = ?config.upload.max_bytes,
            "loaded paramkit configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ParamkitConfig::default()));
        for file in self.discovery.discover_all() {
            trace!("Merging config file: {}", file.path.display());
            figment = figment.merge(file_provider(&file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

fn file_provider(file: &ConfigFile) -> Figment {
    let path = &file.path;
    match file.format {
        ConfigFormat::Toml => Figment::from(Toml::file(path)),
        ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
        ConfigFormat::Json => Figment::from(Json::file(path)),
    }
}

/// Load the configuration from the standard locations.
pub fn load_configuration() -> ConfigResult<ParamkitConfig> {
    ConfigProvider::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::settings::DEFAULT_UPLOAD_PREFIX;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn isolated(project: &TempDir, global: &TempDir) -> ConfigProvider {
        ConfigProvider::with_discovery(FileDiscovery::with_directories(
            Some(project.path().to_path_buf()),
            Some(global.path().to_path_buf()),
        ))
    }

    #[test]
    #[serial]
    fn test_defaults_without_files() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let config = isolated(&project, &global).load().unwrap();
        assert_eq!(config.upload.prefix, DEFAULT_UPLOAD_PREFIX);
        assert_eq!(config.upload.max_bytes, None);
    }

    #[test]
    #[serial]
    fn test_project_overrides_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(
            global.path().join("paramkit.toml"),
            "[upload]\nprefix = \"global-\"\nmax_bytes = 100\n",
        )
        .unwrap();
        fs::write(
            project.path().join("paramkit.yaml"),
            "upload:\n  prefix: project-\n",
        )
        .unwrap();

        let config = isolated(&project, &global).load().unwrap();
        assert_eq!(config.upload.prefix, "project-");
        assert_eq!(config.upload.max_bytes, Some(100));
    }

    #[test]
    #[serial]
    fn test_env_overrides_files() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(
            project.path().join("paramkit.json"),
            r#"{"upload": {"max_bytes": 10}}"#,
        )
        .unwrap();

        std::env::set_var("PARAMKIT_UPLOAD__MAX_BYTES", "2048");
        let result = isolated(&project, &global).load();
        std::env::remove_var("PARAMKIT_UPLOAD__MAX_BYTES");

        assert_eq!(result.unwrap().upload.max_bytes, Some(2048));
    }

    #[test]
    #[serial]
    fn test_invalid_value_rejected() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(
            project.path().join("paramkit.toml"),
            "[upload]\nprefix = \"a/b\"\n",
        )
        .unwrap();

        let err = isolated(&project, &global).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_parse_error() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(
            project.path().join("paramkit.toml"),
            "[upload]\nmax_bytes = \"lots\"\n",
        )
        .unwrap();

        let err = isolated(&project, &global).load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
