//! Application configuration.
//!
//! Layered loading:
//! 1) serialized defaults -> 2) YAML file (if provided) -> 3) env (`CALC__*`) -> 4) CLI overrides
//!
//! Module sections live under `modules.<name>.config` and are read through
//! [`ConfigProvider`] with [`module_config_or_default`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Prefix for environment overrides, e.g. `CALC__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "CALC__";

/// A module's `config` section is present but does not match its type.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid config for module '{module}': {source}")]
    InvalidConfig {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Command-line values that feed into the config merge.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// `-v` count: 1 info, 2 debug, 3 or more trace.
    pub verbose: u8,
}

/// Top-level configuration of the server process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    /// Raw per-module sections: `modules.<name> = { config: { ... } }`.
    pub modules: BTreeMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Load configuration from defaults, an optional YAML file and `CALC__*` env vars.
    ///
    /// # Errors
    /// Returns an error if an explicitly provided file does not exist or if any
    /// layer fails to parse.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to parse configuration")
    }

    /// Apply CLI overrides on top of the loaded layers.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let level = match args.verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// Render the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}

impl ConfigProvider for AppConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }
}

/// Lenient loader: a missing module, non-object module value, or missing
/// `config` section yields `T::default()`.
///
/// # Errors
/// Returns `ConfigError::InvalidConfig` if the config section exists but cannot be deserialized.
pub fn module_config_or_default<T: DeserializeOwned + Default>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    let Some(config_section) = provider
        .get_module_config(module_name)
        .and_then(serde_json::Value::as_object)
        .and_then(|obj| obj.get("config"))
    else {
        return Ok(T::default());
    };

    T::deserialize(config_section).map_err(|e| ConfigError::InvalidConfig {
        module: module_name.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use figment::Jail;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize, Default)]
    #[serde(default)]
    struct TestConfig {
        port: u16,
    }

    fn provider_with(name: &str, value: serde_json::Value) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.modules.insert(name.to_owned(), value);
        cfg
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = AppConfig::load_or_default(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg, AppConfig::default());
            assert_eq!(cfg.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load_or_default(Some(Path::new("/nonexistent/calc.yaml")))
            .unwrap_err()
            .to_string();
        assert!(err.contains("does not exist"), "unexpected error: {err}");
    }

    #[test]
    fn test_yaml_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "calc.yaml",
                r"
logging:
  level: warn
  format: json
modules:
  calculator:
    config:
      port: 7000
",
            )?;
            jail.set_env("CALC__LOGGING__LEVEL", "debug");

            let cfg = AppConfig::load_or_default(Some(Path::new("calc.yaml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.logging.format, LogFormat::Json);

            let module: TestConfig =
                module_config_or_default(&cfg, "calculator").map_err(|e| e.to_string())?;
            assert_eq!(module.port, 7000);
            Ok(())
        });
    }

    #[test]
    fn test_verbose_overrides_level() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliArgs { verbose: 2 });
        assert_eq!(cfg.logging.level, "debug");

        cfg.apply_cli_overrides(&CliArgs::default());
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_lenient_loader_falls_back_to_default() {
        let empty = AppConfig::default();
        let cfg: TestConfig = module_config_or_default(&empty, "calculator").unwrap();
        assert_eq!(cfg, TestConfig::default());

        let no_section = provider_with("calculator", json!({ "other": 1 }));
        let cfg: TestConfig = module_config_or_default(&no_section, "calculator").unwrap();
        assert_eq!(cfg, TestConfig::default());

        let not_object = provider_with("calculator", json!("scalar"));
        let cfg: TestConfig = module_config_or_default(&not_object, "calculator").unwrap();
        assert_eq!(cfg, TestConfig::default());
    }

    #[test]
    fn test_lenient_loader_rejects_invalid_section() {
        let cfg = provider_with("calculator", json!({ "config": { "port": "nope" } }));
        let result: Result<TestConfig, _> = module_config_or_default(&cfg, "calculator");
        assert!(matches!(result, Err(ConfigError::InvalidConfig { .. })));
    }

    #[test]
    fn test_to_yaml_contains_sections() {
        let cfg = provider_with("calculator", json!({ "config": { "port": 7000 } }));
        let yaml = cfg.to_yaml().unwrap();
        assert!(yaml.contains("logging"));
        assert!(yaml.contains("calculator"));
        assert!(yaml.contains("7000"));
    }
}
