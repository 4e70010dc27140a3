//! Application configuration loading and types.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use pwsync_connector::{validate_backends, BackendConfig};
use pwsync_connector_ldap::build_backends;
use pwsync_orchestrator::{ChangeOrchestrator, PasswordChangeService};
use pwsync_policy::{PasswordValidator, PolicyConfig};

use crate::error::{CliError, CliResult};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CONF_FILE";

/// Environment variable overriding `logging.filter`.
pub const LOG_ENV: &str = "PWSYNC_LOG";

const DEFAULT_CONFIG_PATH: &str = "./settings.yaml";

/// Root configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Backends in apply order.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,

    /// Strength policy; absent means every password is accepted.
    #[serde(default)]
    pub password_checker: Option<PolicyConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl AppConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> CliResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| CliError::Config(format!("Failed to parse config: {e}")))
    }

    /// Resolve the configuration file: explicit flag, then `CONF_FILE`, then the default.
    pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.override_log_filter(std::env::var(LOG_ENV).ok());
    }

    fn override_log_filter(&mut self, filter: Option<String>) {
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            self.logging.filter = filter;
        }
    }

    /// Fail-fast startup validation of backends and strength policy.
    pub fn validate(&self) -> CliResult<()> {
        validate_backends(&self.backends)?;
        if let Some(policy) = &self.password_checker {
            policy.validate()?;
        }
        Ok(())
    }

    /// Build the change service from this configuration.
    pub fn build_service(&self) -> CliResult<PasswordChangeService> {
        let backends = build_backends(&self.backends)?;
        let orchestrator = ChangeOrchestrator::new(backends)?;
        Ok(PasswordChangeService::new(self.validator(), orchestrator))
    }

    pub fn validator(&self) -> PasswordValidator {
        PasswordValidator::new(self.password_checker.clone())
    }
}
