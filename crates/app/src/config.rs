//! Environment-driven configuration.

use core::str::FromStr;

use thiserror::Error;

use gearlog_inventory::CatalogSettings;
use gearlog_observability::LogFormat;

pub const LOG_FORMAT_VAR: &str = "GEARLOG_LOG_FORMAT";
pub const ID_STRATEGY_VAR: &str = "GEARLOG_ID_STRATEGY";
pub const SEED_DEMO_VAR: &str = "GEARLOG_SEED_DEMO";
pub const PLACEHOLDER_IMAGE_VAR: &str = "GEARLOG_PLACEHOLDER_IMAGE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// How new record ids are minted.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" => Ok(IdStrategy::Sequential),
            _ => Err("expected \"uuid\" or \"sequential\"".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_format: LogFormat,
    pub id_strategy: IdStrategy,
    pub seed_demo: bool,
    pub catalog: CatalogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            id_strategy: IdStrategy::default(),
            seed_demo: true,
            catalog: CatalogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(LOG_FORMAT_VAR) {
            config.log_format = value
                .parse()
                .map_err(|e: gearlog_observability::ParseLogFormatError| {
                    ConfigError::invalid(LOG_FORMAT_VAR, &value, e.to_string())
                })?;
        }

        if let Some(value) = lookup(ID_STRATEGY_VAR) {
            config.id_strategy = value
                .parse()
                .map_err(|reason: String| ConfigError::invalid(ID_STRATEGY_VAR, &value, reason))?;
        }

        if let Some(value) = lookup(SEED_DEMO_VAR) {
            config.seed_demo = parse_flag(&value).ok_or_else(|| {
                ConfigError::invalid(SEED_DEMO_VAR, &value, "expected true or false")
            })?;
        }

        if let Some(value) = lookup(PLACEHOLDER_IMAGE_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(
                    PLACEHOLDER_IMAGE_VAR,
                    &value,
                    "must not be blank",
                ));
            }
            config.catalog.placeholder_image = value.trim().to_string();
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
