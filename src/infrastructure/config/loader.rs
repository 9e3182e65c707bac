use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::EngineConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid compliance window: {0}h. Must be 24 or 48")]
    InvalidComplianceWindow(u32),

    #[error("Invalid max_hours for {duty_type}: {max_hours}. Must be positive")]
    InvalidMaxHours { duty_type: String, max_hours: f64 },

    #[error("Invalid warning_ratio for {duty_type}: {ratio}. Must be in (0, 1]")]
    InvalidWarningRatio { duty_type: String, ratio: f64 },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. fleetsched.yaml in the working directory
    /// 3. Environment variables (FLEETSCHED_* prefix, highest priority)
    pub fn load() -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file("fleetsched.yaml"))
            .merge(Env::prefixed("FLEETSCHED_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        for limit in &config.compliance.limits {
            if limit.window_hours != 24 && limit.window_hours != 48 {
                return Err(ConfigError::InvalidComplianceWindow(limit.window_hours));
            }
            if limit.max_hours <= 0.0 {
                return Err(ConfigError::InvalidMaxHours {
                    duty_type: limit.duty_type.to_string(),
                    max_hours: limit.max_hours,
                });
            }
            if limit.warning_ratio <= 0.0 || limit.warning_ratio > 1.0 {
                return Err(ConfigError::InvalidWarningRatio {
                    duty_type: limit.duty_type.to_string(),
                    ratio: limit.warning_ratio,
                });
            }
        }

        Ok(())
    }
}
