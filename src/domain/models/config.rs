//! Engine configuration model.
//!
//! Defaults mirror the stock hours-of-service table (14h/24h for short solo
//! blocks, 20h/48h for long ones). Deployments override via YAML or
//! `FLEETSCHED_*` environment variables; see `infrastructure::config`.

use serde::{Deserialize, Serialize};

use super::subject::DutyType;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub compliance: ComplianceConfig,
}

/// SQLite connection settings for the scheduling store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "fleetsched.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace | debug | info | warn | error
    pub level: String,
    /// json | pretty
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// One duty-type limit row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyLimitConfig {
    pub duty_type: DutyType,
    /// Rolling window length; 24 or 48.
    pub window_hours: u32,
    /// Hard cap; measured hours strictly above this is a violation.
    pub max_hours: f64,
    /// Fraction of the cap at which a warning starts (inclusive).
    #[serde(default = "default_warning_ratio")]
    pub warning_ratio: f64,
}

fn default_warning_ratio() -> f64 {
    0.9
}

/// Hours-of-service limit table.
///
/// Duty types without a row classify as valid. Team blocks carry no cap by
/// default but a deployment may add one here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    pub limits: Vec<DutyLimitConfig>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            limits: vec![
                DutyLimitConfig {
                    duty_type: DutyType::Solo1,
                    window_hours: 24,
                    max_hours: 14.0,
                    warning_ratio: 0.9,
                },
                DutyLimitConfig {
                    duty_type: DutyType::Solo2,
                    window_hours: 48,
                    max_hours: 20.0,
                    warning_ratio: 0.9,
                },
            ],
        }
    }
}
