//! Domain errors for the duty-compliance engine.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Hard failures surfaced to the API layer.
///
/// Compliance violations and warnings are never errors: they travel as data
/// inside validation and cascade results. Only missing entities, invalid
/// requests, and execution-time drift are signaled here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Driver not found: {0}")]
    DriverNotFound(Uuid),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(Uuid),

    #[error("Invalid shift time range: start {start} is not before end {end}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Unrecognized duty type: {0:?}")]
    InvalidDutyType(String),

    #[error("Unrecognized cascade action: {0:?}")]
    InvalidAction(String),

    #[error("Action '{action}' requires a target driver id")]
    MissingTargetDriver { action: String },

    #[error("Driver {driver_id} has no assignment within 24h of block {subject_id} to swap")]
    NoSwapPartner { driver_id: Uuid, subject_id: String },

    #[error(
        "Swap partner drifted: expected assignment {expected}, found {actual}; re-analyze before executing"
    )]
    DriftDetected { expected: Uuid, actual: Uuid },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
