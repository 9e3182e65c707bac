//! Cascade-change request and result types.
//!
//! A cascade describes one proposed assignment change (unassign, reassign, or
//! swap) and its simulated downstream effect on the affected drivers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};

use super::validation::ComplianceStatus;

/// The discrete action a cascade request proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeAction {
    Unassign,
    Reassign,
    Swap,
}

impl CascadeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unassign => "unassign",
            Self::Reassign => "reassign",
            Self::Swap => "swap",
        }
    }

    /// Parse an action from request text. Folding happens once, here.
    pub fn parse(raw: &str) -> EngineResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "unassign" => Ok(Self::Unassign),
            "reassign" => Ok(Self::Reassign),
            "swap" => Ok(Self::Swap),
            _ => Err(EngineError::InvalidAction(raw.to_string())),
        }
    }

    /// Whether this action needs a target driver.
    pub fn requires_target_driver(&self) -> bool {
        matches!(self, Self::Reassign | Self::Swap)
    }
}

/// One proposed change, as received from the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeRequest {
    pub assignment_id: Uuid,
    pub action: CascadeAction,
    pub target_driver_id: Option<Uuid>,
}

impl CascadeRequest {
    /// Target driver id, or the error the action mandates.
    pub fn require_target_driver(&self) -> EngineResult<Uuid> {
        self.target_driver_id
            .ok_or_else(|| EngineError::MissingTargetDriver {
                action: self.action.as_str().to_string(),
            })
    }
}

/// Point-in-time workload picture for one driver, used for before/after diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub driver_id: Uuid,
    pub driver_name: String,
    /// Duty hours in the 24h window ending at the reference shift's start.
    pub hours_24h: f64,
    /// Duty hours in the 48h window ending at the reference shift's start.
    pub hours_48h: f64,
    pub assignment_count: usize,
    pub status: ComplianceStatus,
}

/// Result of analyzing (not executing) a cascade request.
///
/// A snapshot of a prospective change, recomputed on every call; it is not
/// guaranteed stable between analysis and execution. Callers pass
/// `target_assignment_id` back to the executor to detect drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeAnalysis {
    pub can_proceed: bool,
    pub action: CascadeAction,
    pub before: Vec<WorkloadSnapshot>,
    pub after: Vec<WorkloadSnapshot>,
    pub has_violations: bool,
    pub has_warnings: bool,
    pub blocking_issues: Vec<String>,
    pub warnings: Vec<String>,
    /// The swap partner assignment found during analysis, if any.
    pub target_assignment_id: Option<Uuid>,
}

/// Result of executing a cascade change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeExecution {
    pub success: bool,
    pub message: String,
    pub updated_assignment_ids: Vec<Uuid>,
}
