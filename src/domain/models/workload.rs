//! Fleet workload summary types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse workload bucket for a driver's week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Light,
    Moderate,
    Heavy,
}

impl WorkloadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }

    /// Bucket by distinct days worked in the week.
    pub fn from_days_worked(days: usize) -> Self {
        match days {
            0..=2 => Self::Light,
            3..=4 => Self::Moderate,
            _ => Self::Heavy,
        }
    }
}

/// One driver's workload over a reference week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverWorkload {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub days_worked: usize,
    pub workload_level: WorkloadLevel,
    pub total_hours: f64,
    pub subject_ids: Vec<String>,
}

/// A driver who could take over a block, ranked least-loaded first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapCandidate {
    pub driver_id: Uuid,
    pub driver_name: String,
    /// The candidate's current weekly hours, before taking the block.
    pub current_hours: f64,
    /// Non-blocking compliance notes from validating the candidate.
    pub warnings: Vec<String>,
}
