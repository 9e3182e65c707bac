//! Driver domain model.
//!
//! Drivers are owned by the surrounding CRUD layer; the engine treats them as
//! read-only input.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment status of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    Inactive,
    OnLeave,
}

impl Default for DriverStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::OnLeave => "on_leave",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "on_leave" | "on-leave" => Some(Self::OnLeave),
            _ => None,
        }
    }
}

/// A driver record, scoped to a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub status: DriverStatus,
    /// Home site code, e.g. "MKC".
    pub domicile: String,
    /// Whether the driver may take loaded blocks at all.
    pub load_eligible: bool,
}

impl Driver {
    /// Whether this driver can receive new assignments.
    pub fn is_assignable(&self) -> bool {
        self.status == DriverStatus::Active && self.load_eligible
    }
}
