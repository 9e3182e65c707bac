//! Assignment domain model: the link between a driver and a shift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subject::AssignmentSubject;

/// A driver-to-subject link.
///
/// Lifecycle: created on commit, moved (driver id updated, row preserved) by
/// reassign/swap, hard-deleted only on unassign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub driver_id: Uuid,
    /// Block id of the subject this assignment claims.
    pub subject_id: String,
    pub is_active: bool,
    pub assigned_by: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(
        tenant_id: Uuid,
        driver_id: Uuid,
        subject_id: impl Into<String>,
        assigned_by: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            driver_id,
            subject_id: subject_id.into(),
            is_active: true,
            assigned_by,
            assigned_at: Utc::now(),
        }
    }
}

/// An assignment joined to its subject, the shape most engine calls consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentWithSubject {
    pub assignment: Assignment,
    pub subject: AssignmentSubject,
}

impl AssignmentWithSubject {
    pub fn new(assignment: Assignment, subject: AssignmentSubject) -> Self {
        Self { assignment, subject }
    }
}
