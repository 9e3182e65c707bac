//! Repository port for the scheduling store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::EngineResult;
use crate::domain::models::{
    Assignment, AssignmentSubject, AssignmentWithSubject, Driver, ProtectedRule,
};

/// Data-access collaborator for drivers, subjects, assignments, and rules.
///
/// Every method takes an explicit `tenant_id`; the engine never relies on
/// ambient tenant state. Reads return `None`/empty for rows belonging to a
/// different tenant, the same as for absent rows.
#[async_trait]
pub trait SchedulingRepository: Send + Sync {
    async fn get_driver(&self, tenant_id: Uuid, driver_id: Uuid) -> EngineResult<Option<Driver>>;

    async fn list_drivers(&self, tenant_id: Uuid) -> EngineResult<Vec<Driver>>;

    async fn upsert_driver(&self, driver: &Driver) -> EngineResult<()>;

    async fn get_subject(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
    ) -> EngineResult<Option<AssignmentSubject>>;

    async fn upsert_subject(&self, tenant_id: Uuid, subject: &AssignmentSubject)
        -> EngineResult<()>;

    /// Fetch one assignment joined to its subject.
    async fn get_assignment(
        &self,
        tenant_id: Uuid,
        assignment_id: Uuid,
    ) -> EngineResult<Option<AssignmentWithSubject>>;

    /// All active assignments for the tenant, joined to subjects.
    async fn list_active_assignments(
        &self,
        tenant_id: Uuid,
    ) -> EngineResult<Vec<AssignmentWithSubject>>;

    /// Active assignments for one driver, joined to subjects.
    async fn list_driver_assignments(
        &self,
        tenant_id: Uuid,
        driver_id: Uuid,
    ) -> EngineResult<Vec<AssignmentWithSubject>>;

    /// Active assignments claiming one subject.
    async fn list_assignments_for_subject(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
    ) -> EngineResult<Vec<Assignment>>;

    async fn list_protected_rules(
        &self,
        tenant_id: Uuid,
        driver_id: Uuid,
    ) -> EngineResult<Vec<ProtectedRule>>;

    async fn insert_protected_rule(&self, rule: &ProtectedRule) -> EngineResult<()>;

    async fn create_assignment(&self, assignment: &Assignment) -> EngineResult<()>;

    /// Hard-delete an assignment (the unassign write).
    async fn delete_assignment(&self, tenant_id: Uuid, assignment_id: Uuid) -> EngineResult<()>;

    /// Move an assignment to another driver in a single update.
    async fn reassign_assignment(
        &self,
        tenant_id: Uuid,
        assignment_id: Uuid,
        new_driver_id: Uuid,
    ) -> EngineResult<()>;

    /// Exchange the drivers of two assignments atomically.
    ///
    /// Implementations must commit both updates in one transaction; a swap
    /// must never be observable half-applied.
    async fn swap_assignment_drivers(
        &self,
        tenant_id: Uuid,
        first_id: Uuid,
        second_id: Uuid,
    ) -> EngineResult<()>;
}
