//! Cascade-change execution.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{CascadeAction, CascadeExecution, CascadeRequest};
use crate::domain::ports::SchedulingRepository;

use super::assignment_validator::AssignmentValidator;
use super::cascade_analyzer::{find_swap_partner, CascadeAnalyzer};

/// Applies an analyzed cascade change through the repository.
///
/// Analysis results are snapshots, not reservations: between analyze and
/// execute another actor may have moved the swap partner. The executor
/// re-resolves the partner fresh and, when the caller supplies the partner id
/// it analyzed against, aborts with [`EngineError::DriftDetected`] on any
/// mismatch, before touching the store. The swap write itself goes through
/// [`SchedulingRepository::swap_assignment_drivers`], which commits both row
/// updates in one transaction.
pub struct CascadeExecutor<R: SchedulingRepository> {
    repo: Arc<R>,
    analyzer: CascadeAnalyzer<R>,
}

impl<R: SchedulingRepository> CascadeExecutor<R> {
    pub fn new(repo: Arc<R>, validator: AssignmentValidator) -> Self {
        let analyzer = CascadeAnalyzer::new(Arc::clone(&repo), validator);
        Self { repo, analyzer }
    }

    /// Execute one cascade change.
    ///
    /// Re-runs the analysis first; a blocked change is reported with
    /// `success: false` and no writes. Violations never commit through this
    /// path, even when the caller skipped the analyze step.
    #[instrument(skip(self, request), fields(assignment_id = %request.assignment_id, action = request.action.as_str()))]
    pub async fn execute(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
        expected_target_assignment_id: Option<Uuid>,
    ) -> EngineResult<CascadeExecution> {
        let analysis = self.analyzer.analyze(tenant_id, request).await?;
        if !analysis.can_proceed {
            warn!("execution refused: analysis reported blocking issues");
            return Ok(CascadeExecution {
                success: false,
                message: format!("Change blocked: {}", analysis.blocking_issues.join("; ")),
                updated_assignment_ids: Vec::new(),
            });
        }

        match request.action {
            CascadeAction::Unassign => self.execute_unassign(tenant_id, request).await,
            CascadeAction::Reassign => self.execute_reassign(tenant_id, request).await,
            CascadeAction::Swap => {
                self.execute_swap(tenant_id, request, expected_target_assignment_id)
                    .await
            }
        }
    }

    async fn execute_unassign(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
    ) -> EngineResult<CascadeExecution> {
        let source = self
            .repo
            .get_assignment(tenant_id, request.assignment_id)
            .await?
            .ok_or(EngineError::AssignmentNotFound(request.assignment_id))?;

        self.repo
            .delete_assignment(tenant_id, request.assignment_id)
            .await?;

        info!(subject_id = %source.subject.id, "assignment deleted");
        Ok(CascadeExecution {
            success: true,
            message: format!("Block {} unassigned", source.subject.id),
            updated_assignment_ids: vec![request.assignment_id],
        })
    }

    async fn execute_reassign(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
    ) -> EngineResult<CascadeExecution> {
        let target_driver_id = request.require_target_driver()?;
        let target_driver = self
            .repo
            .get_driver(tenant_id, target_driver_id)
            .await?
            .ok_or(EngineError::DriverNotFound(target_driver_id))?;

        self.repo
            .reassign_assignment(tenant_id, request.assignment_id, target_driver_id)
            .await?;

        info!(target_driver = %target_driver.name, "assignment moved");
        Ok(CascadeExecution {
            success: true,
            message: format!("Assignment moved to {}", target_driver.name),
            updated_assignment_ids: vec![request.assignment_id],
        })
    }

    async fn execute_swap(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
        expected_target_assignment_id: Option<Uuid>,
    ) -> EngineResult<CascadeExecution> {
        let target_driver_id = request.require_target_driver()?;

        // Resolve the partner against current state, not the analysis result.
        let source = self
            .repo
            .get_assignment(tenant_id, request.assignment_id)
            .await?
            .ok_or(EngineError::AssignmentNotFound(request.assignment_id))?;
        let target_set = self
            .repo
            .list_driver_assignments(tenant_id, target_driver_id)
            .await?;

        let partner = find_swap_partner(&source.subject, &target_set).ok_or_else(|| {
            EngineError::NoSwapPartner {
                driver_id: target_driver_id,
                subject_id: source.subject.id.clone(),
            }
        })?;

        if let Some(expected) = expected_target_assignment_id {
            if expected != partner.assignment.id {
                warn!(
                    expected = %expected,
                    actual = %partner.assignment.id,
                    "swap partner changed since analysis"
                );
                return Err(EngineError::DriftDetected {
                    expected,
                    actual: partner.assignment.id,
                });
            }
        }

        self.repo
            .swap_assignment_drivers(tenant_id, source.assignment.id, partner.assignment.id)
            .await?;

        info!(partner_id = %partner.assignment.id, "assignments swapped");
        Ok(CascadeExecution {
            success: true,
            message: format!(
                "Blocks {} and {} swapped",
                source.subject.id, partner.subject.id
            ),
            updated_assignment_ids: vec![source.assignment.id, partner.assignment.id],
        })
    }
}
