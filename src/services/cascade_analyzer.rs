//! Cascade-change simulation.
//!
//! Builds before/after workload projections for a proposed unassign,
//! reassign, or swap, re-runs the assignment validator against the simulated
//! state, and reports whether the change can proceed. Nothing here writes;
//! see `CascadeExecutor` for the commit path.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{
    Assignment, AssignmentSubject, AssignmentValidationOutcome, AssignmentWithSubject,
    CascadeAction, CascadeAnalysis, CascadeRequest, Driver, DutyType, WorkloadSnapshot,
};
use crate::domain::ports::SchedulingRepository;

use super::assignment_validator::AssignmentValidator;
use super::duty_window::{DutyWindowCalculator, TimeWindow};

/// Find the target driver's assignment nearest in time to `subject`.
///
/// Only assignments starting within 24h of the subject's start qualify (a
/// swap exchanges same-day work). Ties keep the earlier list entry.
pub(crate) fn find_swap_partner<'a>(
    subject: &AssignmentSubject,
    target_set: &'a [AssignmentWithSubject],
) -> Option<&'a AssignmentWithSubject> {
    target_set
        .iter()
        .filter(|a| {
            let gap = a.subject.start - subject.start;
            gap.abs() <= Duration::hours(24)
        })
        .min_by_key(|a| (a.subject.start - subject.start).num_seconds().abs())
}

/// Simulates the ripple effects of an assignment change before commit.
pub struct CascadeAnalyzer<R: SchedulingRepository> {
    repo: Arc<R>,
    validator: AssignmentValidator,
    window_calc: DutyWindowCalculator,
}

impl<R: SchedulingRepository> CascadeAnalyzer<R> {
    pub fn new(repo: Arc<R>, validator: AssignmentValidator) -> Self {
        Self {
            repo,
            validator,
            window_calc: DutyWindowCalculator::new(),
        }
    }

    /// Analyze one proposed change.
    ///
    /// The result is a snapshot, recomputed on every call; pass its
    /// `target_assignment_id` to the executor so swap drift can be detected
    /// at commit time.
    #[instrument(skip(self, request), fields(assignment_id = %request.assignment_id, action = request.action.as_str()))]
    pub async fn analyze(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
    ) -> EngineResult<CascadeAnalysis> {
        let source = self
            .repo
            .get_assignment(tenant_id, request.assignment_id)
            .await?
            .ok_or(EngineError::AssignmentNotFound(request.assignment_id))?;

        let source_driver = self
            .repo
            .get_driver(tenant_id, source.assignment.driver_id)
            .await?
            .ok_or(EngineError::DriverNotFound(source.assignment.driver_id))?;

        let source_set = self
            .repo
            .list_driver_assignments(tenant_id, source_driver.id)
            .await?;

        let analysis = match request.action {
            CascadeAction::Unassign => self.analyze_unassign(&source, &source_driver, &source_set),
            CascadeAction::Reassign => {
                self.analyze_reassign(tenant_id, request, &source, &source_driver, &source_set)
                    .await?
            }
            CascadeAction::Swap => {
                self.analyze_swap(tenant_id, request, &source, &source_driver, &source_set)
                    .await?
            }
        };

        if analysis.can_proceed {
            info!(
                warnings = analysis.warnings.len(),
                "cascade analysis: change can proceed"
            );
        } else {
            warn!(
                blocking = analysis.blocking_issues.len(),
                "cascade analysis: change blocked"
            );
        }

        Ok(analysis)
    }

    fn analyze_unassign(
        &self,
        source: &AssignmentWithSubject,
        source_driver: &Driver,
        source_set: &[AssignmentWithSubject],
    ) -> CascadeAnalysis {
        let reference = source.subject.start;
        let duty = source.subject.duty_type;

        let after_set = without_assignment(source_set, source.assignment.id);

        let before = vec![self.snapshot(source_driver, source_set, reference, duty)];
        let after = vec![self.snapshot(source_driver, &after_set, reference, duty)];

        // Structurally always possible; the uncovered block is worth a flag.
        let warnings = vec![format!(
            "Block {} will become unassigned",
            source.subject.id
        )];

        CascadeAnalysis {
            can_proceed: true,
            action: CascadeAction::Unassign,
            before,
            after,
            has_violations: false,
            has_warnings: true,
            blocking_issues: Vec::new(),
            warnings,
            target_assignment_id: None,
        }
    }

    async fn analyze_reassign(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
        source: &AssignmentWithSubject,
        source_driver: &Driver,
        source_set: &[AssignmentWithSubject],
    ) -> EngineResult<CascadeAnalysis> {
        let target_driver_id = request.require_target_driver()?;
        if target_driver_id == source_driver.id {
            return Err(EngineError::InvalidAction(
                "reassign target is the current driver".to_string(),
            ));
        }

        let target_driver = self
            .repo
            .get_driver(tenant_id, target_driver_id)
            .await?
            .ok_or(EngineError::DriverNotFound(target_driver_id))?;
        let target_set = self
            .repo
            .list_driver_assignments(tenant_id, target_driver_id)
            .await?;
        let rules = self
            .repo
            .list_protected_rules(tenant_id, target_driver_id)
            .await?;

        // The moving assignment still claims its block in the store; exclude
        // it or the conflict check reads the move as a double-booking.
        let fleet = self
            .active_assignments_excluding(tenant_id, &[source.assignment.id])
            .await?;

        let outcome = self.validator.validate(
            &target_driver,
            &source.subject,
            &target_set,
            &rules,
            &fleet,
        );

        let reference = source.subject.start;
        let duty = source.subject.duty_type;

        let source_after = without_assignment(source_set, source.assignment.id);
        let mut target_after = target_set.clone();
        target_after.push(reassigned_to(source, target_driver_id));

        let before = vec![
            self.snapshot(source_driver, source_set, reference, duty),
            self.snapshot(&target_driver, &target_set, reference, duty),
        ];
        let after = vec![
            self.snapshot(source_driver, &source_after, reference, duty),
            self.snapshot(&target_driver, &target_after, reference, duty),
        ];

        let mut issues = IssueAccumulator::default();
        issues.absorb(&outcome);

        Ok(issues.into_analysis(CascadeAction::Reassign, before, after, None))
    }

    async fn analyze_swap(
        &self,
        tenant_id: Uuid,
        request: &CascadeRequest,
        source: &AssignmentWithSubject,
        source_driver: &Driver,
        source_set: &[AssignmentWithSubject],
    ) -> EngineResult<CascadeAnalysis> {
        let target_driver_id = request.require_target_driver()?;
        if target_driver_id == source_driver.id {
            return Err(EngineError::InvalidAction(
                "swap target is the current driver".to_string(),
            ));
        }

        let target_driver = self
            .repo
            .get_driver(tenant_id, target_driver_id)
            .await?
            .ok_or(EngineError::DriverNotFound(target_driver_id))?;
        let target_set = self
            .repo
            .list_driver_assignments(tenant_id, target_driver_id)
            .await?;

        let reference = source.subject.start;
        let duty = source.subject.duty_type;

        let Some(partner) = find_swap_partner(&source.subject, &target_set).cloned() else {
            let before = vec![
                self.snapshot(source_driver, source_set, reference, duty),
                self.snapshot(&target_driver, &target_set, reference, duty),
            ];
            let after = before.clone();

            return Ok(CascadeAnalysis {
                can_proceed: false,
                action: CascadeAction::Swap,
                before,
                after,
                has_violations: true,
                has_warnings: false,
                blocking_issues: vec![format!(
                    "{} has no assignment within 24h of block {} to swap",
                    target_driver.name, source.subject.id
                )],
                warnings: Vec::new(),
                target_assignment_id: None,
            });
        };

        // Build both projected sets before validating either side; a swap
        // must be judged against one consistent simulated snapshot.
        let mut source_after = without_assignment(source_set, source.assignment.id);
        source_after.push(reassigned_to(&partner, source_driver.id));
        let mut target_after = without_assignment(&target_set, partner.assignment.id);
        target_after.push(reassigned_to(source, target_driver_id));

        let source_rules = self
            .repo
            .list_protected_rules(tenant_id, source_driver.id)
            .await?;
        let target_rules = self
            .repo
            .list_protected_rules(tenant_id, target_driver_id)
            .await?;
        let fleet = self
            .active_assignments_excluding(tenant_id, &[source.assignment.id, partner.assignment.id])
            .await?;

        let source_existing = without_assignment(source_set, source.assignment.id);
        let source_outcome = self.validator.validate(
            source_driver,
            &partner.subject,
            &source_existing,
            &source_rules,
            &fleet,
        );

        let target_existing = without_assignment(&target_set, partner.assignment.id);
        let target_outcome = self.validator.validate(
            &target_driver,
            &source.subject,
            &target_existing,
            &target_rules,
            &fleet,
        );

        let before = vec![
            self.snapshot(source_driver, source_set, reference, duty),
            self.snapshot(&target_driver, &target_set, reference, partner.subject.duty_type),
        ];
        let after = vec![
            self.snapshot(source_driver, &source_after, reference, partner.subject.duty_type),
            self.snapshot(&target_driver, &target_after, reference, duty),
        ];

        let mut issues = IssueAccumulator::default();
        issues.absorb(&source_outcome);
        issues.absorb(&target_outcome);

        Ok(issues.into_analysis(
            CascadeAction::Swap,
            before,
            after,
            Some(partner.assignment.id),
        ))
    }

    async fn active_assignments_excluding(
        &self,
        tenant_id: Uuid,
        excluded: &[Uuid],
    ) -> EngineResult<Vec<Assignment>> {
        Ok(self
            .repo
            .list_active_assignments(tenant_id)
            .await?
            .into_iter()
            .map(|a| a.assignment)
            .filter(|a| !excluded.contains(&a.id))
            .collect())
    }

    fn snapshot(
        &self,
        driver: &Driver,
        set: &[AssignmentWithSubject],
        reference: DateTime<Utc>,
        duty_type: DutyType,
    ) -> WorkloadSnapshot {
        let window_24h = TimeWindow::lookback_from(reference, 24);
        let window_48h = TimeWindow::lookback_from(reference, 48);

        let subjects = || set.iter().map(|a| &a.subject);
        let hours_24h = self.window_calc.duty_hours(subjects(), &window_24h);
        let hours_48h = self.window_calc.duty_hours(subjects(), &window_48h);

        let status = self
            .validator
            .classifier()
            .classify(duty_type, hours_24h, hours_48h)
            .status;

        WorkloadSnapshot {
            driver_id: driver.id,
            driver_name: driver.name.clone(),
            hours_24h,
            hours_48h,
            assignment_count: set.len(),
            status,
        }
    }
}

fn without_assignment(
    set: &[AssignmentWithSubject],
    assignment_id: Uuid,
) -> Vec<AssignmentWithSubject> {
    set.iter()
        .filter(|a| a.assignment.id != assignment_id)
        .cloned()
        .collect()
}

/// Clone an assignment-with-subject onto another driver, for projections.
fn reassigned_to(original: &AssignmentWithSubject, driver_id: Uuid) -> AssignmentWithSubject {
    let mut moved = original.clone();
    moved.assignment.driver_id = driver_id;
    moved
}

/// Collects blocking issues and warnings from validator outcomes.
#[derive(Debug, Default)]
struct IssueAccumulator {
    blocking: Vec<String>,
    warnings: Vec<String>,
}

impl IssueAccumulator {
    fn absorb(&mut self, outcome: &AssignmentValidationOutcome) {
        if outcome.validation.is_violation() {
            self.blocking.extend(outcome.validation.messages.clone());
        } else if outcome.validation.is_warning() {
            self.warnings.extend(outcome.validation.messages.clone());
        }

        self.blocking
            .extend(outcome.protected_rule_violations.clone());

        for conflict in &outcome.conflicts {
            self.blocking.push(format!(
                "Block {} already has an active assignment ({})",
                conflict.subject_id, conflict.id
            ));
        }
    }

    fn into_analysis(
        self,
        action: CascadeAction,
        before: Vec<WorkloadSnapshot>,
        after: Vec<WorkloadSnapshot>,
        target_assignment_id: Option<Uuid>,
    ) -> CascadeAnalysis {
        let has_violations = !self.blocking.is_empty();
        let has_warnings = !self.warnings.is_empty();

        CascadeAnalysis {
            can_proceed: !has_violations,
            action,
            before,
            after,
            has_violations,
            has_warnings,
            blocking_issues: self.blocking,
            warnings: self.warnings,
            target_assignment_id,
        }
    }
}
