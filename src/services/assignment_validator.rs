//! Assignment validation facade.

use tracing::debug;

use crate::domain::models::{
    Assignment, AssignmentSubject, AssignmentValidationOutcome, AssignmentWithSubject, Driver,
    ProtectedRule,
};

use super::compliance::ComplianceClassifier;
use super::conflicts::ConflictDetector;
use super::duty_window::{DutyWindowCalculator, TimeWindow};
use super::protected_rules::ProtectedRuleValidator;

/// Composes duty-window aggregation, compliance classification, protected
/// rules, and conflict detection into the single check run before any
/// assignment insert or update.
///
/// Both the 24h and 48h lookback windows are measured backward from the
/// candidate shift's start (prior commitments only); the classifier's limit
/// row picks which window is judged, so short duty types look back one day
/// and long ones two. The candidate subject itself is included in the
/// projected totals.
#[derive(Debug, Clone, Default)]
pub struct AssignmentValidator {
    window_calc: DutyWindowCalculator,
    classifier: ComplianceClassifier,
    rule_validator: ProtectedRuleValidator,
    conflict_detector: ConflictDetector,
}

impl AssignmentValidator {
    /// Validator with the stock compliance limit table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with a configured classifier.
    pub fn with_classifier(classifier: ComplianceClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    pub fn classifier(&self) -> &ComplianceClassifier {
        &self.classifier
    }

    /// Validate giving `subject` to `driver`.
    ///
    /// `existing` is the driver's current active assignments;
    /// `all_assignments` is the fleet-wide active set used for double-booking
    /// detection. When validating an update to an existing assignment, the
    /// caller must exclude that assignment from `all_assignments` first.
    pub fn validate(
        &self,
        driver: &Driver,
        subject: &AssignmentSubject,
        existing: &[AssignmentWithSubject],
        rules: &[ProtectedRule],
        all_assignments: &[Assignment],
    ) -> AssignmentValidationOutcome {
        let window_24h = TimeWindow::lookback_from(subject.start, 24);
        let window_48h = TimeWindow::lookback_from(subject.start, 48);

        let projected = existing
            .iter()
            .map(|a| &a.subject)
            .chain(std::iter::once(subject));
        let hours_24h = self.window_calc.duty_hours(projected.clone(), &window_24h);
        let hours_48h = self.window_calc.duty_hours(projected, &window_48h);

        let validation = self
            .classifier
            .classify(subject.duty_type, hours_24h, hours_48h);

        let protected_rule_violations = self.rule_validator.validate(driver, subject, rules);
        let conflicts = self
            .conflict_detector
            .find_conflicts(&subject.id, all_assignments);

        let can_assign = !validation.is_violation()
            && protected_rule_violations.is_empty()
            && conflicts.is_empty();

        debug!(
            driver_id = %driver.id,
            subject_id = %subject.id,
            status = validation.status.as_str(),
            can_assign,
            "assignment validated"
        );

        AssignmentValidationOutcome {
            can_assign,
            validation,
            protected_rule_violations,
            conflicts,
        }
    }
}
