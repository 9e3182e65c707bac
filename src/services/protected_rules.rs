//! Protected-rule evaluation.

use crate::domain::models::{AssignmentSubject, Driver, ProtectedRule};

/// Checks tenant-defined exclusivity rules for a driver/subject pairing.
///
/// Rules are driver-scoped: a driver with none always passes. Every violated
/// rule produces its own message; evaluation never short-circuits, so the
/// caller can show the full list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtectedRuleValidator;

impl ProtectedRuleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Blocking messages for every rule the pairing violates.
    pub fn validate(
        &self,
        driver: &Driver,
        subject: &AssignmentSubject,
        rules: &[ProtectedRule],
    ) -> Vec<String> {
        rules
            .iter()
            .filter(|rule| rule.driver_id == driver.id)
            .filter_map(|rule| rule.check(&driver.name, subject))
            .collect()
    }
}
