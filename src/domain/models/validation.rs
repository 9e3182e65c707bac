//! Validation result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::assignment::Assignment;

/// Three-tier compliance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Valid,
    Warning,
    Violation,
}

impl Default for ComplianceStatus {
    fn default() -> Self {
        Self::Valid
    }
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Warning => "warning",
            Self::Violation => "violation",
        }
    }
}

/// Outcome of one compliance classification.
///
/// Produced fresh on every call and never cached: duty windows are relative
/// to the shift's own timestamps, so yesterday's result is stale today.
/// Metrics use a `BTreeMap` so identical inputs serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ComplianceStatus,
    pub messages: Vec<String>,
    pub metrics: BTreeMap<String, f64>,
}

impl ValidationResult {
    pub fn is_violation(&self) -> bool {
        self.status == ComplianceStatus::Violation
    }

    pub fn is_warning(&self) -> bool {
        self.status == ComplianceStatus::Warning
    }
}

/// Full outcome of the assignment-validator facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentValidationOutcome {
    /// False iff a violation, protected-rule breach, or conflict exists.
    /// Warnings never block.
    pub can_assign: bool,
    pub validation: ValidationResult,
    pub protected_rule_violations: Vec<String>,
    /// Other active assignments already claiming the same block.
    pub conflicts: Vec<Assignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_severity_ordering() {
        assert!(ComplianceStatus::Violation > ComplianceStatus::Warning);
        assert!(ComplianceStatus::Warning > ComplianceStatus::Valid);
    }

    #[test]
    fn test_identical_results_serialize_identically() {
        let result = |order: &[(&str, f64)]| {
            let mut metrics = BTreeMap::new();
            for (key, value) in order {
                metrics.insert((*key).to_string(), *value);
            }
            ValidationResult {
                status: ComplianceStatus::Valid,
                messages: Vec::new(),
                metrics,
            }
        };

        let a = result(&[("hours_24h", 10.0), ("hours_48h", 12.0)]);
        let b = result(&[("hours_48h", 12.0), ("hours_24h", 10.0)]);

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
