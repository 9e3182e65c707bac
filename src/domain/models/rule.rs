//! Protected assignment rules.
//!
//! Tenant-defined restrictions that narrow which blocks a specific driver may
//! work, e.g. a dedicated-contract driver who must stay on one cycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subject::AssignmentSubject;

/// What a protected rule restricts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtectedRuleKind {
    /// Driver may only work blocks on the listed pattern cycles.
    CycleExclusive { cycle_ids: Vec<String> },
    /// Driver may only work blocks in the listed pattern groups.
    PatternGroupExclusive { groups: Vec<String> },
}

/// A driver-scoped protection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedRule {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub driver_id: Uuid,
    pub kind: ProtectedRuleKind,
    pub note: Option<String>,
}

impl ProtectedRule {
    /// Evaluate this rule against a subject.
    ///
    /// Returns a blocking message when the subject falls outside what the
    /// rule allows, `None` when the rule is satisfied. A subject with no
    /// cycle/group is outside every exclusivity list.
    pub fn check(&self, driver_name: &str, subject: &AssignmentSubject) -> Option<String> {
        match &self.kind {
            ProtectedRuleKind::CycleExclusive { cycle_ids } => {
                let allowed = subject
                    .cycle_id
                    .as_ref()
                    .is_some_and(|c| cycle_ids.contains(c));
                if allowed {
                    None
                } else {
                    Some(format!(
                        "Protected rule: {} may only work cycle(s) {}; block {} is on cycle {}",
                        driver_name,
                        cycle_ids.join(", "),
                        subject.id,
                        subject.cycle_id.as_deref().unwrap_or("<none>"),
                    ))
                }
            }
            ProtectedRuleKind::PatternGroupExclusive { groups } => {
                let allowed = subject
                    .pattern_group
                    .as_ref()
                    .is_some_and(|g| groups.contains(g));
                if allowed {
                    None
                } else {
                    Some(format!(
                        "Protected rule: {} may only work pattern group(s) {}; block {} is in group {}",
                        driver_name,
                        groups.join(", "),
                        subject.id,
                        subject.pattern_group.as_deref().unwrap_or("<none>"),
                    ))
                }
            }
        }
    }
}
