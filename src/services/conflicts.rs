//! Double-booking detection.

use crate::domain::models::Assignment;

/// Detects whether a block already has an active assignment.
///
/// Callers validating an update to an existing assignment must filter that
/// assignment out of `all_assignments` before invoking, or its own row will
/// read as a conflict. That exclusion is the caller's responsibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// Active assignments claiming `subject_id`.
    pub fn find_conflicts(
        &self,
        subject_id: &str,
        all_assignments: &[Assignment],
    ) -> Vec<Assignment> {
        all_assignments
            .iter()
            .filter(|a| a.is_active && a.subject_id == subject_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn assignment(subject_id: &str, is_active: bool) -> Assignment {
        let mut a = Assignment::new(Uuid::new_v4(), Uuid::new_v4(), subject_id, None);
        a.is_active = is_active;
        a
    }

    #[test]
    fn test_detects_active_claim_on_block() {
        let detector = ConflictDetector::new();
        let all = vec![assignment("B-1", true), assignment("B-2", true)];

        let conflicts = detector.find_conflicts("B-1", &all);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].subject_id, "B-1");
    }

    #[test]
    fn test_inactive_assignments_do_not_conflict() {
        let detector = ConflictDetector::new();
        let all = vec![assignment("B-1", false)];

        assert!(detector.find_conflicts("B-1", &all).is_empty());
    }

    #[test]
    fn test_unclaimed_block_has_no_conflicts() {
        let detector = ConflictDetector::new();
        let all = vec![assignment("B-1", true)];

        assert!(detector.find_conflicts("B-9", &all).is_empty());
    }
}
