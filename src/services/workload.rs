//! Fleet-wide and per-driver workload aggregation.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::domain::models::{
    round4, AssignmentSubject, AssignmentWithSubject, Driver, DriverWorkload, ProtectedRule,
    SwapCandidate, WorkloadLevel,
};

use super::assignment_validator::AssignmentValidator;

/// Summarizes driver workloads over a week and ranks swap candidates.
#[derive(Debug, Clone, Default)]
pub struct WorkloadAggregator {
    validator: AssignmentValidator,
}

impl WorkloadAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(validator: AssignmentValidator) -> Self {
        Self { validator }
    }

    /// Per-driver workload summaries for the week containing `reference`.
    ///
    /// The week runs Monday through Sunday; a shift belongs to the day it
    /// starts. Drivers with no work that week still get a (light) row.
    pub fn all_driver_workloads(
        &self,
        drivers: &[Driver],
        reference: NaiveDate,
        assignments: &[AssignmentWithSubject],
    ) -> Vec<DriverWorkload> {
        let week_start = week_start(reference);
        let week_end = week_start + Duration::days(7);

        drivers
            .iter()
            .map(|driver| {
                let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
                let mut total_hours = 0.0;
                let mut subject_ids = Vec::new();

                for entry in assignments {
                    if entry.assignment.driver_id != driver.id || !entry.assignment.is_active {
                        continue;
                    }
                    let day = entry.subject.start.date_naive();
                    if day < week_start || day >= week_end {
                        continue;
                    }
                    days.insert(day);
                    total_hours += entry.subject.duration_hours;
                    subject_ids.push(entry.subject.id.clone());
                }

                subject_ids.sort();

                DriverWorkload {
                    driver_id: driver.id,
                    driver_name: driver.name.clone(),
                    days_worked: days.len(),
                    workload_level: WorkloadLevel::from_days_worked(days.len()),
                    total_hours: round4(total_hours),
                    subject_ids,
                }
            })
            .collect()
    }

    /// Drivers who could take `subject`, least-loaded first.
    ///
    /// Each assignable driver is run through the assignment validator with
    /// the target subject; drivers who could not legally take it are
    /// excluded. Assignments currently claiming the subject are left out of
    /// the conflict input, since the point is to replace them. Ranking is by
    /// ascending weekly hours, driver id as the stable tiebreak.
    pub fn find_swap_candidates(
        &self,
        subject: &AssignmentSubject,
        drivers: &[Driver],
        assignments: &[AssignmentWithSubject],
        rules: &[ProtectedRule],
    ) -> Vec<SwapCandidate> {
        let fleet: Vec<_> = assignments
            .iter()
            .filter(|a| a.subject.id != subject.id)
            .map(|a| a.assignment.clone())
            .collect();

        let reference = subject.start.date_naive();

        let mut candidates: Vec<SwapCandidate> = drivers
            .iter()
            .filter(|d| d.is_assignable())
            .filter_map(|driver| {
                let existing: Vec<_> = assignments
                    .iter()
                    .filter(|a| a.assignment.driver_id == driver.id && a.assignment.is_active)
                    .cloned()
                    .collect();

                let outcome = self
                    .validator
                    .validate(driver, subject, &existing, rules, &fleet);
                if !outcome.can_assign {
                    debug!(driver = %driver.name, "excluded as swap candidate");
                    return None;
                }

                let workload =
                    self.all_driver_workloads(std::slice::from_ref(driver), reference, assignments);
                let current_hours = workload.first().map_or(0.0, |w| w.total_hours);

                Some(SwapCandidate {
                    driver_id: driver.id,
                    driver_name: driver.name.clone(),
                    current_hours,
                    warnings: outcome.validation.messages,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.current_hours
                .partial_cmp(&b.current_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.driver_id.cmp(&b.driver_id))
        });

        candidates
    }
}

/// Monday of the week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
