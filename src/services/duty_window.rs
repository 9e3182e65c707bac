//! Sliding duty-window hour aggregation.

use chrono::{DateTime, Duration, Utc};

use crate::domain::models::{round4, AssignmentSubject};

/// An inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A window of `hours` length ending at `end`.
    ///
    /// Compliance lookback is purely retrospective: the window ends at the
    /// candidate shift's start, not its end.
    pub fn lookback_from(end: DateTime<Utc>, hours: i64) -> Self {
        Self {
            start: end - Duration::hours(hours),
            end,
        }
    }

    /// Inclusive overlap test. A shift that merely touches a boundary
    /// overlaps.
    pub fn overlaps(&self, subject: &AssignmentSubject) -> bool {
        subject.start <= self.end && subject.end >= self.start
    }
}

/// Aggregates total duty hours for one driver within an arbitrary window.
///
/// Pure and deterministic: same inputs give the same total regardless of
/// assignment order. Upstream behavior is preserved deliberately: a shift
/// overlapping the window counts with its full duration, even when only a
/// sliver falls inside. Boundary-adjacent shifts are therefore attributed to
/// both neighboring windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DutyWindowCalculator;

impl DutyWindowCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Sum the durations of every subject overlapping the window.
    ///
    /// Subjects must already be resolved to a single driver; this calculator
    /// does no driver filtering.
    pub fn duty_hours<'a, I>(&self, subjects: I, window: &TimeWindow) -> f64
    where
        I: IntoIterator<Item = &'a AssignmentSubject>,
    {
        let total: f64 = subjects
            .into_iter()
            .filter(|s| window.overlaps(s))
            .map(|s| s.duration_hours)
            .sum();

        round4(total)
    }
}
