//! Property tests for duty-window aggregation and duration rounding.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use fleetsched::domain::models::{round4, AssignmentSubject, DutyType};
use fleetsched::services::{DutyWindowCalculator, TimeWindow};

proptest! {
    /// Property: duty-hour totals are independent of assignment order.
    #[test]
    fn prop_duty_hours_order_independent(
        // Quarter-hour shift lengths at hour offsets across four days.
        shifts in prop::collection::vec((0i64..96, 1i64..57), 0..12),
        shuffle_seed in any::<u64>(),
    ) {
        let base = Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap();
        let mut subjects: Vec<AssignmentSubject> = shifts
            .iter()
            .enumerate()
            .map(|(i, (offset_h, quarter_hours))| {
                let start = base + Duration::hours(*offset_h);
                AssignmentSubject::new(
                    format!("B-{i}"),
                    start,
                    start + Duration::minutes(quarter_hours * 15),
                    DutyType::Solo1,
                    None,
                    None,
                )
                .unwrap()
            })
            .collect();

        let window = TimeWindow::new(
            base + Duration::hours(24),
            base + Duration::hours(48),
        );
        let calc = DutyWindowCalculator::new();
        let forward = calc.duty_hours(&subjects, &window);

        // Deterministic pseudo-shuffle.
        let len = subjects.len();
        if len > 1 {
            for i in 0..len {
                let j = (shuffle_seed as usize).wrapping_mul(31).wrapping_add(i * 7) % len;
                subjects.swap(i, j);
            }
        }
        let shuffled = calc.duty_hours(&subjects, &window);

        prop_assert_eq!(forward.to_bits(), shuffled.to_bits());
    }

    /// Property: rounding to 4 decimals is idempotent.
    #[test]
    fn prop_round4_idempotent(hours in 0.0f64..100.0) {
        let once = round4(hours);
        prop_assert_eq!(round4(once).to_bits(), once.to_bits());
    }

    /// Property: a subject's duration always equals the rounded
    /// end-minus-start, and is never negative.
    #[test]
    fn prop_duration_matches_timestamps(
        start_offset_min in 0i64..10_000,
        length_min in 1i64..3_000,
    ) {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let start = base + Duration::minutes(start_offset_min);
        let end = start + Duration::minutes(length_min);

        let subject =
            AssignmentSubject::new("B", start, end, DutyType::Solo1, None, None).unwrap();

        prop_assert!(subject.duration_hours > 0.0);
        let expected = round4(length_min as f64 / 60.0);
        prop_assert_eq!(subject.duration_hours.to_bits(), expected.to_bits());
    }
}
