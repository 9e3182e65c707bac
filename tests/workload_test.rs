//! Workload aggregation over repository data.

mod common;

use chrono::NaiveDate;
use common::{make_driver, make_subject, seed_assignment, setup_test_db, ts};
use uuid::Uuid;

use fleetsched::domain::ports::SchedulingRepository;
use fleetsched::{DutyType, WorkloadAggregator, WorkloadLevel};

#[tokio::test]
async fn fleet_workload_summary_over_a_week() {
    let db = setup_test_db().await;
    let tenant = Uuid::new_v4();

    let heavy = make_driver(tenant, "Heavy");
    let light = make_driver(tenant, "Light");
    db.repo.upsert_driver(&heavy).await.unwrap();
    db.repo.upsert_driver(&light).await.unwrap();

    // Five working days for one driver, one for the other. Week of
    // 2025-03-10 (Mon) through 03-16.
    for day in 10..15 {
        let id = format!("B-H{day}");
        seed_assignment(&db, tenant, &heavy, &make_subject(&id, ts(day, 6, 0), 9, DutyType::Solo1))
            .await;
    }
    seed_assignment(&db, tenant, &light, &make_subject("B-L", ts(12, 6, 0), 8, DutyType::Solo1))
        .await;

    let drivers = db.repo.list_drivers(tenant).await.unwrap();
    let assignments = db.repo.list_active_assignments(tenant).await.unwrap();

    let aggregator = WorkloadAggregator::new();
    let reference = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let workloads = aggregator.all_driver_workloads(&drivers, reference, &assignments);

    let heavy_row = workloads.iter().find(|w| w.driver_id == heavy.id).unwrap();
    assert_eq!(heavy_row.days_worked, 5);
    assert_eq!(heavy_row.workload_level, WorkloadLevel::Heavy);
    assert!((heavy_row.total_hours - 45.0).abs() < f64::EPSILON);
    assert_eq!(heavy_row.subject_ids.len(), 5);

    let light_row = workloads.iter().find(|w| w.driver_id == light.id).unwrap();
    assert_eq!(light_row.days_worked, 1);
    assert_eq!(light_row.workload_level, WorkloadLevel::Light);
}

#[tokio::test]
async fn swap_candidates_exclude_and_rank() {
    let db = setup_test_db().await;
    let tenant = Uuid::new_v4();

    let free = make_driver(tenant, "Free");
    let busy = make_driver(tenant, "Busy");
    let maxed = make_driver(tenant, "Maxed");
    for d in [&free, &busy, &maxed] {
        db.repo.upsert_driver(d).await.unwrap();
    }

    let holder = make_driver(tenant, "Holder");
    db.repo.upsert_driver(&holder).await.unwrap();

    // The block needing cover, currently held.
    let cover = make_subject("B-COVER", ts(13, 18, 0), 4, DutyType::Solo1);
    seed_assignment(&db, tenant, &holder, &cover).await;

    // Busy works earlier in the week; Maxed is already at 13h that day.
    seed_assignment(&db, tenant, &busy, &make_subject("B-BUSY", ts(11, 6, 0), 8, DutyType::Solo1))
        .await;
    seed_assignment(&db, tenant, &maxed, &make_subject("B-MAX", ts(13, 4, 0), 13, DutyType::Solo1))
        .await;

    let drivers = vec![free.clone(), busy.clone(), maxed.clone()];
    let assignments = db.repo.list_active_assignments(tenant).await.unwrap();

    let aggregator = WorkloadAggregator::new();
    let candidates = aggregator.find_swap_candidates(&cover, &drivers, &assignments, &[]);

    // Maxed would hit 17h in 24h: excluded. Free outranks Busy.
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].driver_id, free.id);
    assert_eq!(candidates[1].driver_id, busy.id);
}
