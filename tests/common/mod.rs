//! Common test utilities for integration tests
//!
//! Provides shared fixtures and database helpers used across multiple
//! integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use fleetsched::adapters::sqlite::{create_pool, Migrator, SqliteSchedulingRepository};
use fleetsched::domain::ports::SchedulingRepository;
use fleetsched::{
    Assignment, AssignmentSubject, AssignmentWithSubject, Driver, DriverStatus, DutyType,
};

/// A migrated scheduling database on disk, dropped with the TempDir.
pub struct TestDb {
    _dir: TempDir,
    pub pool: SqlitePool,
    pub repo: Arc<SqliteSchedulingRepository>,
}

/// Create a fresh file-backed test database with migrations applied.
pub async fn setup_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());

    let pool = create_pool(&url, None)
        .await
        .expect("failed to create test pool");
    Migrator::new(pool.clone())
        .run()
        .await
        .expect("failed to run migrations");

    let repo = Arc::new(SqliteSchedulingRepository::new(pool.clone()));
    TestDb {
        _dir: dir,
        pool,
        repo,
    }
}

/// Setup test logging; call at the start of tests that need output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// March 2025 timestamp shorthand.
pub fn ts(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
}

pub fn make_driver(tenant_id: Uuid, name: &str) -> Driver {
    Driver {
        id: Uuid::new_v4(),
        tenant_id,
        name: name.to_string(),
        status: DriverStatus::Active,
        domicile: "MKC".to_string(),
        load_eligible: true,
    }
}

pub fn make_subject(
    id: &str,
    start: DateTime<Utc>,
    hours: i64,
    duty_type: DutyType,
) -> AssignmentSubject {
    AssignmentSubject::new(id, start, start + Duration::hours(hours), duty_type, None, None)
        .expect("valid subject")
}

/// Persist a subject and an active assignment linking it to a driver.
pub async fn seed_assignment(
    db: &TestDb,
    tenant_id: Uuid,
    driver: &Driver,
    subject: &AssignmentSubject,
) -> AssignmentWithSubject {
    db.repo
        .upsert_subject(tenant_id, subject)
        .await
        .expect("upsert subject");

    let assignment = Assignment::new(tenant_id, driver.id, subject.id.clone(), None);
    db.repo
        .create_assignment(&assignment)
        .await
        .expect("create assignment");

    AssignmentWithSubject::new(assignment, subject.clone())
}
