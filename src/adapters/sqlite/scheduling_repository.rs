//! SQLite implementation of the `SchedulingRepository` port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{
    Assignment, AssignmentSubject, AssignmentWithSubject, Driver, DriverStatus, DutyType,
    ProtectedRule, ProtectedRuleKind,
};
use crate::domain::ports::SchedulingRepository;

#[derive(Clone)]
pub struct SqliteSchedulingRepository {
    pool: SqlitePool,
}

impl SqliteSchedulingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_uuid(raw: &str) -> EngineResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| EngineError::Database(format!("invalid uuid {raw}: {e}")))
}

fn parse_timestamp(raw: &str) -> EngineResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| EngineError::Database(format!("invalid timestamp {raw}: {e}")))
}

#[derive(sqlx::FromRow)]
struct DriverRow {
    id: String,
    tenant_id: String,
    name: String,
    status: String,
    domicile: String,
    load_eligible: bool,
}

impl TryFrom<DriverRow> for Driver {
    type Error = EngineError;

    fn try_from(row: DriverRow) -> EngineResult<Self> {
        let status = DriverStatus::from_str(&row.status)
            .ok_or_else(|| EngineError::Database(format!("invalid driver status {}", row.status)))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            tenant_id: parse_uuid(&row.tenant_id)?,
            name: row.name,
            status,
            domicile: row.domicile,
            load_eligible: row.load_eligible,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: String,
    start_ts: String,
    end_ts: String,
    duty_type: String,
    cycle_id: Option<String>,
    pattern_group: Option<String>,
}

impl TryFrom<SubjectRow> for AssignmentSubject {
    type Error = EngineError;

    fn try_from(row: SubjectRow) -> EngineResult<Self> {
        // Reconstructs through the constructor so the stored duration can
        // never drift from the timestamps.
        Self::new(
            row.id,
            parse_timestamp(&row.start_ts)?,
            parse_timestamp(&row.end_ts)?,
            DutyType::parse(&row.duty_type)?,
            row.cycle_id,
            row.pattern_group,
        )
    }
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: String,
    tenant_id: String,
    driver_id: String,
    subject_id: String,
    is_active: bool,
    assigned_by: Option<String>,
    assigned_at: String,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = EngineError;

    fn try_from(row: AssignmentRow) -> EngineResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            tenant_id: parse_uuid(&row.tenant_id)?,
            driver_id: parse_uuid(&row.driver_id)?,
            subject_id: row.subject_id,
            is_active: row.is_active,
            assigned_by: row.assigned_by,
            assigned_at: parse_timestamp(&row.assigned_at)?,
        })
    }
}

/// One row of the assignment/subject join.
#[derive(sqlx::FromRow)]
struct JoinedRow {
    id: String,
    tenant_id: String,
    driver_id: String,
    subject_id: String,
    is_active: bool,
    assigned_by: Option<String>,
    assigned_at: String,
    start_ts: String,
    end_ts: String,
    duty_type: String,
    cycle_id: Option<String>,
    pattern_group: Option<String>,
}

impl TryFrom<JoinedRow> for AssignmentWithSubject {
    type Error = EngineError;

    fn try_from(row: JoinedRow) -> EngineResult<Self> {
        let assignment = Assignment {
            id: parse_uuid(&row.id)?,
            tenant_id: parse_uuid(&row.tenant_id)?,
            driver_id: parse_uuid(&row.driver_id)?,
            subject_id: row.subject_id.clone(),
            is_active: row.is_active,
            assigned_by: row.assigned_by,
            assigned_at: parse_timestamp(&row.assigned_at)?,
        };
        let subject = AssignmentSubject::new(
            row.subject_id,
            parse_timestamp(&row.start_ts)?,
            parse_timestamp(&row.end_ts)?,
            DutyType::parse(&row.duty_type)?,
            row.cycle_id,
            row.pattern_group,
        )?;

        Ok(Self::new(assignment, subject))
    }
}

#[derive(sqlx::FromRow)]
struct RuleRow {
    id: String,
    tenant_id: String,
    driver_id: String,
    kind: String,
    note: Option<String>,
}

impl TryFrom<RuleRow> for ProtectedRule {
    type Error = EngineError;

    fn try_from(row: RuleRow) -> EngineResult<Self> {
        let kind: ProtectedRuleKind = serde_json::from_str(&row.kind)?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            tenant_id: parse_uuid(&row.tenant_id)?,
            driver_id: parse_uuid(&row.driver_id)?,
            kind,
            note: row.note,
        })
    }
}

const JOIN_SELECT: &str = r"
    SELECT a.id, a.tenant_id, a.driver_id, a.subject_id, a.is_active,
           a.assigned_by, a.assigned_at,
           s.start_ts, s.end_ts, s.duty_type, s.cycle_id, s.pattern_group
    FROM assignments a
    JOIN subjects s ON s.tenant_id = a.tenant_id AND s.id = a.subject_id
";

#[async_trait]
impl SchedulingRepository for SqliteSchedulingRepository {
    async fn get_driver(&self, tenant_id: Uuid, driver_id: Uuid) -> EngineResult<Option<Driver>> {
        let row: Option<DriverRow> =
            sqlx::query_as("SELECT * FROM drivers WHERE id = ? AND tenant_id = ?")
                .bind(driver_id.to_string())
                .bind(tenant_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Driver::try_from).transpose()
    }

    async fn list_drivers(&self, tenant_id: Uuid) -> EngineResult<Vec<Driver>> {
        let rows: Vec<DriverRow> =
            sqlx::query_as("SELECT * FROM drivers WHERE tenant_id = ? ORDER BY name")
                .bind(tenant_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Driver::try_from).collect()
    }

    async fn upsert_driver(&self, driver: &Driver) -> EngineResult<()> {
        sqlx::query(
            r"INSERT INTO drivers (id, tenant_id, name, status, domicile, load_eligible)
              VALUES (?, ?, ?, ?, ?, ?)
              ON CONFLICT(id) DO UPDATE SET
                  name = excluded.name, status = excluded.status,
                  domicile = excluded.domicile, load_eligible = excluded.load_eligible",
        )
        .bind(driver.id.to_string())
        .bind(driver.tenant_id.to_string())
        .bind(&driver.name)
        .bind(driver.status.as_str())
        .bind(&driver.domicile)
        .bind(driver.load_eligible)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_subject(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
    ) -> EngineResult<Option<AssignmentSubject>> {
        let row: Option<SubjectRow> = sqlx::query_as(
            "SELECT id, start_ts, end_ts, duty_type, cycle_id, pattern_group
             FROM subjects WHERE id = ? AND tenant_id = ?",
        )
        .bind(subject_id)
        .bind(tenant_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AssignmentSubject::try_from).transpose()
    }

    async fn upsert_subject(
        &self,
        tenant_id: Uuid,
        subject: &AssignmentSubject,
    ) -> EngineResult<()> {
        sqlx::query(
            r"INSERT INTO subjects
                  (id, tenant_id, start_ts, end_ts, duration_hours, duty_type, cycle_id, pattern_group)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT(tenant_id, id) DO UPDATE SET
                  start_ts = excluded.start_ts, end_ts = excluded.end_ts,
                  duration_hours = excluded.duration_hours, duty_type = excluded.duty_type,
                  cycle_id = excluded.cycle_id, pattern_group = excluded.pattern_group",
        )
        .bind(&subject.id)
        .bind(tenant_id.to_string())
        .bind(subject.start.to_rfc3339())
        .bind(subject.end.to_rfc3339())
        .bind(subject.duration_hours)
        .bind(subject.duty_type.as_str())
        .bind(&subject.cycle_id)
        .bind(&subject.pattern_group)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_assignment(
        &self,
        tenant_id: Uuid,
        assignment_id: Uuid,
    ) -> EngineResult<Option<AssignmentWithSubject>> {
        let query = format!("{JOIN_SELECT} WHERE a.id = ? AND a.tenant_id = ?");
        let row: Option<JoinedRow> = sqlx::query_as(&query)
            .bind(assignment_id.to_string())
            .bind(tenant_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(AssignmentWithSubject::try_from).transpose()
    }

    async fn list_active_assignments(
        &self,
        tenant_id: Uuid,
    ) -> EngineResult<Vec<AssignmentWithSubject>> {
        let query = format!("{JOIN_SELECT} WHERE a.tenant_id = ? AND a.is_active = 1 ORDER BY s.start_ts");
        let rows: Vec<JoinedRow> = sqlx::query_as(&query)
            .bind(tenant_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AssignmentWithSubject::try_from).collect()
    }

    async fn list_driver_assignments(
        &self,
        tenant_id: Uuid,
        driver_id: Uuid,
    ) -> EngineResult<Vec<AssignmentWithSubject>> {
        let query = format!(
            "{JOIN_SELECT} WHERE a.tenant_id = ? AND a.driver_id = ? AND a.is_active = 1 ORDER BY s.start_ts"
        );
        let rows: Vec<JoinedRow> = sqlx::query_as(&query)
            .bind(tenant_id.to_string())
            .bind(driver_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AssignmentWithSubject::try_from).collect()
    }

    async fn list_assignments_for_subject(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
    ) -> EngineResult<Vec<Assignment>> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(
            "SELECT * FROM assignments WHERE tenant_id = ? AND subject_id = ? AND is_active = 1",
        )
        .bind(tenant_id.to_string())
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Assignment::try_from).collect()
    }

    async fn list_protected_rules(
        &self,
        tenant_id: Uuid,
        driver_id: Uuid,
    ) -> EngineResult<Vec<ProtectedRule>> {
        let rows: Vec<RuleRow> = sqlx::query_as(
            "SELECT * FROM protected_rules WHERE tenant_id = ? AND driver_id = ?",
        )
        .bind(tenant_id.to_string())
        .bind(driver_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProtectedRule::try_from).collect()
    }

    async fn insert_protected_rule(&self, rule: &ProtectedRule) -> EngineResult<()> {
        sqlx::query(
            "INSERT INTO protected_rules (id, tenant_id, driver_id, kind, note) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(rule.id.to_string())
        .bind(rule.tenant_id.to_string())
        .bind(rule.driver_id.to_string())
        .bind(serde_json::to_string(&rule.kind)?)
        .bind(&rule.note)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_assignment(&self, assignment: &Assignment) -> EngineResult<()> {
        sqlx::query(
            r"INSERT INTO assignments
                  (id, tenant_id, driver_id, subject_id, is_active, assigned_by, assigned_at)
              VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(assignment.id.to_string())
        .bind(assignment.tenant_id.to_string())
        .bind(assignment.driver_id.to_string())
        .bind(&assignment.subject_id)
        .bind(assignment.is_active)
        .bind(&assignment.assigned_by)
        .bind(assignment.assigned_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_assignment(&self, tenant_id: Uuid, assignment_id: Uuid) -> EngineResult<()> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = ? AND tenant_id = ?")
            .bind(assignment_id.to_string())
            .bind(tenant_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::AssignmentNotFound(assignment_id));
        }
        Ok(())
    }

    async fn reassign_assignment(
        &self,
        tenant_id: Uuid,
        assignment_id: Uuid,
        new_driver_id: Uuid,
    ) -> EngineResult<()> {
        let result = sqlx::query(
            "UPDATE assignments SET driver_id = ?, assigned_at = ? WHERE id = ? AND tenant_id = ?",
        )
        .bind(new_driver_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(assignment_id.to_string())
        .bind(tenant_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::AssignmentNotFound(assignment_id));
        }
        Ok(())
    }

    async fn swap_assignment_drivers(
        &self,
        tenant_id: Uuid,
        first_id: Uuid,
        second_id: Uuid,
    ) -> EngineResult<()> {
        // Both row updates commit together or not at all; a half-applied
        // swap would leave one block double-covered and one uncovered.
        let mut tx = self.pool.begin().await?;

        let first_driver: Option<(String,)> =
            sqlx::query_as("SELECT driver_id FROM assignments WHERE id = ? AND tenant_id = ?")
                .bind(first_id.to_string())
                .bind(tenant_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        let second_driver: Option<(String,)> =
            sqlx::query_as("SELECT driver_id FROM assignments WHERE id = ? AND tenant_id = ?")
                .bind(second_id.to_string())
                .bind(tenant_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;

        let first_driver = first_driver.ok_or(EngineError::AssignmentNotFound(first_id))?.0;
        let second_driver = second_driver.ok_or(EngineError::AssignmentNotFound(second_id))?.0;

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE assignments SET driver_id = ?, assigned_at = ? WHERE id = ?")
            .bind(&second_driver)
            .bind(&now)
            .bind(first_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE assignments SET driver_id = ?, assigned_at = ? WHERE id = ?")
            .bind(&first_driver)
            .bind(&now)
            .bind(second_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
