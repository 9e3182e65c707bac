//! Embedded schema migrations for the scheduling store.

use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        version: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

/// The scheduling schema, in order.
pub fn scheduling_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "drivers, subjects, assignments, protected rules",
        sql: r"
            CREATE TABLE IF NOT EXISTS drivers (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                status TEXT NOT NULL,
                domicile TEXT NOT NULL,
                load_eligible INTEGER NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_drivers_tenant ON drivers(tenant_id);

            CREATE TABLE IF NOT EXISTS subjects (
                id TEXT NOT NULL,
                tenant_id TEXT NOT NULL,
                start_ts TEXT NOT NULL,
                end_ts TEXT NOT NULL,
                duration_hours REAL NOT NULL,
                duty_type TEXT NOT NULL,
                cycle_id TEXT,
                pattern_group TEXT,
                PRIMARY KEY (tenant_id, id)
            );

            CREATE TABLE IF NOT EXISTS assignments (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                driver_id TEXT NOT NULL,
                subject_id TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                assigned_by TEXT,
                assigned_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_assignments_tenant_driver
                ON assignments(tenant_id, driver_id);
            CREATE INDEX IF NOT EXISTS idx_assignments_tenant_subject
                ON assignments(tenant_id, subject_id);

            CREATE TABLE IF NOT EXISTS protected_rules (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                driver_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                note TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_rules_tenant_driver
                ON protected_rules(tenant_id, driver_id);
        ",
    }]
}

pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply all pending migrations; returns how many ran.
    pub async fn run(&self) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current = self.current_version().await?;

        let pending: Vec<_> = scheduling_migrations()
            .into_iter()
            .filter(|m| m.version > current)
            .collect();

        for migration in &pending {
            self.apply(migration).await?;
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError {
            version: 0,
            source: e,
        })?;
        Ok(())
    }

    async fn current_version(&self) -> Result<i64, MigrationError> {
        let row: (Option<i64>,) =
            sqlx::query_as("SELECT MAX(version) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await
                .map_err(MigrationError::VersionCheckError)?;
        Ok(row.0.unwrap_or(0))
    }

    async fn apply(&self, migration: &Migration) -> Result<(), MigrationError> {
        let map_err = |e: sqlx::Error| MigrationError::ExecutionError {
            version: migration.version,
            source: e,
        };

        // SQLite executes one statement per call; split the batch.
        for statement in migration
            .sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_err)?;
        }

        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        Ok(())
    }
}
