//! Fleetsched - Duty-Compliance Validation & Cascade-Change Engine
//!
//! Fleetsched decides whether a proposed driver-to-shift assignment (create,
//! reassign, swap, or unassign) is permissible under hours-of-service style
//! rules, and simulates the ripple effects of a change before it is
//! committed. It is a library invoked in-process by a surrounding API layer;
//! it owns no network protocol and no UI.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and the repository port
//! - **Service Layer** (`services`): duty-window aggregation, compliance
//!   classification, protected rules, conflict detection, the assignment
//!   validator facade, cascade analysis/execution, workload aggregation
//! - **Adapters** (`adapters`): SQLite implementation of the repository port
//! - **Infrastructure** (`infrastructure`): configuration and logging setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleetsched::adapters::sqlite::{create_pool, Migrator, SqliteSchedulingRepository};
//! use fleetsched::services::{AssignmentValidator, CascadeAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = create_pool("sqlite:fleetsched.db", None).await?;
//!     Migrator::new(pool.clone()).run().await?;
//!
//!     let repo = Arc::new(SqliteSchedulingRepository::new(pool));
//!     let analyzer = CascadeAnalyzer::new(repo, AssignmentValidator::new());
//!     // analyzer.analyze(tenant_id, &request).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EngineError, EngineResult};
pub use domain::models::{
    Assignment, AssignmentSubject, AssignmentValidationOutcome, AssignmentWithSubject,
    BlockRecord, CascadeAction, CascadeAnalysis, CascadeExecution, CascadeRequest,
    ComplianceConfig, ComplianceStatus, Driver, DriverStatus, DriverWorkload, DutyType,
    EngineConfig, ProtectedRule, ProtectedRuleKind, ShiftTemplate, SwapCandidate,
    ValidationResult, WorkloadLevel, WorkloadSnapshot,
};
pub use domain::ports::SchedulingRepository;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    AssignmentValidator, CascadeAnalyzer, CascadeExecutor, ComplianceClassifier,
    WorkloadAggregator,
};
