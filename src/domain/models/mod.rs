pub mod assignment;
pub mod cascade;
pub mod config;
pub mod driver;
pub mod rule;
pub mod subject;
pub mod validation;
pub mod workload;

pub use assignment::{Assignment, AssignmentWithSubject};
pub use cascade::{
    CascadeAction, CascadeAnalysis, CascadeExecution, CascadeRequest, WorkloadSnapshot,
};
pub use config::{ComplianceConfig, DatabaseConfig, DutyLimitConfig, EngineConfig, LoggingConfig};
pub use driver::{Driver, DriverStatus};
pub use rule::{ProtectedRule, ProtectedRuleKind};
pub use subject::{round4, AssignmentSubject, BlockRecord, DutyType, OperatorId, ShiftTemplate};
pub use validation::{AssignmentValidationOutcome, ComplianceStatus, ValidationResult};
pub use workload::{DriverWorkload, SwapCandidate, WorkloadLevel};
