//! Engine services: validation, cascade simulation, workload aggregation.

pub mod assignment_validator;
pub mod cascade_analyzer;
pub mod cascade_executor;
pub mod compliance;
pub mod conflicts;
pub mod duty_window;
pub mod protected_rules;
pub mod workload;

pub use assignment_validator::AssignmentValidator;
pub use cascade_analyzer::CascadeAnalyzer;
pub use cascade_executor::CascadeExecutor;
pub use compliance::{ComplianceClassifier, DutyLimit};
pub use conflicts::ConflictDetector;
pub use duty_window::{DutyWindowCalculator, TimeWindow};
pub use protected_rules::ProtectedRuleValidator;
pub use workload::WorkloadAggregator;
