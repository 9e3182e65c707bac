//! Port trait definitions (Hexagonal Architecture)
//!
//! The engine talks to persistence only through these traits; the domain has
//! no knowledge of the concrete store behind them.

pub mod scheduling_repository;

pub use scheduling_repository::SchedulingRepository;
