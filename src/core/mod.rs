//! Core scheduling abstractions and capacity accounting.

pub mod audit;
pub mod error;
pub mod model;
pub mod oracle;
pub mod scheduler;
pub mod store;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, ConstraintError};
pub use model::{
    PermitHolder, PermitRequest, ResourceConstraint, ResourceConstraintInstance, StateUpdate,
    SweepReport, UnitKey, UnitUsage,
};
pub use oracle::{ExecutionStatusLookup, StatusCache};
pub use scheduler::ResourceConstraintScheduler;
pub use store::{ConstraintStore, InstanceStore};
