//! Shared identifiers and closed enums used across the scheduler.

use serde::{Deserialize, Serialize};

/// Identifier of a resource constraint instance.
pub type InstanceId = String;

/// Identifier of a resource constraint.
pub type ConstraintId = String;

/// Generate a fresh identifier.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Admission ordering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Grant capacity strictly by arrival order.
    #[default]
    Fifo,
}

/// What a resource unit key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    /// An infrastructure mapping or definition.
    #[default]
    Infra,
    /// A caller-chosen key.
    Custom,
}

/// Kind of entity whose lifecycle releases a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldingScope {
    /// A workflow execution.
    Workflow,
    /// A pipeline execution.
    Pipeline,
    /// A single phase of a workflow execution.
    Phase,
}

/// State of a permit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    /// Holds its permits.
    Active,
    /// Waiting in the queue for capacity.
    Blocked,
    /// Released; excluded from capacity accounting.
    Finished,
}

impl InstanceState {
    const fn rank(self) -> u8 {
        match self {
            Self::Blocked => 0,
            Self::Active => 1,
            Self::Finished => 2,
        }
    }

    /// Whether `next` lies strictly ahead on `BLOCKED -> ACTIVE -> FINISHED`.
    ///
    /// A blocked instance admitted and finished within one pass is persisted
    /// as a single `BLOCKED -> FINISHED` write.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }

    /// Whether the instance still counts against capacity or waits for it.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Finished)
    }
}

/// Execution status reported by the status oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Waiting to start.
    Queued,
    /// In progress.
    Running,
    /// Suspended, expected to resume.
    Paused,
    /// Completed successfully.
    Success,
    /// Completed with a failure.
    Failed,
    /// Stopped by a user.
    Aborted,
    /// Stopped by an internal error.
    Error,
    /// Timed out.
    Expired,
    /// Rejected before running.
    Rejected,
    /// Never executed.
    Skipped,
}

impl ExecutionStatus {
    /// Only queued, running and paused executions keep their permits.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued | Self::Running | Self::Paused)
    }
}
