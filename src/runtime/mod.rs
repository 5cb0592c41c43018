//! Runtime adapters and API surface.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod backup;

pub use api::{fetch_concurrent_executions, fetch_usage, ConcurrentExecution, ConcurrentExecutionResponse, UsageResponse};
#[cfg(feature = "tokio-runtime")]
pub use backup::BackupSweeper;
