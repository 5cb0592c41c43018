//! Configuration models for constraints, storage, audit and backup sweeps.

pub mod scheduler;

pub use scheduler::{BackupConfig, ConstraintConfig, SchedulerConfig, StoreBackendConfig, CONFIG_PATH_ENV};
