//! # Resource Constraint
//!
//! FIFO, capacity-bounded admission control for workflow executions that
//! contend for a shared resource, such as a deployment slot on one
//! infrastructure mapping.
//!
//! A [`ResourceConstraint`](core::ResourceConstraint) holds a fixed number of
//! permits per resource unit. Executions request permits with
//! [`acquire_permit`](core::ResourceConstraintScheduler::acquire_permit); the
//! request is admitted at once if it fits, otherwise it waits in arrival order.
//! When an execution ends, the orchestration engine calls
//! [`update_active_constraint_for_instance`](core::ResourceConstraintScheduler::update_active_constraint_for_instance)
//! and the scheduler asks the status oracle which holders are done, releases
//! their permits and admits the next requests in line.
//!
//! ## Key Features
//!
//! - **Strict FIFO**: an instance is active exactly when the permits of every
//!   live instance up to and including it fit in capacity
//! - **Cascading release**: newly admitted instances whose executions already
//!   ended are finished in the same call
//! - **Pluggable storage**: [`InstanceStore`](core::InstanceStore) and
//!   [`ConstraintStore`](core::ConstraintStore) with an in-memory backend
//! - **Optimistic versioning**: stale writes surface as retryable conflicts
//! - **Backup sweeps**: a tokio task re-checks every live unit periodically
//!
//! ```rust,ignore
//! use resource_constraint::core::{PermitRequest, ResourceConstraintScheduler};
//! use resource_constraint::infra::InMemoryStore;
//! use resource_constraint::util::{HoldingScope, Strategy, UnitType};
//!
//! let scheduler = ResourceConstraintScheduler::new(InMemoryStore::new(), my_oracle);
//! let rc = scheduler.register_constraint("acc", "deploy-slots", 1, Strategy::Fifo, UnitType::Infra)?;
//! let held = scheduler.acquire_permit(PermitRequest {
//!     app_id: "app".into(),
//!     resource_constraint_id: rc.id.clone(),
//!     resource_unit: "infra-1".into(),
//!     release_entity_type: HoldingScope::Workflow,
//!     release_entity_id: "exec-1".into(),
//!     permits: 1,
//! })?;
//!
//! // Later, when exec-1 ends:
//! let released = scheduler.update_active_constraint_for_instance(&held)?;
//! ```
//!
//! For complete scenarios, see `tests/unblocking_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Configuration models for constraints, storage and sweeps.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for storage backends.
pub mod infra;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
