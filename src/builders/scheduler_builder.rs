//! Builds a scheduler from configuration.

use crate::config::SchedulerConfig;
use crate::core::{
    ConstraintError, ConstraintStore, ExecutionStatusLookup, InMemoryAuditSink, InstanceStore,
    ResourceConstraintScheduler,
};

/// Build a scheduler from configuration using the provided store factory.
///
/// Constraints already present in the store under the same account and name
/// are reused; the rest are registered.
pub fn build_scheduler<S, O, FS>(
    cfg: &SchedulerConfig,
    store_factory: FS,
    oracle: O,
) -> Result<ResourceConstraintScheduler<S, O>, ConstraintError>
where
    S: InstanceStore + ConstraintStore,
    O: ExecutionStatusLookup,
    FS: FnOnce(&SchedulerConfig) -> Result<S, ConstraintError>,
{
    cfg.validate()
        .map_err(|e| ConstraintError::Validation(format!("config invalid: {e}")))?;

    let store = store_factory(cfg)?;
    let scheduler = ResourceConstraintScheduler::new(store, oracle)
        .with_audit(Box::new(InMemoryAuditSink::new(cfg.audit_buffer)));

    let mut names: Vec<_> = cfg.constraints.keys().collect();
    names.sort();
    for name in names {
        let constraint = &cfg.constraints[name];
        if let Some(existing) = scheduler.store().get_by_name(&constraint.account_id, name)? {
            if existing.capacity != constraint.capacity {
                tracing::warn!(
                    name = %name,
                    stored = existing.capacity,
                    configured = constraint.capacity,
                    "constraint capacity is immutable; keeping stored value"
                );
            }
            continue;
        }
        scheduler.register_constraint(
            &constraint.account_id,
            name,
            constraint.capacity,
            constraint.strategy,
            constraint.unit_type,
        )?;
    }

    Ok(scheduler)
}
