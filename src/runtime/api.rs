//! API-facing response models.

use serde::{Deserialize, Serialize};

use crate::core::{
    ConstraintError, ConstraintStore, ExecutionStatusLookup, InstanceStore, ResourceConstraintScheduler,
    UnitUsage,
};
use crate::util::types::{HoldingScope, InstanceState, UnitType};

/// One execution queued on or holding a resource unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrentExecution {
    /// Entity holding or waiting for permits.
    pub release_entity_id: String,
    /// Application of the entity.
    pub app_id: String,
    /// Active or blocked.
    pub state: InstanceState,
    /// Admission order within the unit.
    pub order: u64,
    /// Permits requested.
    pub permits: u32,
}

/// Executions contending for one resource unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrentExecutionResponse {
    /// Constraint name.
    pub constraint_name: String,
    /// Resource unit.
    pub resource_unit: String,
    /// What the unit key names.
    pub unit_type: UnitType,
    /// Constraint capacity.
    pub capacity: u32,
    /// Executions in admission order.
    pub executions: Vec<ConcurrentExecution>,
}

/// Usage of every live unit of a constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageResponse {
    /// Constraint name.
    pub constraint_name: String,
    /// Constraint capacity.
    pub capacity: u32,
    /// Per-unit usage.
    pub units: Vec<UnitUsage>,
}

/// Executions of `scope` contending for `resource_unit` of the named constraint.
pub fn fetch_concurrent_executions<S, O>(
    scheduler: &ResourceConstraintScheduler<S, O>,
    account_id: &str,
    constraint_name: &str,
    resource_unit: &str,
    scope: HoldingScope,
) -> Result<ConcurrentExecutionResponse, ConstraintError>
where
    S: InstanceStore + ConstraintStore,
    O: ExecutionStatusLookup,
{
    let constraint = scheduler.constraint_by_name(account_id, constraint_name)?;
    let executions = scheduler
        .concurrent_executions(&constraint, resource_unit, scope)?
        .into_iter()
        .map(|i| ConcurrentExecution {
            release_entity_id: i.release_entity_id,
            app_id: i.app_id,
            state: i.state,
            order: i.order,
            permits: i.permits,
        })
        .collect();
    Ok(ConcurrentExecutionResponse {
        constraint_name: constraint.name,
        resource_unit: resource_unit.to_owned(),
        unit_type: constraint.unit_type,
        capacity: constraint.capacity,
        executions,
    })
}

/// Usage summary of the named constraint.
pub fn fetch_usage<S, O>(
    scheduler: &ResourceConstraintScheduler<S, O>,
    account_id: &str,
    constraint_name: &str,
) -> Result<UsageResponse, ConstraintError>
where
    S: InstanceStore + ConstraintStore,
    O: ExecutionStatusLookup,
{
    let constraint = scheduler.constraint_by_name(account_id, constraint_name)?;
    let units = scheduler.usage(&constraint.id)?;
    Ok(UsageResponse {
        constraint_name: constraint.name,
        capacity: constraint.capacity,
        units,
    })
}
