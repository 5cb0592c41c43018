//! Constraint and permit-request records.

use serde::{Deserialize, Serialize};

use crate::core::ConstraintError;
use crate::util::types::{
    ConstraintId, HoldingScope, InstanceId, InstanceState, Strategy, UnitType,
};

/// A named, capacity-bounded semaphore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConstraint {
    /// Unique identifier.
    pub id: ConstraintId,
    /// Owning account.
    pub account_id: String,
    /// Human-readable label, unique per account.
    pub name: String,
    /// Total concurrent permits per resource unit.
    pub capacity: u32,
    /// Admission ordering policy.
    pub strategy: Strategy,
    /// What resource unit keys name.
    pub unit_type: UnitType,
}

impl ResourceConstraint {
    /// Check the invariants a stored constraint must hold.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if self.name.trim().is_empty() {
            return Err(ConstraintError::Validation("constraint name must not be empty".into()));
        }
        if self.capacity == 0 {
            return Err(ConstraintError::Validation(format!(
                "constraint `{}` capacity must be greater than 0",
                self.name
            )));
        }
        Ok(())
    }
}

/// Queue key: one constraint's permits tracked against one resource unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    /// Owning constraint.
    pub resource_constraint_id: ConstraintId,
    /// Resource unit within the constraint.
    pub resource_unit: String,
}

impl UnitKey {
    /// Build a key from its parts.
    pub fn new(resource_constraint_id: impl Into<String>, resource_unit: impl Into<String>) -> Self {
        Self {
            resource_constraint_id: resource_constraint_id.into(),
            resource_unit: resource_unit.into(),
        }
    }
}

impl std::fmt::Display for UnitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource_constraint_id, self.resource_unit)
    }
}

/// A queued, active or finished permit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConstraintInstance {
    /// Unique identifier.
    pub id: InstanceId,
    /// Application of the release entity, passed to the status oracle.
    pub app_id: String,
    /// Owning constraint.
    pub resource_constraint_id: ConstraintId,
    /// Resource unit the permits are counted against.
    pub resource_unit: String,
    /// Kind of the release entity.
    pub release_entity_type: HoldingScope,
    /// Entity whose completion releases the permits.
    pub release_entity_id: String,
    /// Permits consumed while active.
    pub permits: u32,
    /// Current state.
    pub state: InstanceState,
    /// Admission sequence number within the unit.
    pub order: u64,
    /// Creation time in milliseconds since epoch.
    pub acquired_at_ms: u128,
    /// Optimistic-lock counter, bumped on every persisted state change.
    pub version: u64,
}

impl ResourceConstraintInstance {
    /// Queue this instance belongs to.
    #[must_use]
    pub fn unit_key(&self) -> UnitKey {
        UnitKey::new(self.resource_constraint_id.clone(), self.resource_unit.clone())
    }
}

/// Caller-supplied request for permits on a resource unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermitRequest {
    /// Application of the release entity.
    pub app_id: String,
    /// Constraint to acquire from.
    pub resource_constraint_id: ConstraintId,
    /// Resource unit to acquire on.
    pub resource_unit: String,
    /// Kind of the release entity.
    pub release_entity_type: HoldingScope,
    /// Entity whose completion releases the permits.
    pub release_entity_id: String,
    /// Permits requested.
    pub permits: u32,
}

impl PermitRequest {
    /// Reject requests that could never be admitted.
    pub fn validate(&self, constraint: &ResourceConstraint) -> Result<(), ConstraintError> {
        if self.permits == 0 {
            return Err(ConstraintError::Validation("permits must be at least 1".into()));
        }
        if self.permits > constraint.capacity {
            return Err(ConstraintError::Validation(format!(
                "{} permits requested but `{}` has capacity {}",
                self.permits, constraint.name, constraint.capacity
            )));
        }
        if self.resource_unit.trim().is_empty() {
            return Err(ConstraintError::Validation("resource unit must not be empty".into()));
        }
        if self.release_entity_id.trim().is_empty() {
            return Err(ConstraintError::Validation("release entity id must not be empty".into()));
        }
        Ok(())
    }
}

/// One state change to persist, guarded by the version it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    /// Instance to update.
    pub id: InstanceId,
    /// Version the caller read.
    pub expected_version: u64,
    /// State the caller observed.
    pub from: InstanceState,
    /// State to write.
    pub to: InstanceState,
}

/// An entity currently holding permits on a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitHolder {
    /// Kind of the release entity.
    pub release_entity_type: HoldingScope,
    /// Entity holding the permits.
    pub release_entity_id: String,
    /// Permits held.
    pub permits: u32,
}

/// Capacity consumption of one resource unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitUsage {
    /// Resource unit.
    pub resource_unit: String,
    /// Permits held by active instances.
    pub active_permits: u64,
    /// Permits requested by blocked instances.
    pub blocked_permits: u64,
    /// Active holders in admission order.
    pub holders: Vec<PermitHolder>,
}

/// Result of one sweep over every live unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Units recomputed, successfully or not.
    pub units_checked: usize,
    /// State changes written.
    pub transitions: usize,
    /// Units whose recomputation failed.
    pub failures: usize,
}
