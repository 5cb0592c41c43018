//! Storage traits the scheduler reads and writes through.

use std::sync::Arc;

use crate::core::{ConstraintError, ResourceConstraint, ResourceConstraintInstance, StateUpdate, UnitKey};

/// Persistence for permit requests.
///
/// Implementations must keep `(resource_constraint_id, resource_unit, order)`
/// unique and index instances by `release_entity_id`.
pub trait InstanceStore: Send + Sync {
    /// Persist a new instance. Fails with `Conflict` if its order is taken.
    fn insert(&self, instance: ResourceConstraintInstance) -> Result<(), ConstraintError>;

    /// Fetch one instance by id.
    fn get(&self, id: &str) -> Result<Option<ResourceConstraintInstance>, ConstraintError>;

    /// All instances of a unit, any state, sorted by `order` ascending.
    fn list_by_unit(&self, key: &UnitKey) -> Result<Vec<ResourceConstraintInstance>, ConstraintError>;

    /// All instances released by the given entity, any state.
    fn list_by_release_entity(
        &self,
        release_entity_id: &str,
    ) -> Result<Vec<ResourceConstraintInstance>, ConstraintError>;

    /// Units of a constraint that still have active or blocked instances, sorted.
    fn list_live_units(&self, resource_constraint_id: &str) -> Result<Vec<String>, ConstraintError>;

    /// Order to assign to the next instance of a unit.
    fn next_order(&self, key: &UnitKey) -> Result<u64, ConstraintError>;

    /// Apply a batch of state changes atomically.
    ///
    /// Every update's `expected_version` and `from` state must match the
    /// stored record, otherwise nothing is written and `Conflict` is returned.
    fn update_states(&self, updates: &[StateUpdate]) -> Result<(), ConstraintError>;
}

/// Lookup of constraint definitions.
pub trait ConstraintStore: Send + Sync {
    /// Persist a new constraint. Fails with `Duplicate` when the account already has a constraint of that name.
    fn save(&self, constraint: ResourceConstraint) -> Result<(), ConstraintError>;

    /// Fetch by id.
    fn get_constraint(&self, id: &str) -> Result<Option<ResourceConstraint>, ConstraintError>;

    /// Fetch by account and name.
    fn get_by_name(&self, account_id: &str, name: &str) -> Result<Option<ResourceConstraint>, ConstraintError>;

    /// Every stored constraint.
    fn list_constraints(&self) -> Result<Vec<ResourceConstraint>, ConstraintError>;
}

impl<T: InstanceStore + ?Sized> InstanceStore for Arc<T> {
    fn insert(&self, instance: ResourceConstraintInstance) -> Result<(), ConstraintError> {
        (**self).insert(instance)
    }

    fn get(&self, id: &str) -> Result<Option<ResourceConstraintInstance>, ConstraintError> {
        (**self).get(id)
    }

    fn list_by_unit(&self, key: &UnitKey) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        (**self).list_by_unit(key)
    }

    fn list_by_release_entity(
        &self,
        release_entity_id: &str,
    ) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        (**self).list_by_release_entity(release_entity_id)
    }

    fn list_live_units(&self, resource_constraint_id: &str) -> Result<Vec<String>, ConstraintError> {
        (**self).list_live_units(resource_constraint_id)
    }

    fn next_order(&self, key: &UnitKey) -> Result<u64, ConstraintError> {
        (**self).next_order(key)
    }

    fn update_states(&self, updates: &[StateUpdate]) -> Result<(), ConstraintError> {
        (**self).update_states(updates)
    }
}

impl<T: ConstraintStore + ?Sized> ConstraintStore for Arc<T> {
    fn save(&self, constraint: ResourceConstraint) -> Result<(), ConstraintError> {
        (**self).save(constraint)
    }

    fn get_constraint(&self, id: &str) -> Result<Option<ResourceConstraint>, ConstraintError> {
        (**self).get_constraint(id)
    }

    fn get_by_name(&self, account_id: &str, name: &str) -> Result<Option<ResourceConstraint>, ConstraintError> {
        (**self).get_by_name(account_id, name)
    }

    fn list_constraints(&self) -> Result<Vec<ResourceConstraint>, ConstraintError> {
        (**self).list_constraints()
    }
}
