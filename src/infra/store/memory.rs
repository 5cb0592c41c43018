//! In-memory store with per-unit ordering and optimistic versioning.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use parking_lot::Mutex;

use crate::core::{
    ConstraintError, ConstraintStore, InstanceStore, ResourceConstraint, ResourceConstraintInstance,
    StateUpdate, UnitKey,
};
use crate::util::types::{ConstraintId, InstanceId};

#[derive(Default)]
struct StoreState {
    instances: HashMap<InstanceId, ResourceConstraintInstance>,
    /// Per-unit queue: order -> instance id.
    units: HashMap<UnitKey, BTreeMap<u64, InstanceId>>,
    by_entity: HashMap<String, Vec<InstanceId>>,
    constraints: HashMap<ConstraintId, ResourceConstraint>,
    names: HashMap<(String, String), ConstraintId>,
}

/// In-memory store for constraints and their instances.
///
/// All maps sit behind one `parking_lot::Mutex`, so a batch of state updates
/// is checked and applied under a single lock.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored instances, any state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().instances.len()
    }

    /// Whether no instances are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InstanceStore for InMemoryStore {
    fn insert(&self, instance: ResourceConstraintInstance) -> Result<(), ConstraintError> {
        let mut state = self.state.lock();
        if state.instances.contains_key(&instance.id) {
            return Err(ConstraintError::Conflict(format!("instance {} already exists", instance.id)));
        }
        let key = instance.unit_key();
        let queue = state.units.entry(key.clone()).or_default();
        if queue.contains_key(&instance.order) {
            return Err(ConstraintError::Conflict(format!(
                "order {} already taken on {key}",
                instance.order
            )));
        }
        queue.insert(instance.order, instance.id.clone());
        state
            .by_entity
            .entry(instance.release_entity_id.clone())
            .or_default()
            .push(instance.id.clone());
        state.instances.insert(instance.id.clone(), instance);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<ResourceConstraintInstance>, ConstraintError> {
        Ok(self.state.lock().instances.get(id).cloned())
    }

    fn list_by_unit(&self, key: &UnitKey) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        let state = self.state.lock();
        Ok(state
            .units
            .get(key)
            .map(|queue| {
                queue
                    .values()
                    .filter_map(|id| state.instances.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_by_release_entity(
        &self,
        release_entity_id: &str,
    ) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        let state = self.state.lock();
        Ok(state
            .by_entity
            .get(release_entity_id)
            .map(|ids| ids.iter().filter_map(|id| state.instances.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    fn list_live_units(&self, resource_constraint_id: &str) -> Result<Vec<String>, ConstraintError> {
        let state = self.state.lock();
        let units: BTreeSet<String> = state
            .instances
            .values()
            .filter(|i| i.resource_constraint_id == resource_constraint_id && i.state.is_live())
            .map(|i| i.resource_unit.clone())
            .collect();
        Ok(units.into_iter().collect())
    }

    fn next_order(&self, key: &UnitKey) -> Result<u64, ConstraintError> {
        let state = self.state.lock();
        Ok(state
            .units
            .get(key)
            .and_then(|queue| queue.keys().next_back())
            .map_or(1, |last| last + 1))
    }

    fn update_states(&self, updates: &[StateUpdate]) -> Result<(), ConstraintError> {
        let mut state = self.state.lock();
        for update in updates {
            let current = state
                .instances
                .get(&update.id)
                .ok_or_else(|| ConstraintError::InstanceNotFound(update.id.clone()))?;
            if current.version != update.expected_version || current.state != update.from {
                return Err(ConstraintError::Conflict(format!(
                    "instance {} is {:?} at version {}, expected {:?} at version {}",
                    update.id, current.state, current.version, update.from, update.expected_version
                )));
            }
            if !update.from.can_advance_to(update.to) {
                return Err(ConstraintError::Validation(format!(
                    "instance {} cannot move from {:?} to {:?}",
                    update.id, update.from, update.to
                )));
            }
        }
        for update in updates {
            if let Some(instance) = state.instances.get_mut(&update.id) {
                instance.state = update.to;
                instance.version += 1;
            }
        }
        Ok(())
    }
}

impl ConstraintStore for InMemoryStore {
    fn save(&self, constraint: ResourceConstraint) -> Result<(), ConstraintError> {
        let mut state = self.state.lock();
        let name_key = (constraint.account_id.clone(), constraint.name.clone());
        if state.names.contains_key(&name_key) {
            return Err(ConstraintError::Duplicate(format!(
                "constraint `{}` for account {}",
                constraint.name, constraint.account_id
            )));
        }
        if state.constraints.contains_key(&constraint.id) {
            return Err(ConstraintError::Conflict(format!("constraint {} already exists", constraint.id)));
        }
        state.names.insert(name_key, constraint.id.clone());
        state.constraints.insert(constraint.id.clone(), constraint);
        Ok(())
    }

    fn get_constraint(&self, id: &str) -> Result<Option<ResourceConstraint>, ConstraintError> {
        Ok(self.state.lock().constraints.get(id).cloned())
    }

    fn get_by_name(&self, account_id: &str, name: &str) -> Result<Option<ResourceConstraint>, ConstraintError> {
        let state = self.state.lock();
        Ok(state
            .names
            .get(&(account_id.to_owned(), name.to_owned()))
            .and_then(|id| state.constraints.get(id).cloned()))
    }

    fn list_constraints(&self) -> Result<Vec<ResourceConstraint>, ConstraintError> {
        let mut constraints: Vec<_> = self.state.lock().constraints.values().cloned().collect();
        constraints.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(constraints)
    }
}
