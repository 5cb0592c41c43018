//! FIFO admission control over capacity-bounded resource units.
//!
//! Each (constraint, resource unit) pair is a queue of permit requests ordered
//! by `order`. Walking the queue and summing permits decides who is admitted:
//! an instance is active exactly when the cumulative permits up to and
//! including it fit in the constraint's capacity. Finishing an active instance
//! shrinks the sum and lets the walk admit the next ones, which are checked
//! against the status oracle in turn.
//!
//! The scheduler never locks. Callers serialize recomputation per unit; stale
//! writes are caught by the store's version check and reported as
//! [`ConstraintError::Conflict`].

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::audit::{build_audit_event, AuditEvent, AuditSink};
use crate::core::oracle::{ExecutionStatusLookup, StatusCache};
use crate::core::store::{ConstraintStore, InstanceStore};
use crate::core::{
    ConstraintError, PermitHolder, PermitRequest, ResourceConstraint, ResourceConstraintInstance,
    StateUpdate, SweepReport, UnitKey, UnitUsage,
};
use crate::util::clock::now_ms;
use crate::util::types::{generate_id, HoldingScope, InstanceId, InstanceState, Strategy, UnitType};

/// Transitions written by one recomputation pass.
#[derive(Debug, Default)]
struct PassOutcome {
    updates: Vec<StateUpdate>,
    finished: HashSet<InstanceId>,
}

/// Working copy of one live instance during a pass.
struct Slot {
    instance: ResourceConstraintInstance,
    state: InstanceState,
}

/// Capacity-bounded FIFO scheduler for resource constraint instances.
pub struct ResourceConstraintScheduler<S, O> {
    store: S,
    oracle: O,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S, O> ResourceConstraintScheduler<S, O>
where
    S: InstanceStore + ConstraintStore,
    O: ExecutionStatusLookup,
{
    /// Create a scheduler over a store and a status oracle.
    pub const fn new(store: S, oracle: O) -> Self {
        Self {
            store,
            oracle,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Events retained by the attached audit sink; empty without one.
    #[must_use]
    pub fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit.as_ref().map(|audit| audit.lock().events()).unwrap_or_default()
    }

    /// Underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Underlying status oracle.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Validate and store a new constraint.
    pub fn register_constraint(
        &self,
        account_id: &str,
        name: &str,
        capacity: u32,
        strategy: Strategy,
        unit_type: UnitType,
    ) -> Result<ResourceConstraint, ConstraintError> {
        let constraint = ResourceConstraint {
            id: generate_id(),
            account_id: account_id.to_owned(),
            name: name.to_owned(),
            capacity,
            strategy,
            unit_type,
        };
        constraint.validate()?;
        if self.store.get_by_name(account_id, name)?.is_some() {
            return Err(ConstraintError::Duplicate(format!(
                "constraint `{name}` for account {account_id}"
            )));
        }
        self.store.save(constraint.clone())?;
        tracing::info!(id = %constraint.id, name, capacity, "registered resource constraint");
        Ok(constraint)
    }

    /// Fetch a constraint by id.
    pub fn constraint(&self, id: &str) -> Result<ResourceConstraint, ConstraintError> {
        self.store
            .get_constraint(id)?
            .ok_or_else(|| ConstraintError::UnknownConstraint(id.to_owned()))
    }

    /// Fetch a constraint by account and name.
    pub fn constraint_by_name(&self, account_id: &str, name: &str) -> Result<ResourceConstraint, ConstraintError> {
        self.store
            .get_by_name(account_id, name)?
            .ok_or_else(|| ConstraintError::UnknownConstraint(name.to_owned()))
    }

    /// Create a new instance at the tail of its unit's queue.
    ///
    /// The instance is active if every live instance ahead of it plus its own
    /// permits fit in capacity, blocked otherwise.
    pub fn acquire_permit(&self, request: PermitRequest) -> Result<ResourceConstraintInstance, ConstraintError> {
        let constraint = self.constraint(&request.resource_constraint_id)?;
        request.validate(&constraint)?;

        let key = UnitKey::new(request.resource_constraint_id.clone(), request.resource_unit.clone());
        let queued: u64 = self
            .store
            .list_by_unit(&key)?
            .iter()
            .filter(|i| i.state.is_live())
            .map(|i| u64::from(i.permits))
            .sum();
        let order = self.store.next_order(&key)?;
        let state = if queued + u64::from(request.permits) <= u64::from(constraint.capacity) {
            InstanceState::Active
        } else {
            InstanceState::Blocked
        };

        let instance = ResourceConstraintInstance {
            id: generate_id(),
            app_id: request.app_id,
            resource_constraint_id: request.resource_constraint_id,
            resource_unit: request.resource_unit,
            release_entity_type: request.release_entity_type,
            release_entity_id: request.release_entity_id,
            permits: request.permits,
            state,
            order,
            acquired_at_ms: now_ms(),
            version: 0,
        };
        self.store.insert(instance.clone())?;

        tracing::info!(
            unit = %key,
            instance = %instance.id,
            entity = %instance.release_entity_id,
            order,
            permits = instance.permits,
            ?state,
            "permit requested"
        );
        self.record(&instance, "acquire", state);
        Ok(instance)
    }

    /// Recompute the unit of `instance`, starting from its own completion.
    ///
    /// Returns `true` if this call moved `instance` to `FINISHED`.
    pub fn update_active_constraint_for_instance(
        &self,
        instance: &ResourceConstraintInstance,
    ) -> Result<bool, ConstraintError> {
        let current = self
            .store
            .get(&instance.id)?
            .ok_or_else(|| ConstraintError::InstanceNotFound(instance.id.clone()))?;
        if current.state == InstanceState::Finished {
            tracing::debug!(instance = %current.id, "instance already finished");
            return Ok(false);
        }

        let constraint = self.constraint(&current.resource_constraint_id)?;
        let outcome = self.recompute(&constraint, &current.unit_key(), |i| i.id == current.id)?;
        Ok(outcome.finished.contains(&current.id))
    }

    /// Re-check every active instance of a unit. Returns the number of writes.
    pub fn update_active_constraints(
        &self,
        resource_constraint_id: &str,
        resource_unit: &str,
    ) -> Result<usize, ConstraintError> {
        let constraint = self.constraint(resource_constraint_id)?;
        let key = UnitKey::new(resource_constraint_id, resource_unit);
        self.recompute(&constraint, &key, |_| true)
            .map(|outcome| outcome.updates.len())
    }

    /// Recompute every unit an entity holds or waits on.
    ///
    /// Units are processed in key order so that simultaneous finishes resolve
    /// the same way regardless of callback order.
    pub fn update_active_constraints_for_entity(&self, release_entity_id: &str) -> Result<usize, ConstraintError> {
        let units: BTreeSet<UnitKey> = self
            .store
            .list_by_release_entity(release_entity_id)?
            .iter()
            .filter(|i| i.state.is_live())
            .map(ResourceConstraintInstance::unit_key)
            .collect();

        let mut transitions = 0;
        for key in units {
            let constraint = self.constraint(&key.resource_constraint_id)?;
            let outcome = self.recompute(&constraint, &key, |i| i.release_entity_id == release_entity_id)?;
            transitions += outcome.updates.len();
        }
        Ok(transitions)
    }

    /// Recompute every live unit of every constraint.
    ///
    /// A failing unit is logged and counted; the sweep moves on.
    pub fn sweep(&self) -> Result<SweepReport, ConstraintError> {
        let mut report = SweepReport::default();
        for constraint in self.store.list_constraints()? {
            for unit in self.store.list_live_units(&constraint.id)? {
                report.units_checked += 1;
                let key = UnitKey::new(constraint.id.clone(), unit);
                match self.recompute(&constraint, &key, |_| true) {
                    Ok(outcome) => report.transitions += outcome.updates.len(),
                    Err(e) => {
                        report.failures += 1;
                        tracing::warn!(unit = %key, error = %e, "sweep failed for unit");
                    }
                }
            }
        }
        tracing::debug!(?report, "sweep complete");
        Ok(report)
    }

    /// Active and blocked permits of each live unit of a constraint.
    pub fn usage(&self, resource_constraint_id: &str) -> Result<Vec<UnitUsage>, ConstraintError> {
        let constraint = self.constraint(resource_constraint_id)?;
        let mut usage = Vec::new();
        for unit in self.store.list_live_units(&constraint.id)? {
            let key = UnitKey::new(constraint.id.clone(), unit.clone());
            let mut entry = UnitUsage {
                resource_unit: unit,
                active_permits: 0,
                blocked_permits: 0,
                holders: Vec::new(),
            };
            for instance in self.store.list_by_unit(&key)? {
                match instance.state {
                    InstanceState::Active => {
                        entry.active_permits += u64::from(instance.permits);
                        entry.holders.push(PermitHolder {
                            release_entity_type: instance.release_entity_type,
                            release_entity_id: instance.release_entity_id,
                            permits: instance.permits,
                        });
                    }
                    InstanceState::Blocked => entry.blocked_permits += u64::from(instance.permits),
                    InstanceState::Finished => {}
                }
            }
            usage.push(entry);
        }
        Ok(usage)
    }

    /// Instances currently holding permits for an entity.
    pub fn acquired_permits_for_entity(
        &self,
        release_entity_id: &str,
    ) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        let mut held: Vec<_> = self
            .store
            .list_by_release_entity(release_entity_id)?
            .into_iter()
            .filter(|i| i.state == InstanceState::Active)
            .collect();
        held.sort_by(|a, b| a.unit_key().cmp(&b.unit_key()).then(a.order.cmp(&b.order)));
        Ok(held)
    }

    /// Live instances of a unit held by entities of `scope`, in admission order.
    pub fn concurrent_executions(
        &self,
        constraint: &ResourceConstraint,
        resource_unit: &str,
        scope: HoldingScope,
    ) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        let key = UnitKey::new(constraint.id.clone(), resource_unit);
        Ok(self
            .store
            .list_by_unit(&key)?
            .into_iter()
            .filter(|i| i.state.is_live() && i.release_entity_type == scope)
            .collect())
    }

    /// One recomputation pass over a unit.
    ///
    /// Active instances matching `seed` are checked against the oracle first.
    /// Every instance the walk admits is checked next, until the work-list
    /// drains. Nothing is written unless the whole pass succeeds.
    fn recompute<F>(
        &self,
        constraint: &ResourceConstraint,
        key: &UnitKey,
        seed: F,
    ) -> Result<PassOutcome, ConstraintError>
    where
        F: Fn(&ResourceConstraintInstance) -> bool,
    {
        let mut slots: Vec<Slot> = self
            .store
            .list_by_unit(key)?
            .into_iter()
            .filter(|i| i.state.is_live())
            .map(|instance| Slot {
                state: instance.state,
                instance,
            })
            .collect();
        slots.sort_by_key(|s| s.instance.order);

        let index: HashMap<InstanceId, usize> = slots
            .iter()
            .enumerate()
            .map(|(pos, s)| (s.instance.id.clone(), pos))
            .collect();
        let mut work: VecDeque<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| seed(&s.instance))
            .map(|(pos, _)| pos)
            .collect();

        let mut cache = StatusCache::new(&self.oracle);
        loop {
            while let Some(pos) = work.pop_front() {
                let slot = &mut slots[pos];
                if slot.state != InstanceState::Active {
                    continue;
                }
                if cache.is_terminal(&slot.instance.app_id, &slot.instance.release_entity_id)? {
                    slot.state = InstanceState::Finished;
                }
            }

            let admitted = admit(&mut slots, constraint.capacity, key);
            if admitted.is_empty() {
                break;
            }
            work.extend(admitted);
        }
        tracing::debug!(unit = %key, lookups = cache.len(), "recomputed unit");

        let mut outcome = PassOutcome::default();
        for slot in &slots {
            if slot.state == slot.instance.state {
                continue;
            }
            outcome.updates.push(StateUpdate {
                id: slot.instance.id.clone(),
                expected_version: slot.instance.version,
                from: slot.instance.state,
                to: slot.state,
            });
            if slot.state == InstanceState::Finished {
                outcome.finished.insert(slot.instance.id.clone());
            }
        }
        if outcome.updates.is_empty() {
            return Ok(outcome);
        }

        self.store.update_states(&outcome.updates)?;
        for update in &outcome.updates {
            let Some(&pos) = index.get(&update.id) else {
                continue;
            };
            let instance = &slots[pos].instance;
            if update.from == InstanceState::Blocked {
                tracing::info!(unit = %key, instance = %instance.id, order = instance.order, "instance activated");
                self.record(instance, "activate", InstanceState::Active);
            }
            if update.to == InstanceState::Finished {
                tracing::info!(
                    unit = %key,
                    instance = %instance.id,
                    entity = %instance.release_entity_id,
                    permits = instance.permits,
                    "instance finished, permits released"
                );
                self.record(instance, "finish", InstanceState::Finished);
            }
        }
        Ok(outcome)
    }

    fn record(&self, instance: &ResourceConstraintInstance, action: &str, state: InstanceState) {
        if let Some(audit) = &self.audit {
            audit.lock().record(build_audit_event(instance, action, state));
        }
    }
}

/// Walk live slots in order, admitting every blocked slot whose cumulative
/// permits fit in `capacity`. Returns the positions newly admitted.
///
/// Active slots are never demoted.
fn admit(slots: &mut [Slot], capacity: u32, key: &UnitKey) -> Vec<usize> {
    let capacity = u64::from(capacity);
    let mut used = 0_u64;
    let mut admitted = Vec::new();
    for (pos, slot) in slots.iter_mut().enumerate() {
        if !slot.state.is_live() {
            continue;
        }
        used += u64::from(slot.instance.permits);
        let fits = used <= capacity;
        match slot.state {
            InstanceState::Blocked if fits => {
                slot.state = InstanceState::Active;
                admitted.push(pos);
            }
            InstanceState::Active if !fits => {
                tracing::warn!(
                    unit = %key,
                    instance = %slot.instance.id,
                    used,
                    capacity,
                    "active instance exceeds capacity; leaving it active"
                );
            }
            _ => {}
        }
    }
    admitted
}
