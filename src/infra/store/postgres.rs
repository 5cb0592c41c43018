//! Postgres-backed store adapter (schema and interface stubs).

use crate::core::{
    ConstraintError, ConstraintStore, InstanceStore, ResourceConstraint, ResourceConstraintInstance,
    StateUpdate, UnitKey,
};

const NOT_WIRED: &str = "postgres store not wired to database client";

/// Postgres store adapter placeholder.
///
/// `migrations()` describes the layout; queries are left to the integration
/// layer that owns the database client.
#[derive(Debug, Default, Clone)]
pub struct PostgresStore;

impl PostgresStore {
    /// Create a new adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Migration statements for constraints and their instances.
    #[must_use]
    pub fn migrations() -> &'static [&'static str] {
        &[
            r"
CREATE TABLE IF NOT EXISTS rc_constraints (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    name TEXT NOT NULL,
    capacity INT NOT NULL CHECK (capacity > 0),
    strategy TEXT NOT NULL,
    unit_type TEXT NOT NULL,
    UNIQUE (account_id, name)
);
",
            r"
CREATE TABLE IF NOT EXISTS rc_instances (
    id TEXT PRIMARY KEY,
    app_id TEXT NOT NULL,
    resource_constraint_id TEXT NOT NULL REFERENCES rc_constraints (id),
    resource_unit TEXT NOT NULL,
    release_entity_type TEXT NOT NULL,
    release_entity_id TEXT NOT NULL,
    permits INT NOT NULL CHECK (permits > 0),
    state TEXT NOT NULL,
    seq_order BIGINT NOT NULL,
    acquired_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    version BIGINT NOT NULL DEFAULT 0,
    UNIQUE (resource_constraint_id, resource_unit, seq_order)
);
CREATE INDEX IF NOT EXISTS idx_rc_instances_release_entity ON rc_instances (release_entity_id);
CREATE INDEX IF NOT EXISTS idx_rc_instances_live ON rc_instances (resource_constraint_id, state);
",
        ]
    }
}

fn not_wired<T>() -> Result<T, ConstraintError> {
    Err(ConstraintError::Backend(NOT_WIRED.into()))
}

impl InstanceStore for PostgresStore {
    fn insert(&self, _instance: ResourceConstraintInstance) -> Result<(), ConstraintError> {
        not_wired()
    }

    fn get(&self, _id: &str) -> Result<Option<ResourceConstraintInstance>, ConstraintError> {
        not_wired()
    }

    fn list_by_unit(&self, _key: &UnitKey) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        not_wired()
    }

    fn list_by_release_entity(
        &self,
        _release_entity_id: &str,
    ) -> Result<Vec<ResourceConstraintInstance>, ConstraintError> {
        not_wired()
    }

    fn list_live_units(&self, _resource_constraint_id: &str) -> Result<Vec<String>, ConstraintError> {
        not_wired()
    }

    fn next_order(&self, _key: &UnitKey) -> Result<u64, ConstraintError> {
        not_wired()
    }

    fn update_states(&self, _updates: &[StateUpdate]) -> Result<(), ConstraintError> {
        not_wired()
    }
}

impl ConstraintStore for PostgresStore {
    fn save(&self, _constraint: ResourceConstraint) -> Result<(), ConstraintError> {
        not_wired()
    }

    fn get_constraint(&self, _id: &str) -> Result<Option<ResourceConstraint>, ConstraintError> {
        not_wired()
    }

    fn get_by_name(&self, _account_id: &str, _name: &str) -> Result<Option<ResourceConstraint>, ConstraintError> {
        not_wired()
    }

    fn list_constraints(&self) -> Result<Vec<ResourceConstraint>, ConstraintError> {
        not_wired()
    }
}
