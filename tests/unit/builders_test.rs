//! Tests for builder modules

use std::collections::HashMap;

use resource_constraint::builders::build_scheduler;
use resource_constraint::config::{BackupConfig, ConstraintConfig, SchedulerConfig, StoreBackendConfig};
use resource_constraint::core::{ConstraintError, ConstraintStore, ExecutionStatusLookup, PermitRequest};
use resource_constraint::infra::{InMemoryStore, PostgresStore};
use resource_constraint::util::{ExecutionStatus, HoldingScope, Strategy, UnitType};

struct AlwaysRunning;

impl ExecutionStatusLookup for AlwaysRunning {
    fn status(&self, _app_id: &str, _release_entity_id: &str) -> Result<ExecutionStatus, ConstraintError> {
        Ok(ExecutionStatus::Running)
    }
}

fn config() -> SchedulerConfig {
    let mut constraints = HashMap::new();
    for (name, capacity) in [("deploy-slots", 2), ("db-migrations", 1)] {
        constraints.insert(
            name.to_string(),
            ConstraintConfig {
                account_id: "acc".to_string(),
                capacity,
                strategy: Strategy::Fifo,
                unit_type: UnitType::Infra,
            },
        );
    }
    SchedulerConfig {
        constraints,
        store: StoreBackendConfig::InMemory,
        audit_buffer: 16,
        backup: BackupConfig::default(),
    }
}

#[test]
fn test_build_registers_configured_constraints() {
    let scheduler = build_scheduler(&config(), |_| Ok(InMemoryStore::new()), AlwaysRunning).unwrap();

    let names: Vec<_> = scheduler
        .store()
        .list_constraints()
        .unwrap()
        .into_iter()
        .map(|c| (c.name, c.capacity))
        .collect();
    assert_eq!(
        names,
        vec![("db-migrations".to_string(), 1), ("deploy-slots".to_string(), 2)]
    );
    assert_eq!(scheduler.constraint_by_name("acc", "deploy-slots").unwrap().capacity, 2);
}

#[test]
fn test_build_rejects_invalid_config() {
    let mut cfg = config();
    cfg.constraints.clear();
    let err = build_scheduler(&cfg, |_| Ok(InMemoryStore::new()), AlwaysRunning).err().unwrap();
    assert!(matches!(err, ConstraintError::Validation(_)));
}

#[test]
fn test_build_surfaces_store_failures() {
    let mut cfg = config();
    cfg.store = StoreBackendConfig::Postgres;
    let err = build_scheduler(&cfg, |_| Ok(PostgresStore::new()), AlwaysRunning).err().unwrap();
    assert!(matches!(err, ConstraintError::Backend(_)));
    assert!(!PostgresStore::migrations().is_empty());
}

#[test]
fn test_build_attaches_audit_sink_sized_from_config() {
    let scheduler = build_scheduler(&config(), |_| Ok(InMemoryStore::new()), AlwaysRunning).unwrap();
    let rc = scheduler.constraint_by_name("acc", "deploy-slots").unwrap();

    for n in 0..20 {
        scheduler
            .acquire_permit(PermitRequest {
                app_id: "app".to_string(),
                resource_constraint_id: rc.id.clone(),
                resource_unit: "infra-1".to_string(),
                release_entity_type: HoldingScope::Workflow,
                release_entity_id: format!("exec-{n}"),
                permits: 1,
            })
            .unwrap();
    }

    let events = scheduler.audit_events();
    assert_eq!(events.len(), 16);
    assert_eq!(events[0].release_entity_id, "exec-4");
    assert!(events.iter().all(|e| e.action == "acquire"));
}
