//! Tests for API response models

use resource_constraint::core::{
    ConstraintError, ExecutionStatusLookup, PermitRequest, ResourceConstraintScheduler,
};
use resource_constraint::infra::InMemoryStore;
use resource_constraint::runtime::{fetch_concurrent_executions, fetch_usage};
use resource_constraint::util::{ExecutionStatus, HoldingScope, InstanceState, Strategy, UnitType};

struct AlwaysRunning;

impl ExecutionStatusLookup for AlwaysRunning {
    fn status(&self, _app_id: &str, _release_entity_id: &str) -> Result<ExecutionStatus, ConstraintError> {
        Ok(ExecutionStatus::Running)
    }
}

fn request(constraint_id: &str, entity: &str, scope: HoldingScope) -> PermitRequest {
    PermitRequest {
        app_id: "app".into(),
        resource_constraint_id: constraint_id.into(),
        resource_unit: "infra-1".into(),
        release_entity_type: scope,
        release_entity_id: entity.into(),
        permits: 1,
    }
}

#[test]
fn test_concurrent_executions_for_workflows() {
    let scheduler = ResourceConstraintScheduler::new(InMemoryStore::new(), AlwaysRunning);
    let rc = scheduler
        .register_constraint("acc", "deploy-slots", 1, Strategy::Fifo, UnitType::Infra)
        .unwrap();
    scheduler.acquire_permit(request(&rc.id, "wf-1", HoldingScope::Workflow)).unwrap();
    scheduler.acquire_permit(request(&rc.id, "wf-2", HoldingScope::Workflow)).unwrap();
    scheduler.acquire_permit(request(&rc.id, "pipe-1", HoldingScope::Pipeline)).unwrap();

    let response =
        fetch_concurrent_executions(&scheduler, "acc", "deploy-slots", "infra-1", HoldingScope::Workflow).unwrap();

    assert_eq!(response.unit_type, UnitType::Infra);
    assert_eq!(response.capacity, 1);
    assert_eq!(response.executions.len(), 2);
    assert_eq!(response.executions[0].release_entity_id, "wf-1");
    assert_eq!(response.executions[0].state, InstanceState::Active);
    assert_eq!(response.executions[1].state, InstanceState::Blocked);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["unit_type"], "INFRA");
    assert_eq!(json["executions"][1]["state"], "BLOCKED");
}

#[test]
fn test_unknown_constraint_name() {
    let scheduler = ResourceConstraintScheduler::new(InMemoryStore::new(), AlwaysRunning);
    let err = fetch_usage(&scheduler, "acc", "missing").unwrap_err();
    assert!(matches!(err, ConstraintError::UnknownConstraint(_)));
}

#[test]
fn test_usage_response() {
    let scheduler = ResourceConstraintScheduler::new(InMemoryStore::new(), AlwaysRunning);
    let rc = scheduler
        .register_constraint("acc", "deploy-slots", 2, Strategy::Fifo, UnitType::Infra)
        .unwrap();
    scheduler.acquire_permit(request(&rc.id, "wf-1", HoldingScope::Workflow)).unwrap();

    let usage = fetch_usage(&scheduler, "acc", "deploy-slots").unwrap();
    assert_eq!(usage.capacity, 2);
    assert_eq!(usage.units.len(), 1);
    assert_eq!(usage.units[0].active_permits, 1);
}
