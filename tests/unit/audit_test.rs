//! Tests for audit sink

use resource_constraint::core::{build_audit_event, AuditSink, InMemoryAuditSink, ResourceConstraintInstance};
use resource_constraint::util::{HoldingScope, InstanceState};

fn instance(id: &str) -> ResourceConstraintInstance {
    ResourceConstraintInstance {
        id: id.into(),
        app_id: "app1".into(),
        resource_constraint_id: "rc1".into(),
        resource_unit: "infra1".into(),
        release_entity_type: HoldingScope::Workflow,
        release_entity_id: "exec1".into(),
        permits: 1,
        state: InstanceState::Blocked,
        order: 1,
        acquired_at_ms: 0,
        version: 0,
    }
}

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(&instance("inst1"), "acquire", InstanceState::Blocked));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].instance_id, "inst1");
    assert_eq!(events[0].action, "acquire");
    assert_eq!(events[0].state, InstanceState::Blocked);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(&instance("inst1"), "acquire", InstanceState::Active));
    sink.record(build_audit_event(&instance("inst2"), "acquire", InstanceState::Active));
    sink.record(build_audit_event(&instance("inst3"), "acquire", InstanceState::Blocked));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].instance_id, "inst2"); // First one popped
    assert_eq!(events[1].instance_id, "inst3");
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(&instance("inst1"), "finish", InstanceState::Finished);

    assert!(event.event_id.starts_with("inst1-finish-"));
    assert_eq!(event.resource_constraint_id, "rc1");
    assert_eq!(event.resource_unit, "infra1");
    assert_eq!(event.release_entity_id, "exec1");
    assert_eq!(event.state, InstanceState::Finished);
    assert!(event.created_at_ms > 0);
}
