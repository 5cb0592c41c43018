//! Tests for utility functions

use resource_constraint::util::{generate_id, init_tracing, now_ms, ExecutionStatus, InstanceState, Strategy, UnitType};

#[test]
fn test_generated_ids_are_unique() {
    let a = generate_id();
    let b = generate_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 32);
}

#[test]
fn test_clock_is_monotonic_enough() {
    let before = now_ms();
    let after = now_ms();
    assert!(after >= before);
    assert!(before > 0);
}

#[test]
fn test_defaults() {
    assert_eq!(Strategy::default(), Strategy::Fifo);
    assert_eq!(UnitType::default(), UnitType::Infra);
}

#[test]
fn test_finished_is_not_live() {
    assert!(InstanceState::Active.is_live());
    assert!(InstanceState::Blocked.is_live());
    assert!(!InstanceState::Finished.is_live());
}

#[test]
fn test_status_round_trip_names() {
    let status: ExecutionStatus = serde_json::from_str("\"ABORTED\"").unwrap();
    assert_eq!(status, ExecutionStatus::Aborted);
    assert!(status.is_terminal());
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized twice");
}
