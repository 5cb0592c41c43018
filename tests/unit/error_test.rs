//! Tests for error types

use resource_constraint::core::ConstraintError;

#[test]
fn test_validation_error() {
    let err = ConstraintError::Validation("permits must be at least 1".to_string());
    assert_eq!(format!("{}", err), "invalid request: permits must be at least 1");
    assert!(!err.is_retryable());
}

#[test]
fn test_unknown_constraint_error() {
    let err = ConstraintError::UnknownConstraint("deploy-slots".to_string());
    assert_eq!(format!("{}", err), "unknown resource constraint: deploy-slots");
}

#[test]
fn test_status_lookup_error() {
    let err = ConstraintError::StatusLookup {
        entity: "exec-1".to_string(),
        reason: "timeout".to_string(),
    };
    assert_eq!(format!("{}", err), "status lookup failed for exec-1: timeout");
    assert!(err.is_retryable());
}

#[test]
fn test_duplicate_error() {
    let err = ConstraintError::Duplicate("constraint `slots` for account acc".to_string());
    assert_eq!(format!("{}", err), "already exists: constraint `slots` for account acc");
    assert!(!err.is_retryable());
}

#[test]
fn test_conflict_error() {
    let err = ConstraintError::Conflict("stale version".to_string());
    assert_eq!(format!("{}", err), "concurrent modification: stale version");
    assert!(err.is_retryable());
}

#[test]
fn test_backend_error() {
    let err = ConstraintError::Backend("connection failed".to_string());
    assert_eq!(format!("{}", err), "backend error: connection failed");
    assert!(!err.is_retryable());
}
