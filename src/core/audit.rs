//! Audit sink implementations.
//!
//! Every state transition the scheduler writes is reported as one event.

use std::collections::VecDeque;

use crate::core::ResourceConstraintInstance;
use crate::util::clock::now_ms;
use crate::util::types::InstanceState;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related instance identifier.
    pub instance_id: String,
    /// Owning constraint.
    pub resource_constraint_id: String,
    /// Resource unit.
    pub resource_unit: String,
    /// Action taken (acquire, activate, finish).
    pub action: String,
    /// State after the action.
    pub state: InstanceState,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Release entity, for correlating with the execution.
    pub release_entity_id: String,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);

    /// Snapshot of retained events, oldest first. Sinks that forward events
    /// elsewhere retain nothing.
    fn events(&self) -> Vec<AuditEvent> {
        Vec::new()
    }
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

/// Build an audit event for an instance entering `state`.
#[must_use]
pub fn build_audit_event(
    instance: &ResourceConstraintInstance,
    action: impl Into<String>,
    state: InstanceState,
) -> AuditEvent {
    let action = action.into();
    let created_at_ms = now_ms();
    AuditEvent {
        event_id: format!("{}-{}-{}", instance.id, action, created_at_ms),
        instance_id: instance.id.clone(),
        resource_constraint_id: instance.resource_constraint_id.clone(),
        resource_unit: instance.resource_unit.clone(),
        action,
        state,
        created_at_ms,
        release_entity_id: instance.release_entity_id.clone(),
    }
}
