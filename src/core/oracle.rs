//! Execution status lookup consumed by the scheduler.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::ConstraintError;
use crate::util::types::ExecutionStatus;

/// Answers whether the entity holding a permit is still running.
///
/// Implemented by the orchestration engine. Failures are returned to the
/// scheduler's caller unchanged; retrying is the caller's business.
pub trait ExecutionStatusLookup: Send + Sync {
    /// Current status of `release_entity_id` within `app_id`.
    fn status(&self, app_id: &str, release_entity_id: &str) -> Result<ExecutionStatus, ConstraintError>;
}

impl<T: ExecutionStatusLookup + ?Sized> ExecutionStatusLookup for Arc<T> {
    fn status(&self, app_id: &str, release_entity_id: &str) -> Result<ExecutionStatus, ConstraintError> {
        (**self).status(app_id, release_entity_id)
    }
}

/// Memoizes lookups for the duration of one recomputation pass.
pub struct StatusCache<'a, O: ?Sized> {
    oracle: &'a O,
    seen: HashMap<(String, String), ExecutionStatus>,
}

impl<'a, O: ExecutionStatusLookup + ?Sized> StatusCache<'a, O> {
    /// Wrap an oracle with an empty cache.
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            seen: HashMap::new(),
        }
    }

    /// Status of an entity, asking the oracle at most once per entity.
    pub fn status(&mut self, app_id: &str, release_entity_id: &str) -> Result<ExecutionStatus, ConstraintError> {
        let key = (app_id.to_owned(), release_entity_id.to_owned());
        if let Some(status) = self.seen.get(&key) {
            tracing::debug!(entity = release_entity_id, ?status, "status cache hit");
            return Ok(*status);
        }
        let status = self.oracle.status(app_id, release_entity_id)?;
        self.seen.insert(key, status);
        Ok(status)
    }

    /// Whether the entity has reached a terminal status.
    pub fn is_terminal(&mut self, app_id: &str, release_entity_id: &str) -> Result<bool, ConstraintError> {
        self.status(app_id, release_entity_id).map(ExecutionStatus::is_terminal)
    }

    /// Number of distinct entities looked up so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
