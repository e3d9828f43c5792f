//! Operation Context
//!
//! Per-request metadata carried through every facade operation: a correlation
//! id for tracing and an optional deadline that each store access checks
//! before starting.

use std::time::{Duration, Instant};
use uuid::Uuid;

use super::LedgerError;

/// Context for a ledger operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Correlation ID for request tracing
    pub correlation_id: Uuid,

    /// Point in time after which the operation must not start new store work
    pub deadline: Option<Instant>,
}

impl OperationContext {
    /// Create a new context with a fresh correlation id and no deadline
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            deadline: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fail fast if the deadline has elapsed.
    ///
    /// Checked before each store access so an expired request never starts an
    /// atomic step; a step already past this check runs to completion, which
    /// keeps partial mutation impossible.
    pub fn ensure_active(&self) -> Result<(), LedgerError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(LedgerError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
