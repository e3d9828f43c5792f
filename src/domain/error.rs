//! Ledger Error Types
//!
//! Pure business errors that don't depend on the web layer.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the ledger core.
///
/// Business-rule violations are terminal for the calling request and are
/// never retried by the core itself. `StoreUnavailable` is the one
/// infrastructure error a caller may retry with backoff.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("tournament not found: {0}")]
    TournamentNotFound(Uuid),

    /// Entity with the same id already stored
    #[error("entity already exists: {0}")]
    AlreadyExists(Uuid),

    /// Negative amount, malformed value, or similar caller mistake
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("user {user} already joined tournament {tournament}")]
    AlreadyJoined { tournament: Uuid, user: Uuid },

    #[error("user {user} is not a participant of tournament {tournament}")]
    NotParticipant { tournament: Uuid, user: Uuid },

    /// Winner already set or prize already paid out
    #[error("tournament {0} is already settled")]
    AlreadySettled(Uuid),

    #[error("tournament {0} has no winner set")]
    NoWinnerSet(Uuid),

    /// The operation context deadline elapsed before the store access
    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// Transient storage failure, retryable by the caller
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// Check if this is a client error (caller's fault, not retryable)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::InsufficientFunds { .. }
                | Self::AlreadyJoined { .. }
                | Self::NotParticipant { .. }
                | Self::AlreadySettled(_)
                | Self::NoWinnerSet(_)
        )
    }

    /// Check if a retry with backoff may help
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::DeadlineExceeded)
    }
}

impl From<super::AmountError> for LedgerError {
    fn from(err: super::AmountError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
