//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Ledger errors
    #[error(transparent)]
    Ledger(#[from] crate::domain::LedgerError),

    // Server errors (5xx)
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // Ledger errors - finer mapping than the blanket 500 of the
            // original routing layer, kept as a documented deviation
            AppError::Ledger(ref ledger_err) => {
                use crate::domain::LedgerError;
                match ledger_err {
                    LedgerError::InvalidArgument(msg) => {
                        (StatusCode::BAD_REQUEST, "invalid_argument", Some(msg.clone()))
                    }
                    LedgerError::InsufficientFunds { .. } => (
                        StatusCode::BAD_REQUEST,
                        "insufficient_funds",
                        Some(ledger_err.to_string()),
                    ),
                    LedgerError::UserNotFound(id) => {
                        (StatusCode::NOT_FOUND, "user_not_found", Some(id.to_string()))
                    }
                    LedgerError::TournamentNotFound(id) => (
                        StatusCode::NOT_FOUND,
                        "tournament_not_found",
                        Some(id.to_string()),
                    ),
                    LedgerError::DeadlineExceeded => {
                        (StatusCode::REQUEST_TIMEOUT, "deadline_exceeded", None)
                    }
                    LedgerError::AlreadyExists(id) => {
                        (StatusCode::CONFLICT, "already_exists", Some(id.to_string()))
                    }
                    LedgerError::AlreadyJoined { .. } => (
                        StatusCode::CONFLICT,
                        "already_joined",
                        Some(ledger_err.to_string()),
                    ),
                    LedgerError::AlreadySettled(id) => (
                        StatusCode::CONFLICT,
                        "already_settled",
                        Some(id.to_string()),
                    ),
                    LedgerError::NotParticipant { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "not_participant",
                        Some(ledger_err.to_string()),
                    ),
                    LedgerError::NoWinnerSet(id) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "no_winner_set",
                        Some(id.to_string()),
                    ),
                    LedgerError::StoreUnavailable(msg) => {
                        tracing::error!("Store unavailable: {}", msg);
                        (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
                    }
                }
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
