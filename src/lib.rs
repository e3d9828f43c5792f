//! tournament_ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;

pub use config::Config;
pub use domain::{Amount, AmountError, Balance, LedgerError, OperationContext};
pub use domain::{Tournament, TournamentState, User};
pub use error::{AppError, AppResult};
pub use service::{Ledger, LedgerService};
pub use store::{EntityStore, MemoryStore};
