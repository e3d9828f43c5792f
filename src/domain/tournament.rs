//! Tournament entity
//!
//! A tournament collects a fixed per-participant deposit into a prize pool
//! and pays the pool to a designated winner exactly once.
//!
//! State machine: `Open` (accepting joins) -> `WinnerSet` (joins disabled,
//! payout pending) -> `Settled` (terminal). Deletion is valid from any state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::{Amount, Balance, LedgerError};

/// Lifecycle state derived from `winner_id` and `settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    Open,
    WinnerSet,
    Settled,
}

/// A tournament with its participant set and accumulated prize pool.
///
/// Invariants:
/// - `pool == deposit * participants.len()` while unsettled
/// - `winner_id` is set at most once and must be a participant
/// - `pool` is zero once `settled`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub deposit: Amount,
    pub participants: BTreeSet<Uuid>,
    pub pool: Balance,
    pub winner_id: Option<Uuid>,
    pub settled: bool,
}

impl Tournament {
    /// Create a tournament with a fresh id, no participants and an empty pool.
    pub fn new(name: String, deposit: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            deposit,
            participants: BTreeSet::new(),
            pool: Balance::zero(),
            winner_id: None,
            settled: false,
        }
    }

    pub fn state(&self) -> TournamentState {
        if self.settled {
            TournamentState::Settled
        } else if self.winner_id.is_some() {
            TournamentState::WinnerSet
        } else {
            TournamentState::Open
        }
    }

    /// Add a participant and grow the pool by the deposit.
    ///
    /// Rejected once a winner is set: joining a decided tournament would
    /// add money the winner computation never sees.
    pub fn join(&mut self, user_id: Uuid) -> Result<(), LedgerError> {
        if self.state() != TournamentState::Open {
            return Err(LedgerError::AlreadySettled(self.id));
        }
        if self.participants.contains(&user_id) {
            return Err(LedgerError::AlreadyJoined {
                tournament: self.id,
                user: user_id,
            });
        }

        self.pool = self.pool.credit(&self.deposit)?;
        self.participants.insert(user_id);
        Ok(())
    }

    /// Record the winner. The winner must have joined.
    pub fn set_winner(&mut self, user_id: Uuid) -> Result<(), LedgerError> {
        if self.state() != TournamentState::Open {
            return Err(LedgerError::AlreadySettled(self.id));
        }
        if !self.participants.contains(&user_id) {
            return Err(LedgerError::NotParticipant {
                tournament: self.id,
                user: user_id,
            });
        }

        self.winner_id = Some(user_id);
        Ok(())
    }

    /// Drain the pool and mark the tournament settled, returning the winner
    /// and the prize to credit.
    ///
    /// This is the single-writer claim step of settlement: once it succeeds
    /// no concurrent settlement can pass the `settled` check again, so the
    /// prize cannot be paid twice.
    pub fn claim_pool(&mut self) -> Result<(Uuid, Amount), LedgerError> {
        if self.settled {
            return Err(LedgerError::AlreadySettled(self.id));
        }
        let winner = self.winner_id.ok_or(LedgerError::NoWinnerSet(self.id))?;

        let prize = Amount::new(self.pool.value())?;
        self.pool = Balance::zero();
        self.settled = true;
        Ok((winner, prize))
    }

    /// Undo a claim whose credit step failed: restore the pool and clear
    /// `settled` so the settlement can be retried from the latest state.
    pub fn reopen_claim(&mut self, prize: &Amount) -> Result<(), LedgerError> {
        self.pool = self.pool.credit(prize)?;
        self.settled = false;
        Ok(())
    }
}
