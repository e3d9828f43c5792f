//! Tournament Pool
//!
//! Participant list management and deposit accrual. Joining does not debit
//! the joining user: the visible contract collects no entry fee, the pool
//! accrues on its own (reproduced as-is, not fixed).

use uuid::Uuid;

use crate::domain::{LedgerError, OperationContext, Tournament, User};
use crate::store::EntityStore;

use super::Ledger;

impl<US, TS> Ledger<US, TS>
where
    US: EntityStore<User>,
    TS: EntityStore<Tournament>,
{
    /// Add `user_id` to the tournament's participant list and grow the pool
    /// by the deposit.
    pub(crate) async fn join(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LedgerError> {
        ctx.ensure_active()?;

        // The user must exist at join time. A concurrent delete can still
        // leave a dangling participant id, same as a delete after join.
        if self.users().get(user_id).await?.is_none() {
            return Err(LedgerError::UserNotFound(user_id));
        }

        ctx.ensure_active()?;
        let updated = self
            .tournaments()
            .update_if_present(tournament_id, |tournament| tournament.join(user_id))
            .await?
            .ok_or(LedgerError::TournamentNotFound(tournament_id))?;

        tracing::info!(
            tournament_id = %tournament_id,
            user_id = %user_id,
            pool = %updated.pool,
            participants = updated.participants.len(),
            correlation_id = %ctx.correlation_id,
            "user joined tournament"
        );
        Ok(())
    }

    /// Delete the tournament record outright. Valid from any state; any
    /// unsettled pool is discarded with it.
    pub(crate) async fn remove_tournament(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
    ) -> Result<(), LedgerError> {
        ctx.ensure_active()?;
        if !self.tournaments().delete(tournament_id).await? {
            return Err(LedgerError::TournamentNotFound(tournament_id));
        }
        tracing::info!(
            tournament_id = %tournament_id,
            correlation_id = %ctx.correlation_id,
            "tournament deleted"
        );
        Ok(())
    }
}
