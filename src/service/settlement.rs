//! Prize Settlement
//!
//! Winner declaration and the one cross-entity step in the system: paying the
//! pool to the winner. The payout is claim-first — a single atomic tournament
//! update drains the pool and marks the tournament settled before any user
//! key is touched. The claim is the per-tournament critical section: a racing
//! settlement observes `settled` and fails, so the prize is paid at most
//! once. Key order is always tournament before user and no lock spans both,
//! which rules out cross-key deadlock.

use uuid::Uuid;

use crate::domain::{Amount, LedgerError, OperationContext, Tournament, User};
use crate::store::EntityStore;

use super::Ledger;

impl<US, TS> Ledger<US, TS>
where
    US: EntityStore<User>,
    TS: EntityStore<Tournament>,
{
    /// Record the tournament winner.
    pub(crate) async fn set_winner(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LedgerError> {
        ctx.ensure_active()?;
        self.tournaments()
            .update_if_present(tournament_id, |tournament| tournament.set_winner(user_id))
            .await?
            .ok_or(LedgerError::TournamentNotFound(tournament_id))?;

        tracing::info!(
            tournament_id = %tournament_id,
            winner_id = %user_id,
            correlation_id = %ctx.correlation_id,
            "tournament winner set"
        );
        Ok(())
    }

    /// Pay the pool to the winner and mark the tournament settled.
    pub(crate) async fn settle(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
    ) -> Result<(), LedgerError> {
        ctx.ensure_active()?;

        // Step 1: claim. One atomic update drains the pool and flips
        // `settled`; after this no other settlement can claim again.
        let mut claim: Option<(Uuid, Amount)> = None;
        self.tournaments()
            .update_if_present(tournament_id, |tournament| {
                claim = Some(tournament.claim_pool()?);
                Ok(())
            })
            .await?
            .ok_or(LedgerError::TournamentNotFound(tournament_id))?;
        let (winner_id, prize) = claim.expect("claim set by successful mutator");

        // Step 2: credit the winner. Past the claim the money must land, so
        // the deadline is intentionally not re-checked here. The in-memory
        // store never suspends, so both steps run within a single poll and a
        // dropped call cannot stop between claim and credit.
        let credited = self
            .users()
            .update_if_present(winner_id, |user| user.credit(&prize))
            .await?;

        if credited.is_none() {
            // Winner was deleted after joining. Compensate: restore the pool
            // and clear `settled` so the state is as if this call never
            // happened, then surface the missing user.
            self.tournaments()
                .update_if_present(tournament_id, |tournament| tournament.reopen_claim(&prize))
                .await?;
            tracing::warn!(
                tournament_id = %tournament_id,
                winner_id = %winner_id,
                correlation_id = %ctx.correlation_id,
                "settlement rolled back: winner no longer exists"
            );
            return Err(LedgerError::UserNotFound(winner_id));
        }

        tracing::info!(
            tournament_id = %tournament_id,
            winner_id = %winner_id,
            prize = %prize,
            correlation_id = %ctx.correlation_id,
            "tournament settled"
        );
        Ok(())
    }
}
