//! Ledger Service
//!
//! The business-logic facade owning User and Tournament invariants. The HTTP
//! layer depends only on the `LedgerService` trait, so it can be substituted
//! with a test double; the `Ledger` implementation composes the entity stores
//! and never caches mutable entity state across calls.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{LedgerError, OperationContext, Tournament, User};
use crate::store::EntityStore;

pub mod balance;
pub mod pool;
pub mod settlement;

/// The public operation set consumed by the HTTP layer.
///
/// Every operation takes an `OperationContext`; the deadline it carries is
/// checked before each store access, and dropping the returned future never
/// leaves partial mutation behind (the per-key atomic steps contain no await
/// points).
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Create a user with the given name and a zero balance; returns its id.
    async fn add_user(&self, ctx: &OperationContext, name: String) -> Result<Uuid, LedgerError>;

    async fn get_user(&self, ctx: &OperationContext, id: Uuid) -> Result<User, LedgerError>;

    async fn delete_user(&self, ctx: &OperationContext, id: Uuid) -> Result<(), LedgerError>;

    /// Deduct `points` from the user's balance; never overdraws.
    async fn take_user_balance(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        points: Decimal,
    ) -> Result<(), LedgerError>;

    /// Add `points` to the user's balance.
    async fn fund_user_balance(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        points: Decimal,
    ) -> Result<(), LedgerError>;

    /// Create a tournament with a fixed per-participant deposit; returns its id.
    async fn add_tournament(
        &self,
        ctx: &OperationContext,
        name: String,
        deposit: Decimal,
    ) -> Result<Uuid, LedgerError>;

    async fn get_tournament(
        &self,
        ctx: &OperationContext,
        id: Uuid,
    ) -> Result<Tournament, LedgerError>;

    /// Delete the tournament outright; any remaining pool is discarded.
    async fn delete_tournament(&self, ctx: &OperationContext, id: Uuid)
        -> Result<(), LedgerError>;

    /// Add a user to the participant list, growing the pool by the deposit.
    async fn add_user_to_tournament(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LedgerError>;

    /// Record the tournament winner; the winner must be a participant.
    async fn set_tournament_winner(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LedgerError>;

    /// Pay the pool to the winner exactly once and mark the tournament settled.
    async fn calculate_tournament_prize(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
    ) -> Result<(), LedgerError>;
}

/// `LedgerService` implementation over two entity stores.
pub struct Ledger<US, TS> {
    users: US,
    tournaments: TS,
}

impl<US, TS> Ledger<US, TS>
where
    US: EntityStore<User>,
    TS: EntityStore<Tournament>,
{
    /// Construct the service over explicitly provided stores (no ambient
    /// global state; tests pass in fresh or seeded stores).
    pub fn new(users: US, tournaments: TS) -> Self {
        Self { users, tournaments }
    }

    pub(crate) fn users(&self) -> &US {
        &self.users
    }

    pub(crate) fn tournaments(&self) -> &TS {
        &self.tournaments
    }
}

#[async_trait]
impl<US, TS> LedgerService for Ledger<US, TS>
where
    US: EntityStore<User>,
    TS: EntityStore<Tournament>,
{
    async fn add_user(&self, ctx: &OperationContext, name: String) -> Result<Uuid, LedgerError> {
        ctx.ensure_active()?;
        let user = User::new(name);
        let id = user.id;
        self.users.put(user).await?;
        tracing::info!(user_id = %id, correlation_id = %ctx.correlation_id, "user created");
        Ok(id)
    }

    async fn get_user(&self, ctx: &OperationContext, id: Uuid) -> Result<User, LedgerError> {
        ctx.ensure_active()?;
        self.users
            .get(id)
            .await?
            .ok_or(LedgerError::UserNotFound(id))
    }

    async fn delete_user(&self, ctx: &OperationContext, id: Uuid) -> Result<(), LedgerError> {
        ctx.ensure_active()?;
        // Deleting a participant of an unsettled tournament is permitted and
        // leaves the id dangling in that tournament's participant set; the
        // settlement path compensates if such a user was the winner.
        if !self.users.delete(id).await? {
            return Err(LedgerError::UserNotFound(id));
        }
        tracing::info!(user_id = %id, correlation_id = %ctx.correlation_id, "user deleted");
        Ok(())
    }

    async fn take_user_balance(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        points: Decimal,
    ) -> Result<(), LedgerError> {
        self.take(ctx, id, points).await
    }

    async fn fund_user_balance(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        points: Decimal,
    ) -> Result<(), LedgerError> {
        self.fund(ctx, id, points).await
    }

    async fn add_tournament(
        &self,
        ctx: &OperationContext,
        name: String,
        deposit: Decimal,
    ) -> Result<Uuid, LedgerError> {
        ctx.ensure_active()?;
        let deposit = crate::domain::Amount::new(deposit)?;
        let tournament = Tournament::new(name, deposit);
        let id = tournament.id;
        self.tournaments.put(tournament).await?;
        tracing::info!(
            tournament_id = %id,
            deposit = %deposit,
            correlation_id = %ctx.correlation_id,
            "tournament created"
        );
        Ok(id)
    }

    async fn get_tournament(
        &self,
        ctx: &OperationContext,
        id: Uuid,
    ) -> Result<Tournament, LedgerError> {
        ctx.ensure_active()?;
        self.tournaments
            .get(id)
            .await?
            .ok_or(LedgerError::TournamentNotFound(id))
    }

    async fn delete_tournament(
        &self,
        ctx: &OperationContext,
        id: Uuid,
    ) -> Result<(), LedgerError> {
        self.remove_tournament(ctx, id).await
    }

    async fn add_user_to_tournament(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LedgerError> {
        self.join(ctx, tournament_id, user_id).await
    }

    async fn set_tournament_winner(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LedgerError> {
        self.set_winner(ctx, tournament_id, user_id).await
    }

    async fn calculate_tournament_prize(
        &self,
        ctx: &OperationContext,
        tournament_id: Uuid,
    ) -> Result<(), LedgerError> {
        self.settle(ctx, tournament_id).await
    }
}
