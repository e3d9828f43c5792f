//! Balance Ledger
//!
//! The only writer of `User.balance`. Both operations run their check and
//! mutation inside one `update_if_present` step, so a stale read can never
//! slip between a sufficiency check and the subtraction.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Amount, LedgerError, OperationContext, Tournament, User};
use crate::store::EntityStore;

use super::Ledger;

impl<US, TS> Ledger<US, TS>
where
    US: EntityStore<User>,
    TS: EntityStore<Tournament>,
{
    /// Add `points` to the user's balance.
    pub(crate) async fn fund(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        points: Decimal,
    ) -> Result<(), LedgerError> {
        ctx.ensure_active()?;
        let amount = Amount::new(points)?;

        let updated = self
            .users()
            .update_if_present(id, |user| user.credit(&amount))
            .await?
            .ok_or(LedgerError::UserNotFound(id))?;

        tracing::info!(
            user_id = %id,
            amount = %amount,
            balance = %updated.balance,
            correlation_id = %ctx.correlation_id,
            "balance funded"
        );
        Ok(())
    }

    /// Deduct `points` from the user's balance, atomically checked.
    pub(crate) async fn take(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        points: Decimal,
    ) -> Result<(), LedgerError> {
        ctx.ensure_active()?;
        let amount = Amount::new(points)?;

        let updated = self
            .users()
            .update_if_present(id, |user| user.debit(&amount))
            .await?
            .ok_or(LedgerError::UserNotFound(id))?;

        tracing::info!(
            user_id = %id,
            amount = %amount,
            balance = %updated.balance,
            correlation_id = %ctx.correlation_id,
            "balance taken"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_ledger;
    use super::*;
    use crate::service::LedgerService;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fund_increases_balance_exactly() {
        let ledger = test_ledger();
        let ctx = OperationContext::new();
        let id = ledger.add_user(&ctx, "Alice".to_string()).await.unwrap();

        ledger.fund(&ctx, id, dec!(100)).await.unwrap();
        ledger.fund(&ctx, id, dec!(0.5)).await.unwrap();

        let user = ledger.get_user(&ctx, id).await.unwrap();
        assert_eq!(user.balance.value(), dec!(100.5));
    }

    #[tokio::test]
    async fn test_take_decreases_balance_exactly() {
        let ledger = test_ledger();
        let ctx = OperationContext::new();
        let id = ledger.add_user(&ctx, "Alice".to_string()).await.unwrap();
        ledger.fund(&ctx, id, dec!(100)).await.unwrap();

        ledger.take(&ctx, id, dec!(30)).await.unwrap();

        let user = ledger.get_user(&ctx, id).await.unwrap();
        assert_eq!(user.balance.value(), dec!(70));
    }

    #[tokio::test]
    async fn test_take_more_than_balance_fails_unchanged() {
        let ledger = test_ledger();
        let ctx = OperationContext::new();
        let id = ledger.add_user(&ctx, "Alice".to_string()).await.unwrap();
        ledger.fund(&ctx, id, dec!(10)).await.unwrap();

        let err = ledger.take(&ctx, id, dec!(11)).await.unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                required: dec!(11),
                available: dec!(10),
            }
        );

        let user = ledger.get_user(&ctx, id).await.unwrap();
        assert_eq!(user.balance.value(), dec!(10));
    }

    #[tokio::test]
    async fn test_negative_amounts_rejected() {
        let ledger = test_ledger();
        let ctx = OperationContext::new();
        let id = ledger.add_user(&ctx, "Alice".to_string()).await.unwrap();

        assert!(matches!(
            ledger.fund(&ctx, id, dec!(-1)).await.unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
        assert!(matches!(
            ledger.take(&ctx, id, dec!(-1)).await.unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_fails_not_found_without_state_change() {
        let ledger = test_ledger();
        let ctx = OperationContext::new();
        let id = Uuid::new_v4();

        assert_eq!(
            ledger.take(&ctx, id, dec!(5)).await.unwrap_err(),
            LedgerError::UserNotFound(id)
        );
        assert_eq!(
            ledger.fund(&ctx, id, dec!(5)).await.unwrap_err(),
            LedgerError::UserNotFound(id)
        );
    }

    #[tokio::test]
    async fn test_racing_debits_never_overdraw() {
        let ledger = Arc::new(test_ledger());
        let ctx = OperationContext::new();
        let id = ledger.add_user(&ctx, "Alice".to_string()).await.unwrap();
        ledger.fund(&ctx, id, dec!(100)).await.unwrap();

        // 40 tasks each try to take 10 from a balance of 100.
        let mut tasks = Vec::new();
        for _ in 0..40 {
            let ledger = Arc::clone(&ledger);
            tasks.push(tokio::spawn(async move {
                let ctx = OperationContext::new();
                ledger.take(&ctx, id, dec!(10)).await
            }));
        }

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        // Exactly ten debits can fit; the rest must fail InsufficientFunds.
        assert_eq!(successes, 10);
        let user = ledger.get_user(&ctx, id).await.unwrap();
        assert_eq!(user.balance.value(), dec!(0));
    }
}
