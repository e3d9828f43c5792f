//! Concurrency tests
//!
//! The service must stay correct under arbitrary interleavings of concurrent
//! calls touching the same entities.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tournament_ledger::domain::{OperationContext, Tournament, TournamentState, User};
use tournament_ledger::service::{Ledger, LedgerService};
use tournament_ledger::store::MemoryStore;
use tournament_ledger::LedgerError;

type TestLedger = Ledger<MemoryStore<User>, MemoryStore<Tournament>>;

fn test_ledger() -> Arc<TestLedger> {
    Arc::new(Ledger::new(MemoryStore::new(), MemoryStore::new()))
}

#[tokio::test]
async fn parallel_debits_never_overdraw_in_total() {
    let ledger = test_ledger();
    let ctx = OperationContext::new();
    let user = ledger.add_user(&ctx, "hotspot".to_string()).await.unwrap();
    ledger.fund_user_balance(&ctx, user, dec!(250)).await.unwrap();

    // 100 debits of 10 race against a balance of 250: exactly 25 can win.
    let mut tasks = Vec::new();
    for _ in 0..100 {
        let ledger = Arc::clone(&ledger);
        tasks.push(tokio::spawn(async move {
            let ctx = OperationContext::new();
            ledger.take_user_balance(&ctx, user, dec!(10)).await
        }));
    }

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => successes += 1,
            Err(err) => assert!(matches!(err, LedgerError::InsufficientFunds { .. })),
        }
    }

    assert_eq!(successes, 25);
    let balance = ledger.get_user(&ctx, user).await.unwrap().balance;
    assert_eq!(balance.value(), dec!(0));
}

#[tokio::test]
async fn mixed_fund_take_storm_preserves_the_sum() {
    let ledger = test_ledger();
    let ctx = OperationContext::new();
    let user = ledger.add_user(&ctx, "storm".to_string()).await.unwrap();
    ledger.fund_user_balance(&ctx, user, dec!(1000)).await.unwrap();

    // Pair every fund of 7 with a take of 7; whatever interleaving happens,
    // each take only succeeds against a sufficient balance, and the final
    // balance is the start plus the net of the successful operations.
    let mut tasks = Vec::new();
    for i in 0..200 {
        let ledger = Arc::clone(&ledger);
        tasks.push(tokio::spawn(async move {
            let ctx = OperationContext::new();
            if i % 2 == 0 {
                ledger.fund_user_balance(&ctx, user, dec!(7)).await.map(|()| dec!(7))
            } else {
                ledger.take_user_balance(&ctx, user, dec!(7)).await.map(|()| dec!(-7))
            }
        }));
    }

    let mut net = dec!(0);
    for task in tasks {
        if let Ok(delta) = task.await.unwrap() {
            net += delta;
        }
    }

    let balance = ledger.get_user(&ctx, user).await.unwrap().balance;
    assert_eq!(balance.value(), dec!(1000) + net);
    assert!(balance.value() >= dec!(0));
}

#[tokio::test]
async fn parallel_joins_accrue_exactly_one_deposit_each() {
    let ledger = test_ledger();
    let ctx = OperationContext::new();
    let tournament = ledger
        .add_tournament(&ctx, "rush".to_string(), dec!(10))
        .await
        .unwrap();

    let mut users = Vec::new();
    for i in 0..30 {
        users.push(ledger.add_user(&ctx, format!("p{i}")).await.unwrap());
    }

    // Every user joins twice, concurrently. The duplicate must lose.
    let mut tasks = Vec::new();
    for user in &users {
        for _ in 0..2 {
            let ledger = Arc::clone(&ledger);
            let user = *user;
            tasks.push(tokio::spawn(async move {
                let ctx = OperationContext::new();
                ledger.add_user_to_tournament(&ctx, tournament, user).await
            }));
        }
    }

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => successes += 1,
            Err(err) => assert!(matches!(err, LedgerError::AlreadyJoined { .. })),
        }
    }
    assert_eq!(successes, users.len());

    let tournament = ledger.get_tournament(&ctx, tournament).await.unwrap();
    assert_eq!(tournament.participants.len(), users.len());
    assert_eq!(tournament.pool.value(), dec!(10) * rust_decimal::Decimal::from(users.len()));
}

#[tokio::test]
async fn independent_tournaments_settle_in_parallel() {
    let ledger = test_ledger();
    let ctx = OperationContext::new();

    let mut pairs = Vec::new();
    for i in 0..10 {
        let tournament = ledger
            .add_tournament(&ctx, format!("t{i}"), dec!(5))
            .await
            .unwrap();
        let user = ledger.add_user(&ctx, format!("w{i}")).await.unwrap();
        ledger
            .add_user_to_tournament(&ctx, tournament, user)
            .await
            .unwrap();
        ledger
            .set_tournament_winner(&ctx, tournament, user)
            .await
            .unwrap();
        pairs.push((tournament, user));
    }

    let mut tasks = Vec::new();
    for (tournament, _) in &pairs {
        let ledger = Arc::clone(&ledger);
        let tournament = *tournament;
        tasks.push(tokio::spawn(async move {
            let ctx = OperationContext::new();
            ledger.calculate_tournament_prize(&ctx, tournament).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    for (tournament, user) in pairs {
        let t = ledger.get_tournament(&ctx, tournament).await.unwrap();
        assert_eq!(t.state(), TournamentState::Settled);
        let u = ledger.get_user(&ctx, user).await.unwrap();
        assert_eq!(u.balance.value(), dec!(5));
    }
}

#[tokio::test]
async fn settlement_race_with_deleted_winner_stays_consistent() {
    let ledger = test_ledger();
    let ctx = OperationContext::new();
    let tournament = ledger
        .add_tournament(&ctx, "cup".to_string(), dec!(10))
        .await
        .unwrap();
    let winner = ledger.add_user(&ctx, "w".to_string()).await.unwrap();
    ledger
        .add_user_to_tournament(&ctx, tournament, winner)
        .await
        .unwrap();
    ledger
        .set_tournament_winner(&ctx, tournament, winner)
        .await
        .unwrap();
    ledger.delete_user(&ctx, winner).await.unwrap();

    // Every attempt fails, and every attempt leaves the pool intact so a
    // later retry (after repair) could still pay out.
    for _ in 0..3 {
        assert_eq!(
            ledger
                .calculate_tournament_prize(&ctx, tournament)
                .await
                .unwrap_err(),
            LedgerError::UserNotFound(winner)
        );
        let t = ledger.get_tournament(&ctx, tournament).await.unwrap();
        assert_eq!(t.pool.value(), dec!(10));
        assert_eq!(t.state(), TournamentState::WinnerSet);
    }
}
