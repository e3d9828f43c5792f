//! Property tests for balance arithmetic
//!
//! Whatever sequence of funds and takes is applied, a balance can never be
//! observed negative and always equals the net of the accepted operations.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tournament_ledger::domain::{Amount, User};

/// An operation drawn by proptest: positive delta funds, negative takes.
fn op_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        1..=1_000i64,
        (1..=1_000i64).prop_map(|v| -v),
        Just(0i64),
    ]
}

proptest! {
    #[test]
    fn balance_never_negative_and_tracks_accepted_net(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut user = User::new("prop".to_string());
        let mut expected = Decimal::ZERO;

        for op in ops {
            let amount = Amount::new(Decimal::from(op.abs())).unwrap();
            if op >= 0 {
                user.credit(&amount).unwrap();
                expected += amount.value();
            } else {
                match user.debit(&amount) {
                    Ok(()) => expected -= amount.value(),
                    // Rejected takes must leave the balance untouched.
                    Err(_) => prop_assert_eq!(user.balance.value(), expected),
                }
            }

            prop_assert!(user.balance.value() >= Decimal::ZERO);
            prop_assert_eq!(user.balance.value(), expected);
        }
    }

    #[test]
    fn take_succeeds_iff_covered(start in 0..10_000i64, take in 0..10_000i64) {
        let mut user = User::new("prop".to_string());
        user.credit(&Amount::new(Decimal::from(start)).unwrap()).unwrap();

        let result = user.debit(&Amount::new(Decimal::from(take)).unwrap());
        if take <= start {
            prop_assert!(result.is_ok());
            prop_assert_eq!(user.balance.value(), Decimal::from(start - take));
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(user.balance.value(), Decimal::from(start));
        }
    }
}
