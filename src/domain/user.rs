//! User entity
//!
//! A user holds a display name and the single mutable field of the model:
//! a non-negative balance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, Balance, LedgerError};

/// A platform user with a monetary balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub balance: Balance,
}

impl User {
    /// Create a user with a fresh id and zero balance.
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            balance: Balance::zero(),
        }
    }

    /// Add `amount` to the balance.
    pub fn credit(&mut self, amount: &Amount) -> Result<(), LedgerError> {
        self.balance = self.balance.credit(amount)?;
        Ok(())
    }

    /// Subtract `amount` from the balance.
    ///
    /// The sufficiency check and the subtraction form one step; callers run
    /// this inside the store's atomic update so two concurrent debits can
    /// never both pass a stale check.
    pub fn debit(&mut self, amount: &Amount) -> Result<(), LedgerError> {
        if !self.balance.is_sufficient_for(amount) {
            return Err(LedgerError::InsufficientFunds {
                required: amount.value(),
                available: self.balance.value(),
            });
        }
        self.balance = self.balance.debit(amount)?;
        Ok(())
    }
}
