//! Token balances for one bridge instance.
//!
//! Only the two operations the protocol triggers are modelled: `burn` on
//! the source and `mint` on the destination. Both either fully apply or
//! leave the ledger untouched.

use std::collections::HashMap;

use xchain_core::Address;

use crate::error::BridgeError;

/// One unit in smallest units (18 decimals).
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Balances in smallest units.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    balances: HashMap<Address, u128>,
    total_supply: u128,
}

impl TokenLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Credit `amount` to `to`.
    pub fn mint(&mut self, to: Address, amount: u128) -> Result<(), BridgeError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(BridgeError::SupplyOverflow(amount))?;
        // Individual balances never exceed the total supply.
        let balance = self.balance_of(&to).saturating_add(amount);
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Debit `amount` from `from`.
    pub fn burn(&mut self, from: Address, amount: u128) -> Result<(), BridgeError> {
        let balance = self.balance_of(&from);
        if balance < amount {
            return Err(BridgeError::InsufficientBalance {
                account: from,
                balance,
                requested: amount,
            });
        }
        self.balances.insert(from, balance - amount);
        self.total_supply -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_burn() {
        let a = Address([1; 20]);
        let mut l = TokenLedger::new();
        l.mint(a, UNIT).unwrap();
        l.burn(a, 1000).unwrap();
        assert_eq!(l.balance_of(&a), 999_999_999_999_999_000);
        assert_eq!(l.total_supply(), 999_999_999_999_999_000);
    }

    #[test]
    fn test_overdraw_leaves_balance() {
        let a = Address([1; 20]);
        let mut l = TokenLedger::new();
        l.mint(a, 10).unwrap();
        assert!(matches!(
            l.burn(a, 11),
            Err(BridgeError::InsufficientBalance { balance: 10, requested: 11, .. })
        ));
        assert_eq!(l.balance_of(&a), 10);
    }

    #[test]
    fn test_supply_overflow() {
        let mut l = TokenLedger::new();
        l.mint(Address([1; 20]), u128::MAX).unwrap();
        assert_eq!(l.mint(Address([2; 20]), 1), Err(BridgeError::SupplyOverflow(1)));
        assert_eq!(l.balance_of(&Address([2; 20])), 0);
    }
}
