//! In-memory balance book
//!
//! Concurrent `(mint, holder) -> amount` map backing both [`TokenVault`] and
//! [`LpLedger`]. Used by the harness and by tests; a deployment would plug
//! a real custody backend in behind the same traits.

use crate::custody::{CustodyError, LpLedger, TokenVault};
use dashmap::DashMap;
use dex_types::Address;
use tracing::{error, trace};

#[derive(Debug, Default)]
pub struct BalanceBook {
    balances: DashMap<(Address, Address), u64>,
    /// Outstanding supply per mint, maintained by `credit`, `mint` and `burn`
    supplies: DashMap<Address, u64>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `mint` out of thin air for `holder`
    pub fn credit(&self, mint: &Address, holder: &Address, amount: u64) -> Result<(), CustodyError> {
        self.add_supply(mint, holder, amount)?;
        if let Err(e) = self.add(mint, holder, amount) {
            self.sub_supply(mint, amount);
            return Err(e);
        }
        trace!(mint = %mint.short(), holder = %holder.short(), amount, "credit");
        Ok(())
    }

    pub fn get(&self, mint: &Address, holder: &Address) -> u64 {
        self.balances.get(&(*mint, *holder)).map(|b| *b).unwrap_or(0)
    }

    pub fn total_supply(&self, mint: &Address) -> u64 {
        self.supplies.get(mint).map(|s| *s).unwrap_or(0)
    }

    fn add(&self, mint: &Address, holder: &Address, amount: u64) -> Result<(), CustodyError> {
        let mut entry = self.balances.entry((*mint, *holder)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow {
                mint: *mint,
                holder: *holder,
            })?;
        Ok(())
    }

    fn sub(&self, mint: &Address, holder: &Address, amount: u64) -> Result<(), CustodyError> {
        let insufficient = |available| CustodyError::InsufficientFunds {
            mint: *mint,
            holder: *holder,
            requested: amount,
            available,
        };
        match self.balances.get_mut(&(*mint, *holder)) {
            Some(mut balance) => {
                let available = *balance;
                *balance = available
                    .checked_sub(amount)
                    .ok_or_else(|| insufficient(available))?;
                Ok(())
            }
            None if amount == 0 => Ok(()),
            None => Err(insufficient(0)),
        }
    }

    /// Debit then credit; the shard guard is released between the two
    fn transfer(&self, mint: &Address, from: &Address, to: &Address, amount: u64) -> Result<(), CustodyError> {
        self.sub(mint, from, amount)?;
        if let Err(e) = self.add(mint, to, amount) {
            if let Err(restore) = self.add(mint, from, amount) {
                error!(
                    mint = %mint.short(),
                    holder = %from.short(),
                    amount,
                    %restore,
                    "Failed to restore debited balance"
                );
            }
            return Err(e);
        }
        Ok(())
    }

    fn add_supply(&self, mint: &Address, holder: &Address, amount: u64) -> Result<(), CustodyError> {
        let mut supply = self.supplies.entry(*mint).or_insert(0);
        *supply = supply
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow {
                mint: *mint,
                holder: *holder,
            })?;
        Ok(())
    }

    fn sub_supply(&self, mint: &Address, amount: u64) {
        if let Some(mut supply) = self.supplies.get_mut(mint) {
            *supply = supply.saturating_sub(amount);
        }
    }
}

impl TokenVault for BalanceBook {
    fn transfer_in(
        &self,
        mint: &Address,
        from: &Address,
        vault: &Address,
        amount: u64,
    ) -> Result<(), CustodyError> {
        self.transfer(mint, from, vault, amount)
    }

    fn transfer_out(
        &self,
        mint: &Address,
        vault: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), CustodyError> {
        self.transfer(mint, vault, to, amount)
    }

    fn balance(&self, mint: &Address, holder: &Address) -> u64 {
        self.get(mint, holder)
    }
}

impl LpLedger for BalanceBook {
    fn mint(&self, lp_mint: &Address, owner: &Address, amount: u64) -> Result<(), CustodyError> {
        self.credit(lp_mint, owner, amount)
    }

    fn burn(&self, lp_mint: &Address, owner: &Address, amount: u64) -> Result<(), CustodyError> {
        self.sub(lp_mint, owner, amount)?;
        self.sub_supply(lp_mint, amount);
        Ok(())
    }

    fn balance_of(&self, lp_mint: &Address, owner: &Address) -> u64 {
        self.get(lp_mint, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[test]
    fn test_transfer_round_trip() {
        let book = BalanceBook::new();
        let (mint, user, vault) = (addr(1), addr(2), addr(3));
        book.credit(&mint, &user, 100).unwrap();

        book.transfer_in(&mint, &user, &vault, 60).unwrap();
        assert_eq!(book.balance(&mint, &user), 40);
        assert_eq!(book.balance(&mint, &vault), 60);

        book.transfer_out(&mint, &vault, &user, 10).unwrap();
        assert_eq!(book.balance(&mint, &user), 50);
        assert_eq!(book.total_supply(&mint), 100);
    }

    #[test]
    fn test_insufficient_funds_leaves_balances() {
        let book = BalanceBook::new();
        let (mint, user, vault) = (addr(1), addr(2), addr(3));
        book.credit(&mint, &user, 5).unwrap();

        let err = book.transfer_in(&mint, &user, &vault, 6).unwrap_err();
        assert_eq!(
            err,
            CustodyError::InsufficientFunds {
                mint,
                holder: user,
                requested: 6,
                available: 5
            }
        );
        assert_eq!(book.balance(&mint, &user), 5);
        assert_eq!(book.balance(&mint, &vault), 0);

        // unknown holder
        assert!(matches!(
            book.transfer_in(&mint, &addr(9), &vault, 1),
            Err(CustodyError::InsufficientFunds { available: 0, .. })
        ));
    }

    #[test]
    fn test_credit_overflow_rejected() {
        let book = BalanceBook::new();
        let (mint, user) = (addr(1), addr(2));
        book.credit(&mint, &user, u64::MAX).unwrap();
        assert!(matches!(
            book.credit(&mint, &user, 1),
            Err(CustodyError::BalanceOverflow { .. })
        ));
        assert_eq!(book.get(&mint, &user), u64::MAX);
        assert_eq!(book.total_supply(&mint), u64::MAX);
    }

    #[test]
    fn test_mint_and_burn_track_supply() {
        let book = BalanceBook::new();
        let (lp, owner) = (addr(7), addr(8));

        book.mint(&lp, &owner, 50).unwrap();
        book.burn(&lp, &owner, 20).unwrap();
        assert_eq!(book.balance_of(&lp, &owner), 30);
        assert_eq!(book.total_supply(&lp), 30);

        assert!(book.burn(&lp, &owner, 31).is_err());
        assert_eq!(book.total_supply(&lp), 30);
    }

    #[test]
    fn test_failed_credit_restores_source() {
        let book = BalanceBook::new();
        let (mint, user, vault) = (addr(1), addr(2), addr(3));
        book.credit(&mint, &user, 10).unwrap();
        // vault already at the ceiling, outside any supply accounting
        book.add(&mint, &vault, u64::MAX).unwrap();

        assert!(matches!(
            book.transfer_in(&mint, &user, &vault, 10),
            Err(CustodyError::BalanceOverflow { holder, .. }) if holder == vault
        ));
        assert_eq!(book.get(&mint, &user), 10);
        assert_eq!(book.get(&mint, &vault), u64::MAX);
    }
}
