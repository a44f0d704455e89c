//! Custody seams: token vaults and the LP-share ledger
//!
//! The engine never owns balances. It asks a [`TokenVault`] to move assets
//! between holders and vault accounts, and an [`LpLedger`] to mint and burn
//! LP shares. Both are expected to be atomic per call; the engine composes
//! calls into an all-or-nothing settlement.

use dex_types::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("Insufficient {mint} balance for {holder}: requested {requested}, available {available}")]
    InsufficientFunds {
        mint: Address,
        holder: Address,
        requested: u64,
        available: u64,
    },

    #[error("Balance overflow crediting {holder} with {mint}")]
    BalanceOverflow { mint: Address, holder: Address },

    #[error("Custody backend rejected the call: {0}")]
    Rejected(String),
}

/// Moves fungible assets between holders and pool vaults
pub trait TokenVault: Send + Sync {
    /// Pull `amount` of `mint` from `from` into the pool vault `vault`
    fn transfer_in(
        &self,
        mint: &Address,
        from: &Address,
        vault: &Address,
        amount: u64,
    ) -> Result<(), CustodyError>;

    /// Release `amount` of `mint` from the pool vault `vault` to `to`
    fn transfer_out(
        &self,
        mint: &Address,
        vault: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), CustodyError>;

    fn balance(&self, mint: &Address, holder: &Address) -> u64;
}

/// Issues and retires LP shares
pub trait LpLedger: Send + Sync {
    fn mint(&self, lp_mint: &Address, owner: &Address, amount: u64) -> Result<(), CustodyError>;

    fn burn(&self, lp_mint: &Address, owner: &Address, amount: u64) -> Result<(), CustodyError>;

    fn balance_of(&self, lp_mint: &Address, owner: &Address) -> u64;
}
