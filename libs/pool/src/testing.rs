//! Scriptable custody backend for exercising settlement failure paths

use crate::custody::{CustodyError, LpLedger, TokenVault};
use crate::ledger::BalanceBook;
use dex_types::Address;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Kind of custody call, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    TransferIn,
    TransferOut,
    Mint,
    Burn,
}

/// A custody call that was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustodyCall {
    pub kind: CallKind,
    pub mint: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

/// [`BalanceBook`] wrapper that records every applied call and can be told
/// to fail the n-th upcoming call of a given kind
#[derive(Debug, Default)]
pub struct FakeCustody {
    book: BalanceBook,
    calls: Mutex<Vec<CustodyCall>>,
    /// Remaining successful calls before the scripted failure fires
    failures: Mutex<HashMap<CallKind, usize>>,
}

impl FakeCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self) -> &BalanceBook {
        &self.book
    }

    pub fn fund(&self, mint: &Address, holder: &Address, amount: u64) -> Result<(), CustodyError> {
        self.book.credit(mint, holder, amount)
    }

    /// Fail the next call of `kind`
    pub fn fail_next(&self, kind: CallKind) {
        self.fail_after(kind, 0);
    }

    /// Let `skip` calls of `kind` through, then fail the following one
    pub fn fail_after(&self, kind: CallKind, skip: usize) {
        self.failures.lock().insert(kind, skip);
    }

    pub fn calls(&self) -> Vec<CustodyCall> {
        self.calls.lock().clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> usize {
        self.calls.lock().iter().filter(|c| c.kind == kind).count()
    }

    fn run(
        &self,
        call: CustodyCall,
        op: impl FnOnce(&BalanceBook) -> Result<(), CustodyError>,
    ) -> Result<(), CustodyError> {
        {
            let mut failures = self.failures.lock();
            if let Some(remaining) = failures.get_mut(&call.kind) {
                if *remaining == 0 {
                    failures.remove(&call.kind);
                    return Err(CustodyError::Rejected(format!("injected {:?} failure", call.kind)));
                }
                *remaining -= 1;
            }
        }
        op(&self.book)?;
        self.calls.lock().push(call);
        Ok(())
    }
}

impl TokenVault for FakeCustody {
    fn transfer_in(
        &self,
        mint: &Address,
        from: &Address,
        vault: &Address,
        amount: u64,
    ) -> Result<(), CustodyError> {
        let call = CustodyCall {
            kind: CallKind::TransferIn,
            mint: *mint,
            from: *from,
            to: *vault,
            amount,
        };
        self.run(call, |book| book.transfer_in(mint, from, vault, amount))
    }

    fn transfer_out(
        &self,
        mint: &Address,
        vault: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), CustodyError> {
        let call = CustodyCall {
            kind: CallKind::TransferOut,
            mint: *mint,
            from: *vault,
            to: *to,
            amount,
        };
        self.run(call, |book| book.transfer_out(mint, vault, to, amount))
    }

    fn balance(&self, mint: &Address, holder: &Address) -> u64 {
        self.book.get(mint, holder)
    }
}

impl LpLedger for FakeCustody {
    fn mint(&self, lp_mint: &Address, owner: &Address, amount: u64) -> Result<(), CustodyError> {
        let call = CustodyCall {
            kind: CallKind::Mint,
            mint: *lp_mint,
            from: Address::ZERO,
            to: *owner,
            amount,
        };
        self.run(call, |book| book.mint(lp_mint, owner, amount))
    }

    fn burn(&self, lp_mint: &Address, owner: &Address, amount: u64) -> Result<(), CustodyError> {
        let call = CustodyCall {
            kind: CallKind::Burn,
            mint: *lp_mint,
            from: *owner,
            to: Address::ZERO,
            amount,
        };
        self.run(call, |book| book.burn(lp_mint, owner, amount))
    }

    fn balance_of(&self, lp_mint: &Address, owner: &Address) -> u64 {
        self.book.get(lp_mint, owner)
    }
}
