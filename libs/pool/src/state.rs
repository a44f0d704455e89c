//! Per-pool state and its read-only snapshot

use dex_amm::{ConstantProductPool, DepositOutcome, Reserves, SwapOutcome, WithdrawalOutcome};
use dex_types::{Address, FeeSchedule, MintPair, PoolAccounts, PoolId, SwapDirection};
use serde::{Deserialize, Serialize};

/// Lifetime counters, informational only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub deposits: u64,
    pub withdrawals: u64,
    pub swaps: u64,
    /// Fees retained in asset0 by swaps paying asset0 in
    pub fees0: u64,
    /// Fees retained in asset1 by swaps paying asset1 in
    pub fees1: u64,
}

/// Authoritative state of one pool
///
/// Only reachable through [`crate::PoolHandle::transact`]; every committed
/// mutation bumps `sequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    id: PoolId,
    pair: MintPair,
    accounts: PoolAccounts,
    fee: FeeSchedule,
    reserves: Reserves,
    sequence: u64,
    stats: PoolStats,
}

impl PoolState {
    /// Empty pool for a canonical pair
    pub fn new(pair: MintPair, fee: FeeSchedule) -> Self {
        let id = PoolId::for_pair(&pair);
        Self {
            id,
            pair,
            accounts: PoolAccounts::derive(&id),
            fee,
            reserves: Reserves::EMPTY,
            sequence: 0,
            stats: PoolStats::default(),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn pair(&self) -> MintPair {
        self.pair
    }

    pub fn accounts(&self) -> &PoolAccounts {
        &self.accounts
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Vault holding the given side's reserve
    pub fn vault_for(&self, mint: &Address) -> Option<Address> {
        if *mint == self.pair.mint0() {
            Some(self.accounts.vault0)
        } else if *mint == self.pair.mint1() {
            Some(self.accounts.vault1)
        } else {
            None
        }
    }

    /// `(mint_in, vault_in, mint_out, vault_out)` for a swap direction
    pub fn swap_route(&self, direction: SwapDirection) -> (Address, Address, Address, Address) {
        match direction {
            SwapDirection::ZeroForOne => (
                self.pair.mint0(),
                self.accounts.vault0,
                self.pair.mint1(),
                self.accounts.vault1,
            ),
            SwapDirection::OneForZero => (
                self.pair.mint1(),
                self.accounts.vault1,
                self.pair.mint0(),
                self.accounts.vault0,
            ),
        }
    }

    pub(crate) fn apply_deposit(&mut self, outcome: &DepositOutcome) {
        self.commit(outcome.next);
        self.stats.deposits += 1;
    }

    pub(crate) fn apply_withdrawal(&mut self, outcome: &WithdrawalOutcome) {
        self.commit(outcome.next);
        self.stats.withdrawals += 1;
    }

    pub(crate) fn apply_swap(&mut self, outcome: &SwapOutcome, direction: SwapDirection) {
        self.commit(outcome.next);
        self.stats.swaps += 1;
        match direction {
            SwapDirection::ZeroForOne => self.stats.fees0 = self.stats.fees0.saturating_add(outcome.fee),
            SwapDirection::OneForZero => self.stats.fees1 = self.stats.fees1.saturating_add(outcome.fee),
        }
    }

    fn commit(&mut self, next: Reserves) {
        debug_assert!(next.is_consistent(), "inconsistent reserves {:?}", next);
        self.reserves = next;
        self.sequence += 1;
    }

    pub fn info(&self) -> PoolInfo {
        PoolInfo {
            pool_id: self.id,
            mint0: self.pair.mint0(),
            mint1: self.pair.mint1(),
            reserve0: self.reserves.reserve0,
            reserve1: self.reserves.reserve1,
            total_lp_supply: self.reserves.lp_supply,
            fee_numerator: self.fee.numerator(),
            fee_denominator: self.fee.denominator(),
            accounts: self.accounts,
            sequence: self.sequence,
            stats: self.stats,
        }
    }
}

impl ConstantProductPool for PoolState {
    fn reserves(&self) -> Reserves {
        self.reserves
    }

    fn fee(&self) -> FeeSchedule {
        self.fee
    }
}

/// Point-in-time copy of a pool, safe to hand out of the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub pool_id: PoolId,
    pub mint0: Address,
    pub mint1: Address,
    pub reserve0: u64,
    pub reserve1: u64,
    pub total_lp_supply: u64,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    pub accounts: PoolAccounts,
    pub sequence: u64,
    pub stats: PoolStats,
}

impl PoolInfo {
    pub fn reserves(&self) -> Reserves {
        Reserves::new(self.reserve0, self.reserve1, self.total_lp_supply)
    }
}
