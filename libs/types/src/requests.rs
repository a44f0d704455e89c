//! Transient request and receipt values for pool operations
//!
//! Requests are built by callers and consumed by one engine call; receipts
//! report what was actually moved. Neither is persisted.

use crate::address::PoolId;
use crate::pair::SwapDirection;
use serde::{Deserialize, Serialize};

/// Deposit of both assets into a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    /// Desired amount of asset0
    pub amount0: u64,
    /// Desired amount of asset1
    pub amount1: u64,
    /// Minimum LP shares to accept (0 = no guard)
    pub min_lp_out: u64,
}

impl AddLiquidity {
    pub fn new(amount0: u64, amount1: u64) -> Self {
        Self {
            amount0,
            amount1,
            min_lp_out: 0,
        }
    }

    pub fn with_min_lp_out(mut self, min_lp_out: u64) -> Self {
        self.min_lp_out = min_lp_out;
        self
    }
}

/// Burn of LP shares for a proportional slice of the reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    pub lp_amount: u64,
    /// Minimum asset0 to accept (0 = no guard)
    pub min_amount0_out: u64,
    /// Minimum asset1 to accept (0 = no guard)
    pub min_amount1_out: u64,
}

impl RemoveLiquidity {
    pub fn new(lp_amount: u64) -> Self {
        Self {
            lp_amount,
            min_amount0_out: 0,
            min_amount1_out: 0,
        }
    }

    pub fn with_min_out(mut self, min_amount0_out: u64, min_amount1_out: u64) -> Self {
        self.min_amount0_out = min_amount0_out;
        self.min_amount1_out = min_amount1_out;
        self
    }
}

/// Exact-input swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub amount_in: u64,
    pub min_amount_out: u64,
    pub direction: SwapDirection,
}

impl Swap {
    pub fn new(amount_in: u64, min_amount_out: u64, direction: SwapDirection) -> Self {
        Self {
            amount_in,
            min_amount_out,
            direction,
        }
    }
}

/// Result of a committed deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub pool_id: PoolId,
    pub lp_minted: u64,
    /// Asset0 actually pulled from the depositor
    pub amount0: u64,
    /// Asset1 actually pulled from the depositor
    pub amount1: u64,
}

/// Result of a committed withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub pool_id: PoolId,
    pub lp_burned: u64,
    pub amount0_out: u64,
    pub amount1_out: u64,
}

/// Result of a committed swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub pool_id: PoolId,
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub amount_out: u64,
    /// Portion of `amount_in` retained as fee
    pub fee: u64,
}
