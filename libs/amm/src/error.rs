//! Pool calculation errors
//!
//! Every variant is raised before any state is committed. The one fatal
//! variant, [`AmmError::InvariantViolation`], means the math itself is wrong;
//! callers must abort and must not retry.

use crate::math::MathError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    #[error("{what} must be greater than zero")]
    ZeroAmount { what: &'static str },

    #[error("Initial deposit mints {minted} LP shares, below the minimum {minimum}")]
    InsufficientInitialLiquidity { minted: u64, minimum: u64 },

    #[error("Deposit too small relative to pool size: zero LP shares minted")]
    ZeroLiquidityMinted,

    #[error("Withdrawal rounds to zero: amount0_out={amount0_out} amount1_out={amount1_out}")]
    ZeroWithdrawal { amount0_out: u64, amount1_out: u64 },

    #[error("Cannot burn {requested} LP shares, only {available} available")]
    InsufficientShares { requested: u64, available: u64 },

    #[error("Pool has no liquidity")]
    EmptyPool,

    #[error("Requested output {requested} exceeds available reserve {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("Swap output rounds to zero")]
    ZeroOutput,

    #[error("Slippage exceeded: {what} {actual} below minimum {minimum}")]
    SlippageExceeded {
        what: &'static str,
        actual: u64,
        minimum: u64,
    },

    #[error("Constant-product invariant broken: k {k_before} -> {k_after}")]
    InvariantViolation { k_before: u128, k_after: u128 },

    #[error(transparent)]
    Arithmetic(#[from] MathError),
}
