//! # Dex AMM Library - Constant-Product Pool Mathematics
//!
//! ## Purpose
//!
//! Exact integer mathematics for a two-asset constant-product pool:
//! overflow-checked multiply-then-divide with explicit rounding, LP-share
//! minting and burning, and fee-bearing exact-input swaps. Every calculation
//! is a pure function from the current [`Reserves`] to an outcome carrying
//! the next `Reserves`, so the caller can validate everything before
//! committing anything.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool reserves/supply and fee schedule from `dex-pool`
//! - **Output Destinations**: The pool engine (commit path) and quoting callers
//! - **Precision**: `u64` amounts, `u128` intermediates, no floating point
//! - **Validation**: Zero amounts, empty pools, slippage guards and the
//!   constant-product invariant are all checked here
//!
//! ## Rounding
//!
//! Rounding always resolves in the pool's favor: payouts, minted shares and
//! fees round down; amounts pulled from a depositor round up.
//!
//! ```rust
//! use dex_amm::{LiquidityMath, Reserves, SwapMath};
//! use dex_types::{FeeSchedule, SwapDirection};
//!
//! let first = LiquidityMath::deposit(Reserves::EMPTY, 50, 50, 1).unwrap();
//! assert_eq!(first.lp_minted, 50);
//!
//! let swap = SwapMath::swap_exact_in(
//!     first.next,
//!     FeeSchedule::ZERO,
//!     10,
//!     0,
//!     SwapDirection::ZeroForOne,
//! )
//! .unwrap();
//! assert_eq!(swap.amount_out, 8); // floor(50 * 10 / 60)
//! assert!(swap.next.k() >= first.next.k());
//! ```

pub mod error;
pub mod liquidity;
pub mod math;
pub mod pool_traits;
pub mod reserves;
pub mod swap;

pub use error::AmmError;
pub use liquidity::{DepositOutcome, LiquidityMath, WithdrawalOutcome};
pub use math::{MathError, Rounding};
pub use pool_traits::ConstantProductPool;
pub use reserves::Reserves;
pub use swap::{SwapMath, SwapOutcome, SwapQuote};

/// Common types for pool calculations
pub use rust_decimal::Decimal;
