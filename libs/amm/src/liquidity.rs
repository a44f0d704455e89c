//! LP-share accounting for deposits and withdrawals
//!
//! First deposit mints `floor(sqrt(amount0 * amount1))` shares and fixes the
//! opening exchange rate at exactly `amount0 : amount1`. Later deposits mint
//! the smaller of the two proportional contributions and only pull the
//! amounts that minted share is worth, so existing holders are never diluted.
//! Withdrawals pay out the floor of the burned share of each reserve.

use crate::error::AmmError;
use crate::math::{self, Rounding};
use crate::reserves::Reserves;
use serde::{Deserialize, Serialize};

/// What a deposit mints, what it consumes, and the reserves afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositOutcome {
    pub lp_minted: u64,
    /// Asset0 actually consumed (never more than offered)
    pub amount0: u64,
    /// Asset1 actually consumed (never more than offered)
    pub amount1: u64,
    pub next: Reserves,
}

/// What a withdrawal pays out and the reserves afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalOutcome {
    pub lp_burned: u64,
    pub amount0_out: u64,
    pub amount1_out: u64,
    pub next: Reserves,
}

/// LP-share mint/burn calculations
pub struct LiquidityMath;

impl LiquidityMath {
    /// Compute a deposit of up to `amount0`/`amount1`
    ///
    /// `min_initial_liquidity` only applies to the first deposit into an
    /// empty pool; a value of 0 is treated as 1.
    pub fn deposit(
        reserves: Reserves,
        amount0: u64,
        amount1: u64,
        min_initial_liquidity: u64,
    ) -> Result<DepositOutcome, AmmError> {
        if amount0 == 0 {
            return Err(AmmError::ZeroAmount { what: "amount0" });
        }
        if amount1 == 0 {
            return Err(AmmError::ZeroAmount { what: "amount1" });
        }

        if reserves.is_empty() {
            Self::initial_deposit(reserves, amount0, amount1, min_initial_liquidity)
        } else {
            Self::proportional_deposit(reserves, amount0, amount1)
        }
    }

    fn initial_deposit(
        reserves: Reserves,
        amount0: u64,
        amount1: u64,
        min_initial_liquidity: u64,
    ) -> Result<DepositOutcome, AmmError> {
        let lp_minted = math::narrow(
            math::isqrt(math::product(amount0, amount1)),
            "initial lp mint",
        )?;

        let minimum = min_initial_liquidity.max(1);
        if lp_minted < minimum {
            return Err(AmmError::InsufficientInitialLiquidity {
                minted: lp_minted,
                minimum,
            });
        }

        // An empty pool holds nothing, so the deposit becomes the reserves.
        let next = Reserves::new(
            math::checked_add(reserves.reserve0, amount0, "reserve0")?,
            math::checked_add(reserves.reserve1, amount1, "reserve1")?,
            lp_minted,
        );

        Ok(DepositOutcome {
            lp_minted,
            amount0,
            amount1,
            next,
        })
    }

    fn proportional_deposit(
        reserves: Reserves,
        amount0: u64,
        amount1: u64,
    ) -> Result<DepositOutcome, AmmError> {
        let supply = reserves.lp_supply;

        let lp_from0 = math::mul_div(amount0, supply, reserves.reserve0, Rounding::Down)?;
        let lp_from1 = math::mul_div(amount1, supply, reserves.reserve1, Rounding::Down)?;
        let lp_minted = lp_from0.min(lp_from1);

        if lp_minted == 0 {
            return Err(AmmError::ZeroLiquidityMinted);
        }

        // Pull exactly what the minted share is worth, rounded toward the pool.
        // lp_minted <= amountX * supply / reserveX, so the ceiling never
        // exceeds what was offered.
        let effective0 = math::mul_div(lp_minted, reserves.reserve0, supply, Rounding::Up)?;
        let effective1 = math::mul_div(lp_minted, reserves.reserve1, supply, Rounding::Up)?;
        debug_assert!(effective0 <= amount0 && effective1 <= amount1);

        let next = Reserves::new(
            math::checked_add(reserves.reserve0, effective0, "reserve0")?,
            math::checked_add(reserves.reserve1, effective1, "reserve1")?,
            math::checked_add(supply, lp_minted, "lp supply")?,
        );

        Ok(DepositOutcome {
            lp_minted,
            amount0: effective0,
            amount1: effective1,
            next,
        })
    }

    /// Compute the burn of `lp_amount` shares
    pub fn withdraw(reserves: Reserves, lp_amount: u64) -> Result<WithdrawalOutcome, AmmError> {
        if lp_amount == 0 {
            return Err(AmmError::ZeroAmount { what: "lp_amount" });
        }
        if lp_amount > reserves.lp_supply {
            return Err(AmmError::InsufficientShares {
                requested: lp_amount,
                available: reserves.lp_supply,
            });
        }

        let supply = reserves.lp_supply;
        let amount0_out = math::mul_div(reserves.reserve0, lp_amount, supply, Rounding::Down)?;
        let amount1_out = math::mul_div(reserves.reserve1, lp_amount, supply, Rounding::Down)?;

        if amount0_out == 0 || amount1_out == 0 {
            return Err(AmmError::ZeroWithdrawal {
                amount0_out,
                amount1_out,
            });
        }

        let next = Reserves::new(
            math::checked_sub(reserves.reserve0, amount0_out, "reserve0")?,
            math::checked_sub(reserves.reserve1, amount1_out, "reserve1")?,
            math::checked_sub(supply, lp_amount, "lp supply")?,
        );

        Ok(WithdrawalOutcome {
            lp_burned: lp_amount,
            amount0_out,
            amount1_out,
            next,
        })
    }
}
