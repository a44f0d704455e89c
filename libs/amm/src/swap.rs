//! Constant-product swap math with integer precision
//!
//! Exact-input swaps follow the x*y=k formula net of fee:
//!
//! ```text
//! fee                 = floor(amount_in * fee_num / fee_den)
//! amount_in_after_fee = amount_in - fee
//! amount_out          = floor(reserve_out * amount_in_after_fee
//!                             / (reserve_in + amount_in_after_fee))
//! ```
//!
//! The full `amount_in` enters the input reserve, so the retained fee grows
//! `k` and accrues to LP holders through share value.

use crate::error::AmmError;
use crate::math::{self, Rounding};
use crate::reserves::Reserves;
use dex_types::{FeeSchedule, SwapDirection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of an exact-input swap calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub amount_in: u64,
    pub amount_out: u64,
    /// Portion of `amount_in` kept by the pool as fee
    pub fee: u64,
    pub amount_in_after_fee: u64,
    pub next: Reserves,
}

/// Read-only preview of a swap, with prices for display and slippage checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee: u64,
    pub amount_in_after_fee: u64,
    /// Output units per input unit before the trade
    pub spot_price_before: Decimal,
    /// Output units per input unit after the trade
    pub spot_price_after: Decimal,
    /// `amount_out / amount_in`
    pub execution_price: Decimal,
    /// Spot price movement in percent
    pub price_impact_pct: Decimal,
}

/// Constant-product swap calculations
pub struct SwapMath;

impl SwapMath {
    /// Fee retained from `amount_in`, rounded down
    pub fn fee_amount(amount_in: u64, fee: FeeSchedule) -> Result<u64, AmmError> {
        Ok(math::mul_div(
            amount_in,
            fee.numerator(),
            fee.denominator(),
            Rounding::Down,
        )?)
    }

    /// Largest output that keeps `reserve_in * reserve_out` from decreasing
    pub fn output_amount(
        amount_in_after_fee: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> Result<u64, AmmError> {
        let numerator = math::product(reserve_out, amount_in_after_fee);
        let denominator = reserve_in as u128 + amount_in_after_fee as u128;
        let out = math::div_round(numerator, denominator, Rounding::Down, "swap output")?;
        Ok(math::narrow(out, "swap output")?)
    }

    /// Compute an exact-input swap and the reserves it leaves behind
    pub fn swap_exact_in(
        reserves: Reserves,
        fee: FeeSchedule,
        amount_in: u64,
        min_amount_out: u64,
        direction: SwapDirection,
    ) -> Result<SwapOutcome, AmmError> {
        if amount_in == 0 {
            return Err(AmmError::ZeroAmount { what: "amount_in" });
        }
        if !reserves.is_tradable() {
            return Err(AmmError::EmptyPool);
        }

        let (reserve_in, reserve_out) = reserves.oriented(direction);
        let fee_amount = Self::fee_amount(amount_in, fee)?;
        let amount_in_after_fee = math::checked_sub(amount_in, fee_amount, "fee deduction")?;
        let amount_out = Self::output_amount(amount_in_after_fee, reserve_in, reserve_out)?;

        if amount_out == 0 {
            return Err(AmmError::ZeroOutput);
        }
        if amount_out < min_amount_out {
            return Err(AmmError::SlippageExceeded {
                what: "amount_out",
                actual: amount_out,
                minimum: min_amount_out,
            });
        }

        let new_reserve_in = math::checked_add(reserve_in, amount_in, "reserve_in")?;
        let new_reserve_out = math::checked_sub(reserve_out, amount_out, "reserve_out")?;
        let next = Reserves::from_oriented(
            direction,
            new_reserve_in,
            new_reserve_out,
            reserves.lp_supply,
        );

        let k_before = reserves.k();
        let k_after = next.k();
        if k_after < k_before {
            return Err(AmmError::InvariantViolation { k_before, k_after });
        }

        Ok(SwapOutcome {
            amount_in,
            amount_out,
            fee: fee_amount,
            amount_in_after_fee,
            next,
        })
    }

    /// An input sufficient to yield at least `amount_out` from an exact-input swap
    pub fn input_for_output(
        reserves: Reserves,
        fee: FeeSchedule,
        amount_out: u64,
        direction: SwapDirection,
    ) -> Result<u64, AmmError> {
        if amount_out == 0 {
            return Err(AmmError::ZeroAmount { what: "amount_out" });
        }
        if !reserves.is_tradable() {
            return Err(AmmError::EmptyPool);
        }

        let (reserve_in, reserve_out) = reserves.oriented(direction);
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }

        // after-fee input needed: ceil(reserve_in * out / (reserve_out - out))
        let needed_after_fee =
            math::mul_div(reserve_in, amount_out, reserve_out - amount_out, Rounding::Up)?;

        // gross up by den / (den - num), rounding toward the pool
        let keep = math::checked_sub(fee.denominator(), fee.numerator(), "fee_keep")?;
        Ok(math::mul_div(
            needed_after_fee,
            fee.denominator(),
            keep,
            Rounding::Up,
        )?)
    }

    /// Preview an exact-input swap without any slippage guard
    pub fn quote(
        reserves: Reserves,
        fee: FeeSchedule,
        amount_in: u64,
        direction: SwapDirection,
    ) -> Result<SwapQuote, AmmError> {
        if amount_in == 0 {
            return Err(AmmError::ZeroAmount { what: "amount_in" });
        }
        if !reserves.is_tradable() {
            return Err(AmmError::EmptyPool);
        }

        let (reserve_in, reserve_out) = reserves.oriented(direction);
        let fee_amount = Self::fee_amount(amount_in, fee)?;
        let amount_in_after_fee = math::checked_sub(amount_in, fee_amount, "fee deduction")?;
        let amount_out = Self::output_amount(amount_in_after_fee, reserve_in, reserve_out)?;

        let new_reserve_in = math::checked_add(reserve_in, amount_in, "reserve_in")?;
        let new_reserve_out = math::checked_sub(reserve_out, amount_out, "reserve_out")?;

        let spot_price_before = ratio(reserve_out, reserve_in);
        let spot_price_after = ratio(new_reserve_out, new_reserve_in);
        let execution_price = ratio(amount_out, amount_in);
        let price_impact_pct = if spot_price_before.is_zero() {
            Decimal::ZERO
        } else {
            (spot_price_before - spot_price_after).abs() / spot_price_before
                * Decimal::ONE_HUNDRED
        };

        Ok(SwapQuote {
            amount_in,
            amount_out,
            fee: fee_amount,
            amount_in_after_fee,
            spot_price_before,
            spot_price_after,
            execution_price,
            price_impact_pct,
        })
    }

    /// Spot price of the input asset in output units
    pub fn spot_price(reserves: Reserves, direction: SwapDirection) -> Option<Decimal> {
        if !reserves.is_tradable() {
            return None;
        }
        let (reserve_in, reserve_out) = reserves.oriented(direction);
        Some(ratio(reserve_out, reserve_in))
    }
}

fn ratio(numerator: u64, denominator: u64) -> Decimal {
    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .unwrap_or(Decimal::ZERO)
}
