//! Pool trait definitions for a unified quoting interface

use crate::liquidity::{DepositOutcome, LiquidityMath, WithdrawalOutcome};
use crate::swap::{SwapMath, SwapQuote};
use crate::{AmmError, Reserves};
use dex_types::{FeeSchedule, SwapDirection};
use rust_decimal::Decimal;

/// Read-only view of a constant-product pool
///
/// Implementors only expose their numbers; every quote is derived from
/// [`SwapMath`] and [`LiquidityMath`] so previews and execution share one
/// code path.
pub trait ConstantProductPool {
    /// Current reserves and LP supply
    fn reserves(&self) -> Reserves;

    /// Immutable fee schedule
    fn fee(&self) -> FeeSchedule;

    /// Calculate output amount for given input
    fn get_amount_out(&self, amount_in: u64, direction: SwapDirection) -> Result<u64, AmmError> {
        Ok(self.quote_swap(amount_in, direction)?.amount_out)
    }

    /// Calculate required input for desired output
    fn get_amount_in(&self, amount_out: u64, direction: SwapDirection) -> Result<u64, AmmError> {
        SwapMath::input_for_output(self.reserves(), self.fee(), amount_out, direction)
    }

    /// Full swap preview with prices
    fn quote_swap(&self, amount_in: u64, direction: SwapDirection) -> Result<SwapQuote, AmmError> {
        SwapMath::quote(self.reserves(), self.fee(), amount_in, direction)
    }

    /// Preview a deposit of up to `amount0`/`amount1`
    fn quote_deposit(
        &self,
        amount0: u64,
        amount1: u64,
        min_initial_liquidity: u64,
    ) -> Result<DepositOutcome, AmmError> {
        LiquidityMath::deposit(self.reserves(), amount0, amount1, min_initial_liquidity)
    }

    /// Preview a withdrawal of `lp_amount` shares
    fn quote_withdrawal(&self, lp_amount: u64) -> Result<WithdrawalOutcome, AmmError> {
        LiquidityMath::withdraw(self.reserves(), lp_amount)
    }

    /// Spot price of the input asset in output units, if the pool is funded
    fn spot_price(&self, direction: SwapDirection) -> Option<Decimal> {
        SwapMath::spot_price(self.reserves(), direction)
    }
}

impl ConstantProductPool for (Reserves, FeeSchedule) {
    fn reserves(&self) -> Reserves {
        self.0
    }

    fn fee(&self) -> FeeSchedule {
        self.1
    }
}
