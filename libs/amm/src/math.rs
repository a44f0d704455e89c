//! Overflow-checked integer arithmetic for pool calculations
//!
//! Amounts, reserves and LP supply are `u64`. Every product of two of them is
//! formed in `u128`, divided with an explicit [`Rounding`] direction, and
//! narrowed back to `u64` with a range check. Nothing here saturates or
//! wraps: every failure is a [`MathError`].
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Amount paid out to a user | [`Rounding::Down`] |
//! | LP shares minted | [`Rounding::Down`] |
//! | Fee retained by the pool | [`Rounding::Down`] |
//! | Amount pulled from a depositor for a given share | [`Rounding::Up`] |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arithmetic failures; any of these aborts the enclosing pool operation
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Arithmetic underflow in {0}")]
    Underflow(&'static str),

    #[error("Division by zero in {0}")]
    DivisionByZero(&'static str),
}

/// Direction of integer division
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Floor
    Down,
    /// Ceiling
    Up,
}

/// `a * b` in doubled width
#[inline]
pub fn product(a: u64, b: u64) -> u128 {
    a as u128 * b as u128
}

/// `floor` or `ceil` of `a * b / d`, computed in `u128` and narrowed to `u64`
pub fn mul_div(a: u64, b: u64, d: u64, rounding: Rounding) -> Result<u64, MathError> {
    let quotient = div_round(product(a, b), d as u128, rounding, "mul_div")?;
    narrow(quotient, "mul_div")
}

/// Division of `u128` values with explicit rounding
pub fn div_round(
    numerator: u128,
    denominator: u128,
    rounding: Rounding,
    context: &'static str,
) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero(context));
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Ok(quotient),
        Rounding::Up if numerator % denominator != 0 => quotient
            .checked_add(1)
            .ok_or(MathError::Overflow(context)),
        Rounding::Up => Ok(quotient),
    }
}

/// Range-checked `u128 -> u64`
#[inline]
pub fn narrow(value: u128, context: &'static str) -> Result<u64, MathError> {
    u64::try_from(value).map_err(|_| MathError::Overflow(context))
}

#[inline]
pub fn checked_add(a: u64, b: u64, context: &'static str) -> Result<u64, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow(context))
}

#[inline]
pub fn checked_sub(a: u64, b: u64, context: &'static str) -> Result<u64, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow(context))
}

/// Floor of the square root (Babylonian method)
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (n >> 1) + (n & 1);
    while y < x {
        x = y;
        y = (y + n / y) >> 1;
    }
    x
}
