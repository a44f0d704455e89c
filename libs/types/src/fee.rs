//! Swap fee schedule

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable swap fee expressed as `numerator / denominator`
///
/// The fee is retained by the pool: the full input enters the reserves, only
/// the post-fee portion prices the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFeeSchedule")]
pub struct FeeSchedule {
    numerator: u64,
    denominator: u64,
}

/// Wire shape, validated through [`FeeSchedule::new`] on the way in
#[derive(Deserialize)]
struct RawFeeSchedule {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RawFeeSchedule> for FeeSchedule {
    type Error = ValidationError;

    fn try_from(raw: RawFeeSchedule) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl FeeSchedule {
    /// 1 / 10_000 (0.01%)
    pub const DEFAULT: Self = Self {
        numerator: 1,
        denominator: 10_000,
    };

    /// Fee-free schedule
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ValidationError> {
        if denominator == 0 || numerator >= denominator {
            return Err(ValidationError::InvalidFee {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// Fee in basis points, rounded down (display only)
    pub fn as_bps(&self) -> u64 {
        ((self.numerator as u128 * 10_000) / self.denominator as u128) as u64
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FeeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
