//! Reserve and LP-supply snapshot that every pool calculation transforms

use dex_types::SwapDirection;
use serde::{Deserialize, Serialize};

/// The numeric part of a pool: both reserves plus outstanding LP supply
///
/// Calculations take a `Reserves` by value and hand back the next one; the
/// caller decides whether to commit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: u64,
    pub reserve1: u64,
    pub lp_supply: u64,
}

impl Reserves {
    pub const EMPTY: Self = Self {
        reserve0: 0,
        reserve1: 0,
        lp_supply: 0,
    };

    pub fn new(reserve0: u64, reserve1: u64, lp_supply: u64) -> Self {
        Self {
            reserve0,
            reserve1,
            lp_supply,
        }
    }

    /// No shares outstanding
    pub fn is_empty(&self) -> bool {
        self.lp_supply == 0
    }

    /// Both reserves funded, so a price exists
    pub fn is_tradable(&self) -> bool {
        self.reserve0 > 0 && self.reserve1 > 0
    }

    /// Constant-product `k = reserve0 * reserve1`
    pub fn k(&self) -> u128 {
        crate::math::product(self.reserve0, self.reserve1)
    }

    /// `(reserve_in, reserve_out)` for a swap direction
    pub fn oriented(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::ZeroForOne => (self.reserve0, self.reserve1),
            SwapDirection::OneForZero => (self.reserve1, self.reserve0),
        }
    }

    /// Rebuild from oriented `(reserve_in, reserve_out)`
    pub fn from_oriented(
        direction: SwapDirection,
        reserve_in: u64,
        reserve_out: u64,
        lp_supply: u64,
    ) -> Self {
        match direction {
            SwapDirection::ZeroForOne => Self::new(reserve_in, reserve_out, lp_supply),
            SwapDirection::OneForZero => Self::new(reserve_out, reserve_in, lp_supply),
        }
    }

    /// Empty pool iff no shares, and a non-empty pool holds both assets
    pub fn is_consistent(&self) -> bool {
        if self.lp_supply == 0 {
            self.reserve0 == 0 && self.reserve1 == 0
        } else {
            self.is_tradable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_roundtrip() {
        let r = Reserves::new(10, 20, 5);
        for dir in [SwapDirection::ZeroForOne, SwapDirection::OneForZero] {
            let (rin, rout) = r.oriented(dir);
            assert_eq!(Reserves::from_oriented(dir, rin, rout, 5), r);
        }
        assert_eq!(r.oriented(SwapDirection::OneForZero), (20, 10));
    }

    #[test]
    fn test_consistency() {
        assert!(Reserves::EMPTY.is_consistent());
        assert!(Reserves::new(1, 1, 1).is_consistent());
        assert!(!Reserves::new(1, 0, 1).is_consistent());
        assert!(!Reserves::new(1, 1, 0).is_consistent());
        assert_eq!(Reserves::new(u64::MAX, u64::MAX, 1).k(), (u64::MAX as u128).pow(2));
    }
}
