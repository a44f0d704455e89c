//! Canonical mint pairs and swap direction

use crate::address::Address;
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An unordered pair of distinct mints stored in canonical order
///
/// `mint0 < mint1` always holds, so `(A, B)` and `(B, A)` build the same
/// value and therefore resolve to the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMintPair")]
pub struct MintPair {
    mint0: Address,
    mint1: Address,
}

/// Wire shape; deserialized pairs are re-canonicalized through [`MintPair::new`]
#[derive(Deserialize)]
struct RawMintPair {
    mint0: Address,
    mint1: Address,
}

impl TryFrom<RawMintPair> for MintPair {
    type Error = ValidationError;

    fn try_from(raw: RawMintPair) -> Result<Self, Self::Error> {
        Self::new(raw.mint0, raw.mint1)
    }
}

impl MintPair {
    pub fn new(mint_a: Address, mint_b: Address) -> Result<Self, ValidationError> {
        if mint_a == mint_b {
            return Err(ValidationError::IdenticalMints {
                mint: mint_a.to_string(),
            });
        }
        let (mint0, mint1) = if mint_a < mint_b {
            (mint_a, mint_b)
        } else {
            (mint_b, mint_a)
        };
        Ok(Self { mint0, mint1 })
    }

    pub fn mint0(&self) -> Address {
        self.mint0
    }

    pub fn mint1(&self) -> Address {
        self.mint1
    }

    pub fn contains(&self, mint: &Address) -> bool {
        self.mint0 == *mint || self.mint1 == *mint
    }

    /// Direction of a swap that sells `mint_in`, if it belongs to the pair
    pub fn direction_for_input(&self, mint_in: &Address) -> Option<SwapDirection> {
        if *mint_in == self.mint0 {
            Some(SwapDirection::ZeroForOne)
        } else if *mint_in == self.mint1 {
            Some(SwapDirection::OneForZero)
        } else {
            None
        }
    }
}

impl fmt::Display for MintPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…/{}…", self.mint0.short(), self.mint1.short())
    }
}

/// Which reserve a swap sells into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell asset0, receive asset1
    ZeroForOne,
    /// Sell asset1, receive asset0
    OneForZero,
}

impl SwapDirection {
    pub fn reverse(self) -> Self {
        match self {
            Self::ZeroForOne => Self::OneForZero,
            Self::OneForZero => Self::ZeroForOne,
        }
    }

    /// `(mint_in, mint_out)` for this direction
    pub fn mints(self, pair: &MintPair) -> (Address, Address) {
        match self {
            Self::ZeroForOne => (pair.mint0(), pair.mint1()),
            Self::OneForZero => (pair.mint1(), pair.mint0()),
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroForOne => write!(f, "0->1"),
            Self::OneForZero => write!(f, "1->0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::PoolId;
    use proptest::prelude::*;

    #[test]
    fn test_pair_is_canonical() {
        let low = Address::from_bytes([1; 32]);
        let high = Address::from_bytes([9; 32]);

        let pair = MintPair::new(high, low).unwrap();
        assert_eq!(pair.mint0(), low);
        assert_eq!(pair.mint1(), high);
        assert_eq!(pair, MintPair::new(low, high).unwrap());
    }

    #[test]
    fn test_direction_for_input() {
        let low = Address::from_bytes([1; 32]);
        let high = Address::from_bytes([9; 32]);
        let pair = MintPair::new(low, high).unwrap();

        assert_eq!(pair.direction_for_input(&low), Some(SwapDirection::ZeroForOne));
        assert_eq!(pair.direction_for_input(&high), Some(SwapDirection::OneForZero));
        assert_eq!(pair.direction_for_input(&Address::ZERO), None);
        assert_eq!(SwapDirection::ZeroForOne.mints(&pair), (low, high));
        assert_eq!(SwapDirection::ZeroForOne.reverse(), SwapDirection::OneForZero);
    }

    #[test]
    fn test_direction_serializes_by_name() {
        let json = serde_json::to_string(&SwapDirection::OneForZero).unwrap();
        assert_eq!(json, "\"OneForZero\"");
    }

    #[test]
    fn test_deserialized_pair_is_canonical() {
        let low = Address::from_bytes([1; 32]);
        let high = Address::from_bytes([9; 32]);
        let reversed = serde_json::json!({ "mint0": high, "mint1": low });

        let pair: MintPair = serde_json::from_value(reversed).unwrap();
        assert_eq!(pair.mint0(), low);
        assert_eq!(PoolId::for_pair(&pair), PoolId::derive(high, low).unwrap());

        let same = serde_json::json!({ "mint0": low, "mint1": low });
        assert!(serde_json::from_value::<MintPair>(same).is_err());
    }

    proptest! {
        #[test]
        fn prop_pair_order_insensitive(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let (a, b) = (Address::from_bytes(a), Address::from_bytes(b));
            match (MintPair::new(a, b), MintPair::new(b, a)) {
                (Ok(ab), Ok(ba)) => {
                    prop_assert_eq!(ab, ba);
                    prop_assert!(ab.mint0() < ab.mint1());
                    prop_assert_eq!(PoolId::for_pair(&ab), PoolId::for_pair(&ba));
                }
                (Err(_), Err(_)) => prop_assert_eq!(a, b),
                _ => prop_assert!(false, "asymmetric result"),
            }
        }
    }
}
