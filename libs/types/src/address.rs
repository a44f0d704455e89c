//! 32-byte addresses and deterministic pool identities
//!
//! Every participant the engine talks about (mints, depositors, pool vaults,
//! LP mints) is a 32-byte [`Address`]. Pool-owned addresses are never chosen
//! by a caller: they are derived from the canonical mint pair with keccak-256,
//! so any external collaborator can recompute them from the pair alone.
//!
//! ```text
//! PoolId       = keccak256("pool_state" ‖ mint0 ‖ mint1)
//! authority    = keccak256("authority"  ‖ PoolId)
//! vault0       = keccak256("vault0"     ‖ PoolId)
//! vault1       = keccak256("vault1"     ‖ PoolId)
//! lp_mint      = keccak256("pool_mint"  ‖ PoolId)
//! ```

use crate::errors::ValidationError;
use crate::pair::MintPair;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

const POOL_STATE_SEED: &[u8] = b"pool_state";
const AUTHORITY_SEED: &[u8] = b"authority";
const VAULT0_SEED: &[u8] = b"vault0";
const VAULT1_SEED: &[u8] = b"vault1";
const POOL_MINT_SEED: &[u8] = b"pool_mint";

/// Opaque 32-byte identifier for mints, holders and pool-owned accounts
///
/// Ordering is byte-lexicographic; this is the total order used to
/// canonicalize mint pairs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character hex string, with or without `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed).map_err(|e| ValidationError::InvalidAddress {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let array: [u8; 32] =
            bytes
                .try_into()
                .map_err(|v: Vec<u8>| ValidationError::InvalidAddress {
                    input: s.to_string(),
                    reason: format!("expected 32 bytes, got {}", v.len()),
                })?;
        Ok(Self(array))
    }

    /// Keccak-256 of a seed followed by the given parts
    pub fn derive(seed: &[u8], parts: &[&[u8]]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(seed);
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Short hex prefix for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}…)", self.short())
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Deterministic identity of a pool, derived from its canonical mint pair
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(Address);

impl PoolId {
    /// Derive the pool identity for a pair of mints in either order
    ///
    /// Fails only when both mints are the same.
    pub fn derive(mint_a: Address, mint_b: Address) -> Result<Self, ValidationError> {
        Ok(Self::for_pair(&MintPair::new(mint_a, mint_b)?))
    }

    /// Derive the pool identity for an already-canonical pair
    pub fn for_pair(pair: &MintPair) -> Self {
        Self(Address::derive(
            POOL_STATE_SEED,
            &[pair.mint0().as_bytes(), pair.mint1().as_bytes()],
        ))
    }

    pub fn address(&self) -> Address {
        self.0
    }

    pub fn short(&self) -> String {
        self.0.short()
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolId({}…)", self.0.short())
    }
}

/// Pool-owned accounts derived from the pool identity
///
/// `authority` is the holder the custody layer moves funds on behalf of;
/// `vault0`/`vault1` hold the reserves; `lp_mint` is the LP-share asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolAccounts {
    pub authority: Address,
    pub vault0: Address,
    pub vault1: Address,
    pub lp_mint: Address,
}

impl PoolAccounts {
    pub fn derive(pool_id: &PoolId) -> Self {
        let key = pool_id.address();
        Self {
            authority: Address::derive(AUTHORITY_SEED, &[key.as_bytes()]),
            vault0: Address::derive(VAULT0_SEED, &[key.as_bytes()]),
            vault1: Address::derive(VAULT1_SEED, &[key.as_bytes()]),
            lp_mint: Address::derive(POOL_MINT_SEED, &[key.as_bytes()]),
        }
    }
}
