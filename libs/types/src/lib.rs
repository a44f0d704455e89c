//! # Dex Types - Pool Identity and Value Types
//!
//! ## Purpose
//!
//! Shared vocabulary for the constant-product pool engine: 32-byte addresses,
//! deterministic pool identities, canonical mint pairs, the fee schedule and
//! the transient request/receipt values each pool operation consumes and
//! produces.
//!
//! ## Integration Points
//!
//! - **Identity**: [`PoolId::derive`] is the pure `(mint, mint) -> PoolId`
//!   function external collaborators use to locate a pool
//! - **Custody**: [`PoolAccounts`] names the vault/authority/LP-mint holders
//!   the custody layer moves funds between
//! - **Engine**: `dex-amm` and `dex-pool` consume these types directly
//!
//! ## Quick Start
//!
//! ```rust
//! use dex_types::{Address, MintPair, PoolId};
//!
//! let usdc = Address::from_bytes([1u8; 32]);
//! let wsol = Address::from_bytes([2u8; 32]);
//!
//! let pair = MintPair::new(wsol, usdc).unwrap();
//! assert_eq!(pair.mint0(), usdc);
//! assert_eq!(PoolId::for_pair(&pair), PoolId::derive(usdc, wsol).unwrap());
//! ```

pub mod address;
pub mod errors;
pub mod fee;
pub mod pair;
pub mod requests;

pub use address::{Address, PoolAccounts, PoolId};
pub use errors::ValidationError;
pub use fee::FeeSchedule;
pub use pair::{MintPair, SwapDirection};
pub use requests::{
    AddLiquidity, DepositReceipt, RemoveLiquidity, Swap, SwapReceipt, WithdrawalReceipt,
};
