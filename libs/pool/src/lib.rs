//! # Dex Pool - Transactional Constant-Product Pools
//!
//! ## Purpose
//!
//! Owns every pool's authoritative state and is the only place it changes.
//! [`PoolEngine`] validates requests, computes outcomes with `dex-amm`,
//! settles token and LP-share movements through the [`TokenVault`] and
//! [`LpLedger`] seams, and commits the new reserves, all under the pool's
//! own lock.
//!
//! ## Integration Points
//!
//! - **Identity**: pools are keyed by `PoolId`, derived from the canonical
//!   mint pair, so any collaborator can compute it without a lookup
//! - **Custody**: [`BalanceBook`] for in-process use, or any implementation
//!   of the custody traits
//! - **Configuration**: [`EngineSettings::from_config`] reads `dex-config`
//! - **Concurrency**: pools live in a sharded map; one mutex per pool
//!
//! ## Quick Start
//!
//! ```rust
//! use dex_pool::{BalanceBook, EngineSettings, PoolEngine};
//! use dex_types::{AddLiquidity, Address, Swap, SwapDirection};
//! use std::sync::Arc;
//!
//! let book = Arc::new(BalanceBook::new());
//! let engine = PoolEngine::new(EngineSettings::default(), book.clone(), book.clone());
//!
//! let (usdc, weth, alice) = (
//!     Address::from_bytes([1; 32]),
//!     Address::from_bytes([2; 32]),
//!     Address::from_bytes([3; 32]),
//! );
//! book.credit(&usdc, &alice, 1_000)?;
//! book.credit(&weth, &alice, 1_000)?;
//!
//! let pool = engine.initialize_default(usdc, weth)?;
//! let deposit = engine.add_liquidity(&pool, &alice, AddLiquidity::new(500, 500))?;
//! assert_eq!(deposit.lp_minted, 500);
//!
//! let swap = engine.swap(&pool, &alice, Swap::new(100, 1, SwapDirection::ZeroForOne))?;
//! assert_eq!(swap.amount_out, 83);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod custody;
pub mod engine;
pub mod error;
pub mod initializer;
pub mod ledger;
pub mod registry;
mod settlement;
pub mod state;
pub mod testing;

pub use custody::{CustodyError, LpLedger, TokenVault};
pub use engine::{EngineSettings, PoolEngine};
pub use error::{ErrorClass, PoolError};
pub use initializer::PoolInitializer;
pub use ledger::BalanceBook;
pub use registry::{PoolHandle, PoolRegistry};
pub use state::{PoolInfo, PoolState, PoolStats};
