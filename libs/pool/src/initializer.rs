//! Pool creation

use crate::error::PoolError;
use crate::registry::{PoolHandle, PoolRegistry};
use crate::state::PoolState;
use dex_types::{Address, FeeSchedule, MintPair};

/// Validates creation parameters and registers empty pools
#[derive(Debug, Clone, Copy)]
pub struct PoolInitializer {
    default_fee: FeeSchedule,
}

impl PoolInitializer {
    pub fn new(default_fee: FeeSchedule) -> Self {
        Self { default_fee }
    }

    pub fn default_fee(&self) -> FeeSchedule {
        self.default_fee
    }

    /// Create and register an empty pool for `(mint_a, mint_b)` in either order
    ///
    /// Checks the fee, then the mints, then uniqueness.
    pub fn initialize(
        &self,
        registry: &PoolRegistry,
        mint_a: Address,
        mint_b: Address,
        fee_numerator: u64,
        fee_denominator: u64,
    ) -> Result<PoolHandle, PoolError> {
        let fee = FeeSchedule::new(fee_numerator, fee_denominator)?;
        let pair = MintPair::new(mint_a, mint_b)?;
        registry.register(PoolState::new(pair, fee))
    }

    pub fn initialize_default(
        &self,
        registry: &PoolRegistry,
        mint_a: Address,
        mint_b: Address,
    ) -> Result<PoolHandle, PoolError> {
        self.initialize(
            registry,
            mint_a,
            mint_b,
            self.default_fee.numerator(),
            self.default_fee.denominator(),
        )
    }
}

impl Default for PoolInitializer {
    fn default() -> Self {
        Self::new(FeeSchedule::DEFAULT)
    }
}
