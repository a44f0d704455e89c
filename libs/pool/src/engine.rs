//! Pool Engine
//!
//! Entry point for every pool operation. Each mutating call resolves the
//! pool, then inside [`PoolHandle::transact`]:
//!
//! 1. computes the outcome from the current reserves (pure, may reject)
//! 2. checks the caller's guards and balances
//! 3. settles custody effects, rolling back on failure
//! 4. commits the new reserves
//!
//! Nothing is committed unless every step succeeds.

use crate::custody::{CustodyError, LpLedger, TokenVault};
use crate::error::{ErrorClass, PoolError};
use crate::initializer::PoolInitializer;
use crate::registry::{PoolHandle, PoolRegistry};
use crate::settlement::{Effect, Settlement};
use crate::state::PoolInfo;
use dex_amm::{
    AmmError, ConstantProductPool, DepositOutcome, LiquidityMath, SwapMath, SwapQuote,
};
use dex_config::EngineConfig;
use dex_types::{
    AddLiquidity, Address, DepositReceipt, FeeSchedule, MintPair, PoolId, RemoveLiquidity, Swap,
    SwapDirection, SwapReceipt, WithdrawalReceipt,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Engine-wide policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Fee used by `initialize_default`
    pub default_fee: FeeSchedule,
    /// Minimum LP shares a first deposit must mint
    pub min_initial_liquidity: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_fee: FeeSchedule::DEFAULT,
            min_initial_liquidity: 1,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &EngineConfig) -> Result<Self, PoolError> {
        Ok(Self {
            default_fee: FeeSchedule::new(config.fees.numerator, config.fees.denominator)?,
            min_initial_liquidity: config.liquidity.min_initial_liquidity,
        })
    }
}

pub struct PoolEngine {
    registry: PoolRegistry,
    initializer: PoolInitializer,
    settings: EngineSettings,
    vault: Arc<dyn TokenVault>,
    ledger: Arc<dyn LpLedger>,
}

impl PoolEngine {
    pub fn new(
        settings: EngineSettings,
        vault: Arc<dyn TokenVault>,
        ledger: Arc<dyn LpLedger>,
    ) -> Self {
        Self {
            registry: PoolRegistry::new(),
            initializer: PoolInitializer::new(settings.default_fee),
            settings,
            vault,
            ledger,
        }
    }

    pub fn from_config(
        config: &EngineConfig,
        vault: Arc<dyn TokenVault>,
        ledger: Arc<dyn LpLedger>,
    ) -> Result<Self, PoolError> {
        Ok(Self::new(EngineSettings::from_config(config)?, vault, ledger))
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    // ---- pool creation ----

    pub fn initialize_pool(
        &self,
        mint_a: Address,
        mint_b: Address,
        fee_numerator: u64,
        fee_denominator: u64,
    ) -> Result<PoolId, PoolError> {
        let handle = self
            .initializer
            .initialize(&self.registry, mint_a, mint_b, fee_numerator, fee_denominator)
            .map_err(|e| self.rejected("initialize_pool", None, e))?;

        info!(
            pool = %handle.id().short(),
            fee = %format!("{}/{}", fee_numerator, fee_denominator),
            "Pool initialized"
        );
        Ok(handle.id())
    }

    /// Create a pool with the configured default fee
    pub fn initialize_default(&self, mint_a: Address, mint_b: Address) -> Result<PoolId, PoolError> {
        let fee = self.initializer.default_fee();
        self.initialize_pool(mint_a, mint_b, fee.numerator(), fee.denominator())
    }

    // ---- mutations ----

    pub fn add_liquidity(
        &self,
        pool_id: &PoolId,
        depositor: &Address,
        request: AddLiquidity,
    ) -> Result<DepositReceipt, PoolError> {
        self.try_add_liquidity(pool_id, depositor, request)
            .map_err(|e| self.rejected("add_liquidity", Some(pool_id), e))
    }

    fn try_add_liquidity(
        &self,
        pool_id: &PoolId,
        depositor: &Address,
        request: AddLiquidity,
    ) -> Result<DepositReceipt, PoolError> {
        require_nonzero(request.amount0, "amount0")?;
        require_nonzero(request.amount1, "amount1")?;
        let handle = self.handle(pool_id)?;

        handle.transact(|pool| {
            let outcome = LiquidityMath::deposit(
                pool.reserves(),
                request.amount0,
                request.amount1,
                self.settings.min_initial_liquidity,
            )?;
            if outcome.lp_minted < request.min_lp_out {
                return Err(AmmError::SlippageExceeded {
                    what: "lp_minted",
                    actual: outcome.lp_minted,
                    minimum: request.min_lp_out,
                }
                .into());
            }

            let pair = pool.pair();
            let accounts = *pool.accounts();
            self.require_funds(&pair.mint0(), depositor, outcome.amount0)?;
            self.require_funds(&pair.mint1(), depositor, outcome.amount1)?;

            Settlement::new()
                .then(Effect::Pull {
                    mint: pair.mint0(),
                    from: *depositor,
                    vault: accounts.vault0,
                    amount: outcome.amount0,
                })
                .then(Effect::Pull {
                    mint: pair.mint1(),
                    from: *depositor,
                    vault: accounts.vault1,
                    amount: outcome.amount1,
                })
                .then(Effect::MintShares {
                    lp_mint: accounts.lp_mint,
                    owner: *depositor,
                    amount: outcome.lp_minted,
                })
                .execute(self.vault.as_ref(), self.ledger.as_ref())?;

            pool.apply_deposit(&outcome);
            debug!(
                pool = %pool_id.short(),
                depositor = %depositor.short(),
                lp_minted = outcome.lp_minted,
                amount0 = outcome.amount0,
                amount1 = outcome.amount1,
                seq = pool.sequence(),
                "Liquidity added"
            );

            Ok(DepositReceipt {
                pool_id: *pool_id,
                lp_minted: outcome.lp_minted,
                amount0: outcome.amount0,
                amount1: outcome.amount1,
            })
        })
    }

    pub fn remove_liquidity(
        &self,
        pool_id: &PoolId,
        owner: &Address,
        request: RemoveLiquidity,
    ) -> Result<WithdrawalReceipt, PoolError> {
        self.try_remove_liquidity(pool_id, owner, request)
            .map_err(|e| self.rejected("remove_liquidity", Some(pool_id), e))
    }

    fn try_remove_liquidity(
        &self,
        pool_id: &PoolId,
        owner: &Address,
        request: RemoveLiquidity,
    ) -> Result<WithdrawalReceipt, PoolError> {
        require_nonzero(request.lp_amount, "lp_amount")?;
        let handle = self.handle(pool_id)?;

        handle.transact(|pool| {
            let pair = pool.pair();
            let accounts = *pool.accounts();

            let held = self.ledger.balance_of(&accounts.lp_mint, owner);
            if request.lp_amount > held {
                return Err(AmmError::InsufficientShares {
                    requested: request.lp_amount,
                    available: held,
                }
                .into());
            }

            let outcome = LiquidityMath::withdraw(pool.reserves(), request.lp_amount)?;
            check_min_out("amount0_out", outcome.amount0_out, request.min_amount0_out)?;
            check_min_out("amount1_out", outcome.amount1_out, request.min_amount1_out)?;

            Settlement::new()
                .then(Effect::BurnShares {
                    lp_mint: accounts.lp_mint,
                    owner: *owner,
                    amount: outcome.lp_burned,
                })
                .then(Effect::Release {
                    mint: pair.mint0(),
                    vault: accounts.vault0,
                    to: *owner,
                    amount: outcome.amount0_out,
                })
                .then(Effect::Release {
                    mint: pair.mint1(),
                    vault: accounts.vault1,
                    to: *owner,
                    amount: outcome.amount1_out,
                })
                .execute(self.vault.as_ref(), self.ledger.as_ref())?;

            pool.apply_withdrawal(&outcome);
            debug!(
                pool = %pool_id.short(),
                owner = %owner.short(),
                lp_burned = outcome.lp_burned,
                amount0_out = outcome.amount0_out,
                amount1_out = outcome.amount1_out,
                seq = pool.sequence(),
                "Liquidity removed"
            );

            Ok(WithdrawalReceipt {
                pool_id: *pool_id,
                lp_burned: outcome.lp_burned,
                amount0_out: outcome.amount0_out,
                amount1_out: outcome.amount1_out,
            })
        })
    }

    pub fn swap(
        &self,
        pool_id: &PoolId,
        trader: &Address,
        request: Swap,
    ) -> Result<SwapReceipt, PoolError> {
        self.try_swap(pool_id, trader, request)
            .map_err(|e| self.rejected("swap", Some(pool_id), e))
    }

    fn try_swap(
        &self,
        pool_id: &PoolId,
        trader: &Address,
        request: Swap,
    ) -> Result<SwapReceipt, PoolError> {
        require_nonzero(request.amount_in, "amount_in")?;
        let handle = self.handle(pool_id)?;

        handle.transact(|pool| {
            let outcome = SwapMath::swap_exact_in(
                pool.reserves(),
                pool.fee(),
                request.amount_in,
                request.min_amount_out,
                request.direction,
            )?;

            let (mint_in, vault_in, mint_out, vault_out) = pool.swap_route(request.direction);
            self.require_funds(&mint_in, trader, outcome.amount_in)?;

            Settlement::new()
                .then(Effect::Pull {
                    mint: mint_in,
                    from: *trader,
                    vault: vault_in,
                    amount: outcome.amount_in,
                })
                .then(Effect::Release {
                    mint: mint_out,
                    vault: vault_out,
                    to: *trader,
                    amount: outcome.amount_out,
                })
                .execute(self.vault.as_ref(), self.ledger.as_ref())?;

            pool.apply_swap(&outcome, request.direction);
            debug!(
                pool = %pool_id.short(),
                trader = %trader.short(),
                direction = %request.direction,
                amount_in = outcome.amount_in,
                amount_out = outcome.amount_out,
                fee = outcome.fee,
                seq = pool.sequence(),
                "Swap executed"
            );

            Ok(SwapReceipt {
                pool_id: *pool_id,
                direction: request.direction,
                amount_in: outcome.amount_in,
                amount_out: outcome.amount_out,
                fee: outcome.fee,
            })
        })
    }

    // ---- queries ----

    pub fn pool_info(&self, pool_id: &PoolId) -> Result<PoolInfo, PoolError> {
        Ok(self.handle(pool_id)?.info())
    }

    pub fn pools(&self) -> Vec<PoolInfo> {
        self.registry.list()
    }

    /// Resolve the pool for two mints given in either order
    pub fn find_pool(&self, mint_a: Address, mint_b: Address) -> Result<PoolId, PoolError> {
        let pool_id = PoolId::for_pair(&MintPair::new(mint_a, mint_b)?);
        if self.registry.contains(&pool_id) {
            Ok(pool_id)
        } else {
            Err(PoolError::PoolNotFound(pool_id))
        }
    }

    pub fn pools_for_mint(&self, mint: &Address) -> Vec<PoolId> {
        self.registry.pools_for_mint(mint)
    }

    pub fn lp_balance(&self, pool_id: &PoolId, owner: &Address) -> Result<u64, PoolError> {
        let lp_mint = self.handle(pool_id)?.snapshot().accounts().lp_mint;
        Ok(self.ledger.balance_of(&lp_mint, owner))
    }

    /// Preview a swap without moving funds
    pub fn quote_swap(
        &self,
        pool_id: &PoolId,
        amount_in: u64,
        direction: SwapDirection,
    ) -> Result<SwapQuote, PoolError> {
        let pool = self.handle(pool_id)?.snapshot();
        Ok(pool.quote_swap(amount_in, direction)?)
    }

    /// Preview the shares and effective amounts of a deposit
    pub fn quote_add_liquidity(
        &self,
        pool_id: &PoolId,
        amount0: u64,
        amount1: u64,
    ) -> Result<DepositOutcome, PoolError> {
        let pool = self.handle(pool_id)?.snapshot();
        Ok(pool.quote_deposit(amount0, amount1, self.settings.min_initial_liquidity)?)
    }

    // ---- helpers ----

    fn handle(&self, pool_id: &PoolId) -> Result<PoolHandle, PoolError> {
        self.registry
            .get(pool_id)
            .ok_or(PoolError::PoolNotFound(*pool_id))
    }

    fn require_funds(&self, mint: &Address, holder: &Address, amount: u64) -> Result<(), PoolError> {
        let available = self.vault.balance(mint, holder);
        if available < amount {
            return Err(CustodyError::InsufficientFunds {
                mint: *mint,
                holder: *holder,
                requested: amount,
                available,
            }
            .into());
        }
        Ok(())
    }

    fn rejected(&self, op: &'static str, pool_id: Option<&PoolId>, err: PoolError) -> PoolError {
        let pool = pool_id.map(PoolId::short).unwrap_or_default();
        match err.class() {
            ErrorClass::Invariant => error!(op, %pool, error = %err, "Invariant violated, operation aborted"),
            ErrorClass::Precondition => debug!(op, %pool, error = %err, "Request rejected"),
            ErrorClass::Arithmetic | ErrorClass::Policy => {
                warn!(op, %pool, error = %err, "Operation rejected")
            }
        }
        err
    }
}

fn require_nonzero(amount: u64, what: &'static str) -> Result<(), PoolError> {
    if amount == 0 {
        return Err(AmmError::ZeroAmount { what }.into());
    }
    Ok(())
}

fn check_min_out(what: &'static str, actual: u64, minimum: u64) -> Result<(), PoolError> {
    if actual < minimum {
        return Err(AmmError::SlippageExceeded {
            what,
            actual,
            minimum,
        }
        .into());
    }
    Ok(())
}
