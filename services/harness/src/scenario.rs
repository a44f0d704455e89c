//! Two-provider walkthrough
//!
//! Initializes one pool, has two providers deposit, one withdraw, and a
//! trader swap, logging balances after every step.

use anyhow::{Context, Result};
use dex_pool::{BalanceBook, PoolEngine, PoolInfo};
use dex_types::{AddLiquidity, Address, PoolId, RemoveLiquidity, Swap, SwapDirection};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Wallet and asset identities used by the walkthrough
#[derive(Debug, Clone, Copy)]
pub struct Actors {
    pub mint0: Address,
    pub mint1: Address,
    pub provider_a: Address,
    pub provider_b: Address,
}

impl Actors {
    pub fn derive() -> Self {
        let x = Address::derive(b"mint", &[b"asset-x".as_slice()]);
        let y = Address::derive(b"mint", &[b"asset-y".as_slice()]);
        // keep the pool's canonical order so asset0 really is mint0
        let (mint0, mint1) = if x < y { (x, y) } else { (y, x) };
        Self {
            mint0,
            mint1,
            provider_a: Address::derive(b"wallet", &[b"provider-a".as_slice()]),
            provider_b: Address::derive(b"wallet", &[b"provider-b".as_slice()]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletBalances {
    pub asset0: u64,
    pub asset1: u64,
    pub lp: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub pool: PoolInfo,
    pub provider_a: WalletBalances,
    pub provider_b: WalletBalances,
    pub swap_amount_out: u64,
    pub swap_fee: u64,
}

pub struct Scenario {
    engine: PoolEngine,
    book: Arc<BalanceBook>,
    actors: Actors,
    /// One whole token in base units
    unit: u64,
}

impl Scenario {
    pub fn new(engine: PoolEngine, book: Arc<BalanceBook>, decimals: u32) -> Result<Self> {
        let unit = 10u64
            .checked_pow(decimals)
            .with_context(|| format!("{} decimals does not fit in u64 amounts", decimals))?;
        Ok(Self {
            engine,
            book,
            actors: Actors::derive(),
            unit,
        })
    }

    fn units(&self, n: u64) -> Result<u64> {
        n.checked_mul(self.unit)
            .with_context(|| format!("{} tokens overflow u64 base units", n))
    }

    pub fn run(&self) -> Result<ScenarioReport> {
        let a = self.actors;

        for wallet in [a.provider_a, a.provider_b] {
            self.book.credit(&a.mint0, &wallet, self.units(100)?)?;
            self.book.credit(&a.mint1, &wallet, self.units(100)?)?;
        }

        let pool = self.engine.initialize_default(a.mint0, a.mint1)?;
        let info = self.engine.pool_info(&pool)?;
        info!(
            "Pool {} created: mint0={} mint1={} fee={}/{}",
            pool.short(),
            info.mint0.short(),
            info.mint1.short(),
            info.fee_numerator,
            info.fee_denominator
        );
        self.log_balances(&pool, "initialized")?;

        let deposit = AddLiquidity::new(self.units(50)?, self.units(50)?);
        let receipt = self.engine.add_liquidity(&pool, &a.provider_a, deposit)?;
        info!("Provider A minted {} LP", receipt.lp_minted);
        self.log_balances(&pool, "provider A deposit")?;

        let receipt = self.engine.add_liquidity(&pool, &a.provider_b, deposit)?;
        info!("Provider B minted {} LP", receipt.lp_minted);
        self.log_balances(&pool, "provider B deposit")?;

        let receipt = self.engine.remove_liquidity(
            &pool,
            &a.provider_a,
            RemoveLiquidity::new(self.units(25)?),
        )?;
        info!(
            "Provider A burned {} LP for {} / {}",
            receipt.lp_burned, receipt.amount0_out, receipt.amount1_out
        );
        self.log_balances(&pool, "provider A withdrawal")?;

        let amount_in = self.units(10)?;
        let quote = self
            .engine
            .quote_swap(&pool, amount_in, SwapDirection::ZeroForOne)?;
        info!(
            "Quote: {} in -> {} out, impact {}%",
            amount_in, quote.amount_out, quote.price_impact_pct
        );
        let swap = self.engine.swap(
            &pool,
            &a.provider_b,
            Swap::new(amount_in, quote.amount_out, SwapDirection::ZeroForOne),
        )?;
        info!(
            "Provider B swapped {} asset0 for {} asset1 (fee {})",
            swap.amount_in, swap.amount_out, swap.fee
        );
        self.log_balances(&pool, "swap")?;

        Ok(ScenarioReport {
            pool: self.engine.pool_info(&pool)?,
            provider_a: self.wallet(&pool, &a.provider_a)?,
            provider_b: self.wallet(&pool, &a.provider_b)?,
            swap_amount_out: swap.amount_out,
            swap_fee: swap.fee,
        })
    }

    fn wallet(&self, pool: &PoolId, owner: &Address) -> Result<WalletBalances> {
        Ok(WalletBalances {
            asset0: self.book.get(&self.actors.mint0, owner),
            asset1: self.book.get(&self.actors.mint1, owner),
            lp: self.engine.lp_balance(pool, owner)?,
        })
    }

    fn log_balances(&self, pool: &PoolId, step: &str) -> Result<()> {
        let info = self.engine.pool_info(pool)?;
        let a = self.wallet(pool, &self.actors.provider_a)?;
        let b = self.wallet(pool, &self.actors.provider_b)?;
        info!(
            step,
            reserve0 = info.reserve0,
            reserve1 = info.reserve1,
            lp_supply = info.total_lp_supply,
            "Pool state"
        );
        info!(step, asset0 = a.asset0, asset1 = a.asset1, lp = a.lp, "Provider A");
        info!(step, asset0 = b.asset0, asset1 = b.asset1, lp = b.lp, "Provider B");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_pool::EngineSettings;

    const ONE: u64 = 1_000_000_000;

    fn scenario(decimals: u32) -> Result<Scenario> {
        let book = Arc::new(BalanceBook::new());
        let engine = PoolEngine::new(EngineSettings::default(), book.clone(), book.clone());
        Scenario::new(engine, book, decimals)
    }

    #[test]
    fn test_walkthrough_balances() {
        let report = scenario(9).unwrap().run().unwrap();

        assert_eq!(report.swap_fee, 1_000_000);
        assert_eq!(report.swap_amount_out, 8_822_750_855);
        assert_eq!(report.pool.reserve0, 85 * ONE);
        assert_eq!(report.pool.reserve1, 75 * ONE - 8_822_750_855);
        assert_eq!(report.pool.total_lp_supply, 75 * ONE);

        assert_eq!(
            report.provider_a,
            WalletBalances {
                asset0: 75 * ONE,
                asset1: 75 * ONE,
                lp: 25 * ONE
            }
        );
        assert_eq!(report.provider_b.asset0, 40 * ONE);
        assert_eq!(report.provider_b.asset1, 50 * ONE + 8_822_750_855);
        assert_eq!(report.provider_b.lp, 50 * ONE);
    }

    #[test]
    fn test_decimals_overflow_rejected() {
        assert!(scenario(20).is_err());
        // 10^19 fits but 100 tokens of it do not
        assert!(scenario(19).unwrap().run().is_err());
    }
}
