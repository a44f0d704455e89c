//! End-to-end pool lifecycle against the in-memory balance book
//!
//! Two 9-decimal assets, two liquidity providers, one trader.

use dex_amm::{AmmError, Reserves};
use dex_pool::testing::{CallKind, FakeCustody};
use dex_pool::{BalanceBook, EngineSettings, ErrorClass, PoolEngine, PoolError, TokenVault};
use dex_types::{
    AddLiquidity, Address, FeeSchedule, PoolId, RemoveLiquidity, Swap, SwapDirection,
};
use std::sync::Arc;

const ONE: u64 = 1_000_000_000;

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 32])
}

struct Fixture {
    engine: PoolEngine,
    book: Arc<BalanceBook>,
    pool: PoolId,
    mint0: Address,
    mint1: Address,
    alice: Address,
    bob: Address,
}

fn fixture(fee: FeeSchedule) -> Fixture {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let book = Arc::new(BalanceBook::new());
    let engine = PoolEngine::new(EngineSettings::default(), book.clone(), book.clone());
    let (mint0, mint1, alice, bob) = (addr(1), addr(2), addr(10), addr(11));
    for user in [alice, bob] {
        book.credit(&mint0, &user, 100 * ONE).unwrap();
        book.credit(&mint1, &user, 100 * ONE).unwrap();
    }
    let pool = engine
        .initialize_pool(mint0, mint1, fee.numerator(), fee.denominator())
        .unwrap();

    Fixture {
        engine,
        book,
        pool,
        mint0,
        mint1,
        alice,
        bob,
    }
}

/// Both providers deposit 50/50, then alice withdraws a quarter of supply
fn seeded(fee: FeeSchedule) -> Fixture {
    let f = fixture(fee);
    f.engine
        .add_liquidity(&f.pool, &f.alice, AddLiquidity::new(50 * ONE, 50 * ONE))
        .unwrap();
    f.engine
        .add_liquidity(&f.pool, &f.bob, AddLiquidity::new(50 * ONE, 50 * ONE))
        .unwrap();
    f.engine
        .remove_liquidity(&f.pool, &f.alice, RemoveLiquidity::new(25 * ONE))
        .unwrap();
    f
}

#[test]
fn test_two_providers_deposit() {
    let f = fixture(FeeSchedule::DEFAULT);

    let a = f
        .engine
        .add_liquidity(&f.pool, &f.alice, AddLiquidity::new(50 * ONE, 50 * ONE))
        .unwrap();
    assert_eq!(a.lp_minted, 50 * ONE);

    let b = f
        .engine
        .add_liquidity(&f.pool, &f.bob, AddLiquidity::new(50 * ONE, 50 * ONE))
        .unwrap();
    assert_eq!(b.lp_minted, 50 * ONE);

    let info = f.engine.pool_info(&f.pool).unwrap();
    assert_eq!(info.reserves(), Reserves::new(100 * ONE, 100 * ONE, 100 * ONE));
    assert_eq!(f.book.total_supply(&info.accounts.lp_mint), 100 * ONE);
    assert_eq!(f.book.get(&f.mint0, &info.accounts.vault0), 100 * ONE);
    assert_eq!(f.book.get(&f.mint1, &info.accounts.vault1), 100 * ONE);
}

#[test]
fn test_partial_withdrawal() {
    let f = seeded(FeeSchedule::DEFAULT);
    let info = f.engine.pool_info(&f.pool).unwrap();

    assert_eq!(info.reserves(), Reserves::new(75 * ONE, 75 * ONE, 75 * ONE));
    assert_eq!(f.engine.lp_balance(&f.pool, &f.alice).unwrap(), 25 * ONE);
    assert_eq!(f.engine.lp_balance(&f.pool, &f.bob).unwrap(), 50 * ONE);
    // 100 - 50 deposited + 25 withdrawn
    assert_eq!(f.book.get(&f.mint0, &f.alice), 75 * ONE);
    assert_eq!(f.book.get(&f.mint1, &f.alice), 75 * ONE);
    assert_eq!(f.book.total_supply(&info.accounts.lp_mint), 75 * ONE);
}

#[test]
fn test_swap_without_fee() {
    let f = seeded(FeeSchedule::ZERO);

    let receipt = f
        .engine
        .swap(&f.pool, &f.bob, Swap::new(10 * ONE, 0, SwapDirection::ZeroForOne))
        .unwrap();

    assert_eq!(receipt.fee, 0);
    assert_eq!(receipt.amount_out, 8_823_529_411); // floor(75e9 * 10e9 / 85e9)

    let info = f.engine.pool_info(&f.pool).unwrap();
    assert_eq!(info.reserve0, 85 * ONE);
    assert_eq!(info.reserve1, 75 * ONE - 8_823_529_411);
    assert_eq!(f.book.get(&f.mint1, &f.bob), 50 * ONE + 8_823_529_411);
}

#[test]
fn test_swap_with_fee() {
    let f = seeded(FeeSchedule::DEFAULT);
    let k_before = f.engine.pool_info(&f.pool).unwrap().reserves().k();

    let receipt = f
        .engine
        .swap(&f.pool, &f.bob, Swap::new(10 * ONE, 0, SwapDirection::ZeroForOne))
        .unwrap();

    assert_eq!(receipt.fee, 1_000_000);
    assert_eq!(receipt.amount_out, 8_822_750_855);

    let info = f.engine.pool_info(&f.pool).unwrap();
    // full input, fee included, stays in the pool
    assert_eq!(info.reserve0, 85 * ONE);
    assert!(info.reserves().k() > k_before);
    assert_eq!(info.stats.fees0, 1_000_000);
    assert_eq!(info.stats.swaps, 1);
}

#[test]
fn test_quote_matches_execution() {
    let f = seeded(FeeSchedule::DEFAULT);

    let quote = f
        .engine
        .quote_swap(&f.pool, 3 * ONE, SwapDirection::OneForZero)
        .unwrap();
    let receipt = f
        .engine
        .swap(&f.pool, &f.alice, Swap::new(3 * ONE, quote.amount_out, SwapDirection::OneForZero))
        .unwrap();

    assert_eq!(receipt.amount_out, quote.amount_out);
    assert_eq!(receipt.fee, quote.fee);
}

#[test]
fn test_queries_are_idempotent() {
    let f = seeded(FeeSchedule::DEFAULT);

    let first = f.engine.pool_info(&f.pool).unwrap();
    let _ = f.engine.quote_swap(&f.pool, ONE, SwapDirection::ZeroForOne).unwrap();
    let _ = f.engine.quote_add_liquidity(&f.pool, ONE, ONE).unwrap();
    let second = f.engine.pool_info(&f.pool).unwrap();

    assert_eq!(first, second);
    assert_eq!(f.engine.pools(), vec![second]);
}

#[test]
fn test_unbalanced_deposit_pulls_only_effective_amounts() {
    let f = seeded(FeeSchedule::DEFAULT);

    // pool is 75/75; offering 30/10 can only use 10/10
    let quote = f.engine.quote_add_liquidity(&f.pool, 30 * ONE, 10 * ONE).unwrap();
    let receipt = f
        .engine
        .add_liquidity(&f.pool, &f.bob, AddLiquidity::new(30 * ONE, 10 * ONE))
        .unwrap();

    assert_eq!(receipt.lp_minted, 10 * ONE);
    assert_eq!((receipt.amount0, receipt.amount1), (10 * ONE, 10 * ONE));
    assert_eq!(receipt.lp_minted, quote.lp_minted);
    assert_eq!(f.book.get(&f.mint0, &f.bob), 40 * ONE);
}

#[test]
fn test_dust_deposit_moves_nothing() {
    let f = seeded(FeeSchedule::DEFAULT);
    let before = f.engine.pool_info(&f.pool).unwrap();

    // once reserve0 exceeds supply, one unit of asset0 is worth less than a share
    f.engine
        .swap(&f.pool, &f.bob, Swap::new(20 * ONE, 0, SwapDirection::ZeroForOne))
        .unwrap();
    let grown = f.engine.pool_info(&f.pool).unwrap();
    assert!(grown.reserve0 > grown.total_lp_supply);

    let err = f
        .engine
        .add_liquidity(&f.pool, &f.alice, AddLiquidity::new(1, 1_000))
        .unwrap_err();
    assert!(matches!(err, PoolError::Amm(AmmError::ZeroLiquidityMinted)));
    assert_eq!(err.class(), ErrorClass::Policy);
    assert_eq!(f.engine.pool_info(&f.pool).unwrap(), grown);
    assert_eq!(f.book.get(&f.mint0, &f.alice), 75 * ONE);
    assert_eq!(before.total_lp_supply, grown.total_lp_supply);
}

#[test]
fn test_slippage_guards() {
    let f = seeded(FeeSchedule::DEFAULT);
    let before = f.engine.pool_info(&f.pool).unwrap();

    let err = f
        .engine
        .swap(&f.pool, &f.bob, Swap::new(10 * ONE, 9 * ONE, SwapDirection::ZeroForOne))
        .unwrap_err();
    assert!(matches!(
        err,
        PoolError::Amm(AmmError::SlippageExceeded { what: "amount_out", .. })
    ));

    let err = f
        .engine
        .add_liquidity(
            &f.pool,
            &f.bob,
            AddLiquidity::new(ONE, ONE).with_min_lp_out(ONE + 1),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PoolError::Amm(AmmError::SlippageExceeded { what: "lp_minted", .. })
    ));

    let err = f
        .engine
        .remove_liquidity(
            &f.pool,
            &f.bob,
            RemoveLiquidity::new(ONE).with_min_out(ONE, ONE + 1),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PoolError::Amm(AmmError::SlippageExceeded { what: "amount1_out", .. })
    ));

    assert_eq!(f.engine.pool_info(&f.pool).unwrap(), before);
}

#[test]
fn test_empty_pool_rejects_swaps_and_withdrawals() {
    let f = fixture(FeeSchedule::DEFAULT);

    let err = f
        .engine
        .swap(&f.pool, &f.bob, Swap::new(ONE, 0, SwapDirection::ZeroForOne))
        .unwrap_err();
    assert!(matches!(err, PoolError::Amm(AmmError::EmptyPool)));

    let err = f
        .engine
        .remove_liquidity(&f.pool, &f.bob, RemoveLiquidity::new(1))
        .unwrap_err();
    assert!(matches!(err, PoolError::Amm(AmmError::InsufficientShares { .. })));
}

#[test]
fn test_full_exit_empties_pool() {
    let f = fixture(FeeSchedule::DEFAULT);
    f.engine
        .add_liquidity(&f.pool, &f.alice, AddLiquidity::new(40 * ONE, 10 * ONE))
        .unwrap();

    let receipt = f
        .engine
        .remove_liquidity(&f.pool, &f.alice, RemoveLiquidity::new(20 * ONE))
        .unwrap();
    assert_eq!((receipt.amount0_out, receipt.amount1_out), (40 * ONE, 10 * ONE));

    let info = f.engine.pool_info(&f.pool).unwrap();
    assert_eq!(info.reserves(), Reserves::EMPTY);

    // an emptied pool takes a fresh first deposit at any ratio
    let again = f
        .engine
        .add_liquidity(&f.pool, &f.bob, AddLiquidity::new(9 * ONE, ONE))
        .unwrap();
    assert_eq!(again.lp_minted, 3 * ONE);
}

#[test]
fn test_min_initial_liquidity_from_settings() {
    let custody = Arc::new(FakeCustody::new());
    let settings = EngineSettings {
        min_initial_liquidity: 1_000,
        ..EngineSettings::default()
    };
    let engine = PoolEngine::new(settings, custody.clone(), custody.clone());
    let pool = engine.initialize_default(addr(1), addr(2)).unwrap();
    custody.fund(&addr(1), &addr(10), ONE).unwrap();
    custody.fund(&addr(2), &addr(10), ONE).unwrap();

    let err = engine
        .add_liquidity(&pool, &addr(10), AddLiquidity::new(999, 999))
        .unwrap_err();
    assert!(matches!(
        err,
        PoolError::Amm(AmmError::InsufficientInitialLiquidity {
            minted: 999,
            minimum: 1_000
        })
    ));
    assert!(custody.calls().is_empty());

    engine
        .add_liquidity(&pool, &addr(10), AddLiquidity::new(1_000, 1_000))
        .unwrap();
}

#[test]
fn test_release_failure_rolls_back_withdrawal() {
    let custody = Arc::new(FakeCustody::new());
    let engine = PoolEngine::new(EngineSettings::default(), custody.clone(), custody.clone());
    let pool = engine.initialize_default(addr(1), addr(2)).unwrap();
    let user = addr(10);
    custody.fund(&addr(1), &user, 10 * ONE).unwrap();
    custody.fund(&addr(2), &user, 10 * ONE).unwrap();
    engine
        .add_liquidity(&pool, &user, AddLiquidity::new(10 * ONE, 10 * ONE))
        .unwrap();
    let before = engine.pool_info(&pool).unwrap();

    // burn and first release succeed, second release fails
    custody.fail_after(CallKind::TransferOut, 1);
    let err = engine
        .remove_liquidity(&pool, &user, RemoveLiquidity::new(5 * ONE))
        .unwrap_err();
    assert!(matches!(err, PoolError::Custody(_)));

    assert_eq!(engine.pool_info(&pool).unwrap(), before);
    assert_eq!(engine.lp_balance(&pool, &user).unwrap(), 10 * ONE);
    assert_eq!(custody.balance(&addr(1), &user), 0);
    assert_eq!(custody.balance(&addr(2), &user), 0);
    assert_eq!(custody.book().total_supply(&before.accounts.lp_mint), 10 * ONE);
}

#[test]
fn test_initialize_failures() {
    let f = fixture(FeeSchedule::DEFAULT);

    let err = f.engine.initialize_default(f.mint1, f.mint0).unwrap_err();
    assert!(matches!(err, PoolError::DuplicatePool { pool_id, .. } if pool_id == f.pool));
    assert_eq!(err.class(), ErrorClass::Precondition);

    assert!(f.engine.initialize_pool(addr(5), addr(6), 1, 0).is_err());
    assert!(f.engine.initialize_default(addr(5), addr(5)).is_err());
    assert_eq!(f.engine.pools().len(), 1);

#[test]
fn test_arithmetic_overflow_leaves_pool_untouched() {
    let book = Arc::new(BalanceBook::new());
    let engine = PoolEngine::new(EngineSettings::default(), book.clone(), book.clone());
    let (mint0, mint1, alice, bob) = (addr(1), addr(2), addr(10), addr(11));

    // one unit of asset0 against nearly the whole asset1 supply
    book.credit(&mint0, &alice, 1).unwrap();
    book.credit(&mint1, &alice, u64::MAX - 1).unwrap();
    book.credit(&mint0, &bob, 1 << 63).unwrap();
    book.credit(&mint1, &bob, 1).unwrap();

    let pool = engine.initialize_default(mint0, mint1).unwrap();
    engine
        .add_liquidity(&pool, &alice, AddLiquidity::new(1, u64::MAX - 1))
        .unwrap();
    let before = engine.pool_info(&pool).unwrap();
    assert_eq!(before.total_lp_supply, u32::MAX as u64);

    let err = engine
        .add_liquidity(&pool, &bob, AddLiquidity::new(1 << 63, 1))
        .unwrap_err();
    assert!(matches!(err, PoolError::Amm(AmmError::Arithmetic(_))));
    assert_eq!(err.class(), ErrorClass::Arithmetic);

    assert_eq!(engine.pool_info(&pool).unwrap(), before);
    assert_eq!(book.get(&mint0, &bob), 1 << 63);
    assert_eq!(book.get(&mint1, &bob), 1);
    assert_eq!(engine.lp_balance(&pool, &bob).unwrap(), 0);
    assert_eq!(book.get(&mint0, &before.accounts.vault0), 1);
    assert_eq!(book.get(&mint1, &before.accounts.vault1), u64::MAX - 1);
}
}
