#[path = "../../registry/tests/test_clock.rs"]
mod test_clock;
#[path = "../../registry/tests/test_erc20.rs"]
mod test_erc20;

use alloy_primitives::{Address, U256};
use liquidity_pool::{LiquidityPool, PoolError};
use motsu::prelude::*;
use option_registry::OptionRegistry;
use test_clock::TestClock;
use test_erc20::TestERC20;
use test_price_feed::TestPriceFeed;

const ADMIN: Address = Address::new([0xAD; 20]);
const LP_ONE: Address = Address::new([0x01; 20]);
const LP_TWO: Address = Address::new([0x02; 20]);
const NOW: u64 = 1_900_000_000;

fn wad(units: u64) -> U256 {
    U256::from(units) * U256::from(10).pow(U256::from(18))
}

fn setup(
    pool: &Contract<LiquidityPool>,
    registry: &Contract<OptionRegistry>,
    clock: &Contract<TestClock>,
    feed: &Contract<TestPriceFeed>,
    underlying: &Contract<TestERC20>,
    strike_asset: &Contract<TestERC20>,
) {
    clock.sender(ADMIN).set_time(NOW);
    registry
        .sender(ADMIN)
        .initialize(clock.address(), 0, 0)
        .unwrap();
    feed.sender(ADMIN)
        .set_price(underlying.address(), strike_asset.address(), wad(300));
    pool.sender(ADMIN)
        .initialize(
            underlying.address(),
            strike_asset.address(),
            registry.address(),
            feed.address(),
            clock.address(),
            wad(3) / U256::from(100),
            wad(60) / U256::from(100),
        )
        .unwrap();
}

fn deposit(pool: &Contract<LiquidityPool>, strike_asset: &Contract<TestERC20>, provider: Address, amount: U256) -> U256 {
    strike_asset.sender(provider).mint(provider, amount);
    strike_asset.sender(provider).approve(pool.address(), amount);
    pool.sender(provider).add_liquidity(amount).unwrap()
}

#[motsu::test]
fn first_deposit_mints_shares_one_to_one(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);

    let minted = deposit(&pool, &strike_asset, LP_ONE, wad(1));

    assert_eq!(minted, wad(1));
    assert_eq!(pool.sender(LP_ONE).balance_of(LP_ONE), wad(1));
    assert_eq!(pool.sender(LP_ONE).total_supply(), wad(1));
    assert_eq!(pool.sender(LP_ONE).pool_value().unwrap(), wad(1));
    assert_eq!(pool.sender(LP_ONE).free_collateral(), wad(1));
    assert_eq!(strike_asset.sender(LP_ONE).balance_of(pool.address()), wad(1));
}

#[motsu::test]
fn second_deposit_keeps_share_ratio(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);

    let first = deposit(&pool, &strike_asset, LP_ONE, wad(1));
    let second = deposit(&pool, &strike_asset, LP_TWO, wad(3));

    assert_eq!(first, wad(1));
    assert_eq!(second, wad(3));
    assert_eq!(pool.sender(LP_TWO).total_supply(), wad(4));
    assert_eq!(pool.sender(LP_TWO).pool_value().unwrap(), wad(4));
}

#[motsu::test]
fn zero_deposit_is_rejected(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);

    let result = pool.sender(LP_ONE).add_liquidity(U256::ZERO);
    assert!(matches!(result, Err(PoolError::ZeroDeposit(_))));
}

#[motsu::test]
fn deposit_without_allowance_fails(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);
    strike_asset.sender(LP_ONE).mint(LP_ONE, wad(1));

    let result = pool.sender(LP_ONE).add_liquidity(wad(1));
    assert!(matches!(result, Err(PoolError::TransferFailed(_))));
}

#[motsu::test]
fn withdrawal_returns_pro_rata_collateral(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);
    deposit(&pool, &strike_asset, LP_ONE, wad(1));
    deposit(&pool, &strike_asset, LP_TWO, wad(3));

    let (collateral, underlying_out) = pool.sender(LP_TWO).remove_liquidity(wad(2)).unwrap();

    assert_eq!(collateral, wad(2));
    assert_eq!(underlying_out, U256::ZERO);
    assert_eq!(pool.sender(LP_TWO).balance_of(LP_TWO), wad(1));
    assert_eq!(pool.sender(LP_TWO).total_supply(), wad(2));
    assert_eq!(strike_asset.sender(LP_TWO).balance_of(LP_TWO), wad(2));
}

#[motsu::test]
fn withdrawal_beyond_shares_fails(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);
    deposit(&pool, &strike_asset, LP_ONE, wad(1));

    let result = pool.sender(LP_ONE).remove_liquidity(wad(2));
    assert!(matches!(result, Err(PoolError::InsufficientShares(_))));

    let result = pool.sender(LP_TWO).remove_liquidity(wad(1));
    assert!(matches!(result, Err(PoolError::InsufficientShares(_))));
}

#[motsu::test]
fn shares_transfer_between_providers(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);
    deposit(&pool, &strike_asset, LP_ONE, wad(5));

    assert!(pool.sender(LP_ONE).transfer(LP_TWO, wad(2)).unwrap());
    assert_eq!(pool.sender(LP_ONE).balance_of(LP_ONE), wad(3));
    assert_eq!(pool.sender(LP_ONE).balance_of(LP_TWO), wad(2));

    let result = pool.sender(LP_TWO).transfer(LP_ONE, wad(3));
    assert!(matches!(result, Err(PoolError::InsufficientShares(_))));
}

#[motsu::test]
fn initialize_only_once(
    pool: Contract<LiquidityPool>,
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    feed: Contract<TestPriceFeed>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    setup(&pool, &registry, &clock, &feed, &underlying, &strike_asset);

    let result = pool.sender(ADMIN).initialize(
        Address::ZERO,
        Address::ZERO,
        Address::ZERO,
        Address::ZERO,
        Address::ZERO,
        U256::ZERO,
        U256::ZERO,
    );
    assert!(matches!(result, Err(PoolError::AlreadyInitialized(_))));
    assert_eq!(pool.sender(ADMIN).spot_price().unwrap(), wad(300));
}
