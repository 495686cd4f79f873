
use alloy_primitives::{Address, B256, U256};
use motsu::prelude::*;
use option_registry::{OptionRegistry, RegistryError};
use test_clock::TestClock;
use test_erc20::TestERC20;

const ADMIN: Address = Address::new([0xAD; 20]);
const ALICE: Address = Address::new([0xA1; 20]);
const CAROL: Address = Address::new([0xC0; 20]);
const HOLDER: Address = Address::new([0xBB; 20]);
const NOW: u64 = 1_900_000_000;
const EXPIRATION: u64 = 2_000_000_000;
const WINDOW: u64 = 3_600;
const PUT: u8 = 1;
const AMERICAN: u8 = 0;
const EUROPEAN: u8 = 1;

fn wad(units: u64) -> U256 {
    U256::from(units) * U256::from(10).pow(U256::from(18))
}

fn fund(token: &Contract<TestERC20>, registry: &Contract<OptionRegistry>, owner: Address, amount: U256) {
    token.sender(owner).mint(owner, amount);
    token.sender(owner).approve(registry.address(), amount);
}

/// Put with strike 100: Alice writes 3, Carol writes 1, Alice's tokens go to
/// `HOLDER` who exercises 2.
fn exercised_put(
    registry: &Contract<OptionRegistry>,
    clock: &Contract<TestClock>,
    underlying: &Contract<TestERC20>,
    strike_asset: &Contract<TestERC20>,
    style: u8,
) -> B256 {
    clock.sender(ADMIN).set_time(NOW);
    registry
        .sender(ADMIN)
        .initialize(clock.address(), style, WINDOW)
        .unwrap();
    let id = registry
        .sender(ALICE)
        .issue(underlying.address(), strike_asset.address(), EXPIRATION, PUT, wad(100))
        .unwrap();

    fund(strike_asset, registry, ALICE, wad(300));
    fund(strike_asset, registry, CAROL, wad(100));
    registry.sender(ALICE).open(id, wad(3), wad(300)).unwrap();
    registry.sender(CAROL).open(id, wad(1), wad(100)).unwrap();
    registry.sender(ALICE).transfer(HOLDER, id, wad(3)).unwrap();

    if style == EUROPEAN {
        clock.sender(ADMIN).set_time(EXPIRATION);
    }
    fund(underlying, registry, HOLDER, wad(2));
    registry.sender(HOLDER).exercise(id, wad(2)).unwrap();
    id
}

#[motsu::test]
fn writers_split_collateral_and_proceeds_pro_rata(
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    let id = exercised_put(&registry, &clock, &underlying, &strike_asset, AMERICAN);
    clock.sender(ADMIN).set_time(EXPIRATION + 1);
    assert_eq!(registry.sender(ALICE).series_state(id).unwrap(), 3);

    let alice = registry.sender(ALICE).redeem(id).unwrap();
    let carol = registry.sender(CAROL).redeem(id).unwrap();

    assert_eq!(alice, (wad(150), wad(3) / U256::from(2)));
    assert_eq!(carol, (wad(50), wad(1) / U256::from(2)));
    assert_eq!(strike_asset.sender(ALICE).balance_of(ALICE), wad(150));
    assert_eq!(underlying.sender(CAROL).balance_of(CAROL), wad(1) / U256::from(2));
}

#[motsu::test]
fn redemptions_drain_exactly_the_escrow(
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    let id = exercised_put(&registry, &clock, &underlying, &strike_asset, AMERICAN);
    let (_, escrow, proceeds, _) = registry.sender(ALICE).series_book(id).unwrap();
    clock.sender(ADMIN).set_time(EXPIRATION + 1);

    let (alice_collateral, alice_proceeds) = registry.sender(ALICE).redeem(id).unwrap();
    let (carol_collateral, carol_proceeds) = registry.sender(CAROL).redeem(id).unwrap();

    assert_eq!(alice_collateral + carol_collateral, escrow);
    assert_eq!(alice_proceeds + carol_proceeds, proceeds);
    assert_eq!(strike_asset.sender(ALICE).balance_of(registry.address()), U256::ZERO);
    assert_eq!(underlying.sender(ALICE).balance_of(registry.address()), U256::ZERO);
    assert_eq!(registry.sender(ALICE).series_state(id).unwrap(), 4);
}

#[motsu::test]
fn redeem_before_expiration_fails(
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    let id = exercised_put(&registry, &clock, &underlying, &strike_asset, AMERICAN);

    let result = registry.sender(ALICE).redeem(id);
    assert!(matches!(result, Err(RegistryError::SeriesNotExpired(_))));

    clock.sender(ADMIN).set_time(EXPIRATION);
    let result = registry.sender(ALICE).redeem(id);
    assert!(matches!(result, Err(RegistryError::SeriesNotExpired(_))));
}

#[motsu::test]
fn european_redeem_waits_for_window(
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    let id = exercised_put(&registry, &clock, &underlying, &strike_asset, EUROPEAN);

    clock.sender(ADMIN).set_time(EXPIRATION + WINDOW);
    let result = registry.sender(CAROL).redeem(id);
    assert!(matches!(result, Err(RegistryError::SeriesNotExpired(_))));

    clock.sender(ADMIN).set_time(EXPIRATION + WINDOW + 1);
    assert_eq!(
        registry.sender(CAROL).redeem(id).unwrap(),
        (wad(50), wad(1) / U256::from(2))
    );
}

#[motsu::test]
fn redeem_once_and_only_for_writers(
    registry: Contract<OptionRegistry>,
    clock: Contract<TestClock>,
    underlying: Contract<TestERC20>,
    strike_asset: Contract<TestERC20>,
) {
    let id = exercised_put(&registry, &clock, &underlying, &strike_asset, AMERICAN);
    clock.sender(ADMIN).set_time(EXPIRATION + 1);

    let result = registry.sender(HOLDER).redeem(id);
    assert!(matches!(result, Err(RegistryError::NotWriter(_))));

    registry.sender(CAROL).redeem(id).unwrap();
    assert!(registry.sender(CAROL).is_redeemed(CAROL, id));
    assert_eq!(registry.sender(CAROL).get_position(CAROL, id), (U256::ZERO, wad(1)));

    let result = registry.sender(CAROL).redeem(id);
    assert!(matches!(result, Err(RegistryError::AlreadyRedeemed(_))));
}
