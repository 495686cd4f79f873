//! Liquidity pool that underwrites options against pooled collateral.
//!
//! Providers deposit the pool's collateral asset and receive shares. The pool
//! quotes premiums with Black-Scholes, floored by a utilization price that
//! grows with the share of the pool a write would consume, and writes options
//! through the registry as the writer of record. After expiration the pool's
//! positions are redeemed back into free collateral and an underlying reserve.
//!
//! Pool value is free collateral, plus the pool's current claim on collateral
//! still escrowed in the registry, plus underlying (reserve and unredeemed
//! exercise proceeds) marked at spot.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]
extern crate alloc;

#[cfg(feature = "export-abi")]
pub fn print_from_args() {
    stylus_sdk::export_abi!("liquidity-pool", 1);
}

pub mod shares;

use alloc::{vec, vec::Vec};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::sol;
use options_core::black_scholes::{self, years_to_expiry};
use options_core::fixed_point::wad_mul;
use options_core::{MathError, OptionType, SeriesTerms, NATIVE_ASSET, WAD};
#[allow(deprecated)]
use stylus_sdk::call::Call;
use stylus_sdk::prelude::*;
use stylus_sdk::stylus_core::calls::ValueTransfer;
use stylus_sdk::stylus_core::log;

pub use options_core::{DivideByZero, InvalidInput, Overflow};

sol_interface! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface IClock {
        function currentTime() external view returns (uint64);
    }

    interface IPriceFeed {
        function getPriceQuote(address base, address quote, uint256 amount) external view returns (uint256);
    }

    interface IOptionRegistry {
        function seriesInfo(bytes32 id) external view returns (address, address, uint64, uint8, uint256);
        function open(bytes32 id, uint256 amount, uint256 deposit) external payable;
        function transfer(address to, bytes32 id, uint256 amount) external;
        function redeem(bytes32 id) external returns (uint256, uint256);
        function seriesBook(bytes32 id) external view returns (uint256, uint256, uint256, uint256);
        function getPosition(address writer, bytes32 id) external view returns (uint256, uint256);
    }
}

sol! {
    event LiquidityAdded(address indexed provider, uint256 amount, uint256 shares);
    event LiquidityRemoved(address indexed provider, uint256 shares, uint256 collateral, uint256 underlying);
    event OptionWritten(
        bytes32 indexed id,
        address indexed buyer,
        uint256 amount,
        uint256 premium,
        uint256 collateral
    );
    event SeriesSettled(bytes32 indexed id, uint256 collateral, uint256 proceeds);
    event Transfer(address indexed from, address indexed to, uint256 value);

    /// Errors that can occur in the LiquidityPool contract.
    #[derive(Debug)]
    error AlreadyInitialized();
    #[derive(Debug)]
    error ZeroDeposit();
    #[derive(Debug)]
    error ZeroAmount();
    #[derive(Debug)]
    error InsufficientShares(uint256 available, uint256 requested);
    #[derive(Debug)]
    error InsufficientLiquidity(uint256 available, uint256 required);
    #[derive(Debug)]
    error UnsupportedSeries(bytes32 id);
    #[derive(Debug)]
    error PremiumTooHigh(uint256 premium, uint256 max_premium);
    #[derive(Debug)]
    error IncorrectPayment(uint256 expected, uint256 received);
    #[derive(Debug)]
    error NothingToSettle(bytes32 id);
    #[derive(Debug)]
    error TransferFailed(address asset);
    #[derive(Debug)]
    error PriceUnavailable(address feed);
    #[derive(Debug)]
    error ClockUnavailable(address clock);
    #[derive(Debug)]
    error RegistryCallFailed(address registry);
}

sol_storage! {
    #[entrypoint]
    pub struct LiquidityPool {
        bool initialized;

        address underlying;
        // Collateral asset; zero is the native currency.
        address strike_asset;
        address registry;
        address price_feed;
        address clock;

        // Annualized wads
        uint256 risk_free_rate;
        uint256 implied_volatility;

        uint256 free_collateral;
        // Underlying received from exercised puts
        uint256 underlying_reserve;
        // Series the pool has written and not yet settled
        bytes32[] open_series;
        // Index into `open_series` plus one; zero when not open
        mapping(bytes32 => uint256) series_slot;

        mapping(address => uint256) shares;
        uint256 total_shares;
    }
}

/// Custom error type combining pool errors.
#[derive(SolidityError, Debug)]
pub enum PoolError {
    AlreadyInitialized(AlreadyInitialized),
    ZeroDeposit(ZeroDeposit),
    ZeroAmount(ZeroAmount),
    InsufficientShares(InsufficientShares),
    /// Free collateral cannot cover the request.
    InsufficientLiquidity(InsufficientLiquidity),
    /// Series is not on the pool's pair or not backed by its collateral.
    UnsupportedSeries(UnsupportedSeries),
    /// Quoted premium moved past the buyer's bound.
    PremiumTooHigh(PremiumTooHigh),
    IncorrectPayment(IncorrectPayment),
    NothingToSettle(NothingToSettle),
    TransferFailed(TransferFailed),
    PriceUnavailable(PriceUnavailable),
    ClockUnavailable(ClockUnavailable),
    RegistryCallFailed(RegistryCallFailed),
    Overflow(Overflow),
    DivideByZero(DivideByZero),
    InvalidInput(InvalidInput),
}

impl From<MathError> for PoolError {
    fn from(error: MathError) -> Self {
        match error {
            MathError::Overflow(e) => Self::Overflow(e),
            MathError::DivideByZero(e) => Self::DivideByZero(e),
            MathError::InvalidInput(e) => Self::InvalidInput(e),
        }
    }
}

fn checked_add(a: U256, b: U256) -> Result<U256, PoolError> {
    a.checked_add(b).ok_or(PoolError::Overflow(Overflow {}))
}

/// What the pool owns, split by asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Holdings {
    /// Free collateral plus the pool's claim on collateral escrowed in the
    /// registry.
    collateral: U256,
    /// Exercise proceeds still held by the registry for the pool.
    pending_underlying: U256,
    /// Underlying already redeemed into the pool.
    reserve: U256,
}

// Private helper methods
impl LiquidityPool {
    fn now(&self) -> Result<u64, PoolError> {
        let clock = self.clock.get();
        if clock.is_zero() {
            return Ok(self.vm().block_timestamp());
        }
        IClock::new(clock)
            .current_time(self)
            .map_err(|_| PoolError::ClockUnavailable(ClockUnavailable { clock }))
    }

    fn spot(&self, underlying: Address, strike_asset: Address) -> Result<U256, PoolError> {
        let feed = self.price_feed.get();
        IPriceFeed::new(feed)
            .get_price_quote(self, underlying, strike_asset, WAD)
            .map_err(|_| PoolError::PriceUnavailable(PriceUnavailable { feed }))
    }

    /// The pool's share of what series `id` still holds in the registry:
    /// `(collateral, proceeds)` as `redeem` would pay them now.
    fn series_claim(&self, id: B256) -> Result<(U256, U256), PoolError> {
        let address = self.registry.get();
        let registry = IOptionRegistry::new(address);
        let failed = |_| PoolError::RegistryCallFailed(RegistryCallFailed { registry: address });
        let (total_written, collateral_locked, exercise_proceeds, _) =
            registry.series_book(self, id).map_err(failed)?;
        let pool = self.vm().contract_address();
        let (_, written) = registry.get_position(self, pool, id).map_err(failed)?;
        if total_written.is_zero() {
            return Ok((U256::ZERO, U256::ZERO));
        }
        Ok((
            shares::pro_rata(collateral_locked, written, total_written)?,
            shares::pro_rata(exercise_proceeds, written, total_written)?,
        ))
    }

    fn holdings(&self) -> Result<Holdings, PoolError> {
        let mut holdings = Holdings {
            collateral: self.free_collateral.get(),
            pending_underlying: U256::ZERO,
            reserve: self.underlying_reserve.get(),
        };
        for index in 0..self.open_series.len() {
            let Some(id) = self.open_series.get(index) else {
                continue;
            };
            let (collateral, proceeds) = self.series_claim(id)?;
            holdings.collateral = checked_add(holdings.collateral, collateral)?;
            holdings.pending_underlying = checked_add(holdings.pending_underlying, proceeds)?;
        }
        Ok(holdings)
    }

    /// `amount` of underlying in collateral units at spot.
    fn underlying_value(&self, amount: U256) -> Result<U256, PoolError> {
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let spot = self.spot(self.underlying.get(), self.strike_asset.get())?;
        Ok(wad_mul(amount, spot)?)
    }

    fn value(&self) -> Result<U256, PoolError> {
        let holdings = self.holdings()?;
        let underlying = checked_add(holdings.pending_underlying, holdings.reserve)?;
        checked_add(holdings.collateral, self.underlying_value(underlying)?)
    }

    fn track_series(&mut self, id: B256) {
        if !self.series_slot.get(id).is_zero() {
            return;
        }
        self.open_series.push(id);
        let slot = U256::from(self.open_series.len());
        self.series_slot.insert(id, slot);
    }

    fn untrack_series(&mut self, id: B256) {
        let slot = self.series_slot.get(id);
        if slot.is_zero() {
            return;
        }
        let index = slot.to::<usize>() - 1;
        let Some(last) = self.open_series.pop() else {
            return;
        };
        if last != id {
            if let Some(mut moved) = self.open_series.setter(index) {
                moved.set(last);
            }
            self.series_slot.insert(last, slot);
        }
        self.series_slot.insert(id, U256::ZERO);
    }

    /// Spot and per-unit Black-Scholes premium for `terms`.
    fn black_scholes_quote(&self, terms: &SeriesTerms) -> Result<(U256, U256), PoolError> {
        let spot = self.spot(terms.underlying, terms.strike_asset)?;
        let years = years_to_expiry(terms.expiration, self.now()?);
        let premium = black_scholes::price(
            terms.option_type,
            spot,
            terms.strike,
            years,
            self.implied_volatility.get(),
            self.risk_free_rate.get(),
        )?;
        Ok((spot, premium))
    }

    /// Per-unit premium for writing `amount`, floored by pool utilization.
    fn utilization_quote(&self, terms: &SeriesTerms, amount: U256) -> Result<U256, PoolError> {
        let value = self.value()?;
        if value.is_zero() {
            return Err(PoolError::InsufficientLiquidity(InsufficientLiquidity {
                available: U256::ZERO,
                required: amount,
            }));
        }
        let (spot, premium) = self.black_scholes_quote(terms)?;
        let floor = shares::utilization_price(spot, amount, value)?;
        Ok(floor.max(premium))
    }

    fn series_terms(&self, id: B256) -> Result<SeriesTerms, PoolError> {
        let registry = self.registry.get();
        let (underlying, strike_asset, expiration, flavor, strike) = IOptionRegistry::new(registry)
            .series_info(self, id)
            .map_err(|_| PoolError::UnsupportedSeries(UnsupportedSeries { id }))?;
        let option_type =
            OptionType::from_u8(flavor).ok_or(PoolError::UnsupportedSeries(UnsupportedSeries { id }))?;
        Ok(SeriesTerms {
            underlying,
            strike_asset,
            expiration,
            option_type,
            strike,
        })
    }

    fn collect(&mut self, asset: Address, from: Address, amount: U256) -> Result<(), PoolError> {
        let attached = self.vm().msg_value();
        if asset == NATIVE_ASSET {
            if attached != amount {
                return Err(PoolError::IncorrectPayment(IncorrectPayment {
                    expected: amount,
                    received: attached,
                }));
            }
            return Ok(());
        }
        if !attached.is_zero() {
            return Err(PoolError::IncorrectPayment(IncorrectPayment {
                expected: U256::ZERO,
                received: attached,
            }));
        }

        let pool = self.vm().contract_address();
        let transferred = IERC20::new(asset)
            .transfer_from(&mut *self, from, pool, amount)
            .map_err(|_| PoolError::TransferFailed(TransferFailed { asset }))?;
        if !transferred {
            return Err(PoolError::TransferFailed(TransferFailed { asset }));
        }
        Ok(())
    }

    fn pay(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), PoolError> {
        if amount.is_zero() {
            return Ok(());
        }
        if asset == NATIVE_ASSET {
            return self
                .vm()
                .transfer_eth(to, amount)
                .map_err(|_| PoolError::TransferFailed(TransferFailed { asset }));
        }

        let transferred = IERC20::new(asset)
            .transfer(&mut *self, to, amount)
            .map_err(|_| PoolError::TransferFailed(TransferFailed { asset }))?;
        if !transferred {
            return Err(PoolError::TransferFailed(TransferFailed { asset }));
        }
        Ok(())
    }

    /// Escrows `collateral` in the registry and receives `amount` series
    /// tokens in the pool's name.
    #[allow(deprecated)]
    fn open_in_registry(&mut self, id: B256, amount: U256, collateral: U256) -> Result<(), PoolError> {
        let asset = self.strike_asset.get();
        let registry = self.registry.get();
        let failed = PoolError::RegistryCallFailed(RegistryCallFailed { registry });

        if asset == NATIVE_ASSET {
            let config = Call::new_in(self).value(collateral);
            return IOptionRegistry::new(registry)
                .open(config, id, amount, collateral)
                .map_err(|_| failed);
        }

        let approved = IERC20::new(asset)
            .approve(&mut *self, registry, collateral)
            .map_err(|_| PoolError::TransferFailed(TransferFailed { asset }))?;
        if !approved {
            return Err(PoolError::TransferFailed(TransferFailed { asset }));
        }
        IOptionRegistry::new(registry)
            .open(&mut *self, id, amount, collateral)
            .map_err(|_| failed)
    }

    fn move_shares(&mut self, from: Address, to: Address, amount: U256) -> Result<(), PoolError> {
        let from_shares = self.shares.get(from);
        if from_shares < amount {
            return Err(PoolError::InsufficientShares(InsufficientShares {
                available: from_shares,
                requested: amount,
            }));
        }
        self.shares.insert(from, from_shares - amount);
        let to_shares = self.shares.get(to);
        self.shares.insert(to, to_shares + amount);
        log(
            self.vm(),
            Transfer {
                from,
                to,
                value: amount,
            },
        );
        Ok(())
    }
}

#[public]
impl LiquidityPool {
    /// One-shot configuration.
    ///
    /// # Arguments
    /// * `underlying` - Asset options are written on
    /// * `strike_asset` - Collateral asset the pool holds; zero for native
    /// * `registry` - Option series registry the pool writes through
    /// * `price_feed` - Contract answering `getPriceQuote`
    /// * `clock` - Contract answering `currentTime()`, or zero for block time
    /// * `risk_free_rate` - Annualized rate, wad
    /// * `implied_volatility` - Annualized volatility, wad
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        underlying: Address,
        strike_asset: Address,
        registry: Address,
        price_feed: Address,
        clock: Address,
        risk_free_rate: U256,
        implied_volatility: U256,
    ) -> Result<(), PoolError> {
        if self.initialized.get() {
            return Err(PoolError::AlreadyInitialized(AlreadyInitialized {}));
        }
        self.initialized.set(true);
        self.underlying.set(underlying);
        self.strike_asset.set(strike_asset);
        self.registry.set(registry);
        self.price_feed.set(price_feed);
        self.clock.set(clock);
        self.risk_free_rate.set(risk_free_rate);
        self.implied_volatility.set(implied_volatility);
        Ok(())
    }

    /// Deposits `amount` of collateral and mints shares to the caller.
    ///
    /// # Returns
    /// Number of shares minted
    ///
    /// Shares are priced against the full pool value, so a deposit never buys
    /// into reserve or outstanding claims at a discount.
    ///
    /// # Errors
    /// - `ZeroDeposit` if amount is zero
    /// - `DivideByZero` if shares are outstanding against a pool worth nothing
    /// - `IncorrectPayment` if attached value does not match a native deposit
    /// - `TransferFailed` if the deposit could not be pulled
    #[payable]
    pub fn add_liquidity(&mut self, amount: U256) -> Result<U256, PoolError> {
        if amount.is_zero() {
            return Err(PoolError::ZeroDeposit(ZeroDeposit {}));
        }
        let provider = self.vm().msg_sender();
        let total_shares = self.total_shares.get();
        let value = if total_shares.is_zero() {
            U256::ZERO
        } else {
            self.value()?
        };
        let minted = shares::shares_for_deposit(amount, total_shares, value)?;

        self.collect(self.strike_asset.get(), provider, amount)?;

        self.free_collateral
            .set(checked_add(self.free_collateral.get(), amount)?);
        self.total_shares.set(checked_add(total_shares, minted)?);
        let held = self.shares.get(provider);
        self.shares.insert(provider, held + minted);

        log(
            self.vm(),
            LiquidityAdded {
                provider,
                amount,
                shares: minted,
            },
        );
        Ok(minted)
    }

    /// Burns `shares` and pays their pro-rata part of the pool.
    ///
    /// The underlying reserve is paid in kind. The share of collateral still
    /// escrowed in the registry, and of exercise proceeds not yet redeemed
    /// (marked at spot), is paid out of free collateral.
    ///
    /// # Returns
    /// `(collateral, underlying)` paid
    ///
    /// # Errors
    /// - `ZeroAmount`, `InsufficientShares`
    /// - `InsufficientLiquidity` if free collateral cannot cover the payout
    /// - `RegistryCallFailed`, `PriceUnavailable` if the pool cannot be valued
    pub fn remove_liquidity(&mut self, shares: U256) -> Result<(U256, U256), PoolError> {
        if shares.is_zero() {
            return Err(PoolError::ZeroAmount(ZeroAmount {}));
        }
        let provider = self.vm().msg_sender();
        let held = self.shares.get(provider);
        if held < shares {
            return Err(PoolError::InsufficientShares(InsufficientShares {
                available: held,
                requested: shares,
            }));
        }

        let total_shares = self.total_shares.get();
        let holdings = self.holdings()?;
        let claim = checked_add(
            holdings.collateral,
            self.underlying_value(holdings.pending_underlying)?,
        )?;
        let collateral = shares::pro_rata(claim, shares, total_shares)?;
        let free = self.free_collateral.get();
        if collateral > free {
            return Err(PoolError::InsufficientLiquidity(InsufficientLiquidity {
                available: free,
                required: collateral,
            }));
        }
        let reserve = holdings.reserve;
        let underlying = shares::pro_rata(reserve, shares, total_shares)?;

        self.shares.insert(provider, held - shares);
        self.total_shares.set(total_shares - shares);
        self.free_collateral.set(free - collateral);
        self.underlying_reserve.set(reserve - underlying);

        self.pay(self.strike_asset.get(), provider, collateral)?;
        self.pay(self.underlying.get(), provider, underlying)?;

        log(
            self.vm(),
            LiquidityRemoved {
                provider,
                shares,
                collateral,
                underlying,
            },
        );
        Ok((collateral, underlying))
    }

    /// Per-unit Black-Scholes premium in strike-asset units.
    ///
    /// # Errors
    /// - `UnsupportedSeries` if `flavor` is not 0 or 1
    /// - `PriceUnavailable` if the price feed cannot be read
    pub fn quote_price(
        &self,
        underlying: Address,
        strike_asset: Address,
        expiration: u64,
        flavor: u8,
        strike: U256,
    ) -> Result<U256, PoolError> {
        let terms = quote_terms(underlying, strike_asset, expiration, flavor, strike)?;
        Ok(self.black_scholes_quote(&terms)?.1)
    }

    /// Per-unit premium for writing `amount`: the larger of Black-Scholes and
    /// `spot * amount / pool_value`.
    ///
    /// # Errors
    /// - `InsufficientLiquidity` if the pool is empty
    /// - `UnsupportedSeries`, `PriceUnavailable` as in `quote_price`
    pub fn quote_price_with_utilization(
        &self,
        underlying: Address,
        strike_asset: Address,
        expiration: u64,
        flavor: u8,
        strike: U256,
        amount: U256,
    ) -> Result<U256, PoolError> {
        let terms = quote_terms(underlying, strike_asset, expiration, flavor, strike)?;
        self.utilization_quote(&terms, amount)
    }

    /// Sells `amount` contracts of series `id` to the caller.
    ///
    /// The pool escrows the collateral in the registry as writer of record and
    /// delivers the series tokens to the caller. With a native collateral asset
    /// the caller attaches `max_premium` and receives the difference back.
    ///
    /// # Returns
    /// Premium charged
    ///
    /// # Errors
    /// - `ZeroAmount`
    /// - `UnsupportedSeries` if the series is off the pool's pair or collateral
    /// - `PremiumTooHigh` if the premium exceeds `max_premium`
    /// - `InsufficientLiquidity` if free collateral cannot back the write
    #[payable]
    pub fn write_option(&mut self, id: B256, amount: U256, max_premium: U256) -> Result<U256, PoolError> {
        if amount.is_zero() {
            return Err(PoolError::ZeroAmount(ZeroAmount {}));
        }
        let terms = self.series_terms(id)?;
        let collateral_asset = self.strike_asset.get();
        if terms.underlying != self.underlying.get()
            || terms.strike_asset != collateral_asset
            || terms.collateral_asset() != collateral_asset
        {
            return Err(PoolError::UnsupportedSeries(UnsupportedSeries { id }));
        }

        let unit_price = self.utilization_quote(&terms, amount)?;
        let premium = shares::premium(unit_price, amount)?;
        if premium > max_premium {
            return Err(PoolError::PremiumTooHigh(PremiumTooHigh {
                premium,
                max_premium,
            }));
        }

        let collateral = terms.collateral_for(amount)?;
        let free = self.free_collateral.get();
        if collateral > free {
            return Err(PoolError::InsufficientLiquidity(InsufficientLiquidity {
                available: free,
                required: collateral,
            }));
        }

        let buyer = self.vm().msg_sender();
        if collateral_asset == NATIVE_ASSET {
            self.collect(collateral_asset, buyer, max_premium)?;
        } else {
            self.collect(collateral_asset, buyer, premium)?;
        }

        self.free_collateral.set(checked_add(free - collateral, premium)?);
        self.track_series(id);

        self.open_in_registry(id, amount, collateral)?;
        let registry = self.registry.get();
        IOptionRegistry::new(registry)
            .transfer(&mut *self, buyer, id, amount)
            .map_err(|_| PoolError::RegistryCallFailed(RegistryCallFailed { registry }))?;

        if collateral_asset == NATIVE_ASSET {
            self.pay(collateral_asset, buyer, max_premium - premium)?;
        }

        log(
            self.vm(),
            OptionWritten {
                id,
                buyer,
                amount,
                premium,
                collateral,
            },
        );
        Ok(premium)
    }

    /// Redeems the pool's position in an expired series.
    ///
    /// Returned collateral becomes free again; exercise proceeds join the
    /// underlying reserve.
    ///
    /// # Returns
    /// `(collateral, proceeds)` received from the registry
    ///
    /// # Errors
    /// - `NothingToSettle` if the pool holds no position in `id`
    /// - `RegistryCallFailed` if the registry refuses the redemption
    pub fn settle_series(&mut self, id: B256) -> Result<(U256, U256), PoolError> {
        if self.series_slot.get(id).is_zero() {
            return Err(PoolError::NothingToSettle(NothingToSettle { id }));
        }

        let registry = self.registry.get();
        let (collateral, proceeds) = IOptionRegistry::new(registry)
            .redeem(&mut *self, id)
            .map_err(|_| PoolError::RegistryCallFailed(RegistryCallFailed { registry }))?;

        self.untrack_series(id);
        self.free_collateral
            .set(checked_add(self.free_collateral.get(), collateral)?);
        self.underlying_reserve
            .set(checked_add(self.underlying_reserve.get(), proceeds)?);

        log(
            self.vm(),
            SeriesSettled {
                id,
                collateral,
                proceeds,
            },
        );
        Ok((collateral, proceeds))
    }

    /// Moves pool shares from the caller.
    ///
    /// # Errors
    /// - `InsufficientShares` if the caller holds fewer than `amount`
    pub fn transfer(&mut self, to: Address, amount: U256) -> Result<bool, PoolError> {
        let from = self.vm().msg_sender();
        self.move_shares(from, to, amount)?;
        Ok(true)
    }

    /// Accepts native collateral returned by the registry.
    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        Ok(())
    }

    // ========================================
    // View Functions
    // ========================================

    #[must_use]
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.shares.get(owner)
    }

    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.total_shares.get()
    }

    /// Free collateral, live registry claims and underlying at spot.
    ///
    /// # Errors
    /// - `RegistryCallFailed` if a series book cannot be read
    /// - `PriceUnavailable` if underlying is held and the feed cannot be read
    pub fn pool_value(&self) -> Result<U256, PoolError> {
        self.value()
    }

    #[must_use]
    pub fn free_collateral(&self) -> U256 {
        self.free_collateral.get()
    }

    /// Collateral the pool can still reclaim from unsettled series.
    ///
    /// # Errors
    /// - `RegistryCallFailed` if a series book cannot be read
    pub fn locked_collateral(&self) -> Result<U256, PoolError> {
        Ok(self.holdings()?.collateral - self.free_collateral.get())
    }

    /// Exercise proceeds the registry holds for the pool's unsettled series.
    ///
    /// # Errors
    /// - `RegistryCallFailed` if a series book cannot be read
    pub fn pending_underlying(&self) -> Result<U256, PoolError> {
        Ok(self.holdings()?.pending_underlying)
    }

    /// Number of series written and not yet settled.
    #[must_use]
    pub fn open_series_count(&self) -> U256 {
        U256::from(self.open_series.len())
    }

    #[must_use]
    pub fn underlying_reserve(&self) -> U256 {
        self.underlying_reserve.get()
    }

    /// Price of one underlying in strike-asset units.
    ///
    /// # Errors
    /// - `PriceUnavailable` if the price feed cannot be read
    pub fn spot_price(&self) -> Result<U256, PoolError> {
        self.spot(self.underlying.get(), self.strike_asset.get())
    }
}

fn quote_terms(
    underlying: Address,
    strike_asset: Address,
    expiration: u64,
    flavor: u8,
    strike: U256,
) -> Result<SeriesTerms, PoolError> {
    let option_type = OptionType::from_u8(flavor)
        .ok_or(PoolError::UnsupportedSeries(UnsupportedSeries { id: B256::ZERO }))?;
    Ok(SeriesTerms {
        underlying,
        strike_asset,
        expiration,
        option_type,
        strike,
    })
}
