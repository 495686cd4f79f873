//! Option series registry.
//!
//! Issues content-addressed option series, escrows writer collateral, keeps
//! the fungible series-token ledger and settles exercises and redemptions.
//!
//! Lifecycle of a series:
//!
//! ```text
//! issue -> open* / close* / transfer* / exercise* -> expiration -> redeem (once per writer)
//! ```
//!
//! Calls escrow one unit of underlying per contract, puts escrow
//! `strike * amount` of the strike asset. Exercise collateral comes out of
//! the series pool rather than any particular writer; redemption splits
//! whatever is left, plus exercise proceeds, by amount written.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]
extern crate alloc;

#[cfg(feature = "export-abi")]
pub fn print_from_args() {
    stylus_sdk::export_abi!("option-registry", 1);
}

pub mod ledger;

use alloc::{vec, vec::Vec};
use alloy_primitives::{keccak256, Address, B256, U256, U64, U8};
use alloy_sol_types::sol;
use options_core::{ExerciseStyle, MathError, OptionType, SeriesTerms, NATIVE_ASSET};
use stylus_sdk::prelude::*;
use stylus_sdk::stylus_core::calls::ValueTransfer;
use stylus_sdk::stylus_core::log;

pub use options_core::{DivideByZero, InvalidInput, Overflow};

use crate::ledger::{Position, SeriesBook, SeriesState};

sol_interface! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }

    interface IClock {
        function currentTime() external view returns (uint64);
    }
}

sol! {
    event SeriesCreated(
        bytes32 indexed id,
        address indexed underlying,
        address indexed strike_asset,
        uint64 expiration,
        uint8 flavor,
        uint8 style,
        uint256 strike
    );
    event PositionOpened(bytes32 indexed id, address indexed writer, uint256 amount, uint256 collateral);
    event PositionClosed(bytes32 indexed id, address indexed writer, uint256 amount, uint256 collateral);
    event Exercised(
        bytes32 indexed id,
        address indexed holder,
        uint256 amount,
        uint256 payment,
        uint256 payout
    );
    event Redeemed(bytes32 indexed id, address indexed writer, uint256 collateral, uint256 proceeds);
    event SeriesTransfer(bytes32 indexed id, address indexed from, address indexed to, uint256 amount);
    event ApprovalForAll(address indexed owner, address indexed operator, bool approved);

    /// Errors that can occur in the registry.
    #[derive(Debug)]
    error AlreadyInitialized();
    #[derive(Debug)]
    error InvalidExpiration(uint64 expiration, uint64 now);
    #[derive(Debug)]
    error InvalidFlavor(uint8 flavor);
    #[derive(Debug)]
    error InvalidStyle(uint8 style);
    #[derive(Debug)]
    error InvalidStrike();
    #[derive(Debug)]
    error ExerciseStyleMismatch(uint8 issued, uint8 requested);
    #[derive(Debug)]
    error ZeroAmount();
    #[derive(Debug)]
    error SeriesNotFound(bytes32 id);
    #[derive(Debug)]
    error SeriesExpired(uint64 expiration, uint64 now);
    #[derive(Debug)]
    error InsufficientCollateral(uint256 required, uint256 provided);
    #[derive(Debug)]
    error IncorrectPayment(uint256 expected, uint256 received);
    #[derive(Debug)]
    error InsufficientWrittenAmount(uint256 available, uint256 requested);
    #[derive(Debug)]
    error ExerciseWindowClosed(uint64 now);
    #[derive(Debug)]
    error InsufficientBalance(uint256 available, uint256 requested);
    #[derive(Debug)]
    error SeriesNotExpired(uint64 redeemable_after, uint64 now);
    #[derive(Debug)]
    error NotWriter();
    #[derive(Debug)]
    error AlreadyRedeemed();
    #[derive(Debug)]
    error NotApproved(address owner, address operator);
    #[derive(Debug)]
    error TransferFailed(address asset);
    #[derive(Debug)]
    error ClockUnavailable(address clock);
}

#[derive(SolidityError, Debug)]
pub enum RegistryError {
    AlreadyInitialized(AlreadyInitialized),
    /// Expiration is not in the future.
    InvalidExpiration(InvalidExpiration),
    /// Flavor is neither call (0) nor put (1).
    InvalidFlavor(InvalidFlavor),
    InvalidStyle(InvalidStyle),
    /// Strike price is zero.
    InvalidStrike(InvalidStrike),
    /// Series already exists with another exercise style.
    ExerciseStyleMismatch(ExerciseStyleMismatch),
    ZeroAmount(ZeroAmount),
    SeriesNotFound(SeriesNotFound),
    SeriesExpired(SeriesExpired),
    /// Declared deposit differs from the required collateral.
    InsufficientCollateral(InsufficientCollateral),
    /// Attached native value does not match what is owed.
    IncorrectPayment(IncorrectPayment),
    /// Close exceeds the writer's own open amount or token balance.
    InsufficientWrittenAmount(InsufficientWrittenAmount),
    ExerciseWindowClosed(ExerciseWindowClosed),
    InsufficientBalance(InsufficientBalance),
    /// Redemption before the exercise window closed.
    SeriesNotExpired(SeriesNotExpired),
    NotWriter(NotWriter),
    AlreadyRedeemed(AlreadyRedeemed),
    NotApproved(NotApproved),
    TransferFailed(TransferFailed),
    ClockUnavailable(ClockUnavailable),
    Overflow(Overflow),
    DivideByZero(DivideByZero),
    /// Arithmetic argument outside the domain of the operation.
    InvalidInput(InvalidInput),
}

impl From<MathError> for RegistryError {
    fn from(error: MathError) -> Self {
        match error {
            MathError::DivideByZero(e) => Self::DivideByZero(e),
            MathError::Overflow(e) => Self::Overflow(e),
            MathError::InvalidInput(e) => Self::InvalidInput(e),
        }
    }
}

sol_storage! {
    pub struct Series {
        bool issued;
        address underlying;
        address strike_asset;
        uint64 expiration;
        uint8 flavor;
        uint8 style;
        uint256 strike;
        uint256 total_written;
        uint256 collateral_locked;
        uint256 exercise_proceeds;
        uint256 total_exercised;
    }

    pub struct WriterPosition {
        uint256 open;
        uint256 written;
        bool redeemed;
    }

    #[entrypoint]
    pub struct OptionRegistry {
        bool initialized;
        // Zero reads the block timestamp.
        address clock;
        uint8 default_style;
        // European exercise window after expiration, seconds.
        uint64 exercise_window;

        mapping(bytes32 => Series) series;
        // keccak256(id, writer)
        mapping(bytes32 => WriterPosition) positions;

        mapping(bytes32 => mapping(address => uint256)) balances;
        mapping(bytes32 => uint256) supply;
        mapping(address => mapping(address => bool)) operator_approvals;
    }
}

/// Series loaded out of storage.
#[derive(Debug, Clone, Copy)]
struct SeriesRecord {
    terms: SeriesTerms,
    style: ExerciseStyle,
    book: SeriesBook,
}

fn position_key(id: B256, writer: Address) -> B256 {
    keccak256([id.as_slice(), writer.as_slice()].concat())
}

// Storage access and asset movement
impl OptionRegistry {
    fn now(&self) -> Result<u64, RegistryError> {
        let clock = self.clock.get();
        if clock.is_zero() {
            return Ok(self.vm().block_timestamp());
        }
        IClock::new(clock)
            .current_time(self)
            .map_err(|_| RegistryError::ClockUnavailable(ClockUnavailable { clock }))
    }

    fn load(&self, id: B256) -> Result<SeriesRecord, RegistryError> {
        let series = self.series.getter(id);
        if !series.issued.get() {
            return Err(RegistryError::SeriesNotFound(SeriesNotFound { id }));
        }

        let flavor = series.flavor.get().to::<u8>();
        let option_type = OptionType::from_u8(flavor)
            .ok_or(RegistryError::InvalidFlavor(InvalidFlavor { flavor }))?;
        let style = series.style.get().to::<u8>();
        let style = ExerciseStyle::from_u8(style)
            .ok_or(RegistryError::InvalidStyle(InvalidStyle { style }))?;

        Ok(SeriesRecord {
            terms: SeriesTerms {
                underlying: series.underlying.get(),
                strike_asset: series.strike_asset.get(),
                expiration: series.expiration.get().to::<u64>(),
                option_type,
                strike: series.strike.get(),
            },
            style,
            book: SeriesBook {
                total_written: series.total_written.get(),
                collateral_locked: series.collateral_locked.get(),
                exercise_proceeds: series.exercise_proceeds.get(),
                total_exercised: series.total_exercised.get(),
            },
        })
    }

    fn store_book(&mut self, id: B256, book: &SeriesBook) {
        let mut series = self.series.setter(id);
        series.total_written.set(book.total_written);
        series.collateral_locked.set(book.collateral_locked);
        series.exercise_proceeds.set(book.exercise_proceeds);
        series.total_exercised.set(book.total_exercised);
    }

    fn load_position(&self, id: B256, writer: Address) -> Position {
        let position = self.positions.getter(position_key(id, writer));
        Position {
            open: position.open.get(),
            written: position.written.get(),
            redeemed: position.redeemed.get(),
        }
    }

    fn store_position(&mut self, id: B256, writer: Address, position: &Position) {
        let mut stored = self.positions.setter(position_key(id, writer));
        stored.open.set(position.open);
        stored.written.set(position.written);
        stored.redeemed.set(position.redeemed);
    }

    fn deadline(&self, record: &SeriesRecord) -> u64 {
        let window = self.exercise_window.get().to::<u64>();
        record.style.exercise_deadline(record.terms.expiration, window)
    }

    fn mint(&mut self, id: B256, to: Address, amount: U256) -> Result<(), RegistryError> {
        let balance = self.balances.getter(id).get(to);
        let supply = self.supply.get(id);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(RegistryError::Overflow(Overflow {}))?;
        let new_supply = supply
            .checked_add(amount)
            .ok_or(RegistryError::Overflow(Overflow {}))?;

        self.balances.setter(id).insert(to, new_balance);
        self.supply.insert(id, new_supply);
        Ok(())
    }

    fn burn(&mut self, id: B256, from: Address, amount: U256) -> Result<(), RegistryError> {
        let balance = self.balances.getter(id).get(from);
        if balance < amount {
            return Err(RegistryError::InsufficientBalance(InsufficientBalance {
                available: balance,
                requested: amount,
            }));
        }
        let supply = self.supply.get(id);

        self.balances.setter(id).insert(from, balance - amount);
        self.supply.insert(id, supply.saturating_sub(amount));
        Ok(())
    }

    fn move_tokens(
        &mut self,
        id: B256,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), RegistryError> {
        let from_balance = self.balances.getter(id).get(from);
        if from_balance < amount {
            return Err(RegistryError::InsufficientBalance(InsufficientBalance {
                available: from_balance,
                requested: amount,
            }));
        }

        self.balances.setter(id).insert(from, from_balance - amount);
        let to_balance = self.balances.getter(id).get(to);
        self.balances.setter(id).insert(to, to_balance + amount);

        log(
            self.vm(),
            SeriesTransfer {
                id,
                from,
                to,
                amount,
            },
        );
        Ok(())
    }

    /// Collects `amount` of `asset` from the caller.
    ///
    /// Native assets must arrive as exactly `amount` of attached value; ERC-20
    /// assets are pulled with `transferFrom` and forbid attached value.
    fn collect(&mut self, asset: Address, from: Address, amount: U256) -> Result<(), RegistryError> {
        let attached = self.vm().msg_value();
        if asset == NATIVE_ASSET {
            if attached != amount {
                return Err(RegistryError::IncorrectPayment(IncorrectPayment {
                    expected: amount,
                    received: attached,
                }));
            }
            return Ok(());
        }
        if !attached.is_zero() {
            return Err(RegistryError::IncorrectPayment(IncorrectPayment {
                expected: U256::ZERO,
                received: attached,
            }));
        }
        if amount.is_zero() {
            return Ok(());
        }

        let registry = self.vm().contract_address();
        let transferred = IERC20::new(asset)
            .transfer_from(&mut *self, from, registry, amount)
            .map_err(|_| RegistryError::TransferFailed(TransferFailed { asset }))?;
        if !transferred {
            return Err(RegistryError::TransferFailed(TransferFailed { asset }));
        }
        Ok(())
    }

    /// Sends `amount` of `asset` out of the registry.
    fn pay(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), RegistryError> {
        if amount.is_zero() {
            return Ok(());
        }
        if asset == NATIVE_ASSET {
            return self
                .vm()
                .transfer_eth(to, amount)
                .map_err(|_| RegistryError::TransferFailed(TransferFailed { asset }));
        }

        let transferred = IERC20::new(asset)
            .transfer(&mut *self, to, amount)
            .map_err(|_| RegistryError::TransferFailed(TransferFailed { asset }))?;
        if !transferred {
            return Err(RegistryError::TransferFailed(TransferFailed { asset }));
        }
        Ok(())
    }
}

#[public]
impl OptionRegistry {
    /// One-shot configuration.
    ///
    /// # Parameters
    /// - `clock`: Contract answering `currentTime()`, or zero for block time
    /// - `default_style`: Exercise style for `issue` (0 American, 1 European)
    /// - `exercise_window`: Seconds European holders may exercise after expiration
    ///
    /// # Errors
    /// - `AlreadyInitialized`: on a second call
    /// - `InvalidStyle`: if `default_style` is not 0 or 1
    pub fn initialize(
        &mut self,
        clock: Address,
        default_style: u8,
        exercise_window: u64,
    ) -> Result<(), RegistryError> {
        if self.initialized.get() {
            return Err(RegistryError::AlreadyInitialized(AlreadyInitialized {}));
        }
        if ExerciseStyle::from_u8(default_style).is_none() {
            return Err(RegistryError::InvalidStyle(InvalidStyle {
                style: default_style,
            }));
        }

        self.initialized.set(true);
        self.clock.set(clock);
        self.default_style.set(U8::from(default_style));
        self.exercise_window.set(U64::from(exercise_window));
        Ok(())
    }

    /// Issues a series with the default exercise style.
    ///
    /// Idempotent while the series is live: issuing the same terms again
    /// returns the existing id.
    ///
    /// # Errors
    /// - `InvalidExpiration`: if `expiration` is not after the current time
    /// - `InvalidFlavor`: if `flavor` is not 0 (call) or 1 (put)
    /// - `InvalidStrike`: if `strike` is zero
    pub fn issue(
        &mut self,
        underlying: Address,
        strike_asset: Address,
        expiration: u64,
        flavor: u8,
        strike: U256,
    ) -> Result<B256, RegistryError> {
        let style = self.default_style.get().to::<u8>();
        self.issue_with_style(underlying, strike_asset, expiration, flavor, strike, style)
    }

    /// Issues a series with an explicit exercise style.
    ///
    /// # Errors
    /// Same as `issue`, plus:
    /// - `InvalidStyle`: if `style` is not 0 or 1
    /// - `ExerciseStyleMismatch`: if the series exists with another style
    pub fn issue_with_style(
        &mut self,
        underlying: Address,
        strike_asset: Address,
        expiration: u64,
        flavor: u8,
        strike: U256,
        style: u8,
    ) -> Result<B256, RegistryError> {
        let option_type =
            OptionType::from_u8(flavor).ok_or(RegistryError::InvalidFlavor(InvalidFlavor { flavor }))?;
        let exercise_style =
            ExerciseStyle::from_u8(style).ok_or(RegistryError::InvalidStyle(InvalidStyle { style }))?;
        if strike.is_zero() {
            return Err(RegistryError::InvalidStrike(InvalidStrike {}));
        }

        let terms = SeriesTerms {
            underlying,
            strike_asset,
            expiration,
            option_type,
            strike,
        };
        let id = terms.id();

        let now = self.now()?;
        if expiration <= now {
            return Err(RegistryError::InvalidExpiration(InvalidExpiration { expiration, now }));
        }

        let issued_style = {
            let existing = self.series.getter(id);
            existing
                .issued
                .get()
                .then(|| existing.style.get().to::<u8>())
        };
        if let Some(issued) = issued_style {
            if issued != style {
                return Err(RegistryError::ExerciseStyleMismatch(ExerciseStyleMismatch {
                    issued,
                    requested: style,
                }));
            }
            return Ok(id);
        }

        {
            let mut series = self.series.setter(id);
            series.issued.set(true);
            series.underlying.set(underlying);
            series.strike_asset.set(strike_asset);
            series.expiration.set(U64::from(expiration));
            series.flavor.set(U8::from(flavor));
            series.style.set(U8::from(exercise_style.to_u8()));
            series.strike.set(strike);
        }

        log(
            self.vm(),
            SeriesCreated {
                id,
                underlying,
                strike_asset,
                expiration,
                flavor,
                style,
                strike,
            },
        );
        Ok(id)
    }

    /// Writes `amount` contracts: escrows collateral and mints series tokens
    /// to the caller.
    ///
    /// # Parameters
    /// - `deposit`: Collateral the caller commits; must equal the requirement
    ///
    /// # Errors
    /// - `ZeroAmount`, `SeriesNotFound`
    /// - `SeriesExpired`: if the series has reached expiration
    /// - `InsufficientCollateral`: if `deposit` differs from the requirement
    /// - `IncorrectPayment`: if attached value does not match a native deposit
    /// - `TransferFailed`: if the collateral could not be pulled
    #[payable]
    pub fn open(&mut self, id: B256, amount: U256, deposit: U256) -> Result<(), RegistryError> {
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount(ZeroAmount {}));
        }
        let mut record = Self::load(self, id)?;
        let now = self.now()?;
        if now >= record.terms.expiration {
            return Err(RegistryError::SeriesExpired(SeriesExpired {
                expiration: record.terms.expiration,
                now,
            }));
        }

        let required = record.terms.collateral_for(amount)?;
        if deposit != required {
            return Err(RegistryError::InsufficientCollateral(InsufficientCollateral {
                required,
                provided: deposit,
            }));
        }

        let writer = self.vm().msg_sender();
        let mut position = self.load_position(id, writer);
        record.book.open(&mut position, amount, required)?;

        self.collect(record.terms.collateral_asset(), writer, required)?;
        self.mint(id, writer, amount)?;
        self.store_book(id, &record.book);
        self.store_position(id, writer, &position);

        log(
            self.vm(),
            PositionOpened {
                id,
                writer,
                amount,
                collateral: required,
            },
        );
        Ok(())
    }

    /// Burns `amount` of the caller's tokens against their own open position
    /// and returns the collateral.
    ///
    /// Tokens received by transfer can back a close only up to the amount the
    /// caller wrote.
    ///
    /// # Errors
    /// - `ZeroAmount`, `SeriesNotFound`
    /// - `SeriesExpired`: once the series has reached expiration
    /// - `InsufficientWrittenAmount`: if the caller's balance or own open
    ///   amount is below `amount`
    pub fn close(&mut self, id: B256, amount: U256) -> Result<(), RegistryError> {
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount(ZeroAmount {}));
        }
        let mut record = Self::load(self, id)?;
        let now = self.now()?;
        if now >= record.terms.expiration {
            return Err(RegistryError::SeriesExpired(SeriesExpired {
                expiration: record.terms.expiration,
                now,
            }));
        }

        let writer = self.vm().msg_sender();
        let balance = self.balances.getter(id).get(writer);
        if balance < amount {
            return Err(RegistryError::InsufficientWrittenAmount(
                InsufficientWrittenAmount {
                    available: balance,
                    requested: amount,
                },
            ));
        }

        let mut position = self.load_position(id, writer);
        let collateral = record.terms.collateral_for(amount)?;
        record.book.close(&mut position, amount, collateral)?;

        self.burn(id, writer, amount)?;
        self.store_book(id, &record.book);
        self.store_position(id, writer, &position);
        self.pay(record.terms.collateral_asset(), writer, collateral)?;

        log(
            self.vm(),
            PositionClosed {
                id,
                writer,
                amount,
                collateral,
            },
        );
        Ok(())
    }

    /// Exercises `amount` held contracts: collects the counter-asset at
    /// strike, pays out collateral from the series pool and burns the tokens.
    ///
    /// # Errors
    /// - `ZeroAmount`, `SeriesNotFound`
    /// - `ExerciseWindowClosed`: outside the series' exercise window
    /// - `InsufficientBalance`: if the caller holds fewer than `amount` tokens
    /// - `IncorrectPayment`, `TransferFailed`: if the payment cannot be collected
    #[payable]
    pub fn exercise(&mut self, id: B256, amount: U256) -> Result<(), RegistryError> {
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount(ZeroAmount {}));
        }
        let mut record = Self::load(self, id)?;
        let now = self.now()?;
        let window = self.exercise_window.get().to::<u64>();
        if !record.style.can_exercise(record.terms.expiration, window, now) {
            return Err(RegistryError::ExerciseWindowClosed(ExerciseWindowClosed { now }));
        }

        let holder = self.vm().msg_sender();
        self.burn(id, holder, amount)?;

        let payment = record.terms.exercise_payment(amount)?;
        let collateral_due = record.terms.collateral_for(amount)?;
        let payout = record.book.exercise(amount, collateral_due, payment)?;

        self.collect(record.terms.counter_asset(), holder, payment)?;
        self.store_book(id, &record.book);
        self.pay(record.terms.collateral_asset(), holder, payout)?;

        log(
            self.vm(),
            Exercised {
                id,
                holder,
                amount,
                payment,
                payout,
            },
        );
        Ok(())
    }

    /// Pays the caller's pro-rata share of remaining collateral and exercise
    /// proceeds once exercise is no longer possible.
    ///
    /// # Returns
    /// `(collateral, proceeds)` paid
    ///
    /// # Errors
    /// - `SeriesNotFound`
    /// - `SeriesNotExpired`: until the exercise window has closed
    /// - `NotWriter`: if the caller never wrote the series
    /// - `AlreadyRedeemed`: on a second redemption
    pub fn redeem(&mut self, id: B256) -> Result<(U256, U256), RegistryError> {
        let mut record = Self::load(self, id)?;
        let now = self.now()?;
        let deadline = self.deadline(&record);
        if now <= deadline {
            return Err(RegistryError::SeriesNotExpired(SeriesNotExpired {
                redeemable_after: deadline,
                now,
            }));
        }

        let writer = self.vm().msg_sender();
        let mut position = self.load_position(id, writer);
        let (collateral, proceeds) = record.book.redeem(&mut position)?;

        self.store_book(id, &record.book);
        self.store_position(id, writer, &position);
        self.pay(record.terms.collateral_asset(), writer, collateral)?;
        self.pay(record.terms.counter_asset(), writer, proceeds)?;

        log(
            self.vm(),
            Redeemed {
                id,
                writer,
                collateral,
                proceeds,
            },
        );
        Ok((collateral, proceeds))
    }

    /// Moves series tokens from the caller. Written amounts stay with the
    /// writer.
    ///
    /// # Errors
    /// - `InsufficientBalance`: if the caller holds fewer than `amount`
    pub fn transfer(&mut self, to: Address, id: B256, amount: U256) -> Result<(), RegistryError> {
        let from = self.vm().msg_sender();
        self.move_tokens(id, from, to, amount)
    }

    /// Moves series tokens on behalf of `from`.
    ///
    /// # Errors
    /// - `NotApproved`: if the caller is neither `from` nor its operator
    /// - `InsufficientBalance`: if `from` holds fewer than `amount`
    pub fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        id: B256,
        amount: U256,
    ) -> Result<(), RegistryError> {
        let operator = self.vm().msg_sender();
        if operator != from && !self.operator_approvals.getter(from).get(operator) {
            return Err(RegistryError::NotApproved(NotApproved {
                owner: from,
                operator,
            }));
        }
        self.move_tokens(id, from, to, amount)
    }

    pub fn set_approval_for_all(&mut self, operator: Address, approved: bool) {
        let owner = self.vm().msg_sender();
        self.operator_approvals
            .setter(owner)
            .insert(operator, approved);
        log(
            self.vm(),
            ApprovalForAll {
                owner,
                operator,
                approved,
            },
        );
    }

    // ========================================
    // View Functions
    // ========================================

    #[must_use]
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operator_approvals.getter(owner).get(operator)
    }

    #[must_use]
    pub fn balance_of(&self, owner: Address, id: B256) -> U256 {
        self.balances.getter(id).get(owner)
    }

    #[must_use]
    pub fn total_supply(&self, id: B256) -> U256 {
        self.supply.get(id)
    }

    /// Id the given terms hash to, whether or not the series was issued.
    ///
    /// # Errors
    /// - `InvalidFlavor`: if `flavor` is not 0 or 1
    pub fn series_id(
        &self,
        underlying: Address,
        strike_asset: Address,
        expiration: u64,
        flavor: u8,
        strike: U256,
    ) -> Result<B256, RegistryError> {
        let option_type =
            OptionType::from_u8(flavor).ok_or(RegistryError::InvalidFlavor(InvalidFlavor { flavor }))?;
        Ok(SeriesTerms {
            underlying,
            strike_asset,
            expiration,
            option_type,
            strike,
        }
        .id())
    }

    /// Terms of an issued series.
    ///
    /// # Returns
    /// `(underlying, strike_asset, expiration, flavor, strike)`
    ///
    /// # Errors
    /// - `SeriesNotFound`
    pub fn series_info(&self, id: B256) -> Result<(Address, Address, u64, u8, U256), RegistryError> {
        let terms = self.load(id)?.terms;
        Ok((
            terms.underlying,
            terms.strike_asset,
            terms.expiration,
            terms.option_type.to_u8(),
            terms.strike,
        ))
    }

    /// Lifecycle phase: 0 unissued, 1 active, 2 exercisable after expiration,
    /// 3 redeemable, 4 settled.
    ///
    /// # Errors
    /// - `ClockUnavailable`: if the configured clock cannot be read
    pub fn series_state(&self, id: B256) -> Result<u8, RegistryError> {
        let Ok(record) = self.load(id) else {
            return Ok(SeriesState::Unissued.to_u8());
        };
        let now = self.now()?;
        let deadline = self.deadline(&record);
        Ok(SeriesState::at(record.terms.expiration, deadline, now, &record.book).to_u8())
    }

    /// # Errors
    /// - `SeriesNotFound`
    pub fn exercise_style(&self, id: B256) -> Result<u8, RegistryError> {
        Ok(self.load(id)?.style.to_u8())
    }

    /// # Returns
    /// `(open, written)` for `writer`; `open` drops to zero on redemption
    #[must_use]
    pub fn get_position(&self, writer: Address, id: B256) -> (U256, U256) {
        let position = self.load_position(id, writer);
        (position.open, position.written)
    }

    #[must_use]
    pub fn is_redeemed(&self, writer: Address, id: B256) -> bool {
        self.load_position(id, writer).redeemed
    }

    /// Collateral `open` expects for `amount` contracts.
    ///
    /// # Errors
    /// - `SeriesNotFound`, `Overflow`
    pub fn required_collateral(&self, id: B256, amount: U256) -> Result<U256, RegistryError> {
        Ok(self.load(id)?.terms.collateral_for(amount)?)
    }

    /// # Returns
    /// `(total_written, collateral_locked, exercise_proceeds, total_exercised)`
    ///
    /// # Errors
    /// - `SeriesNotFound`
    pub fn series_book(&self, id: B256) -> Result<(U256, U256, U256, U256), RegistryError> {
        let book = self.load(id)?.book;
        Ok((
            book.total_written,
            book.collateral_locked,
            book.exercise_proceeds,
            book.total_exercised,
        ))
    }

    /// # Errors
    /// - `ClockUnavailable`: if the configured clock cannot be read
    pub fn current_time(&self) -> Result<u64, RegistryError> {
        self.now()
    }
}
