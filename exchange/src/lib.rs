//! Exchange for registry-issued option series.
//!
//! Users deposit ERC-20 quote tokens and series tokens into internal
//! balances, rest limit orders against them and fill each other's orders at
//! the maker's price. Orders are filled one at a time by id; there is no
//! matching engine.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]
extern crate alloc;

#[cfg(feature = "export-abi")]
pub fn print_from_args() {
    stylus_sdk::export_abi!("option-exchange", 1);
}

pub mod orders;

use alloc::{vec, vec::Vec};
use alloy_primitives::{Address, B256, U256, U8};
use alloy_sol_types::sol;
use options_core::MathError;
use stylus_sdk::prelude::*;
use stylus_sdk::stylus_core::log;

pub use options_core::Overflow;

use crate::orders::{Order, OrderSide};

sol_interface! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }

    interface IOptionRegistry {
        function transfer(address to, bytes32 id, uint256 amount) external;
        function transferFrom(address from, address to, bytes32 id, uint256 amount) external;
    }
}

sol! {
    event Deposit(address indexed owner, address indexed token, uint256 amount);
    event Withdraw(address indexed owner, address indexed token, uint256 amount);
    event OptionsDeposited(address indexed owner, bytes32 indexed id, uint256 amount);
    event OptionsWithdrawn(address indexed owner, bytes32 indexed id, uint256 amount);
    event OrderPlaced(
        uint256 indexed order_id,
        address indexed maker,
        bytes32 indexed id,
        address quote_token,
        uint256 price,
        uint256 quantity,
        uint8 side
    );
    event OrderCancelled(uint256 indexed order_id, address indexed maker, uint256 released);
    event Trade(
        uint256 indexed order_id,
        address indexed maker,
        address indexed taker,
        bytes32 id,
        uint256 quantity,
        uint256 price,
        uint256 cost
    );

    /// Errors that can occur in the Exchange contract.
    #[derive(Debug)]
    error AlreadyInitialized();
    #[derive(Debug)]
    error ZeroAmount();
    #[derive(Debug)]
    error InsufficientBalance(uint256 available, uint256 requested);
    #[derive(Debug)]
    error OrderNotFound(uint256 order_id);
    #[derive(Debug)]
    error NotOrderMaker(uint256 order_id, address caller);
    #[derive(Debug)]
    error InvalidSide(uint8 side);
    #[derive(Debug)]
    error FillExceedsOrder(uint256 remaining, uint256 requested);
    #[derive(Debug)]
    error TransferFailed(address asset);
}

#[derive(SolidityError, Debug)]
pub enum ExchangeError {
    AlreadyInitialized(AlreadyInitialized),
    ZeroAmount(ZeroAmount),
    /// Internal balance cannot cover the request.
    InsufficientBalance(InsufficientBalance),
    /// No open order with this id.
    OrderNotFound(OrderNotFound),
    NotOrderMaker(NotOrderMaker),
    /// Side is neither 0 (buy) nor 1 (sell).
    InvalidSide(InvalidSide),
    FillExceedsOrder(FillExceedsOrder),
    /// Token or registry transfer reverted or returned false.
    TransferFailed(TransferFailed),
    Overflow(Overflow),
}

impl From<MathError> for ExchangeError {
    fn from(_: MathError) -> Self {
        Self::Overflow(Overflow {})
    }
}

sol_storage! {
    pub struct StoredOrder {
        address maker;
        bytes32 series;
        address quote_token;
        uint256 price;
        uint256 remaining;
        uint256 locked;
        uint8 side;
    }

    #[entrypoint]
    pub struct Exchange {
        bool initialized;
        address registry;

        // owner => token => amount
        mapping(address => mapping(address => uint256)) balances;
        // owner => series => amount
        mapping(address => mapping(bytes32 => uint256)) option_balances;

        mapping(uint256 => StoredOrder) orders;
        uint256 next_order_id;
    }
}

fn insufficient(available: U256, requested: U256) -> ExchangeError {
    ExchangeError::InsufficientBalance(InsufficientBalance {
        available,
        requested,
    })
}

// Private helper methods
impl Exchange {
    fn credit(&mut self, owner: Address, token: Address, amount: U256) -> Result<(), ExchangeError> {
        let balance = self.balances.getter(owner).get(token);
        let updated = balance
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow(Overflow {}))?;
        self.balances.setter(owner).insert(token, updated);
        Ok(())
    }

    fn debit(&mut self, owner: Address, token: Address, amount: U256) -> Result<(), ExchangeError> {
        let balance = self.balances.getter(owner).get(token);
        if balance < amount {
            return Err(insufficient(balance, amount));
        }
        self.balances.setter(owner).insert(token, balance - amount);
        Ok(())
    }

    fn credit_options(&mut self, owner: Address, id: B256, amount: U256) -> Result<(), ExchangeError> {
        let balance = self.option_balances.getter(owner).get(id);
        let updated = balance
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow(Overflow {}))?;
        self.option_balances.setter(owner).insert(id, updated);
        Ok(())
    }

    fn debit_options(&mut self, owner: Address, id: B256, amount: U256) -> Result<(), ExchangeError> {
        let balance = self.option_balances.getter(owner).get(id);
        if balance < amount {
            return Err(insufficient(balance, amount));
        }
        self.option_balances.setter(owner).insert(id, balance - amount);
        Ok(())
    }

    fn load_order(&self, order_id: U256) -> Result<Order, ExchangeError> {
        let stored = self.orders.getter(order_id);
        let maker = stored.maker.get();
        let remaining = stored.remaining.get();
        if maker.is_zero() || remaining.is_zero() {
            return Err(ExchangeError::OrderNotFound(OrderNotFound { order_id }));
        }
        Ok(Order {
            maker,
            series: stored.series.get(),
            quote_token: stored.quote_token.get(),
            price: stored.price.get(),
            remaining,
            locked: stored.locked.get(),
            side: OrderSide::from_u8(stored.side.get().to::<u8>())?,
        })
    }

    fn store_order(&mut self, order_id: U256, order: &Order) {
        let mut stored = self.orders.setter(order_id);
        stored.maker.set(order.maker);
        stored.series.set(order.series);
        stored.quote_token.set(order.quote_token);
        stored.price.set(order.price);
        stored.remaining.set(order.remaining);
        stored.locked.set(order.locked);
        stored.side.set(U8::from(order.side.to_u8()));
    }
}

#[public]
impl Exchange {
    /// Points the exchange at the registry whose series it trades.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call
    pub fn initialize(&mut self, registry: Address) -> Result<(), ExchangeError> {
        if self.initialized.get() {
            return Err(ExchangeError::AlreadyInitialized(AlreadyInitialized {}));
        }
        self.initialized.set(true);
        self.registry.set(registry);
        self.next_order_id.set(U256::from(1));
        Ok(())
    }

    /// Pulls `amount` of an ERC-20 into the caller's exchange balance.
    ///
    /// # Errors
    /// - `ZeroAmount`
    /// - `TransferFailed` if `transferFrom` reverts or returns false
    pub fn deposit_token(&mut self, token: Address, amount: U256) -> Result<(), ExchangeError> {
        if amount.is_zero() {
            return Err(ExchangeError::ZeroAmount(ZeroAmount {}));
        }
        let owner = self.vm().msg_sender();
        let exchange = self.vm().contract_address();
        let transferred = IERC20::new(token)
            .transfer_from(&mut *self, owner, exchange, amount)
            .map_err(|_| ExchangeError::TransferFailed(TransferFailed { asset: token }))?;
        if !transferred {
            return Err(ExchangeError::TransferFailed(TransferFailed { asset: token }));
        }

        self.credit(owner, token, amount)?;
        log(self.vm(), Deposit { owner, token, amount });
        Ok(())
    }

    /// Sends `amount` of an ERC-20 from the caller's exchange balance.
    ///
    /// # Errors
    /// - `ZeroAmount`, `InsufficientBalance`, `TransferFailed`
    pub fn withdraw_token(&mut self, token: Address, amount: U256) -> Result<(), ExchangeError> {
        if amount.is_zero() {
            return Err(ExchangeError::ZeroAmount(ZeroAmount {}));
        }
        let owner = self.vm().msg_sender();
        self.debit(owner, token, amount)?;

        let transferred = IERC20::new(token)
            .transfer(&mut *self, owner, amount)
            .map_err(|_| ExchangeError::TransferFailed(TransferFailed { asset: token }))?;
        if !transferred {
            return Err(ExchangeError::TransferFailed(TransferFailed { asset: token }));
        }

        log(self.vm(), Withdraw { owner, token, amount });
        Ok(())
    }

    /// Moves series tokens from the caller's registry balance into the
    /// exchange. The caller must have approved the exchange as operator.
    ///
    /// # Errors
    /// - `ZeroAmount`
    /// - `TransferFailed` if the registry refuses the transfer
    pub fn deposit_options(&mut self, id: B256, amount: U256) -> Result<(), ExchangeError> {
        if amount.is_zero() {
            return Err(ExchangeError::ZeroAmount(ZeroAmount {}));
        }
        let owner = self.vm().msg_sender();
        let exchange = self.vm().contract_address();
        let registry = self.registry.get();
        IOptionRegistry::new(registry)
            .transfer_from(&mut *self, owner, exchange, id, amount)
            .map_err(|_| ExchangeError::TransferFailed(TransferFailed { asset: registry }))?;

        self.credit_options(owner, id, amount)?;
        log(self.vm(), OptionsDeposited { owner, id, amount });
        Ok(())
    }

    /// Returns series tokens from the caller's exchange balance.
    ///
    /// # Errors
    /// - `ZeroAmount`, `InsufficientBalance`, `TransferFailed`
    pub fn withdraw_options(&mut self, id: B256, amount: U256) -> Result<(), ExchangeError> {
        if amount.is_zero() {
            return Err(ExchangeError::ZeroAmount(ZeroAmount {}));
        }
        let owner = self.vm().msg_sender();
        self.debit_options(owner, id, amount)?;

        let registry = self.registry.get();
        IOptionRegistry::new(registry)
            .transfer(&mut *self, owner, id, amount)
            .map_err(|_| ExchangeError::TransferFailed(TransferFailed { asset: registry }))?;

        log(self.vm(), OptionsWithdrawn { owner, id, amount });
        Ok(())
    }

    /// Rests a limit order for series `id` priced in `quote_token`.
    ///
    /// Locks from the maker's exchange balance:
    /// - Buy: `price * quantity` of the quote token
    /// - Sell: `quantity` series tokens
    ///
    /// # Parameters
    /// - `price`: Quote tokens per series token, wad
    /// - `side`: 0 = Buy, 1 = Sell
    ///
    /// # Returns
    /// Order id for `cancel_order` and `fill_order`.
    ///
    /// # Errors
    /// - `InvalidSide`, `ZeroAmount`
    /// - `InsufficientBalance` if the maker cannot cover the lock
    pub fn place_order(
        &mut self,
        id: B256,
        quote_token: Address,
        price: U256,
        quantity: U256,
        side: u8,
    ) -> Result<U256, ExchangeError> {
        let side = OrderSide::from_u8(side)?;
        let maker = self.vm().msg_sender();
        let order = Order::place(maker, id, quote_token, price, quantity, side)?;

        match side {
            OrderSide::Buy => self.debit(maker, quote_token, order.locked)?,
            OrderSide::Sell => self.debit_options(maker, id, order.locked)?,
        }

        let order_id = self.next_order_id.get();
        self.next_order_id.set(order_id + U256::from(1));
        self.store_order(order_id, &order);

        log(
            self.vm(),
            OrderPlaced {
                order_id,
                maker,
                id,
                quote_token,
                price,
                quantity,
                side: side.to_u8(),
            },
        );
        Ok(order_id)
    }

    /// Closes an open order and returns its lock to the maker's balance.
    ///
    /// # Errors
    /// - `OrderNotFound` if the order is unknown, filled or cancelled
    /// - `NotOrderMaker` if the caller did not place it
    pub fn cancel_order(&mut self, order_id: U256) -> Result<(), ExchangeError> {
        let mut order = self.load_order(order_id)?;
        let caller = self.vm().msg_sender();
        if caller != order.maker {
            return Err(ExchangeError::NotOrderMaker(NotOrderMaker { order_id, caller }));
        }

        let released = order.cancel();
        match order.side {
            OrderSide::Buy => self.credit(order.maker, order.quote_token, released)?,
            OrderSide::Sell => self.credit_options(order.maker, order.series, released)?,
        }
        self.store_order(order_id, &order);

        log(
            self.vm(),
            OrderCancelled {
                order_id,
                maker: order.maker,
                released,
            },
        );
        Ok(())
    }

    /// Takes `quantity` of an open order at the maker's price.
    ///
    /// Against a sell order the caller pays quote tokens and receives series
    /// tokens; against a buy order the caller delivers series tokens and
    /// receives the locked quote tokens.
    ///
    /// # Returns
    /// Quote tokens exchanged
    ///
    /// # Errors
    /// - `OrderNotFound`, `ZeroAmount`, `FillExceedsOrder`
    /// - `InsufficientBalance` if the taker cannot pay or deliver
    pub fn fill_order(&mut self, order_id: U256, quantity: U256) -> Result<U256, ExchangeError> {
        let mut order = self.load_order(order_id)?;
        let taker = self.vm().msg_sender();
        let fill = order.fill(quantity)?;

        match order.side {
            OrderSide::Sell => {
                self.debit(taker, order.quote_token, fill.cost)?;
                self.credit(order.maker, order.quote_token, fill.cost)?;
                self.credit_options(taker, order.series, fill.quantity)?;
            }
            OrderSide::Buy => {
                self.debit_options(taker, order.series, fill.quantity)?;
                self.credit_options(order.maker, order.series, fill.quantity)?;
                self.credit(taker, order.quote_token, fill.cost)?;
                self.credit(order.maker, order.quote_token, fill.refund)?;
            }
        }
        self.store_order(order_id, &order);

        log(
            self.vm(),
            Trade {
                order_id,
                maker: order.maker,
                taker,
                id: order.series,
                quantity: fill.quantity,
                price: order.price,
                cost: fill.cost,
            },
        );
        Ok(fill.cost)
    }

    // ========================================
    // View Functions
    // ========================================

    #[must_use]
    pub fn balance_of(&self, owner: Address, token: Address) -> U256 {
        self.balances.getter(owner).get(token)
    }

    #[must_use]
    pub fn option_balance_of(&self, owner: Address, id: B256) -> U256 {
        self.option_balances.getter(owner).get(id)
    }

    /// Open order as `(maker, series, quote_token, price, remaining, side)`.
    ///
    /// # Errors
    /// - `OrderNotFound` if the order is unknown, filled or cancelled
    pub fn order_info(
        &self,
        order_id: U256,
    ) -> Result<(Address, B256, Address, U256, U256, u8), ExchangeError> {
        let order = self.load_order(order_id)?;
        Ok((
            order.maker,
            order.series,
            order.quote_token,
            order.price,
            order.remaining,
            order.side.to_u8(),
        ))
    }

    #[must_use]
    pub fn registry(&self) -> Address {
        self.registry.get()
    }
}
