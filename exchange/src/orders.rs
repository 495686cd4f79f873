//! Limit order state and fill arithmetic.
//!
//! A buy order locks `price * quantity` of its quote token up front; a sell
//! order locks the series tokens themselves. Fills always settle at the
//! maker's price.

use alloy_primitives::{Address, B256, U256};
use options_core::fixed_point::wad_mul;

use crate::{ExchangeError, FillExceedsOrder, InvalidSide, Overflow, ZeroAmount};

/// Represents the side of an order in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderSide {
    /// Buy order: maker wants to buy option tokens with quote tokens.
    Buy = 0,
    /// Sell order: maker wants to sell option tokens for quote tokens.
    Sell = 1,
}

impl OrderSide {
    /// Converts a u8 to OrderSide.
    ///
    /// # Errors
    /// Returns `InvalidSide` for anything other than 0 or 1.
    pub const fn from_u8(value: u8) -> Result<Self, ExchangeError> {
        match value {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            _ => Err(ExchangeError::InvalidSide(InvalidSide { side: value })),
        }
    }

    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// A resting limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub maker: Address,
    pub series: B256,
    pub quote_token: Address,
    /// Quote tokens per option token, wad.
    pub price: U256,
    /// Option tokens still available to fill.
    pub remaining: U256,
    /// Maker balance held by the order: quote tokens for a buy, option tokens
    /// for a sell.
    pub locked: U256,
    pub side: OrderSide,
}

/// Settlement of one fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub quantity: U256,
    /// Quote tokens paid for `quantity`.
    pub cost: U256,
    /// Quote tokens released back to a buy-order maker once fully filled.
    pub refund: U256,
}

impl Order {
    /// New order and the amount it must lock from the maker.
    ///
    /// # Errors
    /// - `ZeroAmount`: if `price` or `quantity` is zero
    /// - `Overflow`: if `price * quantity` exceeds `U256::MAX`
    pub fn place(
        maker: Address,
        series: B256,
        quote_token: Address,
        price: U256,
        quantity: U256,
        side: OrderSide,
    ) -> Result<Self, ExchangeError> {
        if price.is_zero() || quantity.is_zero() {
            return Err(ExchangeError::ZeroAmount(ZeroAmount {}));
        }
        let locked = match side {
            OrderSide::Buy => wad_mul(price, quantity)?,
            OrderSide::Sell => quantity,
        };
        Ok(Self {
            maker,
            series,
            quote_token,
            price,
            remaining: quantity,
            locked,
            side,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.remaining.is_zero()
    }

    /// Takes `quantity` off the order at the maker's price.
    ///
    /// Rounding dust left in a buy order's lock is refunded with the fill
    /// that empties it.
    ///
    /// # Errors
    /// - `ZeroAmount`: if `quantity` is zero
    /// - `FillExceedsOrder`: if `quantity` is more than what remains
    pub fn fill(&mut self, quantity: U256) -> Result<Fill, ExchangeError> {
        if quantity.is_zero() {
            return Err(ExchangeError::ZeroAmount(ZeroAmount {}));
        }
        if quantity > self.remaining {
            return Err(ExchangeError::FillExceedsOrder(FillExceedsOrder {
                remaining: self.remaining,
                requested: quantity,
            }));
        }

        let cost = wad_mul(self.price, quantity)?;
        let remaining = self.remaining - quantity;
        let released = match self.side {
            OrderSide::Buy if remaining.is_zero() => self.locked,
            OrderSide::Buy => cost,
            OrderSide::Sell => quantity,
        };
        let locked = self
            .locked
            .checked_sub(released)
            .ok_or(ExchangeError::Overflow(Overflow {}))?;
        let refund = match self.side {
            OrderSide::Buy => released
                .checked_sub(cost)
                .ok_or(ExchangeError::Overflow(Overflow {}))?,
            OrderSide::Sell => U256::ZERO,
        };

        self.remaining = remaining;
        self.locked = locked;
        Ok(Fill {
            quantity,
            cost,
            refund,
        })
    }

    /// Closes the order and returns whatever it still locks.
    pub fn cancel(&mut self) -> U256 {
        let released = self.locked;
        self.remaining = U256::ZERO;
        self.locked = U256::ZERO;
        released
    }
}
