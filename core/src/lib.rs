//! Pricing primitives shared by the option contracts.
//!
//! Every monetary value is a `U256` scaled by 10^18 ("wad"). Nothing in this
//! crate touches floating point: the normal CDF, the logarithm and the
//! exponential are evaluated with fixed-degree series over integers so that
//! every contract that links this crate prices identically.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`fixed_point`] | `mul_div`, wad multiply/divide, `sqrt`, `ln`, `exp` |
//! | [`normal`] | Standard normal CDF and PDF |
//! | [`black_scholes`] | Call/put premium and time-to-expiry conversion |
//! | [`auction`] | Linearly accruing put auction price |
//! | [`series`] | Series identity, flavors and escrow requirements |
#![cfg_attr(not(test), no_std)]
extern crate alloc;

use alloc::{vec, vec::Vec};
use alloy_sol_types::sol;
use stylus_sdk::prelude::*;

pub mod auction;
pub mod black_scholes;
pub mod fixed_point;
pub mod normal;
pub mod series;

pub use fixed_point::WAD;
pub use series::{ExerciseStyle, OptionType, SeriesTerms, NATIVE_ASSET};

sol! {
    /// Errors raised by fixed-point arithmetic.
    #[derive(Debug)]
    error Overflow();
    #[derive(Debug)]
    error DivideByZero();
    #[derive(Debug)]
    error InvalidInput();
}

#[derive(SolidityError, Debug)]
pub enum MathError {
    /// Result does not fit in 256 bits.
    Overflow(Overflow),
    /// Denominator was zero.
    DivideByZero(DivideByZero),
    /// Argument outside the function's domain (e.g. `ln(0)`).
    InvalidInput(InvalidInput),
}

impl MathError {
    pub(crate) const fn overflow() -> Self {
        Self::Overflow(Overflow {})
    }

    pub(crate) const fn divide_by_zero() -> Self {
        Self::DivideByZero(DivideByZero {})
    }

    pub(crate) const fn invalid_input() -> Self {
        Self::InvalidInput(InvalidInput {})
    }
}
