//! Time-decaying put auction price.
//!
//! The price accrues linearly from zero when the auction starts to the full
//! notional after [`AUCTION_WINDOW`] seconds, then stays there. The accrued
//! amount is divided by a wad discount factor, so any discount below one
//! raises the price.

use alloy_primitives::U256;

use crate::fixed_point::{mul_div, WAD};
use crate::MathError;

/// Seconds until the auction price reaches the notional (12 hours).
pub const AUCTION_WINDOW: u64 = 43_200;

/// Auction price after `elapsed` seconds.
///
/// # Parameters
/// - `notional`: Full price reached at the end of the window, wad
/// - `elapsed`: Seconds since the auction started
/// - `discount`: Wad discount factor applied as `1 / discount`
///
/// # Errors
/// - `DivideByZero`: if `discount` is zero and `elapsed` is not
/// - `Overflow`: if the discounted price exceeds `U256::MAX`
pub fn put_auction_price(notional: U256, elapsed: u64, discount: U256) -> Result<U256, MathError> {
    if elapsed == 0 {
        return Ok(U256::ZERO);
    }
    if discount.is_zero() {
        return Err(MathError::divide_by_zero());
    }

    let accrued = mul_div(
        notional,
        U256::from(elapsed.min(AUCTION_WINDOW)),
        U256::from(AUCTION_WINDOW),
    )?;
    mul_div(accrued, WAD, discount)
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// Property: price never decreases with time and never exceeds the notional
        #[test]
        fn prop_auction_non_decreasing(
            notional in 0u128..u128::MAX,
            earlier in 0u64..100_000,
            later_gap in 0u64..100_000,
        ) {
            let notional = U256::from(notional);
            let first = put_auction_price(notional, earlier, WAD).unwrap();
            let second = put_auction_price(notional, earlier + later_gap, WAD).unwrap();
            prop_assert!(second >= first);
            prop_assert!(second <= notional);
        }
    }
}
