//! Black-Scholes valuation of European calls and puts.
//!
//! ```text
//! d1 = (ln(S/K) + (r + σ²/2) t) / (σ √t)
//! d2 = d1 - σ √t
//! call = S Φ(d1) - K e^(-rt) Φ(d2)
//! put  = K e^(-rt) Φ(-d2) - S Φ(-d1)
//! ```
//!
//! All inputs are wads: `volatility` and `rate` are annualized fractions
//! (`0.6` is 60%), `years` is time to expiry in years.

use alloy_primitives::{I256, U256};

use crate::fixed_point::{exp_wad, ln_wad, signed, signed_mul_div, sqrt_wad, to_signed, wad_mul, WAD};
use crate::normal::cdf;
use crate::series::OptionType;
use crate::MathError;

/// Julian year, `86_400 * 365.25`.
pub const SECONDS_PER_YEAR: u64 = 31_557_600;

/// Premium of one unit of the option.
///
/// Expired options (`years == 0`) are worth their intrinsic value. When
/// `σ√t` vanishes the price collapses to the intrinsic value against the
/// discounted strike.
///
/// # Errors
/// - `InvalidInput`: if `spot` or `strike` is zero
/// - `Overflow`: if an intermediate does not fit 256 bits
pub fn price(
    option_type: OptionType,
    spot: U256,
    strike: U256,
    years: U256,
    volatility: U256,
    rate: U256,
) -> Result<U256, MathError> {
    if spot.is_zero() || strike.is_zero() {
        return Err(MathError::invalid_input());
    }
    if years.is_zero() {
        return Ok(intrinsic_value(option_type, spot, strike));
    }

    let discount = exp_wad(signed(true, wad_mul(rate, years)?)?)?;
    let discounted_strike = wad_mul(strike, discount)?;

    let spread = wad_mul(volatility, sqrt_wad(years)?)?;
    if spread.is_zero() {
        return Ok(intrinsic_value(option_type, spot, discounted_strike));
    }

    let log_moneyness = ln_wad(spot)?
        .checked_sub(ln_wad(strike)?)
        .ok_or(MathError::overflow())?;
    let drift = rate + (wad_mul(volatility, volatility)? >> 1);
    let numerator = log_moneyness
        .checked_add(to_signed(wad_mul(drift, years)?)?)
        .ok_or(MathError::overflow())?;

    let d1 = signed_mul_div(numerator, WAD, spread)?;
    let d2 = d1
        .checked_sub(to_signed(spread)?)
        .ok_or(MathError::overflow())?;

    let premium = match option_type {
        OptionType::Call => {
            wad_mul(spot, cdf(d1)?)?.saturating_sub(wad_mul(discounted_strike, cdf(d2)?)?)
        }
        OptionType::Put => wad_mul(discounted_strike, cdf(negate(d2)?)?)?
            .saturating_sub(wad_mul(spot, cdf(negate(d1)?)?)?),
    };
    Ok(premium)
}

/// Exercise value at `spot` against `strike`, floored at zero.
pub fn intrinsic_value(option_type: OptionType, spot: U256, strike: U256) -> U256 {
    match option_type {
        OptionType::Call => spot.saturating_sub(strike),
        OptionType::Put => strike.saturating_sub(spot),
    }
}

/// Time between `now` and `expiration` as a wad of years, zero once expired.
pub fn years_to_expiry(expiration: u64, now: u64) -> U256 {
    if expiration <= now {
        return U256::ZERO;
    }
    U256::from(expiration - now) * WAD / U256::from(SECONDS_PER_YEAR)
}

fn negate(value: I256) -> Result<I256, MathError> {
    value.checked_neg().ok_or(MathError::overflow())
}
