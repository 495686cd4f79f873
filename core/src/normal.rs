//! Standard normal distribution.
//!
//! The CDF uses the Zelen & Severo polynomial (Abramowitz & Stegun 26.2.17):
//!
//! ```text
//! Φ(x) = 1 - φ(x) (b1 t + b2 t² + b3 t³ + b4 t⁴ + b5 t⁵),  t = 1 / (1 + p x),  x >= 0
//! ```
//!
//! with absolute error below 7.5e-8, far inside the one-cent pricing band.
//! Outside `|x| <= 6` the result is clamped to exactly 0 or 1.

use alloy_primitives::{I256, U256};

use crate::fixed_point::{exp_wad, mul_div, signed, wad_mul, WAD};
use crate::MathError;

/// `1 / sqrt(2π)` in wad.
const INV_SQRT_2PI: U256 = U256::from_limbs([398_942_280_401_432_678, 0, 0, 0]);

const P: U256 = U256::from_limbs([231_641_900_000_000_000, 0, 0, 0]);
const B1: U256 = U256::from_limbs([319_381_530_000_000_000, 0, 0, 0]);
const B2: U256 = U256::from_limbs([356_563_782_000_000_000, 0, 0, 0]); // negative
const B3: U256 = U256::from_limbs([1_781_477_937_000_000_000, 0, 0, 0]);
const B4: U256 = U256::from_limbs([1_821_255_978_000_000_000, 0, 0, 0]); // negative
const B5: U256 = U256::from_limbs([1_330_274_429_000_000_000, 0, 0, 0]);

/// Beyond this magnitude Φ is clamped to 0 or 1.
pub const CLAMP: U256 = U256::from_limbs([6_000_000_000_000_000_000, 0, 0, 0]);

/// Standard normal cumulative distribution function.
///
/// # Parameters
/// - `x`: Signed wad
///
/// # Returns
/// Φ(x) as a wad in `[0, WAD]`
///
/// # Errors
/// Propagates `MathError` from the underlying fixed-point operations; none
/// are reachable for `|x| <= 6`.
pub fn cdf(x: I256) -> Result<U256, MathError> {
    let magnitude = x.unsigned_abs();
    if magnitude > CLAMP {
        return Ok(if x.is_negative() { U256::ZERO } else { WAD });
    }

    let t = mul_div(WAD, WAD, WAD + wad_mul(P, magnitude)?)?;
    let t2 = wad_mul(t, t)?;
    let t3 = wad_mul(t2, t)?;
    let t4 = wad_mul(t3, t)?;
    let t5 = wad_mul(t4, t)?;

    // Split by coefficient sign so every intermediate stays unsigned.
    let positive = wad_mul(B1, t)? + wad_mul(B3, t3)? + wad_mul(B5, t5)?;
    let negative = wad_mul(B2, t2)? + wad_mul(B4, t4)?;
    let polynomial = positive
        .checked_sub(negative)
        .ok_or(MathError::overflow())?;

    let tail = wad_mul(pdf(magnitude)?, polynomial)?;
    if x.is_negative() {
        Ok(tail)
    } else {
        Ok(WAD.saturating_sub(tail))
    }
}

/// Standard normal density `φ(x) = e^(-x²/2) / sqrt(2π)`.
///
/// φ is even, so only the magnitude is needed.
///
/// # Errors
/// - `Overflow`: if `x²` does not fit 256 bits
pub fn pdf(magnitude: U256) -> Result<U256, MathError> {
    let half_square = mul_div(magnitude, magnitude, WAD << 1)?;
    let decay = exp_wad(signed(true, half_square)?)?;
    wad_mul(INV_SQRT_2PI, decay)
}
