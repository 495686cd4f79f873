//! Wad (10^18) fixed-point arithmetic.
//!
//! Rounding policy: every operation truncates. Unsigned results round toward
//! zero, signed results round toward zero as well, so no operation ever
//! rounds in the caller's favour.

use alloy_primitives::{I256, U256, U512};

use crate::MathError;

/// 1.0 in wad representation.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// ln(2) in wad.
pub const LN_2: U256 = U256::from_limbs([693_147_180_559_945_309, 0, 0, 0]);

/// Inputs below `-42.0` make `exp` smaller than one wei.
const EXP_MIN_EXPONENT: U256 = U256::from_limbs([5_106_511_852_580_896_768, 2, 0, 0]);

/// `exp(135.0)` is the largest power that still fits 256 bits as a wad.
const EXP_MAX_EXPONENT: U256 = U256::from_limbs([5_872_791_484_033_138_688, 7, 0, 0]);

/// Computes `a * b / denominator` with a 512-bit intermediate.
///
/// The product never overflows; only the final quotient has to fit in 256
/// bits. The quotient is truncated.
///
/// # Errors
/// - `DivideByZero`: if `denominator` is zero
/// - `Overflow`: if the quotient exceeds `U256::MAX`
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::divide_by_zero());
    }

    let quotient = widen(a) * widen(b) / widen(denominator);
    narrow(quotient)
}

/// `a * b / WAD`, truncated.
///
/// # Errors
/// - `Overflow`: if the result exceeds `U256::MAX`
pub fn wad_mul(a: U256, b: U256) -> Result<U256, MathError> {
    mul_div(a, b, WAD)
}

/// `a * WAD / b`, truncated.
///
/// # Errors
/// - `DivideByZero`: if `b` is zero
/// - `Overflow`: if the result exceeds `U256::MAX`
pub fn wad_div(a: U256, b: U256) -> Result<U256, MathError> {
    mul_div(a, WAD, b)
}

/// Signed `a * b / denominator`; the magnitude is truncated toward zero.
///
/// # Errors
/// - `DivideByZero`: if `denominator` is zero
/// - `Overflow`: if the magnitude does not fit a positive `I256`
pub fn signed_mul_div(a: I256, b: U256, denominator: U256) -> Result<I256, MathError> {
    let magnitude = mul_div(a.unsigned_abs(), b, denominator)?;
    signed(a.is_negative(), magnitude)
}

/// Builds an `I256` from a sign and a magnitude.
///
/// # Errors
/// - `Overflow`: if `magnitude` is not representable as a positive `I256`
pub fn signed(negative: bool, magnitude: U256) -> Result<I256, MathError> {
    let value = to_signed(magnitude)?;
    if negative {
        I256::ZERO.checked_sub(value).ok_or(MathError::overflow())
    } else {
        Ok(value)
    }
}

/// Reinterprets an unsigned wad as a signed one.
///
/// # Errors
/// - `Overflow`: if `value >= 2^255`
pub fn to_signed(value: U256) -> Result<I256, MathError> {
    let raw = I256::from_raw(value);
    if raw.is_negative() {
        return Err(MathError::overflow());
    }
    Ok(raw)
}

/// Square root of a wad, i.e. `isqrt(x * WAD)`.
///
/// # Errors
/// - `Overflow`: if `x * WAD` exceeds `U256::MAX`
pub fn sqrt_wad(x: U256) -> Result<U256, MathError> {
    let scaled = x.checked_mul(WAD).ok_or(MathError::overflow())?;
    Ok(isqrt(scaled))
}

/// Natural logarithm of a positive wad.
///
/// Reduces `x = 2^k * y` with `y` in `[1, 2)`, then evaluates
/// `ln(y) = 2 * atanh((y - 1) / (y + 1))` by its odd power series, which
/// converges below one wei in about twenty terms.
///
/// # Errors
/// - `InvalidInput`: if `x` is zero
pub fn ln_wad(x: U256) -> Result<I256, MathError> {
    if x.is_zero() {
        return Err(MathError::invalid_input());
    }

    let two = WAD << 1;
    let mut y = x;
    let mut exponent: i64 = 0;
    while y >= two {
        y >>= 1;
        exponent += 1;
    }
    while y < WAD {
        y <<= 1;
        exponent -= 1;
    }

    let z = mul_div(y - WAD, WAD, y + WAD)?;
    let z_squared = wad_mul(z, z)?;
    let mut term = z;
    let mut series = U256::ZERO;
    let mut divisor = U256::from(1);
    while !term.is_zero() {
        series += term / divisor;
        term = wad_mul(term, z_squared)?;
        divisor += U256::from(2);
    }
    let fraction = series << 1;

    let whole = LN_2 * U256::from(exponent.unsigned_abs());
    if exponent >= 0 {
        signed(false, whole + fraction)
    } else {
        // fraction < ln 2 <= whole
        signed(true, whole - fraction)
    }
}

/// `e^x` for a signed wad exponent.
///
/// Negative exponents are evaluated as `1 / e^|x|` so the series only ever
/// sums positive terms. Exponents below `-42` return zero.
///
/// # Errors
/// - `Overflow`: if `x > 135`
pub fn exp_wad(x: I256) -> Result<U256, MathError> {
    let magnitude = x.unsigned_abs();
    if x.is_negative() {
        if magnitude > EXP_MIN_EXPONENT {
            return Ok(U256::ZERO);
        }
        let grown = exp_unsigned(magnitude)?;
        return mul_div(WAD, WAD, grown);
    }

    if magnitude > EXP_MAX_EXPONENT {
        return Err(MathError::overflow());
    }
    exp_unsigned(magnitude)
}

/// `e^x` for `x >= 0`: `x = k * ln 2 + r`, Taylor series on `r`, shift by `k`.
fn exp_unsigned(x: U256) -> Result<U256, MathError> {
    let halvings = x / LN_2;
    let remainder = x - halvings * LN_2;

    let mut sum = WAD;
    let mut term = WAD;
    let mut index = U256::from(1);
    while !term.is_zero() {
        term = mul_div(term, remainder, WAD * index)?;
        sum += term;
        index += U256::from(1);
    }

    let shift = usize::try_from(halvings.as_limbs()[0]).map_err(|_| MathError::overflow())?;
    sum.checked_shl(shift).ok_or(MathError::overflow())
}

/// Integer square root by Newton iteration from a power-of-two upper bound.
fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }

    let mut x = U256::from(1) << ((n.bit_len() + 1) / 2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

fn widen(value: U256) -> U512 {
    let limbs = value.as_limbs();
    U512::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

fn narrow(value: U512) -> Result<U256, MathError> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|&limb| limb != 0) {
        return Err(MathError::overflow());
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wad(units: u64) -> U256 {
        U256::from(units) * WAD
    }

    fn assert_close(actual: U256, expected: U256, tolerance: U256) {
        let diff = if actual > expected {
            actual - expected
        } else {
            expected - actual
        };
        assert!(
            diff <= tolerance,
            "actual {actual} expected {expected} diff {diff}"
        );
    }

    #[test]
    fn test_constants_match_decimal_values() {
        assert_eq!(WAD, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(EXP_MIN_EXPONENT, wad(42));
        assert_eq!(EXP_MAX_EXPONENT, wad(135));
    }

    #[test]
    fn test_mul_div_truncates() {
        let result = mul_div(U256::from(10), U256::from(10), U256::from(3)).unwrap();
        assert_eq!(result, U256::from(33));
    }

    #[test]
    fn test_mul_div_full_width_intermediate() {
        // U256::MAX * 2 overflows 256 bits but the quotient does not.
        let result = mul_div(U256::MAX, U256::from(2), U256::from(4)).unwrap();
        assert_eq!(result, U256::MAX / U256::from(2));
    }

    #[test]
    fn test_mul_div_overflow() {
        let result = mul_div(U256::MAX, U256::from(2), U256::from(1));
        assert!(matches!(result, Err(MathError::Overflow(_))));
    }

    #[test]
    fn test_mul_div_divide_by_zero() {
        let result = mul_div(U256::from(1), U256::from(1), U256::ZERO);
        assert!(matches!(result, Err(MathError::DivideByZero(_))));
    }

    #[test]
    fn test_wad_div_by_zero() {
        assert!(matches!(
            wad_div(WAD, U256::ZERO),
            Err(MathError::DivideByZero(_))
        ));
    }

    #[test]
    fn test_signed_mul_div_truncates_toward_zero() {
        let minus_seven = signed(true, U256::from(7)).unwrap();
        let result = signed_mul_div(minus_seven, U256::from(1), U256::from(2)).unwrap();
        assert_eq!(result, signed(true, U256::from(3)).unwrap());
    }

    #[test]
    fn test_to_signed_rejects_top_bit() {
        assert!(matches!(to_signed(U256::MAX), Err(MathError::Overflow(_))));
    }

    #[test]
    fn test_sqrt_wad_exact_squares() {
        assert_eq!(sqrt_wad(wad(4)).unwrap(), wad(2));
        assert_eq!(sqrt_wad(wad(9)).unwrap(), wad(3));
        assert_eq!(sqrt_wad(U256::ZERO).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_sqrt_wad_two() {
        let root = sqrt_wad(wad(2)).unwrap();
        assert_eq!(root, U256::from(1_414_213_562_373_095_048u64));
    }

    #[test]
    fn test_ln_of_one_is_zero() {
        assert_eq!(ln_wad(WAD).unwrap(), I256::ZERO);
    }

    #[test]
    fn test_ln_of_two() {
        let ln = ln_wad(wad(2)).unwrap();
        assert!(!ln.is_negative());
        assert_close(ln.unsigned_abs(), LN_2, U256::from(10));
    }

    #[test]
    fn test_ln_of_a_third_is_negative() {
        let ln = ln_wad(WAD / U256::from(3)).unwrap();
        assert!(ln.is_negative());
        // ln(1/3) = -1.098612288668109691
        assert_close(
            ln.unsigned_abs(),
            U256::from(1_098_612_288_668_109_691u64),
            U256::from(1_000),
        );
    }

    #[test]
    fn test_ln_of_zero_is_invalid() {
        assert!(matches!(ln_wad(U256::ZERO), Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn test_exp_of_zero_is_one() {
        assert_eq!(exp_wad(I256::ZERO).unwrap(), WAD);
    }

    #[test]
    fn test_exp_of_one() {
        let e = exp_wad(to_signed(WAD).unwrap()).unwrap();
        assert_close(e, U256::from(2_718_281_828_459_045_235u64), U256::from(1_000));
    }

    #[test]
    fn test_exp_of_minus_three() {
        let value = exp_wad(signed(true, wad(3)).unwrap()).unwrap();
        // e^-3 = 0.049787068367863943
        assert_close(value, U256::from(49_787_068_367_863_943u64), U256::from(1_000));
    }

    #[test]
    fn test_exp_underflows_to_zero() {
        let value = exp_wad(signed(true, wad(43)).unwrap()).unwrap();
        assert_eq!(value, U256::ZERO);
    }

    #[test]
    fn test_exp_overflow() {
        let result = exp_wad(to_signed(wad(136)).unwrap());
        assert!(matches!(result, Err(MathError::Overflow(_))));
    }

    #[test]
    fn test_exp_inverts_ln() {
        let x = U256::from(1_234_500_000_000_000_000u64);
        let round_trip = exp_wad(ln_wad(x).unwrap()).unwrap();
        assert_close(round_trip, x, U256::from(10_000));
    }
}
