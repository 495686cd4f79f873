//! Share accounting and the utilization quote floor.

use alloy_primitives::U256;
use options_core::fixed_point::{mul_div, wad_mul};
use options_core::MathError;

/// Shares minted for `deposit` into a pool worth `pool_value` before the
/// deposit. Only a pool with no shares outstanding mints 1:1.
///
/// # Errors
/// - `DivideByZero`: if shares are outstanding and `pool_value` is zero
/// - `Overflow`: if the share count exceeds `U256::MAX`
pub fn shares_for_deposit(
    deposit: U256,
    total_shares: U256,
    pool_value: U256,
) -> Result<U256, MathError> {
    if total_shares.is_zero() {
        return Ok(deposit);
    }
    mul_div(deposit, total_shares, pool_value)
}

/// Portion of `holdings` that `shares` out of `total_shares` entitle to.
///
/// # Errors
/// - `DivideByZero`: if `total_shares` is zero
pub fn pro_rata(holdings: U256, shares: U256, total_shares: U256) -> Result<U256, MathError> {
    mul_div(holdings, shares, total_shares)
}

/// Per-unit premium floor for writing `amount` contracts: `spot * amount / pool_value`.
///
/// # Errors
/// - `DivideByZero`: if `pool_value` is zero
pub fn utilization_price(spot: U256, amount: U256, pool_value: U256) -> Result<U256, MathError> {
    mul_div(spot, amount, pool_value)
}

/// Total premium for `amount` contracts at `unit_price`, both wads.
///
/// # Errors
/// - `Overflow`: if the premium exceeds `U256::MAX`
pub fn premium(unit_price: U256, amount: U256) -> Result<U256, MathError> {
    wad_mul(unit_price, amount)
}
