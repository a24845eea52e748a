//! 256-bit arithmetic for the solver intermediates
//!
//! Reserves and amounts are `u128` at 12 decimals, but the quadratic terms
//! (`b²`, `c·f·g`, `x·y·1e18`) do not fit in 128 bits, so every solver widens
//! to `U256` and narrows back with an overflow check.
use uint::construct_uint;

use crate::ErrorCode;

construct_uint! {
    pub struct U256(4);
}

impl U256 {
    pub fn try_into_u128(self) -> anchor_lang::Result<u128> {
        Ok(u128::try_from(self).map_err(|_| ErrorCode::MathOverflow)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Up,
    Down,
}

#[inline]
pub fn u256(value: u128) -> U256 {
    U256::from(value)
}

/// Floor of the square root, by Newton's method on integers.
///
/// Starts from `ceil(n / 2)` and stops as soon as the iterate stops
/// decreasing, which is the floor root for every `n`.
pub fn sqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    let mut x = n;
    let mut y = (n >> 1) + (n & U256::one());
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

pub fn checked_add(a: U256, b: U256) -> anchor_lang::Result<U256> {
    Ok(a.checked_add(b).ok_or(ErrorCode::MathOverflow)?)
}

pub fn checked_sub(a: U256, b: U256) -> anchor_lang::Result<U256> {
    Ok(a.checked_sub(b).ok_or(ErrorCode::MathUnderflow)?)
}

pub fn checked_mul(a: U256, b: U256) -> anchor_lang::Result<U256> {
    Ok(a.checked_mul(b).ok_or(ErrorCode::MathOverflow)?)
}

pub fn checked_div(a: U256, b: U256) -> anchor_lang::Result<U256> {
    Ok(a.checked_div(b).ok_or(ErrorCode::MathOverflow)?)
}

/// `a * b / d`, truncating or rounding up.
pub fn mul_div(a: U256, b: U256, d: U256, rounding: Rounding) -> anchor_lang::Result<U256> {
    let product = checked_mul(a, b)?;
    let quotient = checked_div(product, d)?;
    match rounding {
        Rounding::Down => Ok(quotient),
        Rounding::Up => {
            if (product % d).is_zero() {
                Ok(quotient)
            } else {
                checked_add(quotient, U256::one())
            }
        }
    }
}

/// `a * b / d` on `u128` operands with a `u128` result.
pub fn mul_div_u128(a: u128, b: u128, d: u128, rounding: Rounding) -> anchor_lang::Result<u128> {
    mul_div(u256(a), u256(b), u256(d), rounding)?.try_into_u128()
}
