//! Decimal normalization
//!
//! Every amount entering a computation is rescaled to `INTERNAL_DECIMALS` (12)
//! so the solvers see values of comparable magnitude whatever the token's own
//! precision. Tokens with fewer decimals are scaled up, tokens with more are
//! divided down.
use crate::{
    math::{mul_div_u128, Rounding},
    ErrorCode, INTERNAL_DECIMALS, MAX_TOKEN_DECIMALS,
};

fn scale_factor(decimals: u8) -> anchor_lang::Result<u128> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(ErrorCode::InvalidDecimals.into());
    }
    let exponent = decimals.abs_diff(INTERNAL_DECIMALS) as u32;
    Ok(10u128.pow(exponent))
}

/// Raw token amount to the internal 12-decimal scale: `amount * 10^(12 - decimals)`.
pub fn to_adjusted_amount(amount: u128, decimals: u8) -> anchor_lang::Result<u128> {
    let factor = scale_factor(decimals)?;
    if decimals <= INTERNAL_DECIMALS {
        Ok(amount.checked_mul(factor).ok_or(ErrorCode::MathOverflow)?)
    } else {
        Ok(amount / factor)
    }
}

/// Internal 12-decimal amount back to raw token units, truncating.
pub fn from_adjusted_amount(adjusted: u128, decimals: u8) -> anchor_lang::Result<u128> {
    from_adjusted_amount_rounded(adjusted, decimals, Rounding::Down)
}

pub fn from_adjusted_amount_rounded(
    adjusted: u128,
    decimals: u8,
    rounding: Rounding,
) -> anchor_lang::Result<u128> {
    let factor = scale_factor(decimals)?;
    if decimals >= INTERNAL_DECIMALS {
        Ok(adjusted.checked_mul(factor).ok_or(ErrorCode::MathOverflow)?)
    } else {
        mul_div_u128(adjusted, 1, factor, rounding)
    }
}
