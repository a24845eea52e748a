use log::debug;

use crate::{
    math::{mul_div_u128, Rounding},
    ErrorCode, TokenIndex, MAX_PERCENTAGE, SHARE_PRECISION,
};

/// `amount * (1 - rate)`, rate in millionths, truncated.
pub fn apply_rate_down(amount: u128, rate: u64) -> anchor_lang::Result<u128> {
    let factor = (MAX_PERCENTAGE as u128)
        .checked_sub(rate as u128)
        .ok_or(ErrorCode::InvalidInput)?;
    mul_div_u128(amount, factor, MAX_PERCENTAGE as u128, Rounding::Down)
}

/// `amount * (1 + rate)`, rate in millionths, truncated.
pub fn apply_rate_up(amount: u128, rate: u64) -> anchor_lang::Result<u128> {
    let factor = (MAX_PERCENTAGE as u128) + rate as u128;
    mul_div_u128(amount, factor, MAX_PERCENTAGE as u128, Rounding::Down)
}

/// Grosses up an amount that had `rate` deducted: `amount / (1 - rate)`.
pub fn reverse_apply_rate_down(
    amount: u128,
    rate: u64,
    rounding: Rounding,
) -> anchor_lang::Result<u128> {
    let factor = (MAX_PERCENTAGE as u128)
        .checked_sub(rate as u128)
        .filter(|factor| *factor > 0)
        .ok_or(ErrorCode::InvalidInput)?;
    mul_div_u128(amount, MAX_PERCENTAGE as u128, factor, rounding)
}

/// Shares for a solver fraction scaled by `SHARE_PRECISION`.
pub fn shares_from_fraction(fraction: u128, total_shares: u128) -> anchor_lang::Result<u128> {
    mul_div_u128(fraction, total_shares, SHARE_PRECISION, Rounding::Down)
}

/// How the unmatched part of a dual-sided amount is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Residual {
    /// `(larger - smaller fraction) * base`: deposit, withdraw, borrow.
    ReserveGap,
    /// `amount - smaller / larger fraction * amount`: payback.
    AmountRemainder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitInput {
    Empty,
    EqualProportion,
    /// `matched_shares` move at the pool ratio, `amount` of `token` goes
    /// through the swap solver.
    OneSided {
        matched_shares: u128,
        token: TokenIndex,
        amount: u128,
    },
}

/// Splits `(amount0, amount1)` into a pool-ratio part and a one-sided rest.
///
/// `base0`/`base1` are what a share represents: real reserves on the
/// collateral side, debt on the debt side. Both must be non-zero.
pub(crate) fn split_input(
    amount0: u128,
    amount1: u128,
    base0: u128,
    base1: u128,
    total_shares: u128,
    residual: Residual,
) -> anchor_lang::Result<SplitInput> {
    match (amount0 > 0, amount1 > 0) {
        (false, false) => return Ok(SplitInput::Empty),
        (true, false) => {
            return Ok(SplitInput::OneSided {
                matched_shares: 0,
                token: TokenIndex::Token0,
                amount: amount0,
            })
        }
        (false, true) => {
            return Ok(SplitInput::OneSided {
                matched_shares: 0,
                token: TokenIndex::Token1,
                amount: amount1,
            })
        }
        (true, true) => {}
    }

    let fraction0 = mul_div_u128(amount0, SHARE_PRECISION, base0, Rounding::Down)?;
    let fraction1 = mul_div_u128(amount1, SHARE_PRECISION, base1, Rounding::Down)?;
    if fraction0 == fraction1 {
        return Ok(SplitInput::EqualProportion);
    }

    let (token, small, large, amount, base) = if fraction0 > fraction1 {
        (TokenIndex::Token0, fraction1, fraction0, amount0, base0)
    } else {
        (TokenIndex::Token1, fraction0, fraction1, amount1, base1)
    };
    let rest = match residual {
        Residual::ReserveGap => mul_div_u128(large - small, base, SHARE_PRECISION, Rounding::Down)?,
        Residual::AmountRemainder => amount - mul_div_u128(small, amount, large, Rounding::Down)?,
    };
    let matched_shares = mul_div_u128(small, total_shares, SHARE_PRECISION, Rounding::Down)?;
    debug!(
        "dual-sided input: {} shares at pool ratio, {} of {:?} left to swap",
        matched_shares, rest, token
    );

    Ok(SplitInput::OneSided {
        matched_shares,
        token,
        amount: rest,
    })
}
