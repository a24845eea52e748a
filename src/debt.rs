//! Borrow and payback on the debt pool
//!
//! Same shape as the collateral side, with debt amounts as the share basis:
//! borrowing mints debt shares, paying back burns them.
use log::debug;

use crate::{
    decimals::{from_adjusted_amount_rounded, to_adjusted_amount},
    math::Rounding,
    solvers::{borrow_and_swap, swap_and_payback, swap_and_payback_one_token_perfect_shares},
    utils::{
        apply_rate_down, apply_rate_up, shares_from_fraction, split_input, Residual, SplitInput,
    },
    DebtReserves, DexConfig, ErrorCode, NoOpReason, Outcome, ProportionalUpdate, ShareChange,
    SharesQuote, TokenAmountQuote, TokenIndex,
};

fn empty_pool(total_borrow_shares: u128, reserves: &DebtReserves) -> bool {
    total_borrow_shares == 0 || reserves.has_empty_debt()
}

pub fn borrow_adjusted(
    token0_amount: u128,
    token1_amount: u128,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    config.validate()?;
    if token0_amount == 0 && token1_amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if empty_pool(total_borrow_shares, reserves) {
        debug!("borrow: empty debt pool");
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let (matched_shares, token, amount) = match split_input(
        token0_amount,
        token1_amount,
        reserves.token0_debt,
        reserves.token1_debt,
        total_borrow_shares,
        Residual::ReserveGap,
    )? {
        SplitInput::Empty => return Ok(Outcome::NoOp(NoOpReason::EmptyInput)),
        SplitInput::EqualProportion => return Ok(Outcome::NoOp(NoOpReason::EqualProportion)),
        SplitInput::OneSided {
            matched_shares,
            token,
            amount,
        } => (matched_shares, token, amount),
    };
    if amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::ZeroSwapAmount));
    }

    let mut reserves = *reserves;
    let mut total_shares = total_borrow_shares;
    if matched_shares > 0 {
        reserves = reserves.proportional_update(matched_shares, total_shares, ShareChange::Mint)?;
        total_shares = total_shares.checked_add(matched_shares).ok_or(ErrorCode::MathOverflow)?;
    }

    let other = token.other();
    let fraction = borrow_and_swap(
        reserves.debt(token),
        reserves.debt(other),
        reserves.imaginary(token),
        reserves.imaginary(other),
        amount,
    )?;
    let swap_shares =
        apply_rate_up(shares_from_fraction(fraction, total_shares)?, config.dex_fee_rate)?;
    let shares = matched_shares.checked_add(swap_shares).ok_or(ErrorCode::MathOverflow)?;
    debug!("borrow: {} matched + {} swapped shares", matched_shares, swap_shares);

    Ok(Outcome::Success(SharesQuote {
        shares,
        shares_with_slippage: apply_rate_up(shares, config.slippage_rate)?,
    }))
}

pub fn payback_adjusted(
    token0_amount: u128,
    token1_amount: u128,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    config.validate()?;
    if token0_amount == 0 && token1_amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if empty_pool(total_borrow_shares, reserves) {
        debug!("payback: empty debt pool");
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let (matched_shares, token, amount) = match split_input(
        token0_amount,
        token1_amount,
        reserves.token0_debt,
        reserves.token1_debt,
        total_borrow_shares,
        Residual::AmountRemainder,
    )? {
        SplitInput::Empty => return Ok(Outcome::NoOp(NoOpReason::EmptyInput)),
        SplitInput::EqualProportion => return Ok(Outcome::NoOp(NoOpReason::EqualProportion)),
        SplitInput::OneSided {
            matched_shares,
            token,
            amount,
        } => (matched_shares, token, amount),
    };
    if amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::ZeroSwapAmount));
    }

    let mut reserves = *reserves;
    let mut total_shares = total_borrow_shares;
    if matched_shares > 0 {
        reserves = reserves.proportional_update(matched_shares, total_shares, ShareChange::Burn)?;
        total_shares = total_shares.checked_sub(matched_shares).ok_or(ErrorCode::MathUnderflow)?;
    }

    let other = token.other();
    let fraction = swap_and_payback(
        reserves.debt(token),
        reserves.debt(other),
        reserves.imaginary(token),
        reserves.imaginary(other),
        amount,
    )?;
    let swap_shares =
        apply_rate_down(shares_from_fraction(fraction, total_shares)?, config.dex_fee_rate)?;
    let shares = matched_shares.checked_add(swap_shares).ok_or(ErrorCode::MathOverflow)?;
    debug!("payback: {} matched + {} swapped shares", matched_shares, swap_shares);
    if shares > total_borrow_shares {
        return Err(ErrorCode::SharesExceedTotalSupply.into());
    }

    Ok(Outcome::Success(SharesQuote {
        shares,
        shares_with_slippage: apply_rate_down(shares, config.slippage_rate)?,
    }))
}

/// Amount of `token`, in 12 decimals and after the dex fee, that repays
/// `shares` entirely in that token.
pub fn payback_max_adjusted(
    shares: u128,
    token: TokenIndex,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<u128>> {
    config.validate()?;
    if shares == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if total_borrow_shares == 0 || reserves.has_empty_real_reserves() || reserves.has_empty_debt() {
        debug!("payback max: empty debt pool");
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let updated = reserves.proportional_update(shares, total_borrow_shares, ShareChange::Burn)?;
    let other = token.other();
    let amount = swap_and_payback_one_token_perfect_shares(
        updated.imaginary(token),
        updated.imaginary(other),
        reserves.debt(token),
        reserves.debt(other),
        updated.real(token),
        updated.real(other),
    )?;
    debug!("payback max: {} shares repaid with {}", shares, amount);

    Ok(Outcome::Success(apply_rate_up(amount, config.dex_fee_rate)?))
}

pub fn borrow(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    borrow_adjusted(
        to_adjusted_amount(token0_amount, token0_decimals)?,
        to_adjusted_amount(token1_amount, token1_decimals)?,
        config,
        total_borrow_shares,
        reserves,
    )
}

pub fn payback(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    payback_adjusted(
        to_adjusted_amount(token0_amount, token0_decimals)?,
        to_adjusted_amount(token1_amount, token1_decimals)?,
        config,
        total_borrow_shares,
        reserves,
    )
}

/// Raw amount of `token` to send for repaying `shares`, fee included. The
/// slippage bound is the maximum to send.
pub fn payback_max(
    shares: u128,
    token: TokenIndex,
    decimals: u8,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<TokenAmountQuote>> {
    let adjusted =
        match payback_max_adjusted(shares, token, config, total_borrow_shares, reserves)? {
            Outcome::Success(amount) => amount,
            Outcome::NoOp(reason) => return Ok(Outcome::NoOp(reason)),
        };
    let token_amount = from_adjusted_amount_rounded(adjusted, decimals, Rounding::Up)?;

    Ok(Outcome::Success(TokenAmountQuote {
        token_amount,
        token_amount_with_slippage: apply_rate_up(token_amount, config.slippage_rate)?,
    }))
}
