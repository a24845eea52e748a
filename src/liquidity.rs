//! Deposit and withdraw on the collateral pool
//!
//! A one-sided amount is quoted as a partial swap plus a proportional
//! add/remove (see `solvers`). A dual-sided amount first moves at the pool
//! ratio; only the unmatched rest goes through the solver. The dex fee is
//! charged on the swapped part only, slippage on the final share count.
use log::debug;

use crate::{
    decimals::{from_adjusted_amount, to_adjusted_amount},
    solvers::{swap_and_deposit, withdraw_and_swap},
    swap::get_amount_out,
    utils::{
        apply_rate_down, apply_rate_up, shares_from_fraction, split_input, Residual, SplitInput,
    },
    CollateralReserves, DexConfig, ErrorCode, NoOpReason, Outcome, ProportionalUpdate, ShareChange,
    SharesQuote, TokenAmountQuote, TokenIndex,
};

fn empty_pool(total_supply_shares: u128, reserves: &CollateralReserves) -> bool {
    total_supply_shares == 0 || reserves.has_empty_real_reserves()
}

/// Shares minted for depositing `token0_amount` and `token1_amount`, both in 12
/// decimals.
pub fn deposit_adjusted(
    token0_amount: u128,
    token1_amount: u128,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    config.validate()?;
    if token0_amount == 0 && token1_amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if empty_pool(total_supply_shares, reserves) {
        debug!("deposit: empty collateral pool");
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let (matched_shares, token, amount) = match split_input(
        token0_amount,
        token1_amount,
        reserves.token0_real_reserves,
        reserves.token1_real_reserves,
        total_supply_shares,
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
    let mut total_shares = total_supply_shares;
    if matched_shares > 0 {
        reserves = reserves.proportional_update(matched_shares, total_shares, ShareChange::Mint)?;
        total_shares = total_shares.checked_add(matched_shares).ok_or(ErrorCode::MathOverflow)?;
    }

    let other = token.other();
    let fraction = swap_and_deposit(
        amount,
        reserves.imaginary(other),
        reserves.imaginary(token),
        reserves.real(token),
        reserves.real(other),
    )?;
    let swap_shares =
        apply_rate_down(shares_from_fraction(fraction, total_shares)?, config.dex_fee_rate)?;
    let shares = matched_shares.checked_add(swap_shares).ok_or(ErrorCode::MathOverflow)?;
    debug!("deposit: {} matched + {} swapped shares", matched_shares, swap_shares);

    Ok(Outcome::Success(SharesQuote {
        shares,
        shares_with_slippage: apply_rate_down(shares, config.slippage_rate)?,
    }))
}

/// Shares burned for withdrawing `token0_amount` and `token1_amount`, both in
/// 12 decimals.
pub fn withdraw_adjusted(
    token0_amount: u128,
    token1_amount: u128,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    config.validate()?;
    if token0_amount == 0 && token1_amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if empty_pool(total_supply_shares, reserves) {
        debug!("withdraw: empty collateral pool");
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let (matched_shares, token, amount) = match split_input(
        token0_amount,
        token1_amount,
        reserves.token0_real_reserves,
        reserves.token1_real_reserves,
        total_supply_shares,
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
    let mut total_shares = total_supply_shares;
    if matched_shares > 0 {
        reserves = reserves.proportional_update(matched_shares, total_shares, ShareChange::Burn)?;
        total_shares = total_shares.checked_sub(matched_shares).ok_or(ErrorCode::MathUnderflow)?;
    }

    let other = token.other();
    let fraction = withdraw_and_swap(
        reserves.real(token),
        reserves.real(other),
        reserves.outside_range(token)?,
        reserves.outside_range(other)?,
        amount,
    )?;
    let swap_shares =
        apply_rate_up(shares_from_fraction(fraction, total_shares)?, config.dex_fee_rate)?;
    let shares = matched_shares.checked_add(swap_shares).ok_or(ErrorCode::MathOverflow)?;
    debug!("withdraw: {} matched + {} swapped shares", matched_shares, swap_shares);
    if shares > total_supply_shares {
        return Err(ErrorCode::SharesExceedTotalSupply.into());
    }

    Ok(Outcome::Success(SharesQuote {
        shares,
        shares_with_slippage: apply_rate_up(shares, config.slippage_rate)?,
    }))
}

/// Token amount, in 12 decimals and after the dex fee, received for burning
/// `shares` entirely in `token`.
///
/// The shares' slice of both real reserves is removed, less one unit each,
/// and the other token's slice is sold into `token` on the remaining pool.
/// A slice that truncates to nothing gives `NoOp(ZeroSwapAmount)`.
pub fn withdraw_max_adjusted(
    shares: u128,
    token: TokenIndex,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<u128>> {
    config.validate()?;
    if shares == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if empty_pool(total_supply_shares, reserves) {
        debug!("withdraw max: empty collateral pool");
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let updated = reserves.proportional_update(shares, total_supply_shares, ShareChange::Burn)?;
    let other = token.other();
    let removed = |index: TokenIndex| {
        reserves
            .real(index)
            .checked_sub(updated.real(index))
            .ok_or(ErrorCode::MathUnderflow)
    };
    let (own_removed, other_removed) = (removed(token)?, removed(other)?);
    if own_removed == 0 || other_removed == 0 {
        debug!("withdraw max: {} shares remove nothing", shares);
        return Ok(Outcome::NoOp(NoOpReason::ZeroSwapAmount));
    }
    // one unit of each slice stays in the pool
    let (own_amount, other_amount) = (own_removed - 1, other_removed - 1);

    let swapped = match other_amount {
        0 => 0,
        amount => get_amount_out(amount, updated.imaginary(other), updated.imaginary(token))?,
    };
    let amount = own_amount.checked_add(swapped).ok_or(ErrorCode::MathOverflow)?;
    debug!("withdraw max: {} direct + {} swapped", own_amount, swapped);
    if amount == 0 {
        return Ok(Outcome::NoOp(NoOpReason::ZeroSwapAmount));
    }

    Ok(Outcome::Success(apply_rate_down(amount, config.dex_fee_rate)?))
}

/// Shares minted for depositing raw token amounts.
pub fn deposit(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    deposit_adjusted(
        to_adjusted_amount(token0_amount, token0_decimals)?,
        to_adjusted_amount(token1_amount, token1_decimals)?,
        config,
        total_supply_shares,
        reserves,
    )
}

/// Shares burned for withdrawing raw token amounts.
pub fn withdraw(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<SharesQuote>> {
    withdraw_adjusted(
        to_adjusted_amount(token0_amount, token0_decimals)?,
        to_adjusted_amount(token1_amount, token1_decimals)?,
        config,
        total_supply_shares,
        reserves,
    )
}

/// Raw amount of `token` received for burning `shares`. The slippage bound is
/// the minimum to accept.
pub fn withdraw_max(
    shares: u128,
    token: TokenIndex,
    decimals: u8,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<TokenAmountQuote>> {
    let adjusted =
        match withdraw_max_adjusted(shares, token, config, total_supply_shares, reserves)? {
            Outcome::Success(amount) => amount,
            Outcome::NoOp(reason) => return Ok(Outcome::NoOp(reason)),
        };
    let token_amount = from_adjusted_amount(adjusted, decimals)?;

    Ok(Outcome::Success(TokenAmountQuote {
        token_amount,
        token_amount_with_slippage: apply_rate_down(token_amount, config.slippage_rate)?,
    }))
}
