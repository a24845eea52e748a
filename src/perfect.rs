//! Pool-ratio ("perfect") operations
//!
//! No swap happens on this path: given one token's amount, the other token's
//! amount and the share delta follow from the pool ratio alone. Shares and
//! amounts are truncated; slippage only pads the token amounts.
use log::debug;

use crate::{
    decimals::{from_adjusted_amount, to_adjusted_amount},
    math::{mul_div_u128, Rounding},
    utils::{apply_rate_down, apply_rate_up},
    CollateralReserves, DebtReserves, DexConfig, ErrorCode, NoOpReason, Outcome, PerfectMaxQuote,
    PerfectQuote, TokenIndex,
};

/// Which way the tokens move for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// deposit, payback
    IntoPool,
    /// withdraw, borrow
    OutOfPool,
}

impl Direction {
    fn with_slippage(self, amount: u128, slippage_rate: u64) -> anchor_lang::Result<u128> {
        match self {
            Direction::IntoPool => apply_rate_up(amount, slippage_rate),
            Direction::OutOfPool => apply_rate_down(amount, slippage_rate),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn perfect_quote(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    slippage_rate: u64,
    total_shares: u128,
    base0: u128,
    base1: u128,
    direction: Direction,
) -> anchor_lang::Result<Outcome<PerfectQuote>> {
    let (token, amount) = match (token0_amount > 0, token1_amount > 0) {
        (true, true) => return Ok(Outcome::NoOp(NoOpReason::BothAmountsPositive)),
        (false, false) => return Ok(Outcome::NoOp(NoOpReason::EmptyInput)),
        (true, false) => (TokenIndex::Token0, token0_amount),
        (false, true) => (TokenIndex::Token1, token1_amount),
    };
    if total_shares == 0 || base0 == 0 || base1 == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    let (decimals, other_decimals, base, other_base) = match token {
        TokenIndex::Token0 => (token0_decimals, token1_decimals, base0, base1),
        TokenIndex::Token1 => (token1_decimals, token0_decimals, base1, base0),
    };
    let adjusted = to_adjusted_amount(amount, decimals)?;
    let shares = mul_div_u128(adjusted, total_shares, base, Rounding::Down)?;
    let other_adjusted = mul_div_u128(adjusted, other_base, base, Rounding::Down)?;
    let other_amount = from_adjusted_amount(other_adjusted, other_decimals)?;
    debug!("perfect {:?}: {} shares, {} of the other token", direction, shares, other_amount);

    let (token0_amount, token1_amount) = match token {
        TokenIndex::Token0 => (amount, other_amount),
        TokenIndex::Token1 => (other_amount, amount),
    };
    Ok(Outcome::Success(PerfectQuote {
        shares,
        token0_amount,
        token1_amount,
        token0_amount_with_slippage: direction.with_slippage(token0_amount, slippage_rate)?,
        token1_amount_with_slippage: direction.with_slippage(token1_amount, slippage_rate)?,
    }))
}

#[allow(clippy::too_many_arguments)]
fn perfect_max_quote(
    shares: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    slippage_rate: u64,
    total_shares: u128,
    base0: u128,
    base1: u128,
    direction: Direction,
) -> anchor_lang::Result<Outcome<PerfectMaxQuote>> {
    if shares == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyInput));
    }
    if total_shares == 0 || base0 == 0 || base1 == 0 {
        return Ok(Outcome::NoOp(NoOpReason::EmptyReserves));
    }
    if shares > total_shares {
        return Err(ErrorCode::SharesExceedTotalSupply.into());
    }

    let token0_amount = from_adjusted_amount(
        mul_div_u128(shares, base0, total_shares, Rounding::Down)?,
        token0_decimals,
    )?;
    let token1_amount = from_adjusted_amount(
        mul_div_u128(shares, base1, total_shares, Rounding::Down)?,
        token1_decimals,
    )?;

    Ok(Outcome::Success(PerfectMaxQuote {
        token0_amount,
        token1_amount,
        token0_amount_with_slippage: direction.with_slippage(token0_amount, slippage_rate)?,
        token1_amount_with_slippage: direction.with_slippage(token1_amount, slippage_rate)?,
    }))
}

/// Pool-ratio deposit from one raw token amount. The slippage amounts are the
/// most the caller should send.
pub fn deposit_perfect(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<PerfectQuote>> {
    config.validate()?;
    perfect_quote(
        token0_amount,
        token1_amount,
        token0_decimals,
        token1_decimals,
        config.slippage_rate,
        total_supply_shares,
        reserves.token0_real_reserves,
        reserves.token1_real_reserves,
        Direction::IntoPool,
    )
}

/// Pool-ratio withdrawal from one raw token amount. The slippage amounts are
/// the least the caller should accept.
pub fn withdraw_perfect(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<PerfectQuote>> {
    config.validate()?;
    perfect_quote(
        token0_amount,
        token1_amount,
        token0_decimals,
        token1_decimals,
        config.slippage_rate,
        total_supply_shares,
        reserves.token0_real_reserves,
        reserves.token1_real_reserves,
        Direction::OutOfPool,
    )
}

/// Both tokens received for burning `shares` at the pool ratio.
pub fn withdraw_perfect_max(
    shares: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_supply_shares: u128,
    reserves: &CollateralReserves,
) -> anchor_lang::Result<Outcome<PerfectMaxQuote>> {
    config.validate()?;
    perfect_max_quote(
        shares,
        token0_decimals,
        token1_decimals,
        config.slippage_rate,
        total_supply_shares,
        reserves.token0_real_reserves,
        reserves.token1_real_reserves,
        Direction::OutOfPool,
    )
}

pub fn borrow_perfect(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<PerfectQuote>> {
    config.validate()?;
    perfect_quote(
        token0_amount,
        token1_amount,
        token0_decimals,
        token1_decimals,
        config.slippage_rate,
        total_borrow_shares,
        reserves.token0_debt,
        reserves.token1_debt,
        Direction::OutOfPool,
    )
}

pub fn payback_perfect(
    token0_amount: u128,
    token1_amount: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<PerfectQuote>> {
    config.validate()?;
    perfect_quote(
        token0_amount,
        token1_amount,
        token0_decimals,
        token1_decimals,
        config.slippage_rate,
        total_borrow_shares,
        reserves.token0_debt,
        reserves.token1_debt,
        Direction::IntoPool,
    )
}

/// Both tokens owed for repaying `shares` of debt at the pool ratio.
pub fn payback_perfect_max(
    shares: u128,
    token0_decimals: u8,
    token1_decimals: u8,
    config: &DexConfig,
    total_borrow_shares: u128,
    reserves: &DebtReserves,
) -> anchor_lang::Result<Outcome<PerfectMaxQuote>> {
    config.validate()?;
    perfect_max_quote(
        shares,
        token0_decimals,
        token1_decimals,
        config.slippage_rate,
        total_borrow_shares,
        reserves.token0_debt,
        reserves.token1_debt,
        Direction::IntoPool,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL_SHARES: u128 = 20_000_000_000_000_000_000_000;

    fn col_reserves() -> CollateralReserves {
        CollateralReserves {
            token0_real_reserves: 20_000_000_000_000_000,
            token1_real_reserves: 40_000_000_000_000_000,
            token0_imaginary_reserves: 400_000_000_000_000_000,
            token1_imaginary_reserves: 800_000_000_000_000_000,
        }
    }

    fn debt_reserves() -> DebtReserves {
        DebtReserves {
            token0_debt: 10_000_000_000_000_000,
            token1_debt: 30_000_000_000_000_000,
            token0_real_reserves: 9_000_000_000_000_000,
            token1_real_reserves: 27_000_000_000_000_000,
            token0_imaginary_reserves: 180_000_000_000_000_000,
            token1_imaginary_reserves: 540_000_000_000_000_000,
        }
    }

    fn config() -> DexConfig {
        DexConfig::new(100, 10_000).unwrap()
    }

    #[test]
    fn test_deposit_perfect() {
        // 1 token of 6 decimals against a 1:2 pool of an 18 decimal token
        let quote =
            deposit_perfect(1_000_000, 0, 6, 18, &config(), TOTAL_SHARES, &col_reserves()).unwrap();
        assert_eq!(
            quote,
            Outcome::Success(PerfectQuote {
                shares: 1_000_000_000_000_000_000,
                token0_amount: 1_000_000,
                token1_amount: 2_000_000_000_000_000_000,
                token0_amount_with_slippage: 1_010_000,
                token1_amount_with_slippage: 2_020_000_000_000_000_000,
            })
        );
    }

    #[test]
    fn test_withdraw_perfect_truncates() {
        // 1 raw unit at 12 decimals: 1e-12 of a token
        let quote = withdraw_perfect(0, 3, 6, 12, &config(), TOTAL_SHARES, &col_reserves())
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(quote.token1_amount, 3);
        // 1.5e-12 of token0 at 6 decimals is nothing
        assert_eq!(quote.token0_amount, 0);
        // 3 * 2e22 / 4e16
        assert_eq!(quote.shares, 1_500_000);

        // 7 * 3 / 4e16 is below one share
        let quote = withdraw_perfect(0, 7, 12, 12, &config(), 3, &col_reserves())
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(quote.shares, 0);
        // 7 * 2e16 / 4e16 = 3.5
        assert_eq!(quote.token0_amount, 3);
        assert_eq!(quote.token1_amount_with_slippage, 6);
    }

    #[test]
    fn test_perfect_input_shape() {
        let outcome =
            deposit_perfect(1, 1, 12, 12, &config(), TOTAL_SHARES, &col_reserves()).unwrap();
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::BothAmountsPositive));
        let outcome =
            borrow_perfect(0, 0, 12, 12, &config(), TOTAL_SHARES, &debt_reserves()).unwrap();
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::EmptyInput));
        let outcome = payback_perfect(1, 0, 12, 12, &config(), 0, &debt_reserves()).unwrap();
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::EmptyReserves));
    }

    #[test]
    fn test_borrow_and_payback_perfect() {
        let debt = debt_reserves();
        let borrow = borrow_perfect(1_000_000_000_000, 0, 12, 12, &config(), TOTAL_SHARES, &debt)
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(borrow.shares, 2_000_000_000_000_000_000);
        assert_eq!(borrow.token1_amount, 3_000_000_000_000);
        assert_eq!(borrow.token1_amount_with_slippage, 2_970_000_000_000);

        let payback = payback_perfect(0, 3_000_000_000_000, 12, 12, &config(), TOTAL_SHARES, &debt)
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(payback.shares, 2_000_000_000_000_000_000);
        assert_eq!(payback.token0_amount, 1_000_000_000_000);
        assert_eq!(payback.token0_amount_with_slippage, 1_010_000_000_000);
    }

    #[test]
    fn test_withdraw_perfect_max() {
        let quote = withdraw_perfect_max(
            1_000_000_000_000_000_000,
            6,
            18,
            &config(),
            TOTAL_SHARES,
            &col_reserves(),
        )
        .unwrap();
        assert_eq!(
            quote,
            Outcome::Success(PerfectMaxQuote {
                token0_amount: 1_000_000,
                token1_amount: 2_000_000_000_000_000_000,
                token0_amount_with_slippage: 990_000,
                token1_amount_with_slippage: 1_980_000_000_000_000_000,
            })
        );

        let err =
            withdraw_perfect_max(TOTAL_SHARES + 1, 6, 18, &config(), TOTAL_SHARES, &col_reserves())
                .unwrap_err();
        let expected: anchor_lang::error::Error = ErrorCode::SharesExceedTotalSupply.into();
        assert_eq!(err, expected);
    }

    #[test]
    fn test_payback_perfect_max_truncates() {
        let shares = 1_000_000_000_000_000_001;
        let quote = payback_perfect_max(shares, 6, 12, &config(), TOTAL_SHARES, &debt_reserves())
            .unwrap()
            .success()
            .unwrap();
        // half a token plus dust, the dust is dropped
        assert_eq!(quote.token0_amount, 500_000);
        assert_eq!(quote.token1_amount, 1_500_000_000_000);
        assert_eq!(quote.token1_amount_with_slippage, 1_515_000_000_000);

        let empty = DebtReserves {
            token0_debt: 0,
            ..debt_reserves()
        };
        let outcome = payback_perfect_max(1, 6, 12, &config(), TOTAL_SHARES, &empty).unwrap();
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::EmptyReserves));
    }
}
