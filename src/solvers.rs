#![allow(clippy::many_single_char_names)]

//! Closed-form swap solvers for the composite operations
//!
//! A one-sided deposit, withdrawal, borrow or payback is executed as "swap part
//! of it, then add/remove the rest at the pool ratio". Each solver expands the
//! constant-product invariant after the hypothetical swap, collects the terms
//! into `a·x² + b·x + c = 0` and takes the economically valid root, then turns
//! the swap amount into a share fraction scaled by `SHARE_PRECISION`.
//!
//! All intermediates are `U256`; every division truncates.
use log::trace;

use crate::{
    math::{checked_add, checked_div, checked_mul, checked_sub, sqrt, u256, U256},
    ErrorCode, SHARE_PRECISION, SIX_DECIMALS,
};

/// Fails with `error` unless `amount / 1e6 <= x <= amount * (1e6 - 1) / 1e6`,
/// compared exactly (no truncated bounds).
fn check_swap_bounds(x: U256, amount: U256, error: ErrorCode) -> anchor_lang::Result<()> {
    let scaled = checked_mul(x, u256(SIX_DECIMALS))?;
    let upper = checked_mul(amount, u256(SIX_DECIMALS - 1))?;
    if scaled < amount || scaled > upper {
        trace!("swap amount {} out of bounds for {}", x, amount);
        return Err(error.into());
    }
    Ok(())
}

fn share_precision() -> U256 {
    u256(SHARE_PRECISION)
}

/// Share fraction minted by depositing `amount` of one token, part of which is
/// swapped into the other token first.
///
/// c - amount of token in
/// d - imaginary reserves of token out
/// e - imaginary reserves of token in
/// f - real reserves of token in
/// i - real reserves of token out
///
/// With x the amount swapped:
///   x² + (B/i)·x - c·e = 0,  B/i = (c·d + d·f + e·i - c·i) / i
///   x = (√(4·c·e + (B/i)²) - B/i) / 2
///
/// The remaining `c - x` and the swap output `d·x / (e + x)` are deposited;
/// the smaller of the two implied share fractions is returned.
pub fn swap_and_deposit(
    amount: u128,
    i_reserve_out: u128,
    i_reserve_in: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> anchor_lang::Result<u128> {
    let (c, d, e, f, i) = (
        u256(amount),
        u256(i_reserve_out),
        u256(i_reserve_in),
        u256(reserve_in),
        u256(reserve_out),
    );

    // c·d + d·f + e·i >= c·i because d >= i
    let positive =
        checked_add(checked_add(checked_mul(c, d)?, checked_mul(d, f)?)?, checked_mul(e, i)?)?;
    let b = checked_div(checked_sub(positive, checked_mul(c, i)?)?, i)?;
    let four_ce = checked_mul(checked_mul(U256::from(4u8), c)?, e)?;
    let root = sqrt(checked_add(four_ce, checked_mul(b, b)?)?);
    let x = checked_sub(root, b)? >> 1;

    check_swap_bounds(x, c, ErrorCode::SwapAndDepositTooLowOrTooHigh)?;

    let amt0_to_deposit = checked_sub(c, x)?;
    let amt1_to_deposit = checked_div(checked_mul(d, x)?, checked_add(e, x)?)?;

    let shares0 =
        checked_div(checked_mul(amt0_to_deposit, share_precision())?, checked_add(f, x)?)?;
    let shares1 = checked_div(
        checked_mul(amt1_to_deposit, share_precision())?,
        checked_sub(i, amt1_to_deposit)?,
    )?;
    trace!("swap_and_deposit: x {} shares0 {} shares1 {}", x, shares0, shares1);

    shares0.min(shares1).try_into_u128()
}

/// Share fraction burned to withdraw `amount` of one token, taking part of it
/// from the other side of the pool and swapping it back.
///
/// c - real reserves of token out
/// d - real reserves of the other token
/// e - imaginary reserves outside range of token out (imaginary - real)
/// f - imaginary reserves outside range of the other token
/// g - amount to withdraw
///
///   B/2A = (d·e + 2·c·d + c·f) / (2·d)
///   C/A  = (c·f / d + c) · g
///   x    = B/2A - √((B/2A)² - C/A)
///
/// The smaller root is the one below `g`; the burned fraction is `x / c`.
pub fn withdraw_and_swap(
    reserve_out: u128,
    reserve_other: u128,
    outside_range_out: u128,
    outside_range_other: u128,
    amount: u128,
) -> anchor_lang::Result<u128> {
    let (c, d, e, f, g) = (
        u256(reserve_out),
        u256(reserve_other),
        u256(outside_range_out),
        u256(outside_range_other),
        u256(amount),
    );
    let two = U256::from(2u8);

    let numerator = checked_add(
        checked_add(checked_mul(d, e)?, checked_mul(checked_mul(two, c)?, d)?)?,
        checked_mul(c, f)?,
    )?;
    let half_b = checked_div(numerator, checked_mul(two, d)?)?;
    let c_over_a = checked_mul(checked_add(checked_div(checked_mul(c, f)?, d)?, c)?, g)?;
    let discriminant = checked_sub(checked_mul(half_b, half_b)?, c_over_a)?;
    let x = checked_sub(half_b, sqrt(discriminant))?;

    check_swap_bounds(x, g, ErrorCode::WithdrawAndSwapTooLowOrTooHigh)?;
    trace!("withdraw_and_swap: x {}", x);

    checked_div(checked_mul(x, share_precision())?, c)?.try_into_u128()
}

/// Share fraction of debt minted to borrow `amount` of one token, borrowing
/// part of it as the other token and swapping it.
///
/// c - debt of token out
/// d - debt of the other token
/// e - imaginary reserves of token out
/// f - imaginary reserves of the other token
/// g - amount to borrow
///
///   B/2A = (c·f + d·e + d·g) / (2·d)
///   C/A  = c·f·g / d
///   x    = B/2A - √((B/2A)² - C/A)
///
/// `x` is rounded up by one unit before conversion so borrow shares never
/// undercharge.
pub fn borrow_and_swap(
    debt_out: u128,
    debt_other: u128,
    i_reserve_out: u128,
    i_reserve_other: u128,
    amount: u128,
) -> anchor_lang::Result<u128> {
    let (c, d, e, f, g) = (
        u256(debt_out),
        u256(debt_other),
        u256(i_reserve_out),
        u256(i_reserve_other),
        u256(amount),
    );
    let two = U256::from(2u8);

    let numerator =
        checked_add(checked_add(checked_mul(c, f)?, checked_mul(d, e)?)?, checked_mul(d, g)?)?;
    let half_b = checked_div(numerator, checked_mul(two, d)?)?;
    let c_over_a = checked_div(checked_mul(checked_mul(c, f)?, g)?, d)?;
    let discriminant = checked_sub(checked_mul(half_b, half_b)?, c_over_a)?;
    let x = checked_sub(half_b, sqrt(discriminant))?;

    check_swap_bounds(x, g, ErrorCode::BorrowAndSwapTooLowOrTooHigh)?;
    trace!("borrow_and_swap: x {}", x);

    checked_div(checked_mul(checked_add(x, U256::one())?, share_precision())?, c)?.try_into_u128()
}

/// Share fraction of debt burned by paying back `amount` of one token, part of
/// which is swapped to repay the other token's debt.
///
/// c - debt of token in
/// d - debt of the other token
/// e - imaginary reserves of token in
/// f - imaginary reserves of the other token
/// g - amount to pay back
///
///   B/A = (c·f + d·e - f·g - d·g) / d      (may be negative)
///   x   = (√(4·e·g + (B/A)²) - B/A) / 2
pub fn swap_and_payback(
    debt_in: u128,
    debt_other: u128,
    i_reserve_in: u128,
    i_reserve_other: u128,
    amount: u128,
) -> anchor_lang::Result<u128> {
    let (c, d, e, f, g) = (
        u256(debt_in),
        u256(debt_other),
        u256(i_reserve_in),
        u256(i_reserve_other),
        u256(amount),
    );

    let positive = checked_add(checked_mul(c, f)?, checked_mul(d, e)?)?;
    let negative = checked_add(checked_mul(f, g)?, checked_mul(d, g)?)?;
    let four_eg = checked_mul(checked_mul(U256::from(4u8), e)?, g)?;

    let x = if positive >= negative {
        let b = checked_div(checked_sub(positive, negative)?, d)?;
        let root = sqrt(checked_add(four_eg, checked_mul(b, b)?)?);
        checked_sub(root, b)? >> 1
    } else {
        let b = checked_div(checked_sub(negative, positive)?, d)?;
        let root = sqrt(checked_add(four_eg, checked_mul(b, b)?)?);
        checked_add(root, b)? >> 1
    };

    check_swap_bounds(x, g, ErrorCode::SwapAndPaybackTooLowOrTooHigh)?;

    let amt0_to_payback = checked_sub(g, x)?;
    let amt1_to_payback = checked_div(checked_mul(f, x)?, checked_add(e, x)?)?;

    let shares0 =
        checked_div(checked_mul(amt0_to_payback, share_precision())?, checked_sub(c, x)?)?;
    let shares1 = checked_div(
        checked_mul(amt1_to_payback, share_precision())?,
        checked_add(d, amt1_to_payback)?,
    )?;
    trace!("swap_and_payback: x {} shares0 {} shares1 {}", x, shares0, shares1);

    shares0.min(shares1).try_into_u128()
}

/// Token amount that repays debt shares entirely in one token, given the debt
/// pool after the shares' liquidity was removed pro rata.
///
/// a - imaginary reserves of token in, after removal
/// b - imaginary reserves of the other token, after removal
/// c - current debt of token in (before removal)
/// d - current debt of the other token (before removal)
/// i - real reserves of token in, after removal
/// j - real reserves of the other token, after removal
///
///   l = a - i, m = b - j          (liquidity outside range)
///   w = a·b                       (final K)
///   z = w / l, y = w / m          (final imaginary reserves)
///   v = z - m - d
///   x = v·y / (m + v)
///   amount = c - x
pub fn swap_and_payback_one_token_perfect_shares(
    i_reserve_in: u128,
    i_reserve_other: u128,
    debt_in: u128,
    debt_other: u128,
    reserve_in: u128,
    reserve_other: u128,
) -> anchor_lang::Result<u128> {
    let (a, b, c, d, i, j) = (
        u256(i_reserve_in),
        u256(i_reserve_other),
        u256(debt_in),
        u256(debt_other),
        u256(reserve_in),
        u256(reserve_other),
    );

    let l = checked_sub(a, i)?;
    let m = checked_sub(b, j)?;
    let w = checked_mul(a, b)?;
    let z = checked_div(w, l)?;
    let y = checked_div(w, m)?;
    let v = checked_sub(checked_sub(z, m)?, d)?;
    let x = checked_div(checked_mul(v, y)?, checked_add(m, v)?)?;
    trace!("swap_and_payback_one_token_perfect_shares: z {} y {} x {}", z, y, x);

    checked_sub(c, x)?.try_into_u128()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 20k tokens a side at 12 decimals, imaginary reserves ~19.5x real
    const R0: u128 = 20_000_000_006_000_000;
    const R1: u128 = 20_000_000_000_500_000;
    const I0: u128 = 389_736_659_726_997_981;
    const I1: u128 = 389_736_659_619_871_949;

    const D0: u128 = 10_000_000_000_000_000;
    const D1: u128 = 9_999_999_999_000_000;
    const DI0: u128 = 184_868_330_099_560_759;
    const DI1: u128 = 184_868_330_048_879_109;

    const ONE_TOKEN: u128 = 1_000_000_000_000;

    fn assert_error(result: anchor_lang::Result<u128>, code: ErrorCode) {
        let expected: anchor_lang::error::Error = code.into();
        assert_eq!(result.unwrap_err(), expected);
    }

    #[test]
    fn test_swap_and_deposit() {
        // one token into a 40k token pool is ~1/40k of the supply
        assert_eq!(swap_and_deposit(ONE_TOKEN, I1, I0, R0, R1).unwrap(), 24_999_983_956_348);
    }

    #[test]
    fn test_withdraw_and_swap() {
        assert_eq!(
            withdraw_and_swap(R0, R1, I0 - R0, I1 - R1, ONE_TOKEN).unwrap(),
            25_000_016_028_999
        );
    }

    #[test]
    fn test_borrow_and_swap() {
        assert_eq!(borrow_and_swap(D0, D1, DI0, DI1, ONE_TOKEN).unwrap(), 49_999_932_380_100);
    }

    #[test]
    fn test_swap_and_payback() {
        assert_eq!(swap_and_payback(D0, D1, DI0, DI1, ONE_TOKEN).unwrap(), 49_999_932_376_456);
    }

    #[test]
    fn test_swap_and_payback_negative_b() {
        // paying back more than the debt flips the sign of b and lands out of bounds
        assert_error(
            swap_and_payback(1_000, 1_000, 1_000, 1_000, 1_500),
            ErrorCode::SwapAndPaybackTooLowOrTooHigh,
        );
    }

    #[test]
    fn test_dust_amounts_are_rejected() {
        assert_error(swap_and_deposit(1, I1, I0, R0, R1), ErrorCode::SwapAndDepositTooLowOrTooHigh);
        assert_error(
            withdraw_and_swap(R0, R1, I0 - R0, I1 - R1, 1),
            ErrorCode::WithdrawAndSwapTooLowOrTooHigh,
        );
        assert_error(borrow_and_swap(D0, D1, DI0, DI1, 1), ErrorCode::BorrowAndSwapTooLowOrTooHigh);
        assert_error(
            swap_and_payback(D0, D1, DI0, DI1, 1),
            ErrorCode::SwapAndPaybackTooLowOrTooHigh,
        );
        assert!(ErrorCode::SwapAndPaybackTooLowOrTooHigh.is_swap_bounds_error());
        assert!(!ErrorCode::MathOverflow.is_swap_bounds_error());
    }

    #[test]
    fn test_swap_bounds_are_exact() {
        let amount = u256(2_000_000);
        assert!(check_swap_bounds(u256(2), amount, ErrorCode::InvalidInput).is_ok());
        assert!(check_swap_bounds(u256(1), amount, ErrorCode::InvalidInput).is_err());
        assert!(check_swap_bounds(u256(1_999_998), amount, ErrorCode::InvalidInput).is_ok());
        assert!(check_swap_bounds(u256(1_999_999), amount, ErrorCode::InvalidInput).is_err());
    }

    #[test]
    fn test_perfect_shares_after_removal() {
        // the pool after burning 1e18 of 2e22 debt shares
        let amount = swap_and_payback_one_token_perfect_shares(
            184_859_086_683_055_781,
            184_859_086_632_376_666,
            D0,
            D1,
            9_486_358_653_906_273,
            9_486_358_651_430_232,
        )
        .unwrap();
        assert_eq!(amount, 999_971_233_901);
    }

    proptest! {
        #[test]
        fn prop_round_trips_never_pay(amount in 1_000_000u128..1_000_000_000_000_000) {
            let deposited = swap_and_deposit(amount, I1, I0, R0, R1).unwrap();
            let withdrawn = withdraw_and_swap(R0, R1, I0 - R0, I1 - R1, amount).unwrap();
            prop_assert!(deposited < withdrawn);

            let borrowed = borrow_and_swap(D1, D0, DI1, DI0, amount).unwrap();
            let paid_back = swap_and_payback(D1, D0, DI1, DI0, amount).unwrap();
            prop_assert!(paid_back < borrowed);
        }
    }
}
