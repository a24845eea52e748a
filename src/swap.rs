use borsh::{BorshDeserialize, BorshSerialize};
use log::debug;

use crate::{
    decimals::{from_adjusted_amount, from_adjusted_amount_rounded, to_adjusted_amount},
    math::{checked_add, checked_div, checked_mul, checked_sub, mul_div, sqrt, u256, Rounding, U256},
    utils::{apply_rate_down, reverse_apply_rate_down},
    CollateralReserves, DebtReserves, ErrorCode, MAX_PRICE_DIFF, PRICE_PRECISION, SHARE_PRECISION,
};

/// Withdraw or borrow capacity that grows linearly from `available` to
/// `expands_to` over `expand_duration` seconds after the last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TokenLimit {
    pub available: u128,  // out token decimals
    pub expands_to: u128, // out token decimals
    pub expand_duration: u64,
}

impl TokenLimit {
    pub fn expanded(&self, last_update_timestamp: u64, current_timestamp: u64) -> u128 {
        let elapsed = current_timestamp.saturating_sub(last_update_timestamp);
        if elapsed >= self.expand_duration || self.expands_to <= self.available {
            return self.expands_to.max(self.available);
        }
        let growth = self.expands_to - self.available;
        // elapsed < expand_duration, so the quotient stays below `growth`
        let expanded = u256(growth) * U256::from(elapsed) / U256::from(self.expand_duration);
        self.available + expanded.low_u128()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DexLimits {
    pub withdrawable_token0: TokenLimit,
    pub withdrawable_token1: TokenLimit,
    pub borrowable_token0: TokenLimit,
    pub borrowable_token1: TokenLimit,
    pub last_update_timestamp: u64,
}

/// How a swap is split between the collateral and the debt pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapRoute {
    pub collateral_amount: u128,
    pub debt_amount: u128,
}

/// Constant product quote: `amount_in * reserve_out / (reserve_in + amount_in)`,
/// truncated.
pub fn get_amount_out(
    amount_in: u128,
    i_reserve_in: u128,
    i_reserve_out: u128,
) -> anchor_lang::Result<u128> {
    let (numerator, denominator) = out_leg(amount_in, i_reserve_in, i_reserve_out)?;
    mul_div(numerator, U256::one(), denominator, Rounding::Down)?.try_into_u128()
}

/// Inverse quote: `amount_out * reserve_in / (reserve_out - amount_out)`,
/// rounded up so the input always covers the output.
pub fn get_amount_in(
    amount_out: u128,
    i_reserve_in: u128,
    i_reserve_out: u128,
) -> anchor_lang::Result<u128> {
    let (numerator, denominator) = in_leg(amount_out, i_reserve_in, i_reserve_out)?;
    mul_div(numerator, U256::one(), denominator, Rounding::Up)?.try_into_u128()
}

// (numerator, denominator) of an exact input quote
fn out_leg(
    amount_in: u128,
    i_reserve_in: u128,
    i_reserve_out: u128,
) -> anchor_lang::Result<(U256, U256)> {
    Ok((
        checked_mul(u256(amount_in), u256(i_reserve_out))?,
        checked_add(u256(i_reserve_in), u256(amount_in))?,
    ))
}

// (numerator, denominator) of an exact output quote
fn in_leg(
    amount_out: u128,
    i_reserve_in: u128,
    i_reserve_out: u128,
) -> anchor_lang::Result<(U256, U256)> {
    Ok((
        checked_mul(u256(amount_out), u256(i_reserve_in))?,
        checked_sub(u256(i_reserve_out), u256(amount_out))?,
    ))
}

/// `n1/d1 + n2/d2` as `(n1·d2 + n2·d1) / (d1·d2)`, rounded once.
fn sum_legs(
    first: (U256, U256),
    second: (U256, U256),
    rounding: Rounding,
) -> anchor_lang::Result<u128> {
    let numerator =
        checked_add(checked_mul(first.0, second.1)?, checked_mul(second.0, first.1)?)?;
    let denominator = checked_mul(first.1, second.1)?;
    mul_div(numerator, U256::one(), denominator, rounding)?.try_into_u128()
}

// √(reserve_a * reserve_b * 1e18)
fn root_k(reserve_a: u128, reserve_b: u128) -> anchor_lang::Result<U256> {
    let product = checked_mul(u256(reserve_a), u256(reserve_b))?;
    Ok(sqrt(checked_mul(product, u256(SHARE_PRECISION))?))
}

/// `(positive - negative) / denominator` clamped to `[0, total]`.
fn clamp_split(
    positive: U256,
    negative: U256,
    denominator: U256,
    total: u128,
) -> anchor_lang::Result<u128> {
    if negative >= positive {
        return Ok(0);
    }
    let amount = checked_div(positive - negative, denominator)?;
    if amount >= u256(total) {
        return Ok(total);
    }
    amount.try_into_u128()
}

/// Amount of `amount_in` to send through the collateral pool so both pools
/// end at the same price.
///
/// x, y   - collateral imaginary reserves of token out, token in
/// x2, y2 - debt imaginary reserves of token out, token in
///
///   a = ((y2 + t)·√(x·y) - y·√(x2·y2)) / (√(x·y) + √(x2·y2))
pub fn swap_routing_in(
    t: u128,
    x: u128,
    y: u128,
    x2: u128,
    y2: u128,
) -> anchor_lang::Result<u128> {
    let xy_root = root_k(x, y)?;
    let x2y2_root = root_k(x2, y2)?;
    let positive = checked_mul(checked_add(u256(y2), u256(t))?, xy_root)?;
    let negative = checked_mul(u256(y), x2y2_root)?;
    clamp_split(positive, negative, checked_add(xy_root, x2y2_root)?, t)
}

/// Amount of `amount_out` to take from the collateral pool so both pools end
/// at the same price.
///
/// x, y   - collateral imaginary reserves of token in, token out
/// x2, y2 - debt imaginary reserves of token in, token out
///
///   b = (t·√(x·y) + y·√(x2·y2) - y2·√(x·y)) / (√(x·y) + √(x2·y2))
pub fn swap_routing_out(
    t: u128,
    x: u128,
    y: u128,
    x2: u128,
    y2: u128,
) -> anchor_lang::Result<u128> {
    let xy_root = root_k(x, y)?;
    let x2y2_root = root_k(x2, y2)?;
    let positive =
        checked_add(checked_mul(u256(t), xy_root)?, checked_mul(u256(y), x2y2_root)?)?;
    let negative = checked_mul(u256(y2), xy_root)?;
    clamp_split(positive, negative, checked_add(xy_root, x2y2_root)?, t)
}

/// Reserves of one pool seen from the direction of the swap.
#[derive(Debug, Clone, Copy)]
struct PoolSide {
    real_out: u128,
    i_reserve_in: u128,
    i_reserve_out: u128,
}

impl PoolSide {
    fn out_leg(&self, amount_in: u128) -> anchor_lang::Result<(U256, U256)> {
        match amount_in {
            0 => Ok((U256::zero(), U256::one())),
            amount => out_leg(amount, self.i_reserve_in, self.i_reserve_out),
        }
    }

    fn in_leg(&self, amount_out: u128) -> anchor_lang::Result<(U256, U256)> {
        match amount_out {
            0 => Ok((U256::zero(), U256::one())),
            amount => in_leg(amount, self.i_reserve_in, self.i_reserve_out),
        }
    }
}

fn collateral_side(reserves: &CollateralReserves, swap_0_to_1: bool) -> PoolSide {
    if swap_0_to_1 {
        PoolSide {
            real_out: reserves.token1_real_reserves,
            i_reserve_in: reserves.token0_imaginary_reserves,
            i_reserve_out: reserves.token1_imaginary_reserves,
        }
    } else {
        PoolSide {
            real_out: reserves.token0_real_reserves,
            i_reserve_in: reserves.token1_imaginary_reserves,
            i_reserve_out: reserves.token0_imaginary_reserves,
        }
    }
}

fn debt_side(reserves: &DebtReserves, swap_0_to_1: bool) -> PoolSide {
    if swap_0_to_1 {
        PoolSide {
            real_out: reserves.token1_real_reserves,
            i_reserve_in: reserves.token0_imaginary_reserves,
            i_reserve_out: reserves.token1_imaginary_reserves,
        }
    } else {
        PoolSide {
            real_out: reserves.token0_real_reserves,
            i_reserve_in: reserves.token1_imaginary_reserves,
            i_reserve_out: reserves.token0_imaginary_reserves,
        }
    }
}

fn enabled_pools(
    col_reserves: &CollateralReserves,
    debt_reserves: &DebtReserves,
) -> anchor_lang::Result<(bool, bool)> {
    let pools = (col_reserves.is_enabled(), debt_reserves.is_enabled());
    if pools == (false, false) {
        return Err(ErrorCode::NoPoolsEnabled.into());
    }
    Ok(pools)
}

/// Output of each pool against its real reserves and its expanded
/// withdraw/borrow limit, both in the out token.
fn check_outputs(
    swap_0_to_1: bool,
    outputs: SwapRoute,
    col: PoolSide,
    debt: PoolSide,
    out_decimals: u8,
    limits: &DexLimits,
    current_timestamp: u64,
) -> anchor_lang::Result<()> {
    if outputs.collateral_amount > col.real_out {
        return Err(ErrorCode::InsufficientCollateralReserves.into());
    }
    if outputs.debt_amount > debt.real_out {
        return Err(ErrorCode::InsufficientDebtReserves.into());
    }

    let (withdrawable, borrowable) = if swap_0_to_1 {
        (limits.withdrawable_token1, limits.borrowable_token1)
    } else {
        (limits.withdrawable_token0, limits.borrowable_token0)
    };
    let withdrawable = withdrawable.expanded(limits.last_update_timestamp, current_timestamp);
    let borrowable = borrowable.expanded(limits.last_update_timestamp, current_timestamp);

    if from_adjusted_amount(outputs.collateral_amount, out_decimals)? > withdrawable {
        debug!(
            "collateral output {} above withdraw limit {}",
            outputs.collateral_amount, withdrawable
        );
        return Err(ErrorCode::WithdrawLimitReached.into());
    }
    if from_adjusted_amount(outputs.debt_amount, out_decimals)? > borrowable {
        debug!("debt output {} above borrow limit {}", outputs.debt_amount, borrowable);
        return Err(ErrorCode::BorrowLimitReached.into());
    }
    Ok(())
}

/// Price movement of the pool that carried the larger input, capped at
/// `MAX_PRICE_DIFF` percent.
fn check_price_impact(
    inputs: SwapRoute,
    outputs: SwapRoute,
    col: PoolSide,
    debt: PoolSide,
) -> anchor_lang::Result<()> {
    let (pool, amount_in, amount_out) = if inputs.collateral_amount > inputs.debt_amount {
        (col, inputs.collateral_amount, outputs.collateral_amount)
    } else {
        (debt, inputs.debt_amount, outputs.debt_amount)
    };
    let precision = u256(PRICE_PRECISION);

    let old_price =
        checked_div(checked_mul(u256(pool.i_reserve_out), precision)?, u256(pool.i_reserve_in))?;
    let new_price = checked_div(
        checked_mul(checked_sub(u256(pool.i_reserve_out), u256(amount_out))?, precision)?,
        checked_add(u256(pool.i_reserve_in), u256(amount_in))?,
    )?;
    let diff = if old_price > new_price {
        old_price - new_price
    } else {
        new_price - old_price
    };

    if checked_mul(diff, U256::from(100u8))? > checked_mul(old_price, u256(MAX_PRICE_DIFF))? {
        debug!("price moved from {} to {}", old_price, new_price);
        return Err(ErrorCode::TradeTooBig.into());
    }
    Ok(())
}

/// Quotes an exact input swap across the collateral and debt pools.
///
/// Amounts are in 12 decimals. `out_decimals` is only used to compare each
/// pool's output with the withdraw and borrow limits, which are kept in the
/// out token's own decimals.
pub fn swap_in_adjusted(
    swap_0_to_1: bool,
    amount_in: u128,
    col_reserves: &CollateralReserves,
    debt_reserves: &DebtReserves,
    out_decimals: u8,
    limits: &DexLimits,
    current_timestamp: u64,
) -> anchor_lang::Result<u128> {
    if amount_in == 0 {
        return Err(ErrorCode::InputAmountTooSmall.into());
    }
    let col = collateral_side(col_reserves, swap_0_to_1);
    let debt = debt_side(debt_reserves, swap_0_to_1);

    let collateral_in = match enabled_pools(col_reserves, debt_reserves)? {
        (true, true) => swap_routing_in(
            amount_in,
            col.i_reserve_out,
            col.i_reserve_in,
            debt.i_reserve_out,
            debt.i_reserve_in,
        )?,
        (true, false) => amount_in,
        _ => 0,
    };
    let inputs = SwapRoute {
        collateral_amount: collateral_in,
        debt_amount: amount_in - collateral_in,
    };
    debug!(
        "swap in {}: {} through collateral, {} through debt",
        amount_in, inputs.collateral_amount, inputs.debt_amount
    );

    let outputs = SwapRoute {
        collateral_amount: match inputs.collateral_amount {
            0 => 0,
            amount => get_amount_out(amount, col.i_reserve_in, col.i_reserve_out)?,
        },
        debt_amount: match inputs.debt_amount {
            0 => 0,
            amount => get_amount_out(amount, debt.i_reserve_in, debt.i_reserve_out)?,
        },
    };

    check_outputs(swap_0_to_1, outputs, col, debt, out_decimals, limits, current_timestamp)?;
    check_price_impact(inputs, outputs, col, debt)?;

    // both legs summed before truncating
    let amount_out = sum_legs(
        col.out_leg(inputs.collateral_amount)?,
        debt.out_leg(inputs.debt_amount)?,
        Rounding::Down,
    )?;
    if amount_out == 0 {
        return Err(ErrorCode::OutputIsZero.into());
    }
    Ok(amount_out)
}

/// Quotes the input needed for an exact output swap across the collateral and
/// debt pools. Amounts are in 12 decimals.
pub fn swap_out_adjusted(
    swap_0_to_1: bool,
    amount_out: u128,
    col_reserves: &CollateralReserves,
    debt_reserves: &DebtReserves,
    out_decimals: u8,
    limits: &DexLimits,
    current_timestamp: u64,
) -> anchor_lang::Result<u128> {
    if amount_out == 0 {
        return Err(ErrorCode::OutputIsZero.into());
    }
    let col = collateral_side(col_reserves, swap_0_to_1);
    let debt = debt_side(debt_reserves, swap_0_to_1);

    let collateral_out = match enabled_pools(col_reserves, debt_reserves)? {
        (true, true) => swap_routing_out(
            amount_out,
            col.i_reserve_in,
            col.i_reserve_out,
            debt.i_reserve_in,
            debt.i_reserve_out,
        )?,
        (true, false) => amount_out,
        _ => 0,
    };
    let outputs = SwapRoute {
        collateral_amount: collateral_out,
        debt_amount: amount_out - collateral_out,
    };
    debug!(
        "swap out {}: {} from collateral, {} from debt",
        amount_out, outputs.collateral_amount, outputs.debt_amount
    );

    // before pricing: get_amount_in needs the output below the imaginary reserve
    check_outputs(swap_0_to_1, outputs, col, debt, out_decimals, limits, current_timestamp)?;

    let inputs = SwapRoute {
        collateral_amount: match outputs.collateral_amount {
            0 => 0,
            amount => get_amount_in(amount, col.i_reserve_in, col.i_reserve_out)?,
        },
        debt_amount: match outputs.debt_amount {
            0 => 0,
            amount => get_amount_in(amount, debt.i_reserve_in, debt.i_reserve_out)?,
        },
    };
    check_price_impact(inputs, outputs, col, debt)?;

    sum_legs(
        col.in_leg(outputs.collateral_amount)?,
        debt.in_leg(outputs.debt_amount)?,
        Rounding::Up,
    )
}

/// Exact input swap on raw token amounts. `dex_fee_rate` is deducted from the
/// input before quoting.
#[allow(clippy::too_many_arguments)]
pub fn swap_in(
    swap_0_to_1: bool,
    amount_in: u128,
    in_decimals: u8,
    out_decimals: u8,
    dex_fee_rate: u64,
    col_reserves: &CollateralReserves,
    debt_reserves: &DebtReserves,
    limits: &DexLimits,
    current_timestamp: u64,
) -> anchor_lang::Result<u128> {
    let adjusted_in = apply_rate_down(to_adjusted_amount(amount_in, in_decimals)?, dex_fee_rate)?;
    if adjusted_in == 0 {
        return Err(ErrorCode::InputAmountTooSmall.into());
    }
    let adjusted_out = swap_in_adjusted(
        swap_0_to_1,
        adjusted_in,
        col_reserves,
        debt_reserves,
        out_decimals,
        limits,
        current_timestamp,
    )?;

    let amount_out = from_adjusted_amount(adjusted_out, out_decimals)?;
    if amount_out == 0 {
        return Err(ErrorCode::OutputIsZero.into());
    }
    Ok(amount_out)
}

/// Exact output swap on raw token amounts. Returns the input to send, fee
/// included and rounded up.
#[allow(clippy::too_many_arguments)]
pub fn swap_out(
    swap_0_to_1: bool,
    amount_out: u128,
    in_decimals: u8,
    out_decimals: u8,
    dex_fee_rate: u64,
    col_reserves: &CollateralReserves,
    debt_reserves: &DebtReserves,
    limits: &DexLimits,
    current_timestamp: u64,
) -> anchor_lang::Result<u128> {
    let adjusted_out = to_adjusted_amount(amount_out, out_decimals)?;
    let adjusted_in = swap_out_adjusted(
        swap_0_to_1,
        adjusted_out,
        col_reserves,
        debt_reserves,
        out_decimals,
        limits,
        current_timestamp,
    )?;
    let with_fee = reverse_apply_rate_down(adjusted_in, dex_fee_rate, Rounding::Up)?;
    from_adjusted_amount_rounded(with_fee, in_decimals, Rounding::Up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col_reserves() -> CollateralReserves {
        CollateralReserves {
            token0_real_reserves: 20_000_000_006_000_000,
            token1_real_reserves: 20_000_000_000_500_000,
            token0_imaginary_reserves: 389_736_659_726_997_981,
            token1_imaginary_reserves: 389_736_659_619_871_949,
        }
    }

    fn debt_reserves() -> DebtReserves {
        DebtReserves {
            token0_debt: 0,
            token1_debt: 0,
            token0_real_reserves: 9_486_832_995_556_050,
            token1_real_reserves: 9_486_832_993_079_885,
            token0_imaginary_reserves: 184_868_330_099_560_759,
            token1_imaginary_reserves: 184_868_330_048_879_109,
        }
    }

    fn limit(available: u128, expands_to: u128, expand_duration: u64) -> TokenLimit {
        TokenLimit {
            available,
            expands_to,
            expand_duration,
        }
    }

    fn limits_wide() -> DexLimits {
        let wide = limit(342_423_328_797_765_150_830_999, 342_423_328_797_765_150_830_999, 0);
        DexLimits {
            withdrawable_token0: wide,
            withdrawable_token1: wide,
            borrowable_token0: wide,
            borrowable_token1: wide,
            last_update_timestamp: 1_700_000_000,
        }
    }

    fn limits_tight() -> DexLimits {
        DexLimits {
            withdrawable_token0: limit(456_740_438_880_263, 711_907_234_052_361_388_866, 600),
            withdrawable_token1: limit(825_179_383_432_029, 711_907_234_052_361_388_866, 600),
            borrowable_token0: limit(941_825_058_374_170, 711_907_234_052_361_388_866, 600),
            borrowable_token1: limit(941_825_058_374_170, 711_907_234_052_361_388_866, 600),
            last_update_timestamp: 1_700_000_000,
        }
    }

    const NOW: u64 = 1_700_000_000;
    const ONE_THOUSAND_TOKENS: u128 = 1_000_000_000_000_000;

    fn error(code: ErrorCode) -> anchor_lang::error::Error {
        code.into()
    }

    fn quote_in(
        swap_0_to_1: bool,
        amount_in: u128,
        limits: &DexLimits,
        now: u64,
    ) -> anchor_lang::Result<u128> {
        let (col, debt) = (col_reserves(), debt_reserves());
        swap_in_adjusted(swap_0_to_1, amount_in, &col, &debt, 18, limits, now)
    }

    fn quote_out(
        swap_0_to_1: bool,
        amount_out: u128,
        limits: &DexLimits,
        now: u64,
    ) -> anchor_lang::Result<u128> {
        let (col, debt) = (col_reserves(), debt_reserves());
        swap_out_adjusted(swap_0_to_1, amount_out, &col, &debt, 18, limits, now)
    }

    #[test]
    fn test_get_amount_out_and_in() {
        assert_eq!(get_amount_out(100, 1_000, 2_000).unwrap(), 181);
        // 181_000 / 1_819 = 99.5
        assert_eq!(get_amount_in(181, 1_000, 2_000).unwrap(), 100);
        assert!(get_amount_in(2_000, 1_000, 2_000).is_err());
    }

    #[test]
    fn test_legs_are_rounded_once() {
        let half = (U256::one(), U256::from(2u8));
        let third = (U256::one(), U256::from(3u8));
        assert_eq!(sum_legs(half, half, Rounding::Down).unwrap(), 1);
        assert_eq!(sum_legs(third, third, Rounding::Down).unwrap(), 0);
        assert_eq!(sum_legs(third, third, Rounding::Up).unwrap(), 1);
        let empty = (U256::zero(), U256::one());
        assert_eq!(sum_legs(third, empty, Rounding::Up).unwrap(), 1);
    }

    #[test]
    fn test_expanded_limit() {
        let tight = limits_tight().withdrawable_token0;
        assert_eq!(tight.expanded(NOW, NOW), 456_740_438_880_263);
        assert_eq!(tight.expanded(NOW - 300, NOW), 355_953_845_396_400_134_564);
        assert_eq!(tight.expanded(NOW - 450, NOW), 533_930_539_724_380_761_715);
        assert_eq!(tight.expanded(NOW - 10_000, NOW), 711_907_234_052_361_388_866);
        // clock behind the sync time
        assert_eq!(tight.expanded(NOW + 5, NOW), 456_740_438_880_263);
        assert_eq!(limit(10, 5, 100).expanded(NOW - 50, NOW), 10);
    }

    #[test]
    fn test_routing_splits_across_pools() {
        let col = col_reserves();
        let debt = debt_reserves();
        let through_col = swap_routing_in(
            ONE_THOUSAND_TOKENS,
            col.token1_imaginary_reserves,
            col.token0_imaginary_reserves,
            debt.token1_imaginary_reserves,
            debt.token0_imaginary_reserves,
        )
        .unwrap();
        assert_eq!(through_col, 678_268_839_640_142);

        let out = quote_in(true, ONE_THOUSAND_TOKENS, &limits_wide(), NOW).unwrap();
        assert_eq!(out, 998_262_697_204_711);
    }

    #[test]
    fn test_swap_in_single_pool() {
        let col = col_reserves();
        let empty = DebtReserves::default();
        let out =
            swap_in_adjusted(true, ONE_THOUSAND_TOKENS, &col, &empty, 18, &limits_wide(), NOW)
                .unwrap();
        let expected = get_amount_out(
            ONE_THOUSAND_TOKENS,
            col.token0_imaginary_reserves,
            col.token1_imaginary_reserves,
        )
        .unwrap();
        assert_eq!(out, expected);

        let err = swap_in_adjusted(
            true,
            ONE_THOUSAND_TOKENS,
            &CollateralReserves::default(),
            &empty,
            18,
            &limits_wide(),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, error(ErrorCode::NoPoolsEnabled));
    }

    #[test]
    fn test_swap_in_out_round_trip() {
        for swap_0_to_1 in [true, false] {
            let out = quote_in(swap_0_to_1, ONE_THOUSAND_TOKENS, &limits_wide(), NOW).unwrap();
            let back = quote_out(swap_0_to_1, out, &limits_wide(), NOW).unwrap();
            assert_eq!(back, ONE_THOUSAND_TOKENS);
        }
    }

    #[test]
    fn test_limits() {
        let err = quote_in(true, ONE_THOUSAND_TOKENS, &limits_tight(), NOW).unwrap_err();
        assert_eq!(err, error(ErrorCode::WithdrawLimitReached));

        let err = quote_out(true, ONE_THOUSAND_TOKENS, &limits_tight(), NOW).unwrap_err();
        assert_eq!(err, error(ErrorCode::WithdrawLimitReached));

        // fully expanded after the window
        assert!(quote_in(true, ONE_THOUSAND_TOKENS, &limits_tight(), NOW + 1_000).is_ok());
        assert!(quote_out(true, ONE_THOUSAND_TOKENS, &limits_tight(), NOW + 1_000).is_ok());
    }

    #[test]
    fn test_trade_too_big() {
        let err = quote_in(true, 15 * ONE_THOUSAND_TOKENS, &limits_wide(), NOW).unwrap_err();
        assert_eq!(err, error(ErrorCode::TradeTooBig));
    }

    #[test]
    fn test_insufficient_reserves() {
        let col = col_reserves();
        let err = swap_out_adjusted(
            true,
            col.token1_real_reserves + 1,
            &col,
            &DebtReserves::default(),
            18,
            &limits_wide(),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, error(ErrorCode::InsufficientCollateralReserves));
    }

    #[test]
    fn test_swap_in_raw_amounts() {
        let (col, debt) = (col_reserves(), debt_reserves());
        // 1000 tokens of a 6 decimal token, 0.01% fee
        let out =
            swap_in(true, 1_000_000_000, 6, 18, 100, &col, &debt, &limits_wide(), NOW).unwrap();
        let net = apply_rate_down(ONE_THOUSAND_TOKENS, 100).unwrap();
        let adjusted = quote_in(true, net, &limits_wide(), NOW).unwrap();
        assert_eq!(out, adjusted * 1_000_000);

        let err = swap_in(true, 0, 6, 18, 100, &col, &debt, &limits_wide(), NOW).unwrap_err();
        assert_eq!(err, error(ErrorCode::InputAmountTooSmall));
    }

    #[test]
    fn test_swap_out_covers_fee() {
        let (col, debt, limits) = (col_reserves(), debt_reserves(), limits_wide());
        let one_token = 1_000_000_000_000_000_000;
        let amount_in = swap_out(true, one_token, 18, 18, 100, &col, &debt, &limits, NOW).unwrap();
        let amount_out = swap_in(true, amount_in, 18, 18, 100, &col, &debt, &limits, NOW).unwrap();
        assert!(amount_out >= 999_999_000_000_000_000);
    }
}
