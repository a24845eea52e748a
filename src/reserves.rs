//! Reserve snapshots of the collateral and debt pools
//!
//! Both pools carry real reserves (tokens actually held) and imaginary
//! reserves (the leveraged constant-product curve used for pricing, always
//! at least the real ones). The debt pool additionally tracks the total
//! borrowed amount per token.
//!
//! Snapshots are plain values: every mint or burn returns a new snapshot and
//! never touches the one the caller passed in.
use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    math::{mul_div_u128, Rounding},
    ErrorCode, TokenIndex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareChange {
    Mint,
    Burn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CollateralReserves {
    pub token0_real_reserves: u128,
    pub token1_real_reserves: u128,
    pub token0_imaginary_reserves: u128,
    pub token1_imaginary_reserves: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DebtReserves {
    pub token0_debt: u128,
    pub token1_debt: u128,
    pub token0_real_reserves: u128,
    pub token1_real_reserves: u128,
    pub token0_imaginary_reserves: u128,
    pub token1_imaginary_reserves: u128,
}

/// Pro-rata reserve bookkeeping shared by every mint and burn.
pub trait ProportionalUpdate: Sized {
    /// Returns a copy where every field `r` becomes `r ± r * shares / total_shares`.
    ///
    /// # Errors
    /// - `MathOverflow` when `total_shares` is zero or a field overflows.
    /// - `SharesExceedTotalSupply` when burning more than `total_shares`.
    fn proportional_update(
        &self,
        shares: u128,
        total_shares: u128,
        change: ShareChange,
    ) -> anchor_lang::Result<Self>;
}

fn update_field(
    value: u128,
    shares: u128,
    total_shares: u128,
    change: ShareChange,
) -> anchor_lang::Result<u128> {
    let delta = mul_div_u128(value, shares, total_shares, Rounding::Down)?;
    match change {
        ShareChange::Mint => Ok(value.checked_add(delta).ok_or(ErrorCode::MathOverflow)?),
        ShareChange::Burn => Ok(value.checked_sub(delta).ok_or(ErrorCode::MathUnderflow)?),
    }
}

fn check_update(shares: u128, total_shares: u128, change: ShareChange) -> anchor_lang::Result<()> {
    if total_shares == 0 {
        return Err(ErrorCode::MathOverflow.into());
    }
    if change == ShareChange::Burn && shares > total_shares {
        return Err(ErrorCode::SharesExceedTotalSupply.into());
    }
    Ok(())
}

impl ProportionalUpdate for CollateralReserves {
    fn proportional_update(
        &self,
        shares: u128,
        total_shares: u128,
        change: ShareChange,
    ) -> anchor_lang::Result<Self> {
        check_update(shares, total_shares, change)?;
        let update = |value| update_field(value, shares, total_shares, change);
        Ok(Self {
            token0_real_reserves: update(self.token0_real_reserves)?,
            token1_real_reserves: update(self.token1_real_reserves)?,
            token0_imaginary_reserves: update(self.token0_imaginary_reserves)?,
            token1_imaginary_reserves: update(self.token1_imaginary_reserves)?,
        })
    }
}

impl ProportionalUpdate for DebtReserves {
    fn proportional_update(
        &self,
        shares: u128,
        total_shares: u128,
        change: ShareChange,
    ) -> anchor_lang::Result<Self> {
        check_update(shares, total_shares, change)?;
        let update = |value| update_field(value, shares, total_shares, change);
        Ok(Self {
            token0_debt: update(self.token0_debt)?,
            token1_debt: update(self.token1_debt)?,
            token0_real_reserves: update(self.token0_real_reserves)?,
            token1_real_reserves: update(self.token1_real_reserves)?,
            token0_imaginary_reserves: update(self.token0_imaginary_reserves)?,
            token1_imaginary_reserves: update(self.token1_imaginary_reserves)?,
        })
    }
}

impl CollateralReserves {
    pub fn real(&self, token: TokenIndex) -> u128 {
        match token {
            TokenIndex::Token0 => self.token0_real_reserves,
            TokenIndex::Token1 => self.token1_real_reserves,
        }
    }

    pub fn imaginary(&self, token: TokenIndex) -> u128 {
        match token {
            TokenIndex::Token0 => self.token0_imaginary_reserves,
            TokenIndex::Token1 => self.token1_imaginary_reserves,
        }
    }

    /// Imaginary liquidity outside the real range: `imaginary - real`.
    pub fn outside_range(&self, token: TokenIndex) -> anchor_lang::Result<u128> {
        Ok(self
            .imaginary(token)
            .checked_sub(self.real(token))
            .ok_or(ErrorCode::MathUnderflow)?)
    }

    pub fn has_empty_real_reserves(&self) -> bool {
        self.token0_real_reserves == 0 || self.token1_real_reserves == 0
    }

    /// Usable for swaps: every real and imaginary reserve is non-zero.
    pub fn is_enabled(&self) -> bool {
        !self.has_empty_real_reserves()
            && self.token0_imaginary_reserves > 0
            && self.token1_imaginary_reserves > 0
    }
}

impl DebtReserves {
    pub fn debt(&self, token: TokenIndex) -> u128 {
        match token {
            TokenIndex::Token0 => self.token0_debt,
            TokenIndex::Token1 => self.token1_debt,
        }
    }

    pub fn real(&self, token: TokenIndex) -> u128 {
        match token {
            TokenIndex::Token0 => self.token0_real_reserves,
            TokenIndex::Token1 => self.token1_real_reserves,
        }
    }

    pub fn imaginary(&self, token: TokenIndex) -> u128 {
        match token {
            TokenIndex::Token0 => self.token0_imaginary_reserves,
            TokenIndex::Token1 => self.token1_imaginary_reserves,
        }
    }

    pub fn has_empty_real_reserves(&self) -> bool {
        self.token0_real_reserves == 0 || self.token1_real_reserves == 0
    }

    pub fn has_empty_debt(&self) -> bool {
        self.token0_debt == 0 || self.token1_debt == 0
    }

    pub fn is_enabled(&self) -> bool {
        !self.has_empty_real_reserves()
            && self.token0_imaginary_reserves > 0
            && self.token1_imaginary_reserves > 0
    }
}
