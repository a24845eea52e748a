use borsh::{BorshDeserialize, BorshSerialize};

use crate::{ErrorCode, MAX_PERCENTAGE};

/// Fee and slippage settings for one quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DexConfig {
    pub dex_fee_rate: u64,  // 10^6 = 100%, charged on the swapped leg only
    pub slippage_rate: u64, // 10^6 = 100%
}

impl DexConfig {
    pub fn new(dex_fee_rate: u64, slippage_rate: u64) -> anchor_lang::Result<Self> {
        let config = Self {
            dex_fee_rate,
            slippage_rate,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anchor_lang::Result<()> {
        if self.dex_fee_rate > MAX_PERCENTAGE || self.slippage_rate > MAX_PERCENTAGE {
            return Err(ErrorCode::InvalidInput.into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenIndex {
    Token0,
    Token1,
}

impl TokenIndex {
    pub fn other(self) -> Self {
        match self {
            TokenIndex::Token0 => TokenIndex::Token1,
            TokenIndex::Token1 => TokenIndex::Token0,
        }
    }
}

impl TryFrom<u8> for TokenIndex {
    type Error = anchor_lang::error::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TokenIndex::Token0),
            1 => Ok(TokenIndex::Token1),
            _ => Err(ErrorCode::InvalidTokenIndex.into()),
        }
    }
}

/// Why an operation produced nothing instead of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoOpReason {
    /// Both token amounts (or the share amount) are zero.
    EmptyInput,
    /// Both token amounts are positive on a single-token path.
    BothAmountsPositive,
    /// Dual-sided amounts already match the pool ratio; nothing is left to swap.
    EqualProportion,
    /// A reserve or the share supply the operation divides by is zero.
    EmptyReserves,
    /// The leftover after proportional matching, or the slice a share burn
    /// removes, truncated to zero.
    ZeroSwapAmount,
}

/// Result of a quoting operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome<T> {
    Success(T),
    NoOp(NoOpReason),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::NoOp(_) => None,
        }
    }

    pub fn no_op_reason(&self) -> Option<NoOpReason> {
        match self {
            Outcome::Success(_) => None,
            Outcome::NoOp(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::NoOp(reason) => Outcome::NoOp(reason),
        }
    }
}

/// Shares minted or burned by a deposit, withdraw, borrow or payback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharesQuote {
    pub shares: u128,
    /// Worst acceptable share count: minimum to receive on deposit/payback,
    /// maximum to give up on withdraw/borrow.
    pub shares_with_slippage: u128,
}

/// Token amount for a share amount settled entirely in one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenAmountQuote {
    pub token_amount: u128,
    pub token_amount_with_slippage: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfectQuote {
    pub shares: u128,
    pub token0_amount: u128,
    pub token1_amount: u128,
    pub token0_amount_with_slippage: u128,
    pub token1_amount_with_slippage: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfectMaxQuote {
    pub token0_amount: u128,
    pub token1_amount: u128,
    pub token0_amount_with_slippage: u128,
    pub token1_amount_with_slippage: u128,
}
