use anchor_lang::prelude::error_code;

#[error_code]
pub enum ErrorCode {
    #[msg("Invalid input")]
    InvalidInput,
    #[msg("Token decimals out of range")]
    InvalidDecimals,
    #[msg("Token index must be 0 or 1")]
    InvalidTokenIndex,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Math underflow")]
    MathUnderflow,
    #[msg("Shares to burn exceed total shares")]
    SharesExceedTotalSupply,
    #[msg("Swap and deposit amount too low or too high")]
    SwapAndDepositTooLowOrTooHigh,
    #[msg("Withdraw and swap amount too low or too high")]
    WithdrawAndSwapTooLowOrTooHigh,
    #[msg("Borrow and swap amount too low or too high")]
    BorrowAndSwapTooLowOrTooHigh,
    #[msg("Swap and payback amount too low or too high")]
    SwapAndPaybackTooLowOrTooHigh,
    #[msg("Neither collateral nor debt pool is enabled")]
    NoPoolsEnabled,
    #[msg("Insufficient collateral pool reserves")]
    InsufficientCollateralReserves,
    #[msg("Insufficient debt pool reserves")]
    InsufficientDebtReserves,
    #[msg("Withdraw limit reached")]
    WithdrawLimitReached,
    #[msg("Borrow limit reached")]
    BorrowLimitReached,
    #[msg("Trade too big, exceeds max price difference")]
    TradeTooBig,
    #[msg("Input amount too small")]
    InputAmountTooSmall,
    #[msg("Output is zero")]
    OutputIsZero,
}

impl ErrorCode {
    /// True for the errors raised when a solved swap falls outside
    /// `[amount / 1e6, amount * (1e6 - 1) / 1e6]`.
    pub fn is_swap_bounds_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::SwapAndDepositTooLowOrTooHigh
                | ErrorCode::WithdrawAndSwapTooLowOrTooHigh
                | ErrorCode::BorrowAndSwapTooLowOrTooHigh
                | ErrorCode::SwapAndPaybackTooLowOrTooHigh
        )
    }
}
