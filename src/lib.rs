//! Leveraged DEX Math Library
//!
//! Quoting math for a two-pool (collateral + debt) leveraged constant-product
//! DEX: deposit, withdraw, borrow and payback with an internal swap, their
//! pool-ratio ("perfect") variants, and the swap quote the pools are priced
//! with. Every function is pure integer arithmetic over caller-owned snapshots.

pub mod constants;
pub mod debt;
pub mod decimals;
pub mod errors;
pub mod liquidity;
pub mod math;
pub mod perfect;
pub mod reserves;
pub mod solvers;
pub mod state;
pub mod swap;
pub mod utils;

// Re-export functions for convenience
pub use constants::*;
pub use debt::{
    borrow, borrow_adjusted, payback, payback_adjusted, payback_max, payback_max_adjusted,
};
pub use decimals::{from_adjusted_amount, to_adjusted_amount};
pub use errors::ErrorCode;
pub use liquidity::{
    deposit, deposit_adjusted, withdraw, withdraw_adjusted, withdraw_max, withdraw_max_adjusted,
};
pub use perfect::{
    borrow_perfect, deposit_perfect, payback_perfect, payback_perfect_max, withdraw_perfect,
    withdraw_perfect_max,
};
pub use reserves::{CollateralReserves, DebtReserves, ProportionalUpdate, ShareChange};
pub use state::*;
pub use swap::{swap_in, swap_in_adjusted, swap_out, swap_out_adjusted, DexLimits, TokenLimit};
