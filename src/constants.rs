/// Rate denominator for fees and slippage. 10^6 = 100%
pub const MAX_PERCENTAGE: u64 = 1_000_000;

/// Swap bound denominator: a solved swap must be at least 1/10^6 of the amount
/// and at most (10^6 - 1)/10^6 of it.
pub const SIX_DECIMALS: u128 = 1_000_000;

/// Fixed-point scale of the share fractions returned by the solvers.
pub const SHARE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Canonical decimals of every amount and reserve used internally.
pub const INTERNAL_DECIMALS: u8 = 12;

/// Largest token decimals accepted by the normalizer.
pub const MAX_TOKEN_DECIMALS: u8 = 18;

/// Scale used for pool prices in the swap price impact check.
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000_000_000_000;

/// Maximum price movement (in percent) a single swap may cause on the pool
/// that carries most of the trade.
pub const MAX_PRICE_DIFF: u128 = 5;
