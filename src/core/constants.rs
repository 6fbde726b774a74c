use rust_decimal::Decimal;

// Routing intermediates, tried in this order for two-hop routes
pub const PREFERRED_INTERMEDIATES: [&str; 3] = ["ETH", "USDC", "USDT"];

// Stablecoins pegged at $1
pub const PEGGED_STABLECOINS: [&str; 2] = ["USDC", "USDT"];

// Token whose price denominates gas
pub const GAS_TOKEN: &str = "ETH";

// Id reported for the synthetic pool used when no pool graph connects a pair
pub const VIRTUAL_POOL_ID: &str = "virtual";
pub const POOL_DISPLAY_NAME: &str = "Insider V2";

// Fee rates
pub const DEFAULT_FEE_RATE_BPS: i64 = 30; // 0.3%
pub const STABLE_FEE_RATE_BPS: i64 = 5; // 0.05%

// Gas estimation
pub const DEFAULT_GAS_PRICE_GWEI: u64 = 25;
pub const SINGLE_HOP_GAS_LIMIT: u64 = 120_000;
pub const MULTI_HOP_GAS_LIMIT: u64 = 180_000;
pub const GWEI_PER_ETH: u64 = 1_000_000_000;

// Quote configuration
pub const QUOTE_TTL_SECS: u64 = 30;
pub const DEFAULT_SLIPPAGE_PCT: f64 = 0.5;
pub const MAX_SLIPPAGE_PCT: f64 = 50.0;

// Prediction scoring
pub const TICK_INTERVAL_SECS: u64 = 5 * 60;
pub const MAX_MULTIPLIER: f64 = 10.0;
pub const LEADERBOARD_SIZE: usize = 100;

/// Error-percent ceiling and multiplier for each tier of the tiered payout policy.
pub const SCORING_TIERS: [(f64, f64); 5] = [
    (1.0, 10.0),
    (2.5, 5.0),
    (5.0, 2.0),
    (10.0, 1.0),
    (f64::INFINITY, 0.0),
];

/// Fee rate as a decimal fraction from basis points.
pub fn fee_rate_from_bps(bps: i64) -> Decimal {
    Decimal::new(bps, 4)
}

pub fn default_fee_rate() -> Decimal {
    fee_rate_from_bps(DEFAULT_FEE_RATE_BPS)
}
