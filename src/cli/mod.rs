use crate::core::MultiplierPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "insider")]
#[command(about = "Swap quotes and price-path prediction scoring for Insider Exchange", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Quote a swap between two tokens
    Quote(QuoteArgs),

    /// List liquidity pools
    Pools(PoolsArgs),

    /// Show reference token prices
    Prices(PricesArgs),

    /// Score a predicted price path against the realized one
    Score(ScoreArgs),
}

#[derive(Parser)]
pub struct QuoteArgs {
    /// Token to sell (symbol, e.g. ETH)
    pub from: String,

    /// Token to buy (symbol, e.g. USDC)
    pub to: String,

    /// Amount of the sold token
    pub amount: Decimal,

    /// Slippage tolerance in percent (default: DEFAULT_SLIPPAGE_PCT or 0.5)
    #[arg(short, long)]
    pub slippage: Option<f64>,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,

    /// Submit and execute the quoted swap for this wallet address
    #[arg(long, value_name = "ADDRESS")]
    pub execute: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PoolSort {
    Tvl,
    Volume,
    Apr,
}

#[derive(Parser)]
pub struct PoolsArgs {
    /// Maximum number of pools to list
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Ranking order
    #[arg(long, value_enum, default_value = "tvl")]
    pub sort: PoolSort,

    /// Only pools containing this token
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Parser)]
pub struct PricesArgs {
    /// Only show these symbols
    pub symbols: Vec<String>,

    /// Only tokens whose symbol or name contains this text
    #[arg(short, long, conflicts_with = "symbols")]
    pub search: Option<String>,
}

#[derive(Parser)]
pub struct ScoreArgs {
    /// JSON file with the predicted path: [{"time": ms, "price": n}, ...]
    pub predicted: PathBuf,

    /// JSON file with the realized path, same format
    pub actual: PathBuf,

    /// Sampling interval in milliseconds (default: TICK_INTERVAL_SECS)
    #[arg(long)]
    pub tick_ms: Option<i64>,

    /// Multiplier policy, linear or tiered (default: MULTIPLIER_POLICY)
    #[arg(long)]
    pub policy: Option<MultiplierPolicy>,

    /// Stake to compute the payout for
    #[arg(long)]
    pub stake: Option<f64>,
}
