use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::ExchangeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub price: Decimal,
    pub price_change_24h: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub reserve_a: Decimal,
    pub reserve_b: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub token_a: String,
    pub token_b: String,
    pub fee_rate: Decimal,
    pub tvl: Decimal,
    pub volume_24h: Decimal,
    pub network: String,
    pub reserves: Option<PoolReserves>,
}

impl Pool {
    /// True if the pool trades `a` against `b`, in either order
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.token_a.eq_ignore_ascii_case(a) && self.token_b.eq_ignore_ascii_case(b))
            || (self.token_a.eq_ignore_ascii_case(b) && self.token_b.eq_ignore_ascii_case(a))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.token_a.eq_ignore_ascii_case(symbol) || self.token_b.eq_ignore_ascii_case(symbol)
    }

    pub fn fees_24h(&self) -> Decimal {
        self.volume_24h * self.fee_rate
    }

    /// Annualized fee yield on TVL in percent, two decimals. Zero for an empty pool.
    pub fn apr(&self) -> Decimal {
        if self.tvl <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.fees_24h() * Decimal::from(365) / self.tvl * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub pool_id: String,
    pub from_symbol: String,
    pub to_symbol: String,
    pub fee_rate: Decimal,
}

/// One or two hops. The first hop starts at the request's input token, the
/// last ends at its output token, and consecutive hops share a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub hops: Vec<Hop>,
}

impl Route {
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn is_multi_hop(&self) -> bool {
        self.hops.len() > 1
    }

    pub fn is_virtual(&self) -> bool {
        self.hops
            .iter()
            .any(|hop| hop.pool_id == crate::core::VIRTUAL_POOL_ID)
    }

    /// Sum of per-hop fee rates
    pub fn total_fee_rate(&self) -> Decimal {
        self.hops.iter().map(|hop| hop.fee_rate).sum()
    }

    /// Symbols visited, e.g. `LINK -> ETH -> ARB`
    pub fn path(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.hops.iter().map(|h| h.from_symbol.as_str()).collect();
        if let Some(last) = self.hops.last() {
            symbols.push(last.to_symbol.as_str());
        }
        symbols
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().join(" -> "))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub from_symbol: String,
    pub to_symbol: String,
    pub amount: Decimal,
    pub slippage_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub from_token: String,
    pub to_token: String,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub rate: Decimal,
    pub inverse_rate: Decimal,
    pub price_impact_pct: Decimal,
    pub slippage_pct: Decimal,
    pub min_received: Decimal,
    pub route: Route,
    pub gas_limit: u64,
    pub gas_fee_usd: Decimal,
    /// Pool fees in USD. Reported only, `to_amount` is not reduced by it.
    pub fee_usd: Decimal,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Quote {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Completed,
}

/// A quote accepted by a user and submitted for execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub id: Uuid,
    pub quote: Quote,
    pub user_address: String,
    pub status: SwapStatus,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Swap {
    pub fn is_pending(&self) -> bool {
        self.status == SwapStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix milliseconds
    pub time: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub multiplier: f64,
}

impl ScoreResult {
    pub fn zero() -> Self {
        Self {
            score: 0.0,
            multiplier: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionWindow {
    #[serde(rename = "1D")]
    OneDay,
    #[default]
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
}

impl PredictionWindow {
    pub fn duration(&self) -> Duration {
        match self {
            PredictionWindow::OneDay => Duration::days(1),
            PredictionWindow::OneWeek => Duration::days(7),
            PredictionWindow::OneMonth => Duration::days(30),
            PredictionWindow::OneYear => Duration::days(365),
            PredictionWindow::ThreeYears => Duration::days(3 * 365),
            PredictionWindow::FiveYears => Duration::days(5 * 365),
            PredictionWindow::TenYears => Duration::days(10 * 365),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PredictionWindow::OneDay => "1D",
            PredictionWindow::OneWeek => "1W",
            PredictionWindow::OneMonth => "1M",
            PredictionWindow::OneYear => "1Y",
            PredictionWindow::ThreeYears => "3Y",
            PredictionWindow::FiveYears => "5Y",
            PredictionWindow::TenYears => "10Y",
        }
    }
}

impl FromStr for PredictionWindow {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1D" => Ok(PredictionWindow::OneDay),
            "1W" => Ok(PredictionWindow::OneWeek),
            "1M" => Ok(PredictionWindow::OneMonth),
            "1Y" => Ok(PredictionWindow::OneYear),
            "3Y" => Ok(PredictionWindow::ThreeYears),
            "5Y" => Ok(PredictionWindow::FiveYears),
            "10Y" => Ok(PredictionWindow::TenYears),
            other => Err(ExchangeError::Other(format!("Unknown prediction window: {}", other))),
        }
    }
}

impl fmt::Display for PredictionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionStatus {
    Pending,
    Won,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub asset: String,
    pub window: PredictionWindow,
    pub start_price: f64,
    pub predicted_price: f64,
    pub stake: f64,
    pub user_address: Option<String>,
    pub path: Vec<PricePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub score: ScoreResult,
    pub actual_price: f64,
    pub actual_change_pct: f64,
    pub payout: f64,
    pub settled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Uuid,
    pub asset: String,
    pub window: PredictionWindow,
    pub start_price: f64,
    pub predicted_price: f64,
    pub predicted_change_pct: f64,
    pub stake: f64,
    pub user_address: String,
    pub path: Vec<PricePoint>,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: PredictionStatus,
    pub settlement: Option<Settlement>,
}

impl Prediction {
    pub fn is_pending(&self) -> bool {
        self.status == PredictionStatus::Pending
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && now >= self.ends_at
    }
}
