use crate::core::{constants::*, error::ExchangeResult, ExchangeError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// How a path-accuracy score is turned into a payout multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiplierPolicy {
    /// `round(score * 10, 2)`
    Linear,
    /// Bucketed by path error percent into 10x / 5x / 2x / 1x / 0x
    Tiered,
}

impl FromStr for MultiplierPolicy {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(MultiplierPolicy::Linear),
            "tiered" => Ok(MultiplierPolicy::Tiered),
            other => Err(ExchangeError::ConfigError(format!(
                "Unknown multiplier policy '{}', expected linear or tiered",
                other
            ))),
        }
    }
}

impl fmt::Display for MultiplierPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiplierPolicy::Linear => write!(f, "linear"),
            MultiplierPolicy::Tiered => write!(f, "tiered"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_slippage_pct: f64,
    pub max_slippage_pct: f64,
    pub gas_price_gwei: u64,
    pub quote_ttl_secs: u64,
    pub tick_interval_secs: u64,
    pub multiplier_policy: MultiplierPolicy,
}

impl Config {
    pub fn from_env() -> ExchangeResult<Self> {
        let multiplier_policy = match env::var("MULTIPLIER_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => MultiplierPolicy::Linear,
        };

        Ok(Self {
            default_slippage_pct: env::var("DEFAULT_SLIPPAGE_PCT")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_SLIPPAGE_PCT),
            max_slippage_pct: env::var("MAX_SLIPPAGE_PCT")
                .unwrap_or_default()
                .parse()
                .unwrap_or(MAX_SLIPPAGE_PCT),
            gas_price_gwei: env::var("GAS_PRICE_GWEI")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_GAS_PRICE_GWEI),
            quote_ttl_secs: env::var("QUOTE_TTL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(QUOTE_TTL_SECS),
            tick_interval_secs: env::var("TICK_INTERVAL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(TICK_INTERVAL_SECS),
            multiplier_policy,
        })
    }

    pub fn validate(&self) -> ExchangeResult<()> {
        if !(0.0..=100.0).contains(&self.max_slippage_pct) {
            return Err(ExchangeError::ConfigError(
                "Max slippage must be between 0% and 100%".to_string(),
            ));
        }

        if self.default_slippage_pct < 0.0 || self.default_slippage_pct > self.max_slippage_pct {
            return Err(ExchangeError::ConfigError(
                "Default slippage cannot exceed max slippage".to_string(),
            ));
        }

        if self.quote_ttl_secs == 0 {
            return Err(ExchangeError::ConfigError(
                "Quote TTL must be greater than 0".to_string(),
            ));
        }

        if self.tick_interval_secs == 0 {
            return Err(ExchangeError::ConfigError(
                "Tick interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Tick interval in milliseconds, the unit of path timestamps
    pub fn tick_interval_ms(&self) -> i64 {
        (self.tick_interval_secs as i64).saturating_mul(1000)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_slippage_pct: DEFAULT_SLIPPAGE_PCT,
            max_slippage_pct: MAX_SLIPPAGE_PCT,
            gas_price_gwei: DEFAULT_GAS_PRICE_GWEI,
            quote_ttl_secs: QUOTE_TTL_SECS,
            tick_interval_secs: TICK_INTERVAL_SECS,
            multiplier_policy: MultiplierPolicy::Linear,
        }
    }
}
