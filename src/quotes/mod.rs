pub mod gas;
pub mod price_impact;
pub mod quote_book;
pub mod swap_book;


use crate::core::{
    Config, ExchangeError, ExchangeResult, Quote, QuoteRequest, GAS_TOKEN, QUOTE_TTL_SECS,
};
use crate::discovery::{PoolRegistry, RouteFinder};
use crate::oracle::PriceOracle;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub use gas::GasEstimator;
pub use price_impact::price_impact_pct;
pub use quote_book::QuoteBook;
pub use swap_book::SwapBook;

/// Prices swaps at the oracle rate and routes them over the pool graph.
///
/// Stateless between calls: the output depends only on the request, the
/// oracle's current prices and the pool table.
pub struct SwapQuoteEngine {
    oracle: Arc<dyn PriceOracle>,
    route_finder: RouteFinder,
    gas: GasEstimator,
    quote_ttl: Duration,
}

impl SwapQuoteEngine {
    pub fn new(oracle: Arc<dyn PriceOracle>, registry: Arc<dyn PoolRegistry>) -> Self {
        Self {
            oracle,
            route_finder: RouteFinder::new(registry),
            gas: GasEstimator::default(),
            quote_ttl: Duration::seconds(QUOTE_TTL_SECS as i64),
        }
    }

    pub fn with_config(
        oracle: Arc<dyn PriceOracle>,
        registry: Arc<dyn PoolRegistry>,
        config: &Config,
    ) -> Self {
        Self {
            oracle,
            route_finder: RouteFinder::new(registry),
            gas: GasEstimator::new(config.gas_price_gwei),
            quote_ttl: Duration::seconds(config.quote_ttl_secs as i64),
        }
    }

    /// Quote swapping `amount` of `from_symbol` into `to_symbol`
    pub fn quote(
        &self,
        from_symbol: &str,
        to_symbol: &str,
        amount: Decimal,
        slippage_pct: Decimal,
    ) -> ExchangeResult<Quote> {
        let request = QuoteRequest {
            from_symbol: from_symbol.to_string(),
            to_symbol: to_symbol.to_string(),
            amount,
            slippage_pct,
        };
        self.quote_at(&request, Utc::now())
    }

    /// Quote stamped as created at `now`
    pub fn quote_at(&self, request: &QuoteRequest, now: DateTime<Utc>) -> ExchangeResult<Quote> {
        let from_price = self.oracle.price(&request.from_symbol)?;
        let to_price = self.oracle.price(&request.to_symbol)?;

        if request.amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(format!(
                "amount must be greater than 0, got {}",
                request.amount
            )));
        }

        if request.slippage_pct < Decimal::ZERO || request.slippage_pct > Decimal::ONE_HUNDRED {
            return Err(ExchangeError::InvalidSlippage(format!(
                "slippage must be between 0% and 100%, got {}%",
                request.slippage_pct
            )));
        }

        let route = self
            .route_finder
            .find_route(&request.from_symbol, &request.to_symbol);

        // Constant-price conversion, no reserve curve
        let rate = checked(from_price.checked_div(to_price), "rate")?;
        let inverse_rate = checked(to_price.checked_div(from_price), "inverse rate")?;
        let to_amount = checked(request.amount.checked_mul(rate), "output amount")?;

        let notional_usd = checked(request.amount.checked_mul(from_price), "notional")?;
        let price_impact_pct = price_impact_pct(notional_usd);

        let min_received = checked(
            to_amount.checked_mul(Decimal::ONE - request.slippage_pct / Decimal::ONE_HUNDRED),
            "minimum received",
        )?;

        let eth_price = self.oracle.price(GAS_TOKEN)?;
        let gas_limit = self.gas.gas_limit(&route);
        let gas_fee_usd = self.gas.estimate_usd(&route, eth_price);
        let fee_usd = checked(notional_usd.checked_mul(route.total_fee_rate()), "pool fee")?;

        debug!(
            "Quote {} {} -> {} {} (rate {}, impact {}%, route {}, gas ${})",
            request.amount,
            request.from_symbol,
            to_amount,
            request.to_symbol,
            rate,
            price_impact_pct,
            route,
            gas_fee_usd
        );

        Ok(Quote {
            id: Uuid::new_v4(),
            from_token: request.from_symbol.to_uppercase(),
            to_token: request.to_symbol.to_uppercase(),
            from_amount: request.amount,
            to_amount,
            rate,
            inverse_rate,
            price_impact_pct,
            slippage_pct: request.slippage_pct,
            min_received,
            route,
            gas_limit,
            gas_fee_usd,
            fee_usd,
            created_at: now,
            expires_at: now + self.quote_ttl,
        })
    }
}

/// Decimal arithmetic that left the representable range
fn checked(value: Option<Decimal>, what: &str) -> ExchangeResult<Decimal> {
    value.ok_or_else(|| {
        ExchangeError::InvalidAmount(format!("{} is outside the representable range", what))
    })
}
