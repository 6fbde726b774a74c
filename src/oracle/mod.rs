pub mod reserve_pricing;

use crate::core::{ExchangeError, ExchangeResult, Token, PEGGED_STABLECOINS};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::sync::Arc;

pub use reserve_pricing::ReservePricing;

// Display metadata for the tokens listed on the exchange
lazy_static! {
    static ref TOKEN_METADATA: HashMap<&'static str, (&'static str, u8)> = {
        let mut m = HashMap::new();
        m.insert("ETH", ("Ethereum", 18));
        m.insert("USDC", ("USD Coin", 6));
        m.insert("USDT", ("Tether", 6));
        m.insert("BTC", ("Bitcoin", 8));
        m.insert("BNB", ("BNB", 18));
        m.insert("ARB", ("Arbitrum", 18));
        m.insert("OP", ("Optimism", 18));
        m.insert("MATIC", ("Polygon", 18));
        m.insert("LINK", ("Chainlink", 18));
        m.insert("UNI", ("Uniswap", 18));
        m.insert("AAVE", ("Aave", 18));
        m.insert("CRV", ("Curve", 18));
        m
    };
}

/// Read side of the reference-price table
pub trait PriceOracle: Send + Sync {
    /// Current USD price of `symbol`, or `UnknownToken`
    fn price(&self, symbol: &str) -> ExchangeResult<Decimal>;
}

impl<T: PriceOracle + ?Sized> PriceOracle for Arc<T> {
    fn price(&self, symbol: &str) -> ExchangeResult<Decimal> {
        (**self).price(symbol)
    }
}

pub fn is_pegged_stablecoin(symbol: &str) -> bool {
    PEGGED_STABLECOINS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(symbol))
}

/// Concurrent in-memory price table.
///
/// Writers (a refresh job) and readers (quote requests) may interleave freely;
/// a reader sees either the old or the new entry for a symbol, never a torn one.
pub struct InMemoryPriceOracle {
    tokens: DashMap<String, Token>,
}

impl InMemoryPriceOracle {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// Oracle holding only the pegged stablecoins
    pub fn with_stablecoins() -> Self {
        let oracle = Self::new();
        let now = Utc::now();
        for symbol in PEGGED_STABLECOINS {
            oracle.tokens.insert(symbol.to_string(), new_token(symbol, Decimal::ONE, now));
        }
        oracle
    }

    /// Record a fresh price for `symbol`.
    ///
    /// Pegged stablecoins stay at $1 whatever the feed says. For other tokens
    /// the 24h change becomes the move from the previous price, in percent.
    pub fn update_price(&self, symbol: &str, price: Decimal, now: DateTime<Utc>) -> ExchangeResult<()> {
        if price <= Decimal::ZERO {
            return Err(ExchangeError::InvalidPrice {
                symbol: symbol.to_string(),
                price: price.to_string(),
            });
        }

        let key = symbol.to_uppercase();

        if is_pegged_stablecoin(&key) {
            self.tokens.insert(key.clone(), new_token(&key, Decimal::ONE, now));
            return Ok(());
        }

        match self.tokens.get_mut(&key) {
            Some(mut token) => {
                let change = percentage_change(token.price, price);
                debug!("{} price {} -> {} ({}%)", key, token.price, price, change);
                token.price = price;
                token.price_change_24h = change;
                token.updated_at = Some(now);
            }
            None => {
                debug!("{} listed at {}", key, price);
                self.tokens.insert(key.clone(), new_token(&key, price, now));
            }
        }

        Ok(())
    }

    /// Apply a batch of prices, returning how many were accepted
    pub fn update_prices(&self, prices: &HashMap<String, Decimal>, now: DateTime<Utc>) -> usize {
        let mut updated = 0;
        for (symbol, price) in prices {
            match self.update_price(symbol, *price, now) {
                Ok(()) => updated += 1,
                Err(e) => debug!("Skipping price update: {}", e),
            }
        }
        info!("Updated {} of {} token prices", updated, prices.len());
        updated
    }

    pub fn get_token(&self, symbol: &str) -> Option<Token> {
        self.tokens
            .get(&symbol.to_uppercase())
            .map(|entry| entry.value().clone())
    }

    /// Snapshot of every priced token, ordered by symbol
    pub fn tokens(&self) -> Vec<Token> {
        let mut tokens: Vec<Token> = self.tokens.iter().map(|e| e.value().clone()).collect();
        tokens.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        tokens
    }

    /// Tokens whose symbol or name contains `query`, ignoring case, ordered by symbol
    pub fn search(&self, query: &str) -> Vec<Token> {
        let query = query.trim().to_lowercase();
        self.tokens()
            .into_iter()
            .filter(|t| {
                t.symbol.to_lowercase().contains(&query) || t.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Symbol to USD price for every priced token
    pub fn prices(&self) -> HashMap<String, Decimal> {
        self.tokens
            .iter()
            .map(|e| (e.key().clone(), e.value().price))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl PriceOracle for InMemoryPriceOracle {
    fn price(&self, symbol: &str) -> ExchangeResult<Decimal> {
        self.tokens
            .get(&symbol.to_uppercase())
            .map(|entry| entry.price)
            .ok_or_else(|| ExchangeError::UnknownToken(symbol.to_string()))
    }
}

impl Default for InMemoryPriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

fn new_token(symbol: &str, price: Decimal, now: DateTime<Utc>) -> Token {
    let (name, decimals) = match TOKEN_METADATA.get(symbol) {
        Some((name, decimals)) => (name.to_string(), *decimals),
        None => (symbol.to_string(), 18),
    };

    Token {
        symbol: symbol.to_string(),
        name,
        decimals,
        price,
        price_change_24h: Decimal::ZERO,
        updated_at: Some(now),
    }
}

fn percentage_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        return Decimal::ZERO;
    }
    ((to - from) / from * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_token() {
        let oracle = InMemoryPriceOracle::new();
        let err = oracle.price("ETH").unwrap_err();
        assert!(matches!(err, ExchangeError::UnknownToken(s) if s == "ETH"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let oracle = InMemoryPriceOracle::new();
        oracle.update_price("eth", Decimal::from(2000), Utc::now()).unwrap();

        assert_eq!(oracle.price("ETH").unwrap(), Decimal::from(2000));
        assert_eq!(oracle.price("Eth").unwrap(), Decimal::from(2000));

        let token = oracle.get_token("ETH").unwrap();
        assert_eq!(token.name, "Ethereum");
        assert_eq!(token.decimals, 18);
    }

    #[test]
    fn test_price_change_tracking() {
        let oracle = InMemoryPriceOracle::new();
        let now = Utc::now();
        oracle.update_price("ETH", Decimal::from(2000), now).unwrap();
        oracle.update_price("ETH", Decimal::from(2100), now).unwrap();

        let token = oracle.get_token("ETH").unwrap();
        assert_eq!(token.price, Decimal::from(2100));
        assert_eq!(token.price_change_24h, Decimal::from(5));

        oracle.update_price("ETH", Decimal::from(2000), now).unwrap();
        let token = oracle.get_token("ETH").unwrap();
        // -4.7619... rounded to 2 dp
        assert_eq!(token.price_change_24h, Decimal::new(-476, 2));
    }

    #[test]
    fn test_stablecoins_stay_pegged() {
        let oracle = InMemoryPriceOracle::with_stablecoins();
        assert_eq!(oracle.price("USDC").unwrap(), Decimal::ONE);

        oracle.update_price("USDT", Decimal::new(998, 3), Utc::now()).unwrap();
        let usdt = oracle.get_token("USDT").unwrap();
        assert_eq!(usdt.price, Decimal::ONE);
        assert_eq!(usdt.price_change_24h, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let oracle = InMemoryPriceOracle::new();
        assert!(oracle.update_price("ETH", Decimal::ZERO, Utc::now()).is_err());
        assert!(oracle.update_price("ETH", Decimal::from(-5), Utc::now()).is_err());
        assert!(oracle.is_empty());
    }

    #[test]
    fn test_batch_update() {
        let oracle = InMemoryPriceOracle::with_stablecoins();
        let mut prices = HashMap::new();
        prices.insert("BTC".to_string(), Decimal::from(43000));
        prices.insert("LINK".to_string(), Decimal::new(1450, 2));
        prices.insert("BAD".to_string(), Decimal::ZERO);

        assert_eq!(oracle.update_prices(&prices, Utc::now()), 2);
        let symbols: Vec<String> = oracle.tokens().into_iter().map(|t| t.symbol).collect();
        assert_eq!(symbols, vec!["BTC", "LINK", "USDC", "USDT"]);

        let prices = oracle.prices();
        assert_eq!(prices.len(), 4);
        assert_eq!(prices["BTC"], Decimal::from(43000));
    }

    #[test]
    fn test_search_by_symbol_or_name() {
        let oracle = InMemoryPriceOracle::with_stablecoins();
        let now = Utc::now();
        oracle.update_price("ETH", Decimal::from(2000), now).unwrap();
        oracle.update_price("LINK", Decimal::new(1450, 2), now).unwrap();

        let symbols = |query: &str| -> Vec<String> {
            oracle.search(query).into_iter().map(|t| t.symbol).collect()
        };

        assert_eq!(symbols("usd"), vec!["USDC", "USDT"]);
        assert_eq!(symbols("Chain"), vec!["LINK"]);
        assert_eq!(symbols(" ether "), vec!["ETH", "USDT"]);
        assert!(symbols("doge").is_empty());
        assert_eq!(symbols("").len(), 4);
    }
}
