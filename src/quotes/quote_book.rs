use crate::core::{ExchangeError, ExchangeResult, Quote};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

/// Issued quotes awaiting execution, keyed by quote id.
/// Expired quotes are never handed out.
pub struct QuoteBook {
    quotes: Arc<DashMap<Uuid, Quote>>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self {
            quotes: Arc::new(DashMap::new()),
        }
    }

    pub fn register(&self, quote: Quote) {
        debug!("Registered quote {} (expires {})", quote.id, quote.expires_at);
        self.quotes.insert(quote.id, quote);
    }

    /// Look up a live quote
    pub fn get(&self, id: &Uuid, now: DateTime<Utc>) -> ExchangeResult<Quote> {
        let quote = self
            .quotes
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ExchangeError::QuoteNotFound(id.to_string()))?;

        if quote.is_expired(now) {
            self.quotes.remove(id);
            return Err(ExchangeError::QuoteExpired(id.to_string()));
        }

        Ok(quote)
    }

    /// Remove and return a live quote, so it can be executed at most once
    pub fn take(&self, id: &Uuid, now: DateTime<Utc>) -> ExchangeResult<Quote> {
        let (_, quote) = self
            .quotes
            .remove(id)
            .ok_or_else(|| ExchangeError::QuoteNotFound(id.to_string()))?;

        if quote.is_expired(now) {
            return Err(ExchangeError::QuoteExpired(id.to_string()));
        }

        Ok(quote)
    }

    /// Drop expired quotes, returning how many were removed
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.quotes.len();
        self.quotes.retain(|_, quote| !quote.is_expired(now));
        before - self.quotes.len()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Hop, Route};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn create_test_quote(created_at: DateTime<Utc>) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            from_token: "ETH".to_string(),
            to_token: "USDC".to_string(),
            from_amount: Decimal::ONE,
            to_amount: Decimal::from(2000),
            rate: Decimal::from(2000),
            inverse_rate: Decimal::new(5, 4),
            price_impact_pct: Decimal::new(5, 2),
            slippage_pct: Decimal::new(5, 1),
            min_received: Decimal::from(1990),
            route: Route {
                hops: vec![Hop {
                    pool_id: "eth-usdc-030".to_string(),
                    from_symbol: "ETH".to_string(),
                    to_symbol: "USDC".to_string(),
                    fee_rate: Decimal::new(3, 3),
                }],
            },
            gas_limit: 120_000,
            gas_fee_usd: Decimal::from(6),
            fee_usd: Decimal::from(6),
            created_at,
            expires_at: created_at + Duration::seconds(30),
        }
    }

    #[test]
    fn test_register_and_get() {
        let book = QuoteBook::new();
        let now = Utc::now();
        let quote = create_test_quote(now);
        let id = quote.id;

        book.register(quote);
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&id, now + Duration::seconds(10)).unwrap().id, id);
    }

    #[test]
    fn test_expired_quote_is_rejected() {
        let book = QuoteBook::new();
        let now = Utc::now();
        let quote = create_test_quote(now);
        let id = quote.id;
        book.register(quote);

        let err = book.get(&id, now + Duration::seconds(30)).unwrap_err();
        assert!(matches!(err, ExchangeError::QuoteExpired(_)));
        assert!(book.is_empty());
    }

    #[test]
    fn test_take_is_single_use() {
        let book = QuoteBook::new();
        let now = Utc::now();
        let quote = create_test_quote(now);
        let id = quote.id;
        book.register(quote);

        assert!(book.take(&id, now).is_ok());
        assert!(matches!(book.take(&id, now), Err(ExchangeError::QuoteNotFound(_))));
    }

    #[test]
    fn test_cleanup_expired() {
        let book = QuoteBook::new();
        let now = Utc::now();
        book.register(create_test_quote(now - Duration::seconds(60)));
        book.register(create_test_quote(now));

        assert_eq!(book.cleanup_expired(now), 1);
        assert_eq!(book.len(), 1);
    }
}
