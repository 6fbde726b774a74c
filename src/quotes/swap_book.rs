use crate::core::{ExchangeError, ExchangeResult, Swap, SwapStatus};
use crate::quotes::QuoteBook;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

/// Swaps submitted against issued quotes.
///
/// Submitting consumes the quote, so a quote backs at most one swap.
/// Settlement on a real chain is out of scope; `execute` marks the swap
/// completed and stamps a transaction hash.
pub struct SwapBook {
    quotes: Arc<QuoteBook>,
    swaps: DashMap<Uuid, Swap>,
}

impl SwapBook {
    pub fn new(quotes: Arc<QuoteBook>) -> Self {
        Self {
            quotes,
            swaps: DashMap::new(),
        }
    }

    pub fn quotes(&self) -> &QuoteBook {
        &self.quotes
    }

    /// Accept a live quote for `user_address`, leaving the swap pending
    pub fn submit(&self, quote_id: &Uuid, user_address: &str, now: DateTime<Utc>) -> ExchangeResult<Swap> {
        let quote = self.quotes.take(quote_id, now)?;

        let swap = Swap {
            id: Uuid::new_v4(),
            quote,
            user_address: user_address.to_string(),
            status: SwapStatus::Pending,
            tx_hash: None,
            created_at: now,
            confirmed_at: None,
        };

        info!(
            "Swap {} submitted: {} {} -> {} {} for {}",
            swap.id,
            swap.quote.from_amount,
            swap.quote.from_token,
            swap.quote.to_amount,
            swap.quote.to_token,
            swap.user_address
        );

        self.swaps.insert(swap.id, swap.clone());
        Ok(swap)
    }

    /// Complete a pending swap. A swap executes at most once.
    pub fn execute(&self, id: &Uuid, now: DateTime<Utc>) -> ExchangeResult<Swap> {
        let mut entry = self
            .swaps
            .get_mut(id)
            .ok_or_else(|| ExchangeError::SwapNotFound(id.to_string()))?;

        if !entry.is_pending() {
            return Err(ExchangeError::SwapAlreadyExecuted(id.to_string()));
        }

        entry.status = SwapStatus::Completed;
        entry.tx_hash = Some(transaction_hash());
        entry.confirmed_at = Some(now);

        info!("Swap {} completed", id);
        Ok(entry.value().clone())
    }

    pub fn get(&self, id: &Uuid) -> Option<Swap> {
        self.swaps.get(id).map(|entry| entry.value().clone())
    }

    /// A user's swaps, newest first
    pub fn by_user(&self, user_address: &str) -> Vec<Swap> {
        let mut swaps: Vec<Swap> = self
            .swaps
            .iter()
            .filter(|entry| entry.user_address == user_address)
            .map(|entry| entry.value().clone())
            .collect();
        swaps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        swaps
    }

    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }
}

/// 32 random bytes as 0x-prefixed hex
fn transaction_hash() -> String {
    format!("0x{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
