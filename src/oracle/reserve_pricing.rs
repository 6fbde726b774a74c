use crate::core::{Pool, GAS_TOKEN};
use crate::oracle::{is_pegged_stablecoin, InMemoryPriceOracle};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Derives USD prices from pool reserves.
/// Used to seed the oracle when no market feed is available.
pub struct ReservePricing;

impl ReservePricing {
    /// USD price of `symbol` implied by `pools`, or None if no stablecoin or
    /// ETH-denominated pool prices it
    pub fn token_price(symbol: &str, pools: &[Pool]) -> Option<Decimal> {
        if is_pegged_stablecoin(symbol) {
            return Some(Decimal::ONE);
        }

        let stable_pools: Vec<&Pool> = pools
            .iter()
            .filter(|pool| {
                (pool.token_a.eq_ignore_ascii_case(symbol) && is_pegged_stablecoin(&pool.token_b))
                    || (pool.token_b.eq_ignore_ascii_case(symbol) && is_pegged_stablecoin(&pool.token_a))
            })
            .collect();

        if stable_pools.is_empty() {
            // ETH itself has nothing further to route through
            if symbol.eq_ignore_ascii_case(GAS_TOKEN) {
                return None;
            }
            return Self::indirect_price(symbol, pools);
        }

        // TVL-weighted average across stable pools; each stable leg is worth $1
        Self::weighted_price(symbol, &stable_pools)
    }

    /// Price of `symbol` expressed in the other token of `pool`
    fn price_from_pool(symbol: &str, pool: &Pool) -> Option<Decimal> {
        let reserves = pool.reserves?;
        if reserves.reserve_a.is_zero() || reserves.reserve_b.is_zero() {
            return None;
        }

        if pool.token_a.eq_ignore_ascii_case(symbol) {
            Some(reserves.reserve_b / reserves.reserve_a)
        } else if pool.token_b.eq_ignore_ascii_case(symbol) {
            Some(reserves.reserve_a / reserves.reserve_b)
        } else {
            None
        }
    }

    fn weighted_price(symbol: &str, pools: &[&Pool]) -> Option<Decimal> {
        let mut total_weight = Decimal::ZERO;
        let mut weighted = Decimal::ZERO;

        for pool in pools {
            if let Some(price) = Self::price_from_pool(symbol, pool) {
                let weight = pool.tvl.max(Decimal::ONE);
                weighted += price * weight;
                total_weight += weight;

                debug!("Pool {} prices {} at {} (tvl {})", pool.id, symbol, price, pool.tvl);
            }
        }

        if total_weight > Decimal::ZERO {
            Some(weighted / total_weight)
        } else {
            None
        }
    }

    /// token -> ETH -> USD
    fn indirect_price(symbol: &str, pools: &[Pool]) -> Option<Decimal> {
        let eth_price = Self::token_price(GAS_TOKEN, pools)?;

        let eth_pools: Vec<&Pool> = pools
            .iter()
            .filter(|pool| pool.connects(symbol, GAS_TOKEN))
            .collect();

        if eth_pools.is_empty() {
            return None;
        }

        let price_in_eth = Self::weighted_price(symbol, &eth_pools)?;
        Some(price_in_eth * eth_price)
    }

    /// Price every token appearing in `pools` and load it into `oracle`.
    /// Returns the number of tokens priced.
    pub fn seed_oracle(oracle: &InMemoryPriceOracle, pools: &[Pool], now: DateTime<Utc>) -> usize {
        let symbols: BTreeSet<String> = pools
            .iter()
            .flat_map(|pool| [pool.token_a.to_uppercase(), pool.token_b.to_uppercase()])
            .collect();

        let mut seeded = 0;
        for symbol in symbols {
            match Self::token_price(&symbol, pools) {
                Some(price) if price > Decimal::ZERO => {
                    if oracle.update_price(&symbol, price, now).is_ok() {
                        seeded += 1;
                    }
                }
                _ => warn!("No reserve-implied price for {}", symbol),
            }
        }
        seeded
    }
}
