use crate::core::{constants::*, Pool, PoolReserves, PREFERRED_INTERMEDIATES};
use crate::discovery::PoolRegistry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate figures across every listed pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_tvl: Decimal,
    pub total_volume_24h: Decimal,
    pub total_fees_24h: Decimal,
}

/// Fixed pool table, read-only after construction
pub struct StaticPoolRegistry {
    pools: Vec<Pool>,
    intermediates: Vec<String>,
}

impl StaticPoolRegistry {
    pub fn new(pools: Vec<Pool>) -> Self {
        Self {
            pools,
            intermediates: PREFERRED_INTERMEDIATES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the routing intermediates, tried in the given order
    pub fn with_intermediates(mut self, intermediates: Vec<String>) -> Self {
        self.intermediates = intermediates;
        self
    }

    /// The exchange's listed pools
    pub fn with_default_pools() -> Self {
        Self::new(default_pools())
    }

    pub fn get(&self, id: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id == id)
    }

    pub fn all(&self) -> &[Pool] {
        &self.pools
    }

    pub fn by_network(&self, network: &str) -> Vec<&Pool> {
        self.pools
            .iter()
            .filter(|p| p.network.eq_ignore_ascii_case(network))
            .collect()
    }

    pub fn top_by_tvl(&self, limit: usize) -> Vec<&Pool> {
        let mut pools: Vec<&Pool> = self.pools.iter().collect();
        pools.sort_by(|a, b| b.tvl.cmp(&a.tvl));
        pools.truncate(limit);
        pools
    }

    pub fn top_by_volume(&self, limit: usize) -> Vec<&Pool> {
        let mut pools: Vec<&Pool> = self.pools.iter().collect();
        pools.sort_by(|a, b| b.volume_24h.cmp(&a.volume_24h));
        pools.truncate(limit);
        pools
    }

    /// Highest fee yield first
    pub fn top_by_apr(&self, limit: usize) -> Vec<&Pool> {
        let mut pools: Vec<&Pool> = self.pools.iter().collect();
        pools.sort_by(|a, b| b.apr().cmp(&a.apr()));
        pools.truncate(limit);
        pools
    }

    pub fn total_stats(&self) -> PoolStats {
        self.pools.iter().fold(
            PoolStats {
                total_tvl: Decimal::ZERO,
                total_volume_24h: Decimal::ZERO,
                total_fees_24h: Decimal::ZERO,
            },
            |mut acc, pool| {
                acc.total_tvl += pool.tvl;
                acc.total_volume_24h += pool.volume_24h;
                acc.total_fees_24h += pool.fees_24h();
                acc
            },
        )
    }
}

impl PoolRegistry for StaticPoolRegistry {
    fn find_pools_for_pair(&self, a: &str, b: &str) -> Vec<Pool> {
        self.pools
            .iter()
            .filter(|pool| pool.connects(a, b))
            .cloned()
            .collect()
    }

    fn preferred_intermediates(&self) -> Vec<String> {
        self.intermediates.clone()
    }
}

impl Default for StaticPoolRegistry {
    fn default() -> Self {
        Self::with_default_pools()
    }
}

fn listed_pool(
    id: &str,
    pair: (&str, &str),
    fee_bps: i64,
    tvl: i64,
    volume_24h: i64,
    reserves: (i64, i64),
    network: &str,
) -> Pool {
    Pool {
        id: id.to_string(),
        token_a: pair.0.to_string(),
        token_b: pair.1.to_string(),
        fee_rate: fee_rate_from_bps(fee_bps),
        tvl: Decimal::from(tvl),
        volume_24h: Decimal::from(volume_24h),
        network: network.to_string(),
        reserves: Some(PoolReserves {
            reserve_a: Decimal::from(reserves.0),
            reserve_b: Decimal::from(reserves.1),
        }),
    }
}

pub fn default_pools() -> Vec<Pool> {
    vec![
        listed_pool("eth-usdc-030", ("ETH", "USDC"), DEFAULT_FEE_RATE_BPS, 542_800_000, 128_400_000, (221_755, 543_300_000), "ethereum"),
        listed_pool("eth-usdt-030", ("ETH", "USDT"), DEFAULT_FEE_RATE_BPS, 312_500_000, 89_200_000, (127_551, 312_500_000), "ethereum"),
        listed_pool("btc-eth-030", ("BTC", "ETH"), DEFAULT_FEE_RATE_BPS, 256_100_000, 67_800_000, (2_963, 52_265), "ethereum"),
        listed_pool("eth-arb-030", ("ETH", "ARB"), DEFAULT_FEE_RATE_BPS, 124_700_000, 45_300_000, (25_449, 33_702_703), "arbitrum"),
        listed_pool("usdc-usdt-005", ("USDC", "USDT"), STABLE_FEE_RATE_BPS, 98_400_000, 234_500_000, (49_200_000, 49_200_000), "ethereum"),
        listed_pool("eth-op-030", ("ETH", "OP"), DEFAULT_FEE_RATE_BPS, 78_500_000, 32_100_000, (16_020, 11_461_988), "optimism"),
        listed_pool("eth-matic-030", ("ETH", "MATIC"), DEFAULT_FEE_RATE_BPS, 65_200_000, 28_400_000, (13_306, 35_434_783), "polygon"),
        listed_pool("link-eth-030", ("LINK", "ETH"), DEFAULT_FEE_RATE_BPS, 45_600_000, 18_200_000, (1_535_354, 9_306), "ethereum"),
        listed_pool("uni-eth-030", ("UNI", "ETH"), DEFAULT_FEE_RATE_BPS, 38_900_000, 14_500_000, (2_689_903, 7_939), "ethereum"),
        listed_pool("aave-eth-030", ("AAVE", "ETH"), DEFAULT_FEE_RATE_BPS, 28_700_000, 9_800_000, (145_685, 5_857), "ethereum"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pools_either_order() {
        let registry = StaticPoolRegistry::with_default_pools();

        let pools = registry.find_pools_for_pair("USDC", "ETH");
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].id, "eth-usdc-030");

        assert!(registry.find_pools_for_pair("LINK", "UNI").is_empty());
    }

    #[test]
    fn test_default_intermediates() {
        let registry = StaticPoolRegistry::with_default_pools();
        assert_eq!(registry.preferred_intermediates(), vec!["ETH", "USDC", "USDT"]);

        let registry = registry.with_intermediates(vec!["USDT".to_string()]);
        assert_eq!(registry.preferred_intermediates(), vec!["USDT"]);
    }

    #[test]
    fn test_rankings() {
        let registry = StaticPoolRegistry::with_default_pools();

        let by_tvl: Vec<&str> = registry.top_by_tvl(2).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(by_tvl, vec!["eth-usdc-030", "eth-usdt-030"]);

        let by_volume = registry.top_by_volume(1);
        assert_eq!(by_volume[0].id, "usdc-usdt-005");

        let by_apr: Vec<&str> = registry.top_by_apr(3).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(by_apr, vec!["eth-matic-030", "eth-op-030", "link-eth-030"]);
        assert_eq!(registry.get("eth-matic-030").unwrap().apr(), Decimal::new(4770, 2));

        assert_eq!(registry.by_network("arbitrum").len(), 1);
        assert!(registry.get("aave-eth-030").is_some());
        assert!(registry.get("doge-eth-030").is_none());
    }

    #[test]
    fn test_total_stats() {
        let registry = StaticPoolRegistry::new(vec![
            listed_pool("a", ("ETH", "USDC"), 30, 1_000, 100, (1, 1), "ethereum"),
            listed_pool("b", ("USDC", "USDT"), 5, 2_000, 1_000, (1, 1), "ethereum"),
        ]);

        let stats = registry.total_stats();
        assert_eq!(stats.total_tvl, Decimal::from(3_000));
        assert_eq!(stats.total_volume_24h, Decimal::from(1_100));
        // 100 * 0.003 + 1000 * 0.0005
        assert_eq!(stats.total_fees_24h, Decimal::new(8, 1));
    }
}
