use crate::core::{Route, DEFAULT_GAS_PRICE_GWEI, GWEI_PER_ETH, MULTI_HOP_GAS_LIMIT, SINGLE_HOP_GAS_LIMIT};
use rust_decimal::Decimal;

/// Fixed-price gas model
#[derive(Debug, Clone, Copy)]
pub struct GasEstimator {
    gas_price_gwei: u64,
}

impl GasEstimator {
    pub fn new(gas_price_gwei: u64) -> Self {
        Self { gas_price_gwei }
    }

    pub fn gas_limit(&self, route: &Route) -> u64 {
        if route.is_multi_hop() {
            MULTI_HOP_GAS_LIMIT
        } else {
            SINGLE_HOP_GAS_LIMIT
        }
    }

    /// Network fee in USD: `gas_price * gas_limit / 1e9 * eth_price`
    pub fn estimate_usd(&self, route: &Route, eth_price_usd: Decimal) -> Decimal {
        let gas_units = Decimal::from(self.gas_price_gwei) * Decimal::from(self.gas_limit(route));
        gas_units / Decimal::from(GWEI_PER_ETH) * eth_price_usd
    }
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_GAS_PRICE_GWEI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Hop;

    fn route(hops: usize) -> Route {
        Route {
            hops: (0..hops)
                .map(|i| Hop {
                    pool_id: format!("pool-{}", i),
                    from_symbol: "A".to_string(),
                    to_symbol: "B".to_string(),
                    fee_rate: Decimal::new(3, 3),
                })
                .collect(),
        }
    }

    #[test]
    fn test_gas_limits() {
        let gas = GasEstimator::default();
        assert_eq!(gas.gas_limit(&route(1)), 120_000);
        assert_eq!(gas.gas_limit(&route(2)), 180_000);
    }

    #[test]
    fn test_gas_fee_usd() {
        let gas = GasEstimator::default();
        // 25 gwei * 120k = 0.003 ETH at $2000
        assert_eq!(gas.estimate_usd(&route(1), Decimal::from(2000)), Decimal::from(6));
        // 25 gwei * 180k = 0.0045 ETH at $2000
        assert_eq!(gas.estimate_usd(&route(2), Decimal::from(2000)), Decimal::from(9));

        let gas = GasEstimator::new(50);
        assert_eq!(gas.estimate_usd(&route(1), Decimal::from(2000)), Decimal::from(12));
    }
}
