use crate::core::{default_fee_rate, Hop, Pool, Route, VIRTUAL_POOL_ID};
use crate::discovery::PoolRegistry;
use log::{debug, warn};
use std::sync::Arc;

/// Picks the pools a trade passes through
pub struct RouteFinder {
    registry: Arc<dyn PoolRegistry>,
}

impl RouteFinder {
    pub fn new(registry: Arc<dyn PoolRegistry>) -> Self {
        Self { registry }
    }

    /// Route from `from` to `to`. Never fails:
    ///
    /// 1. the deepest direct pool, by TVL
    /// 2. otherwise the first preferred intermediate with pools on both legs
    /// 3. otherwise a single hop over the virtual pool at the default fee
    pub fn find_route(&self, from: &str, to: &str) -> Route {
        if let Some(pool) = self.best_direct_pool(from, to) {
            debug!("Direct route {} -> {} via {} (tvl {})", from, to, pool.id, pool.tvl);
            return Route {
                hops: vec![hop(&pool, from, to)],
            };
        }

        for intermediate in self.registry.preferred_intermediates() {
            if intermediate.eq_ignore_ascii_case(from) || intermediate.eq_ignore_ascii_case(to) {
                continue;
            }

            let first_leg = self.registry.find_pools_for_pair(from, &intermediate);
            let second_leg = self.registry.find_pools_for_pair(&intermediate, to);

            if let (Some(first), Some(second)) = (first_leg.first(), second_leg.first()) {
                debug!(
                    "Two-hop route {} -> {} -> {} via {}, {}",
                    from, intermediate, to, first.id, second.id
                );
                return Route {
                    hops: vec![hop(first, from, &intermediate), hop(second, &intermediate, to)],
                };
            }
        }

        warn!("No pool connects {} and {}, quoting over the virtual pool", from, to);
        Route {
            hops: vec![Hop {
                pool_id: VIRTUAL_POOL_ID.to_string(),
                from_symbol: from.to_string(),
                to_symbol: to.to_string(),
                fee_rate: default_fee_rate(),
            }],
        }
    }

    fn best_direct_pool(&self, from: &str, to: &str) -> Option<Pool> {
        self.registry
            .find_pools_for_pair(from, to)
            .into_iter()
            // max_by_key keeps the last maximum; reverse so ties go to the first listed
            .rev()
            .max_by_key(|pool| pool.tvl)
    }
}

fn hop(pool: &Pool, from: &str, to: &str) -> Hop {
    Hop {
        pool_id: pool.id.clone(),
        from_symbol: from.to_string(),
        to_symbol: to.to_string(),
        fee_rate: pool.fee_rate,
    }
}
