pub mod pool_registry;
pub mod route_finder;

use crate::core::Pool;

pub use pool_registry::{default_pools, PoolStats, StaticPoolRegistry};
pub use route_finder::RouteFinder;

/// Read-only view of the pool graph used for routing
pub trait PoolRegistry: Send + Sync {
    /// Pools trading `a` against `b`, in either token order
    fn find_pools_for_pair(&self, a: &str, b: &str) -> Vec<Pool>;

    /// Symbols tried, in order, as the middle of a two-hop route
    fn preferred_intermediates(&self) -> Vec<String>;
}
