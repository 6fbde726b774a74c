pub mod pools;
pub mod prices;
pub mod quote;
pub mod score;

use crate::discovery::{default_pools, StaticPoolRegistry};
use crate::oracle::{InMemoryPriceOracle, ReservePricing};
use chrono::Utc;
use log::info;
use std::sync::Arc;

/// Default pool table plus an oracle priced from its reserves
pub(crate) fn seeded_market() -> (Arc<StaticPoolRegistry>, Arc<InMemoryPriceOracle>) {
    let pools = default_pools();
    let oracle = InMemoryPriceOracle::with_stablecoins();
    let seeded = ReservePricing::seed_oracle(&oracle, &pools, Utc::now());
    info!("Priced {} tokens from {} pool reserves", seeded, pools.len());

    (Arc::new(StaticPoolRegistry::new(pools)), Arc::new(oracle))
}
