#[macro_use]
extern crate lazy_static;

pub mod cli;
pub mod core;
pub mod discovery;
pub mod oracle;
pub mod prediction;
pub mod quotes;
pub mod utils;

// Re-export commonly used types
pub use core::{Config, ExchangeError, ExchangeResult, Quote, Route, ScoreResult};
pub use discovery::{PoolRegistry, RouteFinder, StaticPoolRegistry};
pub use oracle::{InMemoryPriceOracle, PriceOracle};
pub use prediction::{PredictionBook, PredictionScorer};
pub use quotes::{QuoteBook, SwapBook, SwapQuoteEngine};
