pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{Config, MultiplierPolicy};
pub use constants::*;
pub use error::{ExchangeError, ExchangeResult};
pub use types::*;
