pub mod book;
pub mod multiplier;
pub mod path;
pub mod repository;
pub mod scorer;

pub use book::{LeaderboardEntry, PredictionBook};
pub use multiplier::{linear_multiplier, payout_table, tiered_multiplier, PayoutTier};
pub use path::{interpolate, validate_path};
pub use repository::{InMemoryPredictionRepository, PredictionRepository};
pub use scorer::{PathComparison, PredictionScorer};
