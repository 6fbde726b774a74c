use crate::core::{Config, MultiplierPolicy, PricePoint, ScoreResult, TICK_INTERVAL_SECS};
use crate::prediction::multiplier::{linear_multiplier, tiered_multiplier};
use crate::prediction::path::interpolate;
use log::debug;

/// Riemann-sum accumulators over the shared time range of two paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathComparison {
    pub ticks: usize,
    /// Σ |predicted - actual| · Δt
    pub total_difference: f64,
    /// Σ |actual| · Δt
    pub total_actual_value: f64,
}

impl PathComparison {
    /// `max(0, 1 - difference / actual)`, or 0 when the actual path has no area
    pub fn score(&self) -> f64 {
        if self.total_actual_value == 0.0 || !self.total_actual_value.is_finite() {
            return 0.0;
        }
        let score = 1.0 - self.total_difference / self.total_actual_value;
        if score.is_nan() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }

    /// Path error as a percentage of the actual path's area
    pub fn error_pct(&self) -> f64 {
        if self.total_actual_value == 0.0 {
            return f64::INFINITY;
        }
        self.total_difference / self.total_actual_value * 100.0
    }
}

/// Scores a drawn price path against the realized one
#[derive(Debug, Clone, Copy)]
pub struct PredictionScorer {
    tick_interval_ms: i64,
    policy: MultiplierPolicy,
}

impl PredictionScorer {
    /// Five-minute ticks, linear multiplier
    pub fn new() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_SECS as i64 * 1000,
            policy: MultiplierPolicy::Linear,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_interval_ms: config.tick_interval_ms().max(1),
            policy: config.multiplier_policy,
        }
    }

    /// Sample every `tick_interval_ms` (same unit as path timestamps)
    pub fn with_tick_interval(mut self, tick_interval_ms: i64) -> Self {
        self.tick_interval_ms = tick_interval_ms.max(1);
        self
    }

    pub fn with_policy(mut self, policy: MultiplierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MultiplierPolicy {
        self.policy
    }

    /// Score `predicted` against `actual`.
    ///
    /// Degenerate input (a path shorter than two points, a range shorter than
    /// one tick, an all-zero actual path) yields the zero score rather than an error.
    pub fn score(&self, predicted: &[PricePoint], actual: &[PricePoint]) -> ScoreResult {
        let comparison = match self.compare(predicted, actual) {
            Some(comparison) => comparison,
            None => return ScoreResult::zero(),
        };

        if comparison.total_actual_value == 0.0 {
            return ScoreResult::zero();
        }

        let score = comparison.score();
        let multiplier = match self.policy {
            MultiplierPolicy::Linear => linear_multiplier(score),
            MultiplierPolicy::Tiered => tiered_multiplier(comparison.error_pct()),
        };

        debug!(
            "Scored {} ticks: difference={:.4}, actual={:.4}, score={:.4}, multiplier={}",
            comparison.ticks,
            comparison.total_difference,
            comparison.total_actual_value,
            score,
            multiplier
        );

        ScoreResult { score, multiplier }
    }

    /// Accumulate both integrals at each tick from the earliest start to the
    /// latest end, endpoints included. `None` for degenerate input.
    pub fn compare(&self, predicted: &[PricePoint], actual: &[PricePoint]) -> Option<PathComparison> {
        if predicted.len() < 2 || actual.len() < 2 {
            return None;
        }

        let start = predicted[0].time.min(actual[0].time);
        let end = predicted[predicted.len() - 1]
            .time
            .max(actual[actual.len() - 1].time);

        let span = end.checked_sub(start)?;
        let num_ticks = span / self.tick_interval_ms;
        if num_ticks < 1 {
            return None;
        }

        let dt = self.tick_interval_ms as f64;
        let mut total_difference = 0.0;
        let mut total_actual_value = 0.0;

        for i in 0..=num_ticks {
            let tick = start + i * self.tick_interval_ms;
            let predicted_price = interpolate(predicted, tick)?;
            let actual_price = interpolate(actual, tick)?;

            total_difference += (predicted_price - actual_price).abs() * dt;
            total_actual_value += actual_price.abs() * dt;
        }

        Some(PathComparison {
            ticks: (num_ticks + 1) as usize,
            total_difference,
            total_actual_value,
        })
    }
}

impl Default for PredictionScorer {
    fn default() -> Self {
        Self::new()
    }
}
