use crate::core::{MultiplierPolicy, MAX_MULTIPLIER, SCORING_TIERS};
use serde::{Deserialize, Serialize};

/// `round(score * 10, 2)`, clamped to `[0, 10]`
pub fn linear_multiplier(score: f64) -> f64 {
    let multiplier = (score * MAX_MULTIPLIER * 100.0).round() / 100.0;
    multiplier.clamp(0.0, MAX_MULTIPLIER)
}

/// Multiplier of the first tier whose error ceiling covers `error_pct`
pub fn tiered_multiplier(error_pct: f64) -> f64 {
    if error_pct.is_nan() {
        return 0.0;
    }
    SCORING_TIERS
        .iter()
        .find(|(max_error, _)| error_pct <= *max_error)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(0.0)
}

/// One row of the payout table shown before a prediction is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutTier {
    pub label: String,
    pub multiplier: f64,
    pub payout: f64,
}

/// Payouts a stake can earn under `policy`
pub fn payout_table(stake: f64, policy: MultiplierPolicy) -> Vec<PayoutTier> {
    match policy {
        MultiplierPolicy::Linear => [1.0, 0.75, 0.5, 0.25, 0.0]
            .iter()
            .map(|&score| {
                let multiplier = linear_multiplier(score);
                PayoutTier {
                    label: format!("score {:.2}", score),
                    multiplier,
                    payout: stake * multiplier,
                }
            })
            .collect(),
        MultiplierPolicy::Tiered => SCORING_TIERS
            .iter()
            .map(|&(max_error, multiplier)| PayoutTier {
                label: if max_error.is_infinite() {
                    ">10%".to_string()
                } else {
                    format!("±{}%", max_error)
                },
                multiplier,
                payout: stake * multiplier,
            })
            .collect(),
    }
}
