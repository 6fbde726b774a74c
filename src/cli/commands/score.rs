use crate::cli::{display::ExchangeDisplay, ScoreArgs};
use crate::core::{Config, ExchangeError, ExchangeResult, PricePoint};
use crate::prediction::{payout_table, validate_path, PredictionScorer};
use colored::*;
use log::info;
use std::path::Path;

pub async fn execute(args: ScoreArgs, config: &Config) -> ExchangeResult<()> {
    println!("{}", "🚀 Insider Exchange Prediction Scorer".bold().cyan());

    let predicted = load_path(&args.predicted).await?;
    let actual = load_path(&args.actual).await?;
    validate_path(&predicted)?;

    let mut scorer = PredictionScorer::from_config(config);
    if let Some(tick_ms) = args.tick_ms {
        scorer = scorer.with_tick_interval(tick_ms);
    }
    if let Some(policy) = args.policy {
        scorer = scorer.with_policy(policy);
    }

    info!(
        "Scoring {} predicted against {} actual points ({} policy)",
        predicted.len(),
        actual.len(),
        scorer.policy()
    );

    let result = scorer.score(&predicted, &actual);
    let comparison = scorer.compare(&predicted, &actual);
    ExchangeDisplay::display_score(&result, comparison.as_ref());

    if let Some(stake) = args.stake {
        if !(stake > 0.0) {
            return Err(ExchangeError::InvalidAmount(format!(
                "stake must be greater than 0, got {}",
                stake
            )));
        }
        let table = payout_table(stake, scorer.policy());
        ExchangeDisplay::display_payout_table(stake, stake * result.multiplier, &table);
    }

    Ok(())
}

async fn load_path(path: &Path) -> ExchangeResult<Vec<PricePoint>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let points: Vec<PricePoint> = serde_json::from_str(&contents)?;
    Ok(points)
}
