use crate::core::{ExchangeError, ExchangeResult, PricePoint};

/// Price of `path` at time `t`.
///
/// Linear between the two points bracketing `t`; before the first point or
/// after the last the nearest endpoint's price is returned unchanged.
/// `None` only for an empty path.
pub fn interpolate(path: &[PricePoint], t: i64) -> Option<f64> {
    let first = path.first()?;
    let last = path.last()?;

    if t <= first.time {
        return Some(first.price);
    }
    if t >= last.time {
        return Some(last.price);
    }

    // First point strictly after t; the one before it is at or before t
    let idx = path.partition_point(|p| p.time <= t);
    let p1 = path[idx - 1];
    let p2 = path[idx];

    let span = p2.time - p1.time;
    if span <= 0 {
        return Some(p1.price);
    }

    let ratio = (t - p1.time) as f64 / span as f64;
    Some(p1.price + (p2.price - p1.price) * ratio)
}

/// Check that `path` is usable as a prediction: at least two points,
/// strictly increasing times and finite, non-negative prices
pub fn validate_path(path: &[PricePoint]) -> ExchangeResult<()> {
    if path.len() < 2 {
        return Err(ExchangeError::InvalidPath(format!(
            "need at least 2 points, got {}",
            path.len()
        )));
    }

    for window in path.windows(2) {
        if window[1].time <= window[0].time {
            return Err(ExchangeError::InvalidPath(format!(
                "timestamps must be strictly increasing ({} then {})",
                window[0].time, window[1].time
            )));
        }
    }

    if let Some(bad) = path.iter().find(|p| !p.price.is_finite() || p.price < 0.0) {
        return Err(ExchangeError::InvalidPath(format!(
            "invalid price {} at {}",
            bad.price, bad.time
        )));
    }

    Ok(())
}

/// Percentage move from `from` to `to`
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}
