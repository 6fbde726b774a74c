use crate::core::{
    ExchangeError, ExchangeResult, Prediction, PredictionRequest, PredictionStatus, PricePoint,
    Settlement, LEADERBOARD_SIZE,
};
use crate::prediction::path::{percent_change, validate_path};
use crate::prediction::{PredictionRepository, PredictionScorer};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const ANONYMOUS_USER: &str = "anonymous";

/// Per-user results across settled predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub address: String,
    pub total_predictions: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_staked: f64,
    pub total_payout: f64,
    pub profit: f64,
    pub win_rate_pct: f64,
    pub avg_accuracy_pct: f64,
}

/// Prediction lifecycle: placement, settlement and reporting.
///
/// Holds no timers. Whoever drives settlement (a cron job, a worker) calls
/// [`PredictionBook::due`] and then [`PredictionBook::settle`] with the
/// realized price series once it covers the prediction window.
pub struct PredictionBook {
    repository: Arc<dyn PredictionRepository>,
    scorer: PredictionScorer,
}

impl PredictionBook {
    pub fn new(repository: Arc<dyn PredictionRepository>, scorer: PredictionScorer) -> Self {
        Self { repository, scorer }
    }

    pub fn scorer(&self) -> &PredictionScorer {
        &self.scorer
    }

    /// Record a new pending prediction whose window opens at `now`
    pub fn create(&self, request: PredictionRequest, now: DateTime<Utc>) -> ExchangeResult<Prediction> {
        if !(request.stake > 0.0) {
            return Err(ExchangeError::InvalidAmount(format!(
                "stake must be greater than 0, got {}",
                request.stake
            )));
        }

        if !(request.start_price > 0.0) {
            return Err(ExchangeError::InvalidPrice {
                symbol: request.asset.clone(),
                price: request.start_price.to_string(),
            });
        }

        validate_path(&request.path)?;

        let prediction = Prediction {
            id: Uuid::new_v4(),
            asset: request.asset.to_uppercase(),
            window: request.window,
            start_price: request.start_price,
            predicted_price: request.predicted_price,
            predicted_change_pct: percent_change(request.start_price, request.predicted_price),
            stake: request.stake,
            user_address: request
                .user_address
                .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            path: request.path,
            created_at: now,
            ends_at: now + request.window.duration(),
            status: PredictionStatus::Pending,
            settlement: None,
        };

        info!(
            "Prediction {} on {} ({}, stake {}) ends {}",
            prediction.id, prediction.asset, prediction.window, prediction.stake, prediction.ends_at
        );

        self.repository.insert(prediction.clone());
        Ok(prediction)
    }

    /// Score a due prediction against the realized series and record the payout.
    ///
    /// Concurrent calls for the same id settle it once; the others fail with
    /// `AlreadySettled`.
    pub fn settle(
        &self,
        id: &Uuid,
        actual: &[PricePoint],
        now: DateTime<Utc>,
    ) -> ExchangeResult<Prediction> {
        let scorer = &self.scorer;
        let prediction = self.repository.settle_if_pending(id, &mut |prediction| {
            if now < prediction.ends_at {
                return Err(ExchangeError::SettlementNotDue {
                    id: id.to_string(),
                    ends_at: prediction.ends_at.to_rfc3339(),
                });
            }

            let score = scorer.score(&prediction.path, actual);
            let actual_price = actual
                .last()
                .map(|p| p.price)
                .unwrap_or(prediction.start_price);
            let payout = prediction.stake * score.multiplier;

            prediction.status = if payout > 0.0 {
                PredictionStatus::Won
            } else {
                PredictionStatus::Lost
            };
            prediction.settlement = Some(Settlement {
                score,
                actual_price,
                actual_change_pct: percent_change(prediction.start_price, actual_price),
                payout,
                settled_at: now,
            });
            Ok(())
        })?;

        if let Some(settlement) = &prediction.settlement {
            info!(
                "Settled prediction {}: score {:.4}, multiplier {}x, payout {}",
                id, settlement.score.score, settlement.score.multiplier, settlement.payout
            );
        }
        Ok(prediction)
    }

    pub fn get(&self, id: &Uuid) -> Option<Prediction> {
        self.repository.get(id)
    }

    /// Every prediction, newest first
    pub fn all(&self) -> Vec<Prediction> {
        let mut predictions = self.repository.all();
        predictions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        predictions
    }

    /// A user's predictions, newest first
    pub fn by_user(&self, user_address: &str) -> Vec<Prediction> {
        let mut predictions: Vec<Prediction> = self
            .repository
            .all()
            .into_iter()
            .filter(|p| p.user_address == user_address)
            .collect();
        predictions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        predictions
    }

    /// Pending predictions, soonest ending first
    pub fn pending(&self) -> Vec<Prediction> {
        let mut predictions: Vec<Prediction> = self
            .repository
            .all()
            .into_iter()
            .filter(|p| p.is_pending())
            .collect();
        predictions.sort_by(|a, b| a.ends_at.cmp(&b.ends_at));
        predictions
    }

    /// Pending predictions whose window has closed by `now`
    pub fn due(&self, now: DateTime<Utc>) -> Vec<Prediction> {
        let due: Vec<Prediction> = self
            .pending()
            .into_iter()
            .filter(|p| p.is_due(now))
            .collect();
        debug!("{} predictions due for settlement", due.len());
        due
    }

    /// Users ranked by profit over settled predictions
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut stats: HashMap<String, (LeaderboardEntry, f64)> = HashMap::new();

        for prediction in self.repository.all() {
            let settlement = match &prediction.settlement {
                Some(settlement) => settlement,
                None => continue,
            };

            let (entry, accuracy_sum) = stats
                .entry(prediction.user_address.clone())
                .or_insert_with(|| (empty_entry(&prediction.user_address), 0.0));

            entry.total_predictions += 1;
            entry.total_staked += prediction.stake;
            entry.total_payout += settlement.payout;
            if prediction.status == PredictionStatus::Won {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
            *accuracy_sum += settlement.score.score * 100.0;
        }

        let mut entries: Vec<LeaderboardEntry> = stats
            .into_values()
            .map(|(mut entry, accuracy_sum)| {
                let count = entry.total_predictions as f64;
                entry.profit = entry.total_payout - entry.total_staked;
                entry.win_rate_pct = round1(entry.wins as f64 / count * 100.0);
                entry.avg_accuracy_pct = round1(accuracy_sum / count);
                entry
            })
            .collect();

        entries.sort_by(|a, b| {
            b.profit
                .partial_cmp(&a.profit)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.address.cmp(&b.address))
        });
        entries.truncate(LEADERBOARD_SIZE);
        entries
    }
}

fn empty_entry(address: &str) -> LeaderboardEntry {
    LeaderboardEntry {
        address: address.to_string(),
        total_predictions: 0,
        wins: 0,
        losses: 0,
        total_staked: 0.0,
        total_payout: 0.0,
        profit: 0.0,
        win_rate_pct: 0.0,
        avg_accuracy_pct: 0.0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MultiplierPolicy, PredictionWindow};
    use crate::prediction::InMemoryPredictionRepository;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::sync::Barrier;
    use std::thread;

    const HOUR: i64 = 3_600_000;

    fn book() -> PredictionBook {
        PredictionBook::new(
            Arc::new(InMemoryPredictionRepository::new()),
            PredictionScorer::new(),
        )
    }

    fn flat_path(start: DateTime<Utc>, price: f64) -> Vec<PricePoint> {
        let t0 = start.timestamp_millis();
        vec![PricePoint::new(t0, price), PricePoint::new(t0 + 24 * HOUR, price)]
    }

    fn request(user: &str, stake: f64, path: Vec<PricePoint>) -> PredictionRequest {
        PredictionRequest {
            asset: "eth".to_string(),
            window: PredictionWindow::OneDay,
            start_price: 2000.0,
            predicted_price: 2100.0,
            stake,
            user_address: Some(user.to_string()),
            path,
        }
    }

    #[test]
    fn test_create_prediction() {
        let book = book();
        let now = Utc::now();
        let prediction = book.create(request("alice", 10.0, flat_path(now, 2000.0)), now).unwrap();

        assert_eq!(prediction.asset, "ETH");
        assert_eq!(prediction.status, PredictionStatus::Pending);
        assert_eq!(prediction.ends_at - prediction.created_at, Duration::days(1));
        assert_eq!(prediction.predicted_change_pct, 5.0);
        assert!(book.get(&prediction.id).is_some());
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let book = book();
        let now = Utc::now();

        let err = book.create(request("alice", 0.0, flat_path(now, 1.0)), now).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidAmount(_)));

        let err = book.create(request("alice", 5.0, vec![]), now).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidPath(_)));

        let mut bad_start = request("alice", 5.0, flat_path(now, 1.0));
        bad_start.start_price = 0.0;
        assert!(book.create(bad_start, now).is_err());
    }

    #[test]
    fn test_anonymous_user() {
        let book = book();
        let now = Utc::now();
        let mut req = request("x", 1.0, flat_path(now, 2000.0));
        req.user_address = None;

        let prediction = book.create(req, now).unwrap();
        assert_eq!(prediction.user_address, "anonymous");
    }

    #[test]
    fn test_settle_perfect_prediction() {
        let book = book();
        let now = Utc::now();
        let path = flat_path(now, 2000.0);
        let prediction = book.create(request("alice", 10.0, path.clone()), now).unwrap();

        let settled = book
            .settle(&prediction.id, &path, now + Duration::days(1))
            .unwrap();
        let settlement = settled.settlement.unwrap();

        assert_eq!(settled.status, PredictionStatus::Won);
        assert_eq!(settlement.score.score, 1.0);
        assert_eq!(settlement.score.multiplier, 10.0);
        assert_eq!(settlement.payout, 100.0);
        assert_eq!(settlement.actual_price, 2000.0);
        assert_eq!(settlement.actual_change_pct, 0.0);
    }

    #[test]
    fn test_settle_losing_prediction() {
        let book = book();
        let now = Utc::now();
        let prediction = book
            .create(request("bob", 10.0, flat_path(now, 9000.0)), now)
            .unwrap();

        let settled = book
            .settle(&prediction.id, &flat_path(now, 2000.0), now + Duration::days(2))
            .unwrap();

        assert_eq!(settled.status, PredictionStatus::Lost);
        assert_eq!(settled.settlement.unwrap().payout, 0.0);
    }

    #[test]
    fn test_settle_guards() {
        let book = book();
        let now = Utc::now();
        let path = flat_path(now, 2000.0);
        let prediction = book.create(request("alice", 10.0, path.clone()), now).unwrap();

        let err = book.settle(&prediction.id, &path, now + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, ExchangeError::SettlementNotDue { .. }));

        book.settle(&prediction.id, &path, now + Duration::days(1)).unwrap();
        let err = book.settle(&prediction.id, &path, now + Duration::days(1)).unwrap_err();
        assert!(matches!(err, ExchangeError::AlreadySettled(_)));

        let err = book.settle(&Uuid::new_v4(), &path, now).unwrap_err();
        assert!(matches!(err, ExchangeError::PredictionNotFound(_)));
    }

    #[test]
    fn test_concurrent_settle_pays_out_once() {
        const THREADS: usize = 8;

        for _ in 0..20 {
            let book = book();
            let now = Utc::now();
            let path = flat_path(now, 2000.0);
            let prediction = book.create(request("alice", 10.0, path.clone()), now).unwrap();
            let settle_at = now + Duration::days(1);
            let barrier = Barrier::new(THREADS);

            let results: Vec<ExchangeResult<Prediction>> = thread::scope(|s| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|_| {
                        s.spawn(|| {
                            barrier.wait();
                            book.settle(&prediction.id, &path, settle_at)
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let settled = results.iter().filter(|r| r.is_ok()).count();
            let rejected = results
                .iter()
                .filter(|r| matches!(r, Err(ExchangeError::AlreadySettled(_))))
                .count();
            assert_eq!(settled, 1);
            assert_eq!(rejected, THREADS - 1);

            let stored = book.get(&prediction.id).unwrap();
            assert_eq!(stored.status, PredictionStatus::Won);
            assert_eq!(stored.settlement.unwrap().payout, 100.0);
        }
    }

    #[test]
    fn test_settle_with_degenerate_series_loses() {
        let book = book();
        let now = Utc::now();
        let prediction = book
            .create(request("carol", 10.0, flat_path(now, 2000.0)), now)
            .unwrap();

        let settled = book.settle(&prediction.id, &[], now + Duration::days(1)).unwrap();
        let settlement = settled.settlement.unwrap();

        assert_eq!(settled.status, PredictionStatus::Lost);
        assert_eq!(settlement.actual_price, 2000.0);
    }

    #[test]
    fn test_due_and_pending_ordering() {
        let book = book();
        let now = Utc::now();

        let mut weekly = request("alice", 1.0, flat_path(now, 2000.0));
        weekly.window = PredictionWindow::OneWeek;
        let weekly = book.create(weekly, now).unwrap();
        let daily = book.create(request("alice", 1.0, flat_path(now, 2000.0)), now).unwrap();

        let pending: Vec<Uuid> = book.pending().iter().map(|p| p.id).collect();
        assert_eq!(pending, vec![daily.id, weekly.id]);

        assert!(book.due(now).is_empty());
        let due: Vec<Uuid> = book.due(now + Duration::days(2)).iter().map(|p| p.id).collect();
        assert_eq!(due, vec![daily.id]);
        assert_eq!(book.due(now + Duration::days(7)).len(), 2);
    }

    #[test]
    fn test_by_user_newest_first() {
        let book = book();
        let now = Utc::now();
        let first = book.create(request("alice", 1.0, flat_path(now, 1.0)), now).unwrap();
        let later = now + Duration::minutes(1);
        let second = book.create(request("alice", 1.0, flat_path(later, 1.0)), later).unwrap();
        book.create(request("bob", 1.0, flat_path(now, 1.0)), now).unwrap();

        let ids: Vec<Uuid> = book.by_user("alice").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(book.all().len(), 3);
    }

    #[test]
    fn test_leaderboard() {
        let book = book();
        let now = Utc::now();
        let settle_at = now + Duration::days(1);
        let actual = flat_path(now, 2000.0);

        let a1 = book.create(request("alice", 10.0, actual.clone()), now).unwrap();
        let a2 = book.create(request("alice", 10.0, flat_path(now, 9000.0)), now).unwrap();
        let b1 = book.create(request("bob", 10.0, flat_path(now, 9000.0)), now).unwrap();
        // Unsettled predictions are ignored
        book.create(request("carol", 10.0, actual.clone()), now).unwrap();

        for id in [a1.id, a2.id, b1.id] {
            book.settle(&id, &actual, settle_at).unwrap();
        }

        let board = book.leaderboard();
        assert_eq!(board.len(), 2);

        let alice = &board[0];
        assert_eq!(alice.address, "alice");
        assert_eq!(alice.total_predictions, 2);
        assert_eq!(alice.wins, 1);
        assert_eq!(alice.losses, 1);
        assert_eq!(alice.total_staked, 20.0);
        assert_eq!(alice.total_payout, 100.0);
        assert_eq!(alice.profit, 80.0);
        assert_eq!(alice.win_rate_pct, 50.0);
        assert_eq!(alice.avg_accuracy_pct, 50.0);

        let bob = &board[1];
        assert_eq!(bob.profit, -10.0);
        assert_eq!(bob.win_rate_pct, 0.0);
    }

    #[test]
    fn test_tiered_book() {
        let book = PredictionBook::new(
            Arc::new(InMemoryPredictionRepository::new()),
            PredictionScorer::new().with_policy(MultiplierPolicy::Tiered),
        );
        let now = Utc::now();
        // 2% above the realized price the whole way
        let prediction = book
            .create(request("dave", 10.0, flat_path(now, 2040.0)), now)
            .unwrap();

        let settled = book
            .settle(&prediction.id, &flat_path(now, 2000.0), now + Duration::days(1))
            .unwrap();
        assert_eq!(settled.settlement.unwrap().score.multiplier, 5.0);
        assert_eq!(book.scorer().policy(), MultiplierPolicy::Tiered);
    }
}
