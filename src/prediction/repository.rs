use crate::core::{ExchangeError, ExchangeResult, Prediction};
use dashmap::DashMap;
use uuid::Uuid;

/// Storage for predictions. Settlement reads and rewrites single records;
/// no cross-record transactions are needed.
pub trait PredictionRepository: Send + Sync {
    fn insert(&self, prediction: Prediction);

    fn get(&self, id: &Uuid) -> Option<Prediction>;

    /// Apply `settle` to a pending record and store the result, atomically
    /// with respect to other calls for the same id. Fails with
    /// `AlreadySettled` when the record is no longer pending; an error from
    /// `settle` leaves the record untouched.
    fn settle_if_pending(
        &self,
        id: &Uuid,
        settle: &mut dyn FnMut(&mut Prediction) -> ExchangeResult<()>,
    ) -> ExchangeResult<Prediction>;

    fn all(&self) -> Vec<Prediction>;
}

pub struct InMemoryPredictionRepository {
    predictions: DashMap<Uuid, Prediction>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            predictions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

impl PredictionRepository for InMemoryPredictionRepository {
    fn insert(&self, prediction: Prediction) {
        self.predictions.insert(prediction.id, prediction);
    }

    fn get(&self, id: &Uuid) -> Option<Prediction> {
        self.predictions.get(id).map(|entry| entry.value().clone())
    }

    fn settle_if_pending(
        &self,
        id: &Uuid,
        settle: &mut dyn FnMut(&mut Prediction) -> ExchangeResult<()>,
    ) -> ExchangeResult<Prediction> {
        // The shard write lock is held until the record is replaced
        let mut entry = self
            .predictions
            .get_mut(id)
            .ok_or_else(|| ExchangeError::PredictionNotFound(id.to_string()))?;

        if !entry.is_pending() {
            return Err(ExchangeError::AlreadySettled(id.to_string()));
        }

        let mut updated = entry.value().clone();
        settle(&mut updated)?;
        *entry = updated.clone();
        Ok(updated)
    }

    fn all(&self) -> Vec<Prediction> {
        self.predictions.iter().map(|e| e.value().clone()).collect()
    }
}

impl Default for InMemoryPredictionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PredictionStatus, PredictionWindow, PricePoint};
    use chrono::Utc;

    fn prediction() -> Prediction {
        let now = Utc::now();
        Prediction {
            id: Uuid::new_v4(),
            asset: "BTC".to_string(),
            window: PredictionWindow::OneDay,
            start_price: 40_000.0,
            predicted_price: 42_000.0,
            predicted_change_pct: 5.0,
            stake: 1.0,
            user_address: "0xabc".to_string(),
            path: vec![PricePoint::new(0, 40_000.0), PricePoint::new(1, 42_000.0)],
            created_at: now,
            ends_at: now + PredictionWindow::OneDay.duration(),
            status: PredictionStatus::Pending,
            settlement: None,
        }
    }

    #[test]
    fn test_insert_get_settle() {
        let repo = InMemoryPredictionRepository::new();
        let p = prediction();
        repo.insert(p.clone());

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(&p.id).map(|p| p.asset), Some("BTC".to_string()));

        let settled = repo
            .settle_if_pending(&p.id, &mut |record| {
                record.status = PredictionStatus::Lost;
                Ok(())
            })
            .unwrap();
        assert_eq!(settled.status, PredictionStatus::Lost);
        assert_eq!(repo.get(&p.id).map(|p| p.status), Some(PredictionStatus::Lost));
        assert_eq!(repo.all().len(), 1);

        let err = repo.settle_if_pending(&p.id, &mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, ExchangeError::AlreadySettled(_)));
    }

    #[test]
    fn test_failed_settlement_leaves_record_pending() {
        let repo = InMemoryPredictionRepository::new();
        let p = prediction();
        repo.insert(p.clone());

        let err = repo
            .settle_if_pending(&p.id, &mut |record| {
                record.status = PredictionStatus::Won;
                Err(ExchangeError::Other("scoring failed".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Other(_)));
        assert_eq!(repo.get(&p.id).map(|p| p.status), Some(PredictionStatus::Pending));
    }

    #[test]
    fn test_settle_missing_record() {
        let repo = InMemoryPredictionRepository::default();
        let err = repo.settle_if_pending(&Uuid::new_v4(), &mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, ExchangeError::PredictionNotFound(_)));
        assert!(repo.is_empty());
    }
}
