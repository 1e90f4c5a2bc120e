use std::sync::Arc;

use quiz_core::model::{GameResult, StatisticsRecord};
use quiz_core::{GameTally, summary};
use storage::{InMemoryStore, KeyValueStore, StoredValue};

use crate::Clock;
use crate::error::StatisticsError;

/// Settings keys, kept compatible with earlier saved statistics.
mod keys {
    pub const GAMES_COUNT: &str = "gamesCount";
    pub const TOTAL_CORRECT: &str = "totalCorrect";
    pub const BEST_CORRECT: &str = "bestGame.correct";
    pub const BEST_TOTAL: &str = "bestGame.total";
    pub const BEST_DATE: &str = "bestGame.date";
}

/// Persists cumulative game statistics in a key-value store.
///
/// Every call reads the store; nothing is cached between calls.
#[derive(Clone)]
pub struct StatisticsService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, store }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(InMemoryStore::new()))
    }

    async fn count(&self, key: &'static str) -> Result<u32, StatisticsError> {
        let value = self.store.integer(key).await?;
        u32::try_from(value).map_err(|_| StatisticsError::OutOfRange { key, value })
    }

    /// Load the stored record, or the zero record if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` on storage failures or inconsistent values.
    pub async fn load(&self) -> Result<StatisticsRecord, StatisticsError> {
        let games_played = self.count(keys::GAMES_COUNT).await?;
        let total_correct = self.count(keys::TOTAL_CORRECT).await?;
        let best_correct = self.count(keys::BEST_CORRECT).await?;
        let best_total = self.count(keys::BEST_TOTAL).await?;
        let best_date = self.store.timestamp(keys::BEST_DATE).await?;

        let best_game = GameResult::new(best_correct, best_total, best_date)?;
        Ok(StatisticsRecord::from_persisted(
            games_played,
            best_game,
            total_correct,
        )?)
    }

    /// Fold a completed game into the stored record and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if the record cannot be read or written.
    pub async fn record_game(
        &self,
        result: GameResult,
    ) -> Result<StatisticsRecord, StatisticsError> {
        let mut record = self.load().await?;
        let previous_best = *record.best_game();
        record.record_game(result);

        let mut entries = vec![
            (
                keys::GAMES_COUNT,
                StoredValue::Integer(i64::from(record.games_played())),
            ),
            (
                keys::TOTAL_CORRECT,
                StoredValue::Integer(i64::from(record.total_correct())),
            ),
        ];
        let best = record.best_game();
        if *best != previous_best {
            log::info!("new best game: {}/{}", best.correct(), best.total());
            entries.extend([
                (
                    keys::BEST_CORRECT,
                    StoredValue::Integer(i64::from(best.correct())),
                ),
                (keys::BEST_TOTAL, StoredValue::Integer(i64::from(best.total()))),
                (keys::BEST_DATE, StoredValue::Timestamp(best.played_at())),
            ]);
        }
        self.store.set_values(&entries).await?;

        log::info!(
            "recorded game {}/{} (games played: {})",
            result.correct(),
            result.total(),
            record.games_played()
        );
        Ok(record)
    }

    /// Timestamp a finished session with the service clock and record it.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if the tally is invalid or persistence fails.
    pub async fn record_tally(
        &self,
        tally: GameTally,
    ) -> Result<(GameResult, StatisticsRecord), StatisticsError> {
        let result = GameResult::new(tally.correct, tally.total, self.clock.now())?;
        let record = self.record_game(result).await?;
        Ok((result, record))
    }

    /// Average accuracy across all stored games, in percent.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if the record cannot be loaded.
    pub async fn current_accuracy(&self) -> Result<f64, StatisticsError> {
        Ok(self.load().await?.accuracy())
    }

    #[must_use]
    pub fn summary_text(last: &GameResult, record: &StatisticsRecord) -> String {
        summary::summary_text(last, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::{epoch, fixed_now};

    fn game(correct: u32, at: chrono::DateTime<chrono::Utc>) -> GameResult {
        GameResult::new(correct, 10, at).unwrap()
    }

    #[tokio::test]
    async fn fresh_store_loads_zero_record() {
        let service = StatisticsService::in_memory(Clock::fixed(fixed_now()));
        let record = service.load().await.unwrap();
        assert_eq!(record.games_played(), 0);
        assert_eq!(record.best_game().played_at(), epoch());
        assert_eq!(service.current_accuracy().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn best_game_and_accuracy_across_two_games() {
        let service = StatisticsService::in_memory(Clock::fixed(fixed_now()));
        let t1 = fixed_now();
        let t2 = t1 + Duration::minutes(3);

        let record = service.record_game(game(8, t1)).await.unwrap();
        assert_eq!(*record.best_game(), game(8, t1));
        assert_eq!(record.games_played(), 1);
        assert_eq!(format!("{:.2}", service.current_accuracy().await.unwrap()), "80.00");

        let record = service.record_game(game(5, t2)).await.unwrap();
        assert_eq!(*record.best_game(), game(8, t1));
        assert_eq!(record.games_played(), 2);
        assert_eq!(format!("{:.2}", service.current_accuracy().await.unwrap()), "65.00");
    }

    #[tokio::test]
    async fn equal_score_keeps_earliest_timestamp() {
        let service = StatisticsService::in_memory(Clock::fixed(fixed_now()));
        let t1 = fixed_now();
        service.record_game(game(6, t1)).await.unwrap();
        let record = service
            .record_game(game(6, t1 + Duration::days(1)))
            .await
            .unwrap();
        assert_eq!(record.best_game().played_at(), t1);
    }

    #[tokio::test]
    async fn record_tally_uses_clock() {
        let service = StatisticsService::in_memory(Clock::fixed(fixed_now()));
        let (result, record) = service
            .record_tally(GameTally {
                correct: 7,
                total: 10,
            })
            .await
            .unwrap();
        assert_eq!(result.played_at(), fixed_now());
        assert_eq!(format!("{:.2}", record.accuracy()), "70.00");
    }

    #[tokio::test]
    async fn zero_score_first_game_shows_no_record() {
        let service = StatisticsService::in_memory(Clock::fixed(fixed_now()));
        let (result, record) = service
            .record_tally(GameTally {
                correct: 0,
                total: 10,
            })
            .await
            .unwrap();

        assert_eq!(record.games_played(), 1);
        let text = StatisticsService::summary_text(&result, &record);
        assert!(text.contains("Record: none yet"), "{text}");

        let (result, record) = service
            .record_tally(GameTally {
                correct: 3,
                total: 10,
            })
            .await
            .unwrap();
        let text = StatisticsService::summary_text(&result, &record);
        assert!(text.contains("Record: 3/10 (15.11.2023 01:13:20)"), "{text}");
    }

    #[tokio::test]
    async fn negative_stored_count_is_out_of_range() {
        let store = Arc::new(InMemoryStore::new());
        store
            .set_value(keys::GAMES_COUNT, StoredValue::Integer(-1))
            .await
            .unwrap();
        let service = StatisticsService::new(Clock::fixed(fixed_now()), store);
        let err = service.load().await.unwrap_err();
        assert!(matches!(
            err,
            StatisticsError::OutOfRange {
                key: "gamesCount",
                value: -1
            }
        ));
    }
}
