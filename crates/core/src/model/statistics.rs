use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::game::GameResult;
use crate::quiz::QUESTIONS_PER_GAME;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatisticsRecordError {
    #[error("best game ({best}) exceeds total correct answers ({total_correct})")]
    BestExceedsTotal { best: u32, total_correct: u32 },

    #[error("{total_correct} correct answers recorded without any games played")]
    AnswersWithoutGames { total_correct: u32 },
}

/// Cumulative statistics across all completed games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatisticsRecord {
    games_played: u32,
    best_game: GameResult,
    total_correct: u32,
}

impl StatisticsRecord {
    /// Rehydrate a record from persisted values.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsRecordError` if the values contradict each other.
    pub fn from_persisted(
        games_played: u32,
        best_game: GameResult,
        total_correct: u32,
    ) -> Result<Self, StatisticsRecordError> {
        if games_played == 0 && total_correct > 0 {
            return Err(StatisticsRecordError::AnswersWithoutGames { total_correct });
        }
        if best_game.correct() > total_correct {
            return Err(StatisticsRecordError::BestExceedsTotal {
                best: best_game.correct(),
                total_correct,
            });
        }
        Ok(Self {
            games_played,
            best_game,
            total_correct,
        })
    }

    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    #[must_use]
    pub fn best_game(&self) -> &GameResult {
        &self.best_game
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    /// Folds a completed game into the record.
    ///
    /// The best game is only replaced on a strict improvement.
    pub fn record_game(&mut self, result: GameResult) {
        self.games_played = self.games_played.saturating_add(1);
        self.total_correct = self.total_correct.saturating_add(result.correct());
        if result.is_better_than(&self.best_game) {
            self.best_game = result;
        }
    }

    /// Average share of correct answers in percent, `0` before the first game.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let asked = f64::from(QUESTIONS_PER_GAME) * f64::from(self.games_played);
        100.0 * f64::from(self.total_correct) / asked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn game(correct: u32, minutes: i64) -> GameResult {
        GameResult::new(correct, 10, fixed_now() + Duration::minutes(minutes)).unwrap()
    }

    #[test]
    fn accuracy_is_zero_without_games() {
        assert_eq!(StatisticsRecord::default().accuracy(), 0.0);
    }

    #[test]
    fn accuracy_after_one_game() {
        let mut record = StatisticsRecord::default();
        record.record_game(game(7, 0));
        assert_eq!(format!("{:.2}", record.accuracy()), "70.00");
    }

    #[test]
    fn best_game_keeps_earliest_on_tie_and_worse() {
        let mut record = StatisticsRecord::default();
        record.record_game(game(8, 0));
        record.record_game(game(5, 1));
        record.record_game(game(8, 2));

        assert_eq!(record.games_played(), 3);
        assert_eq!(record.total_correct(), 21);
        assert_eq!(*record.best_game(), game(8, 0));
    }

    #[test]
    fn best_of_regardless_of_order() {
        let mut worse_first = StatisticsRecord::default();
        worse_first.record_game(game(4, 0));
        worse_first.record_game(game(9, 1));

        let mut better_first = StatisticsRecord::default();
        better_first.record_game(game(9, 1));
        better_first.record_game(game(4, 0));

        assert_eq!(worse_first.best_game(), better_first.best_game());
        assert_eq!(worse_first.best_game().correct(), 9);
    }

    #[test]
    fn persisted_values_are_validated() {
        let err = StatisticsRecord::from_persisted(0, GameResult::default(), 3).unwrap_err();
        assert!(matches!(err, StatisticsRecordError::AnswersWithoutGames { total_correct: 3 }));

        let err = StatisticsRecord::from_persisted(1, game(9, 0), 4).unwrap_err();
        assert!(matches!(err, StatisticsRecordError::BestExceedsTotal { best: 9, .. }));
    }
}
