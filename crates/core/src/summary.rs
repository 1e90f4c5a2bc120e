//! Results text shown after a finished game.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::model::{GameResult, StatisticsRecord};

/// Moscow time, UTC+03:00 all year round.
pub const MOSCOW_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Display format for the best-game date.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Zone used for every rendered date.
#[must_use]
pub fn display_zone() -> FixedOffset {
    FixedOffset::east_opt(MOSCOW_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&display_zone()).format(DATE_FORMAT).to_string()
}

/// Best game as `"c/t (date)"`, or `"none yet"` while only zero scores exist.
#[must_use]
pub fn format_best_game(best: &GameResult) -> String {
    if best.total() == 0 {
        return "none yet".to_string();
    }
    format!(
        "{}/{} ({})",
        best.correct(),
        best.total(),
        format_timestamp(best.played_at())
    )
}

/// Builds the multi-line results message for the last game.
#[must_use]
pub fn summary_text(last: &GameResult, record: &StatisticsRecord) -> String {
    format!(
        "Your result: {}/{}\nQuizzes played: {}\nRecord: {}\nAverage accuracy: {:.2}%",
        last.correct(),
        last.total(),
        record.games_played(),
        format_best_game(record.best_game()),
        record.accuracy(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn timestamp_renders_in_moscow_time() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_timestamp(fixed_now()), "15.11.2023 01:13:20");
    }

    #[test]
    fn summary_lists_all_fields() {
        let result = GameResult::new(8, 10, fixed_now()).unwrap();
        let mut record = StatisticsRecord::default();
        record.record_game(result);

        let text = summary_text(&result, &record);
        assert_eq!(
            text,
            "Your result: 8/10\nQuizzes played: 1\nRecord: 8/10 (15.11.2023 01:13:20)\nAverage accuracy: 80.00%"
        );
    }

    #[test]
    fn zero_first_game_has_no_record_yet() {
        let result = GameResult::new(0, 10, fixed_now()).unwrap();
        let mut record = StatisticsRecord::default();
        record.record_game(result);

        let text = summary_text(&result, &record);
        assert!(text.contains("Record: none yet"), "{text}");
        assert!(!text.contains("1970"), "{text}");
        assert!(text.ends_with("Average accuracy: 0.00%"));
    }
}
