mod game;
mod ids;
mod movie;
mod question;
mod statistics;

pub use ids::MovieId;

pub use game::{GameResult, GameResultError};
pub use movie::{MovieRecord, RESIZED_POSTER_SUFFIX, parse_rating};
pub use question::{Comparison, Question, THRESHOLD_RANGE};
pub use statistics::{StatisticsRecord, StatisticsRecordError};
