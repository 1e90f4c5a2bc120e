//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use quiz_core::model::{GameResultError, StatisticsRecordError};
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by movie providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("movie provider is not configured")]
    Disabled,
    #[error("movie provider reported an error: {0}")]
    Reported(String),
    #[error("movie provider request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("movie provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("movie catalog is empty")]
    EmptyCatalog,
    #[error("failed to load the movie catalog")]
    Catalog(#[source] ProviderError),
    #[error("no movies loaded")]
    EmptyPool,
    #[error("failed to load the poster image")]
    Image(#[source] ProviderError),
}

impl QuestionError {
    /// True for failures that require reloading the catalog.
    #[must_use]
    pub fn is_catalog_failure(&self) -> bool {
        matches!(
            self,
            QuestionError::EmptyCatalog | QuestionError::Catalog(_) | QuestionError::EmptyPool
        )
    }
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error("stored value for `{key}` is out of range: {value}")]
    OutOfRange { key: &'static str, value: i64 },
    #[error(transparent)]
    Record(#[from] StatisticsRecordError),
    #[error(transparent)]
    GameResult(#[from] GameResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
