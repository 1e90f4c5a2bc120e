use std::sync::Arc;
use std::time::Duration;

use storage::Storage;
use tokio::sync::mpsc;

use crate::error::AppServicesError;
use crate::provider::MovieProvider;
use crate::question_source::QuestionSource;
use crate::quiz_loop::{DEFAULT_ADVANCE_DELAY, QuizEvent, QuizLoopService};
use crate::statistics_service::StatisticsService;
use crate::Clock;

/// Assembles app-facing services around one provider and one store.
#[derive(Clone)]
pub struct AppServices {
    provider: Arc<dyn MovieProvider>,
    statistics: Arc<StatisticsService>,
    advance_delay: Duration,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        provider: Arc<dyn MovieProvider>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, provider))
    }

    /// Build services that forget statistics when dropped.
    #[must_use]
    pub fn in_memory(clock: Clock, provider: Arc<dyn MovieProvider>) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, provider)
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        provider: Arc<dyn MovieProvider>,
    ) -> Self {
        let store = Arc::clone(&storage.settings);
        let statistics = Arc::new(StatisticsService::new(clock, store));
        Self {
            provider,
            statistics,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn provider(&self) -> Arc<dyn MovieProvider> {
        Arc::clone(&self.provider)
    }

    /// Create a quiz loop for one player plus its event receiver.
    #[must_use]
    pub fn quiz_loop(&self) -> (QuizLoopService, mpsc::UnboundedReceiver<QuizEvent>) {
        let source = QuestionSource::new(self.provider());
        let (service, rx) = QuizLoopService::new(source, self.statistics());
        (service.with_advance_delay(self.advance_delay), rx)
    }
}
