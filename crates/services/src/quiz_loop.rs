use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{GameResult, StatisticsRecord};
use quiz_core::{AnswerOutcome, NextStep, QuizSession, QuizStep};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{QuestionError, QuizLoopError};
use crate::question_source::QuestionSource;
use crate::statistics_service::StatisticsService;

/// Pause between showing an answer's verdict and moving on.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_secs(1);

pub const RESULTS_TITLE: &str = "This round is over!";
pub const PLAY_AGAIN_LABEL: &str = "Play again";
pub const ERROR_TITLE: &str = "Error";
pub const RETRY_LABEL: &str = "Try again";

//
// ─── EVENTS & UPDATES ─────────────────────────────────────────────────────────
//

/// Scheduled work delivered back to the owner of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    AdvanceDue { generation: u64 },
}

/// Results dialog content for a finished game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameReport {
    pub title: &'static str,
    pub button_text: &'static str,
    pub result: GameResult,
    pub record: StatisticsRecord,
    pub summary: String,
}

/// Error dialog content offering a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub title: &'static str,
    pub message: String,
    pub button_text: &'static str,
}

impl ErrorReport {
    #[must_use]
    pub fn from_error(err: &QuizLoopError) -> Self {
        let message = match err {
            QuizLoopError::Question(QuestionError::Image(_)) => "Failed to load the image".into(),
            QuizLoopError::Question(q) if q.is_catalog_failure() => {
                "Could not load the movie list. Check your connection".into()
            }
            other => other.to_string(),
        };
        Self {
            title: ERROR_TITLE,
            message,
            button_text: RETRY_LABEL,
        }
    }
}

/// What the presentation layer should show after an advance.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizUpdate {
    Question(QuizStep),
    Finished(GameReport),
}

//
// ─── LOOP ─────────────────────────────────────────────────────────────────────
//

/// Drives one player through games: questions, answers, delayed advances and
/// statistics.
///
/// Answers schedule an advance on a Tokio timer; the owner receives
/// `QuizEvent::AdvanceDue` on the channel returned by `new` and passes it back
/// to `handle_event`. Restarting cancels a pending advance.
pub struct QuizLoopService {
    source: QuestionSource,
    statistics: Arc<StatisticsService>,
    session: QuizSession,
    advance_delay: Duration,
    events: mpsc::UnboundedSender<QuizEvent>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        source: QuestionSource,
        statistics: Arc<StatisticsService>,
    ) -> (Self, mpsc::UnboundedReceiver<QuizEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let service = Self {
            source,
            statistics,
            session: QuizSession::new(),
            advance_delay: DEFAULT_ADVANCE_DELAY,
            events,
            generation: 0,
            pending: None,
        };
        (service, rx)
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    /// Load the catalog and show the first question of a new game.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Question` if the catalog or first poster fails.
    pub async fn start(&mut self) -> Result<QuizStep, QuizLoopError> {
        self.cancel_pending();
        self.session.reset();
        self.source.load_pool().await?;
        self.request_question().await
    }

    /// Begin a fresh game. Serves both "play again" and "try again".
    ///
    /// The catalog is only reloaded when no pool is loaded yet.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Question` if loading fails again.
    pub async fn restart(&mut self) -> Result<QuizStep, QuizLoopError> {
        self.cancel_pending();
        self.session.reset();
        log::debug!("game restarted");
        self.request_question().await
    }

    /// Evaluate the player's answer and schedule the advance.
    ///
    /// Returns `None` when there is no question to answer; the event is
    /// ignored. Must be called from within a Tokio runtime.
    pub fn answer(&mut self, choice: bool) -> Option<AnswerOutcome> {
        let Some(outcome) = self.session.submit_answer(choice) else {
            log::debug!("ignoring answer with no active question");
            return None;
        };
        self.schedule_advance();
        Some(outcome)
    }

    /// React to a scheduled event. Stale events yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError` if the next question or statistics fail.
    pub async fn handle_event(
        &mut self,
        event: QuizEvent,
    ) -> Result<Option<QuizUpdate>, QuizLoopError> {
        match event {
            QuizEvent::AdvanceDue { generation } => {
                if generation != self.generation || self.pending.is_none() {
                    log::debug!("dropping stale advance (generation {generation})");
                    return Ok(None);
                }
                self.pending = None;
                self.advance().await.map(Some)
            }
        }
    }

    /// Advance immediately, cancelling any scheduled advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Quiz` if no answer was evaluated, otherwise the
    /// errors of loading a question or recording statistics.
    pub async fn advance(&mut self) -> Result<QuizUpdate, QuizLoopError> {
        self.cancel_pending();
        match self.session.advance()? {
            NextStep::MoreQuestions => Ok(QuizUpdate::Question(self.request_question().await?)),
            NextStep::GameComplete(tally) => {
                let (result, record) = self.statistics.record_tally(tally).await?;
                let summary = StatisticsService::summary_text(&result, &record);
                Ok(QuizUpdate::Finished(GameReport {
                    title: RESULTS_TITLE,
                    button_text: PLAY_AGAIN_LABEL,
                    result,
                    record,
                    summary,
                }))
            }
        }
    }

    async fn request_question(&mut self) -> Result<QuizStep, QuizLoopError> {
        if !self.source.is_loaded() {
            self.source.load_pool().await?;
        }
        let question = self.source.next_question().await?;
        let step = self.session.show_question(question)?;
        log::debug!("showing question {}", step.counter);
        Ok(step)
    }

    fn schedule_advance(&mut self) {
        self.cancel_pending();
        let generation = self.generation;
        let delay = self.advance_delay;
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(QuizEvent::AdvanceDue { generation });
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Drop for QuizLoopService {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("session", &self.session)
            .field("source", &self.source)
            .field("advance_delay", &self.advance_delay)
            .field("generation", &self.generation)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}
