#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod provider;
pub mod question_source;
pub mod quiz_loop;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProviderError, QuestionError, QuizLoopError, StatisticsError};
pub use provider::{ImdbMovieProvider, MovieProvider, ProviderConfig, StaticMovieProvider};
pub use question_source::QuestionSource;
pub use quiz_loop::{ErrorReport, GameReport, QuizEvent, QuizLoopService, QuizUpdate};
pub use statistics_service::StatisticsService;
