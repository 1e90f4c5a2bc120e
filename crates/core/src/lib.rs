#![forbid(unsafe_code)]

pub mod model;
pub mod quiz;
pub mod summary;
pub mod time;

pub use quiz::{
    AnswerOutcome, GameTally, NextStep, QUESTIONS_PER_GAME, QuizError, QuizPhase, QuizSession,
    QuizStep,
};
pub use time::Clock;
