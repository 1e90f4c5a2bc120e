use std::fmt;

use thiserror::Error;

use crate::model::Question;

/// Number of questions in one game.
///
/// Accuracy is computed against this value, so it is shared by the session and
/// the statistics record.
pub const QUESTIONS_PER_GAME: u32 = 10;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot show a question while {0}")]
    NotAwaitingQuestion(QuizPhase),

    #[error("cannot advance while {0}")]
    NoEvaluatedAnswer(QuizPhase),
}

//
// ─── PHASES ───────────────────────────────────────────────────────────────────
//

/// Observable phase of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingQuestion,
    QuestionShown,
    AnswerEvaluated,
    GameComplete,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizPhase::AwaitingQuestion => "awaiting a question",
            QuizPhase::QuestionShown => "a question is shown",
            QuizPhase::AnswerEvaluated => "an answer is evaluated",
            QuizPhase::GameComplete => "the game is complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingQuestion,
    QuestionShown { correct_answer: bool },
    AnswerEvaluated,
    GameComplete,
}

impl Phase {
    fn public(self) -> QuizPhase {
        match self {
            Phase::AwaitingQuestion => QuizPhase::AwaitingQuestion,
            Phase::QuestionShown { .. } => QuizPhase::QuestionShown,
            Phase::AnswerEvaluated => QuizPhase::AnswerEvaluated,
            Phase::GameComplete => QuizPhase::GameComplete,
        }
    }
}

//
// ─── OUTPUTS ──────────────────────────────────────────────────────────────────
//

/// What the presentation layer needs to display one round.
#[derive(Clone, PartialEq, Eq)]
pub struct QuizStep {
    pub image: Vec<u8>,
    pub text: String,
    /// One-based progress label, e.g. `"3/10"`.
    pub counter: String,
}

impl fmt::Debug for QuizStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizStep")
            .field("image_len", &self.image.len())
            .field("text", &self.text)
            .field("counter", &self.counter)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
}

/// Final score of a finished session, before it is timestamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTally {
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// The index moved forward; the caller should request the next question.
    MoreQuestions,
    /// The last answer was evaluated; the caller should record the game.
    GameComplete(GameTally),
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// Round state of a single game.
///
/// Invariant: `correct <= current_index + 1 <= total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    total: u32,
    current_index: u32,
    correct: u32,
    phase: Phase,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: QUESTIONS_PER_GAME,
            current_index: 0,
            correct: 0,
            phase: Phase::AwaitingQuestion,
        }
    }

    /// Zero-based index of the current round.
    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase.public()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.total
    }

    #[must_use]
    pub fn counter_label(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.total)
    }

    /// Puts `question` on screen and returns the step to render.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAwaitingQuestion` unless the session is waiting
    /// for its next question.
    pub fn show_question(&mut self, question: Question) -> Result<QuizStep, QuizError> {
        if self.phase != Phase::AwaitingQuestion {
            return Err(QuizError::NotAwaitingQuestion(self.phase()));
        }
        let counter = self.counter_label();
        let (image, text, correct_answer) = question.into_parts();
        self.phase = Phase::QuestionShown { correct_answer };
        Ok(QuizStep {
            image,
            text,
            counter,
        })
    }

    /// Evaluates the player's yes/no choice for the shown question.
    ///
    /// Returns `None` and leaves the session untouched when no question is
    /// waiting for an answer.
    pub fn submit_answer(&mut self, choice: bool) -> Option<AnswerOutcome> {
        let Phase::QuestionShown { correct_answer } = self.phase else {
            return None;
        };
        let is_correct = choice == correct_answer;
        if is_correct {
            self.correct += 1;
        }
        self.phase = Phase::AnswerEvaluated;
        Some(AnswerOutcome { is_correct })
    }

    /// Moves past an evaluated answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoEvaluatedAnswer` unless an answer was just evaluated.
    pub fn advance(&mut self) -> Result<NextStep, QuizError> {
        if self.phase != Phase::AnswerEvaluated {
            return Err(QuizError::NoEvaluatedAnswer(self.phase()));
        }
        if self.is_last_question() {
            self.phase = Phase::GameComplete;
            return Ok(NextStep::GameComplete(GameTally {
                correct: self.correct,
                total: self.total,
            }));
        }
        self.current_index += 1;
        self.phase = Phase::AwaitingQuestion;
        Ok(NextStep::MoreQuestions)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: bool) -> Question {
        Question::new(vec![7], "Is this movie's rating greater than 7?", answer)
    }

    fn play_round(session: &mut QuizSession, answer: bool, choice: bool) -> NextStep {
        session.show_question(question(answer)).unwrap();
        session.submit_answer(choice).unwrap();
        session.advance().unwrap()
    }

    #[test]
    fn show_question_builds_step_with_counter() {
        let mut session = QuizSession::new();
        let step = session.show_question(question(true)).unwrap();
        assert_eq!(step.counter, "1/10");
        assert_eq!(step.image, vec![7]);
        assert_eq!(session.phase(), QuizPhase::QuestionShown);
    }

    #[test]
    fn correct_count_matches_answers() {
        let mut session = QuizSession::new();
        let answers = [true, false, true, true, false, false, true, false, true, true];
        let choices = [true, true, true, false, false, true, true, false, false, true];
        let expected = answers
            .iter()
            .zip(choices.iter())
            .filter(|(a, c)| a == c)
            .count() as u32;

        let mut last = NextStep::MoreQuestions;
        for (answer, choice) in answers.into_iter().zip(choices) {
            last = play_round(&mut session, answer, choice);
            assert!(session.correct_answers() <= session.current_index() + 1);
        }

        assert_eq!(
            last,
            NextStep::GameComplete(GameTally {
                correct: expected,
                total: 10
            })
        );
        assert_eq!(session.correct_answers(), expected);
        assert_eq!(session.phase(), QuizPhase::GameComplete);
    }

    #[test]
    fn nine_advances_then_complete() {
        let mut session = QuizSession::new();
        for round in 0..9 {
            assert_eq!(play_round(&mut session, true, true), NextStep::MoreQuestions);
            assert_eq!(session.current_index(), round + 1);
        }
        assert!(session.is_last_question());
        assert!(matches!(
            play_round(&mut session, true, true),
            NextStep::GameComplete(GameTally { correct: 10, total: 10 })
        ));
        assert_eq!(session.current_index(), 9);
        assert_eq!(
            session.advance(),
            Err(QuizError::NoEvaluatedAnswer(QuizPhase::GameComplete))
        );
    }

    #[test]
    fn answer_without_question_is_noop() {
        let mut session = QuizSession::new();
        session.reset();
        let before = session.clone();
        assert_eq!(session.submit_answer(true), None);
        assert_eq!(session, before);
    }

    #[test]
    fn second_answer_to_same_question_is_ignored() {
        let mut session = QuizSession::new();
        session.show_question(question(true)).unwrap();
        assert_eq!(
            session.submit_answer(true),
            Some(AnswerOutcome { is_correct: true })
        );
        assert_eq!(session.submit_answer(true), None);
        assert_eq!(session.correct_answers(), 1);
    }

    #[test]
    fn show_question_rejected_while_question_pending() {
        let mut session = QuizSession::new();
        session.show_question(question(true)).unwrap();
        let err = session.show_question(question(false)).unwrap_err();
        assert_eq!(err, QuizError::NotAwaitingQuestion(QuizPhase::QuestionShown));
    }

    #[test]
    fn advance_requires_evaluated_answer() {
        let mut session = QuizSession::new();
        assert_eq!(
            session.advance(),
            Err(QuizError::NoEvaluatedAnswer(QuizPhase::AwaitingQuestion))
        );
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut session = QuizSession::new();
        play_round(&mut session, true, true);
        play_round(&mut session, false, true);
        session.reset();
        assert_eq!(session, QuizSession::new());
        assert_eq!(session.counter_label(), "1/10");
    }
}
