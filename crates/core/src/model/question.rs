use std::fmt;
use std::ops::RangeInclusive;

use crate::model::movie::MovieRecord;

/// Thresholds a question may compare the rating against.
pub const THRESHOLD_RANGE: RangeInclusive<u8> = 5..=9;

//
// ─── COMPARISON ───────────────────────────────────────────────────────────────
//

/// Direction of the rating comparison asked in a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// "Is the rating greater than N?"
    Greater,
    /// "Is the rating less than N?"
    Less,
}

impl Comparison {
    /// Evaluates the comparison for a rating. Equality is never a match.
    #[must_use]
    pub fn holds(self, rating: f32, threshold: u8) -> bool {
        let threshold = f32::from(threshold);
        match self {
            Comparison::Greater => rating > threshold,
            Comparison::Less => rating < threshold,
        }
    }

    #[must_use]
    pub fn word(self) -> &'static str {
        match self {
            Comparison::Greater => "greater",
            Comparison::Less => "less",
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single yes/no question with its poster and known answer.
#[derive(Clone, PartialEq, Eq)]
pub struct Question {
    image: Vec<u8>,
    text: String,
    correct_answer: bool,
}

impl Question {
    #[must_use]
    pub fn new(image: Vec<u8>, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    /// Builds the rating question for `movie`.
    ///
    /// The answer is "yes" exactly when the movie's rating satisfies
    /// `comparison` against `threshold`.
    #[must_use]
    pub fn compose(
        movie: &MovieRecord,
        image: Vec<u8>,
        threshold: u8,
        comparison: Comparison,
    ) -> Self {
        let text = format!(
            "Is this movie's rating {} than {threshold}?",
            comparison.word()
        );
        Self::new(image, text, comparison.holds(movie.rating(), threshold))
    }

    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    /// Splits the question into its poster bytes, prompt and answer.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, String, bool) {
        (self.image, self.text, self.correct_answer)
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("image_len", &self.image.len())
            .field("text", &self.text)
            .field("correct_answer", &self.correct_answer)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieId;
    use url::Url;

    fn movie(rating: f32) -> MovieRecord {
        MovieRecord::new(
            MovieId::new("tt0468569"),
            "The Dark Knight",
            rating,
            Url::parse("https://img.example/poster.jpg").unwrap(),
        )
    }

    #[test]
    fn greater_than_threshold_is_yes() {
        let q = Question::compose(&movie(9.2), vec![1, 2, 3], 6, Comparison::Greater);
        assert!(q.correct_answer());
        assert_eq!(q.text(), "Is this movie's rating greater than 6?");
        assert_eq!(q.image(), &[1, 2, 3]);
    }

    #[test]
    fn less_than_threshold_is_no_for_high_rating() {
        let q = Question::compose(&movie(9.2), Vec::new(), 6, Comparison::Less);
        assert!(!q.correct_answer());
        assert_eq!(q.text(), "Is this movie's rating less than 6?");
    }

    #[test]
    fn equal_rating_is_never_a_match() {
        assert!(!Comparison::Greater.holds(7.0, 7));
        assert!(!Comparison::Less.holds(7.0, 7));
    }

    #[test]
    fn zero_rating_fallback_still_produces_question() {
        let q = Question::compose(&movie(0.0), Vec::new(), 5, Comparison::Less);
        assert!(q.correct_answer());
    }

    #[test]
    fn debug_hides_image_bytes() {
        let q = Question::new(vec![0; 1024], "Q", true);
        let printed = format!("{q:?}");
        assert!(printed.contains("image_len: 1024"));
    }
}
