use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Comparison, MovieRecord, Question, THRESHOLD_RANGE};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::QuestionError;
use crate::provider::MovieProvider;

/// Draws random rating questions from a loaded movie pool.
pub struct QuestionSource {
    provider: Arc<dyn MovieProvider>,
    movies: Vec<MovieRecord>,
    rng: StdRng,
}

impl QuestionSource {
    #[must_use]
    pub fn new(provider: Arc<dyn MovieProvider>) -> Self {
        Self {
            provider,
            movies: Vec::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replace the random generator, e.g. with a seeded one in tests.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.movies.is_empty()
    }

    /// Fetch the catalog and replace the pool with it.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::Catalog` if the provider fails and
    /// `QuestionError::EmptyCatalog` if it returns no movies. The previous pool
    /// is kept on failure.
    pub async fn load_pool(&mut self) -> Result<(), QuestionError> {
        let movies = self.provider.fetch_catalog().await.map_err(|err| {
            log::warn!("catalog load failed: {err}");
            QuestionError::Catalog(err)
        })?;
        if movies.is_empty() {
            log::warn!("catalog load returned no movies");
            return Err(QuestionError::EmptyCatalog);
        }
        log::info!("loaded {} movies", movies.len());
        self.movies = movies;
        Ok(())
    }

    /// Build a question about a randomly picked movie.
    ///
    /// Movies may repeat within a game.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPool` before a successful `load_pool` and
    /// `QuestionError::Image` if the poster cannot be fetched.
    pub async fn next_question(&mut self) -> Result<Question, QuestionError> {
        let movie = self
            .movies
            .choose(&mut self.rng)
            .cloned()
            .ok_or(QuestionError::EmptyPool)?;

        let image = self
            .provider
            .fetch_image(&movie.resized_image_url())
            .await
            .map_err(|err| {
                log::warn!("poster for {} failed: {err}", movie.id());
                QuestionError::Image(err)
            })?;

        let threshold = self.rng.random_range(THRESHOLD_RANGE);
        let comparison = if self.rng.random_bool(0.5) {
            Comparison::Greater
        } else {
            Comparison::Less
        };
        log::debug!(
            "question for {}: rating {} {} {threshold}",
            movie.id(),
            movie.rating(),
            comparison.symbol()
        );

        Ok(Question::compose(&movie, image, threshold, comparison))
    }
}

impl fmt::Debug for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionSource")
            .field("movies_len", &self.movies.len())
            .finish_non_exhaustive()
    }
}
