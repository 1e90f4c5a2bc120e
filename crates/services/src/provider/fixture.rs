use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::model::{MovieId, MovieRecord};
use url::Url;

use super::MovieProvider;
use crate::error::ProviderError;

/// Offline provider serving a fixed catalog.
///
/// Posters are the bytes of their URL so every movie yields a distinct image.
/// Failures can be switched on to exercise error paths.
#[derive(Clone, Default)]
pub struct StaticMovieProvider {
    movies: Vec<MovieRecord>,
    fail_catalog: Arc<AtomicBool>,
    fail_images: Arc<AtomicBool>,
    catalog_calls: Arc<AtomicUsize>,
    image_calls: Arc<AtomicUsize>,
}

impl StaticMovieProvider {
    #[must_use]
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            movies,
            ..Self::default()
        }
    }

    /// A small built-in catalog for playing without network access.
    #[must_use]
    pub fn demo() -> Self {
        let entries = [
            ("tt0111161", "The Shawshank Redemption (1994)", "9.3"),
            ("tt0068646", "The Godfather (1972)", "9.2"),
            ("tt0468569", "The Dark Knight (2008)", "9.0"),
            ("tt0110912", "Pulp Fiction (1994)", "8.9"),
            ("tt0133093", "The Matrix (1999)", "8.7"),
            ("tt1375666", "Inception (2010)", "8.8"),
            ("tt0120737", "The Lord of the Rings (2001)", "8.9"),
            ("tt0816692", "Interstellar (2014)", "8.7"),
            ("tt0114369", "Se7en (1995)", "8.6"),
            ("tt1219827", "Ghost in the Shell (2017)", "6.3"),
            ("tt2404435", "The Magnificent Seven (2016)", "6.9"),
            ("tt0383574", "Catwoman (2004)", "3.4"),
        ];
        let movies = entries
            .into_iter()
            .filter_map(|(id, title, rating)| {
                let url = Url::parse(&format!("https://posters.invalid/{id}._V1_.jpg")).ok()?;
                Some(MovieRecord::with_raw_rating(
                    MovieId::new(id),
                    title,
                    rating,
                    url,
                ))
            })
            .collect();
        Self::new(movies)
    }

    pub fn set_fail_catalog(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_images(&self, fail: bool) {
        self.fail_images.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieProvider for StaticMovieProvider {
    async fn fetch_catalog(&self) -> Result<Vec<MovieRecord>, ProviderError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("catalog offline".into()));
        }
        Ok(self.movies.clone())
    }

    async fn fetch_image(&self, url: &Url) -> Result<Vec<u8>, ProviderError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_images.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(format!("no image at {url}")));
        }
        Ok(url.as_str().as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_catalog_is_populated() {
        let provider = StaticMovieProvider::demo();
        let movies = provider.fetch_catalog().await.unwrap();
        assert_eq!(movies.len(), 12);
        assert_eq!(provider.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn failures_can_be_toggled() {
        let provider = StaticMovieProvider::demo();
        provider.set_fail_catalog(true);
        assert!(provider.fetch_catalog().await.is_err());
        provider.set_fail_catalog(false);
        assert!(provider.fetch_catalog().await.is_ok());

        let url = Url::parse("https://posters.invalid/x.jpg").unwrap();
        provider.set_fail_images(true);
        assert!(provider.fetch_image(&url).await.is_err());
        assert_eq!(provider.image_calls(), 1);
    }

    #[tokio::test]
    async fn posters_are_distinct_per_url() {
        let provider = StaticMovieProvider::new(Vec::new());
        let a = Url::parse("https://posters.invalid/a.jpg").unwrap();
        let b = Url::parse("https://posters.invalid/b.jpg").unwrap();
        let poster_a = provider.fetch_image(&a).await.unwrap();
        assert_eq!(poster_a, a.as_str().as_bytes().to_vec());
        assert_ne!(poster_a, provider.fetch_image(&b).await.unwrap());
    }
}
