use std::env;

use async_trait::async_trait;
use quiz_core::model::{MovieId, MovieRecord};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::MovieProvider;
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://tv-api.com/en/API";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    /// Reads `MOVIE_QUIZ_API_KEY` and the optional `MOVIE_QUIZ_API_URL`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("MOVIE_QUIZ_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("MOVIE_QUIZ_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Some(Self { base_url, api_key })
    }

    #[must_use]
    pub fn catalog_url(&self) -> String {
        format!(
            "{}/MostPopularMovies/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

/// HTTP provider for the "most popular movies" catalog.
#[derive(Clone)]
pub struct ImdbMovieProvider {
    client: Client,
    config: Option<ProviderConfig>,
}

impl ImdbMovieProvider {
    #[must_use]
    pub fn new(config: Option<ProviderConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MovieProvider for ImdbMovieProvider {
    async fn fetch_catalog(&self) -> Result<Vec<MovieRecord>, ProviderError> {
        let config = self.config.as_ref().ok_or(ProviderError::Disabled)?;

        let response = self.client.get(config.catalog_url()).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        decode_catalog(&body)
    }

    async fn fetch_image(&self, url: &Url) -> Result<Vec<u8>, ProviderError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Decodes a catalog payload.
///
/// A non-empty `errorMessage` is a failure even on HTTP success. Items with an
/// unusable image URL are skipped; unparsable ratings become `0.0`.
///
/// # Errors
///
/// Returns `ProviderError::Decode` for malformed JSON and
/// `ProviderError::Reported` when the provider returned an error message.
pub fn decode_catalog(body: &str) -> Result<Vec<MovieRecord>, ProviderError> {
    let payload: MostPopularMovies = serde_json::from_str(body)?;
    if !payload.error_message.trim().is_empty() {
        return Err(ProviderError::Reported(payload.error_message));
    }

    let mut movies = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        let Ok(image_url) = Url::parse(&item.image) else {
            log::warn!("skipping {}: invalid image url {:?}", item.id, item.image);
            continue;
        };
        movies.push(MovieRecord::with_raw_rating(
            MovieId::new(item.id),
            item.full_title,
            &item.rating,
            image_url,
        ));
    }
    Ok(movies)
}

#[derive(Debug, Deserialize)]
struct MostPopularMovies {
    #[serde(rename = "errorMessage", default)]
    error_message: String,
    #[serde(default)]
    items: Vec<MostPopularMovie>,
}

#[derive(Debug, Deserialize)]
struct MostPopularMovie {
    id: String,
    #[serde(rename = "fullTitle")]
    full_title: String,
    #[serde(rename = "imDbRating", default)]
    rating: String,
    image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_items_and_defaults_bad_ratings() {
        let body = r#"{
            "items": [
                {"id": "tt1", "fullTitle": "One (2022)", "imDbRating": "8.1", "image": "https://img.example/1._V1_.jpg"},
                {"id": "tt2", "fullTitle": "Two (2023)", "imDbRating": "", "image": "https://img.example/2.jpg"},
                {"id": "tt3", "fullTitle": "Three (2021)", "imDbRating": "7.0", "image": "not a url"}
            ],
            "errorMessage": ""
        }"#;

        let movies = decode_catalog(body).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title(), "One (2022)");
        assert_eq!(movies[0].rating(), 8.1);
        assert_eq!(movies[1].rating(), 0.0);
    }

    #[test]
    fn reported_error_message_is_a_failure() {
        let body = r#"{"items": [], "errorMessage": "Invalid API Key"}"#;
        let err = decode_catalog(body).unwrap_err();
        assert!(matches!(err, ProviderError::Reported(msg) if msg == "Invalid API Key"));
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let err = decode_catalog("<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[test]
    fn catalog_url_trims_trailing_slash() {
        let config = ProviderConfig {
            base_url: "https://api.example/en/API/".into(),
            api_key: "k_123".into(),
        };
        assert_eq!(
            config.catalog_url(),
            "https://api.example/en/API/MostPopularMovies/k_123"
        );
    }

    #[tokio::test]
    async fn disabled_provider_refuses_catalog() {
        let provider = ImdbMovieProvider::new(None);
        let err = provider.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, ProviderError::Disabled));
    }
}
