//! External source of movie records and poster images.

use async_trait::async_trait;
use quiz_core::model::MovieRecord;
use url::Url;

use crate::error::ProviderError;

mod fixture;
mod imdb;

pub use fixture::StaticMovieProvider;
pub use imdb::{ImdbMovieProvider, ProviderConfig, decode_catalog};

/// Catalog and image transport used by the question source.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Fetch the full movie catalog.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failures or provider-reported errors.
    async fn fetch_catalog(&self) -> Result<Vec<MovieRecord>, ProviderError>;

    /// Fetch poster bytes for `url`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the image cannot be downloaded.
    async fn fetch_image(&self, url: &Url) -> Result<Vec<u8>, ProviderError>;
}
