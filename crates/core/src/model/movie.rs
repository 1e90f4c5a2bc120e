use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ids::MovieId;

/// Suffix that asks the poster CDN for a 600px wide rendition.
pub const RESIZED_POSTER_SUFFIX: &str = "._V0_UX600_.jpg";

/// Parses a catalog rating string. Malformed or empty values become `0.0`.
#[must_use]
pub fn parse_rating(raw: &str) -> f32 {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// One entry of the movie catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    id: MovieId,
    title: String,
    rating: f32,
    image_url: Url,
}

impl MovieRecord {
    #[must_use]
    pub fn new(id: MovieId, title: impl Into<String>, rating: f32, image_url: Url) -> Self {
        Self {
            id,
            title: title.into(),
            rating,
            image_url,
        }
    }

    /// Builds a record from the raw catalog rating string.
    ///
    /// A rating that does not parse is stored as `0.0` so that one bad record
    /// never fails a round.
    #[must_use]
    pub fn with_raw_rating(
        id: MovieId,
        title: impl Into<String>,
        raw_rating: &str,
        image_url: Url,
    ) -> Self {
        Self::new(id, title, parse_rating(raw_rating), image_url)
    }

    #[must_use]
    pub fn id(&self) -> &MovieId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn rating(&self) -> f32 {
        self.rating
    }

    #[must_use]
    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    /// Poster URL with the size modifiers replaced by the 600px variant.
    ///
    /// URLs without a `._` modifier segment are returned unchanged.
    #[must_use]
    pub fn resized_image_url(&self) -> Url {
        let raw = self.image_url.as_str();
        let Some((prefix, _)) = raw.split_once("._") else {
            return self.image_url.clone();
        };
        Url::parse(&format!("{prefix}{RESIZED_POSTER_SUFFIX}"))
            .unwrap_or_else(|_| self.image_url.clone())
    }
}
