//! Full movie details.

use serde::{Deserialize, Serialize};

use crate::result::MediaType;

/// The remote API's marker for an absent field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Turns the "N/A" sentinel and blank strings into `None`.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

/// A rating from one source, e.g. `Rotten Tomatoes: 94%`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Coarse band of an IMDb rating, used to tint it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    /// 8.0 and above.
    High,
    /// 6.0 up to 8.0.
    Medium,
    /// Below 6.0.
    Low,
    /// Missing or not a number.
    Unknown,
}

impl RatingTier {
    /// Classifies a rating string such as `"8.2"` or `"8.2/10"`.
    pub fn from_rating(rating: &str) -> Self {
        let number = rating.split('/').next().unwrap_or_default().trim();
        match number.parse::<f64>() {
            Ok(score) if score >= 8.0 => RatingTier::High,
            Ok(score) if score >= 6.0 => RatingTier::Medium,
            Ok(_) => RatingTier::Low,
            Err(_) => RatingTier::Unknown,
        }
    }
}

/// Everything known about one title.
///
/// Optional fields are `None` when the remote source sent "N/A".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub media_type: MediaType,
    pub poster: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub ratings: Vec<Rating>,
    pub metascore: Option<String>,
    pub imdb_rating: Option<String>,
    pub imdb_votes: Option<String>,
    pub dvd: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
}

impl MovieDetails {
    /// Genres as individual labels.
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .map(|genre| {
                genre
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tier of the IMDb rating.
    pub fn rating_tier(&self) -> RatingTier {
        self.imdb_rating
            .as_deref()
            .map(RatingTier::from_rating)
            .unwrap_or(RatingTier::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_filters_sentinel() {
        assert_eq!(present(Some("N/A".to_string())), None);
        assert_eq!(present(Some("  ".to_string())), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some("PG-13".to_string())), Some("PG-13".to_string()));
    }

    #[test]
    fn test_rating_tier_bands() {
        assert_eq!(RatingTier::from_rating("9.0"), RatingTier::High);
        assert_eq!(RatingTier::from_rating("8.0"), RatingTier::High);
        assert_eq!(RatingTier::from_rating("7.9"), RatingTier::Medium);
        assert_eq!(RatingTier::from_rating("6.0"), RatingTier::Medium);
        assert_eq!(RatingTier::from_rating("5.4"), RatingTier::Low);
        assert_eq!(RatingTier::from_rating("8.5/10"), RatingTier::High);
        assert_eq!(RatingTier::from_rating("N/A"), RatingTier::Unknown);
    }

    #[test]
    fn test_genres_split() {
        let details = MovieDetails {
            genre: Some("Action, Crime, Drama".to_string()),
            ..Default::default()
        };
        assert_eq!(details.genres(), vec!["Action", "Crime", "Drama"]);
    }

    #[test]
    fn test_genres_absent() {
        let details = MovieDetails::default();
        assert!(details.genres().is_empty());
    }

    #[test]
    fn test_rating_tier_without_rating() {
        let details = MovieDetails::default();
        assert_eq!(details.rating_tier(), RatingTier::Unknown);

        let details = MovieDetails {
            imdb_rating: Some("9.0".to_string()),
            ..Default::default()
        };
        assert_eq!(details.rating_tier(), RatingTier::High);
    }
}
