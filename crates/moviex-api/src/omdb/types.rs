//! OMDb API response types and envelope normalization.

use serde::Deserialize;

/// Sentinel the API uses for "field intentionally absent".
pub const NOT_AVAILABLE: &str = "N/A";

/// Message used when the API reports failure without an `Error` field.
pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// Flag value signalling success in the `Response` field.
const RESPONSE_TRUE: &str = "True";

/// Returns `Some(value)` unless it is empty or the `"N/A"` sentinel.
#[must_use]
pub fn available(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        None
    } else {
        Some(trimmed)
    }
}

/// Builds the IMDb title page URL for an identifier.
#[must_use]
pub fn imdb_title_url(imdb_id: &str) -> String {
    format!("https://www.imdb.com/title/{imdb_id}/")
}

/// Serde default for string fields the API may leave out.
fn not_available() -> String {
    String::from(NOT_AVAILABLE)
}

// --- Search ---

/// Raw response from a search (`s=`) request.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEnvelope {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default)]
    pub response: String,
    /// Result page (present on success).
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<Movie>>,
    /// Total number of matches, as a decimal string.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// Failure message (present on failure).
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// Normalized search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The API accepted the search.
    Found {
        /// Titles on the requested page.
        results: Vec<Movie>,
        /// Server-reported total across all pages.
        total_results: u32,
    },
    /// The API reported a failure (`Response: "False"`).
    Failed {
        /// API-provided message, or [`NO_RESULTS_MESSAGE`].
        message: String,
    },
}

impl SearchEnvelope {
    /// Normalizes the envelope.
    ///
    /// A missing `Search` array becomes an empty list and an unparseable
    /// `totalResults` becomes `0`.
    #[must_use]
    pub fn into_outcome(self) -> SearchOutcome {
        if self.response == RESPONSE_TRUE {
            let total_results = self
                .total_results
                .as_deref()
                .and_then(|t| t.trim().parse::<u32>().ok())
                .unwrap_or(0);
            SearchOutcome::Found {
                results: self.search.unwrap_or_default(),
                total_results,
            }
        } else {
            SearchOutcome::Failed {
                message: failure_message(self.error),
            }
        }
    }
}

/// A summary record returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Movie {
    /// IMDb identifier, e.g. `tt0372784`.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Year or year range (`"2005"`, `"2008–2012"`).
    #[serde(rename = "Year", default = "not_available")]
    pub year: String,
    /// Kind (`movie`, `series`, `episode`, sometimes `game`).
    #[serde(rename = "Type", default = "not_available")]
    pub media_type: String,
    /// Poster URL or `"N/A"`.
    #[serde(rename = "Poster", default = "not_available")]
    pub poster: String,
}

impl Movie {
    /// Returns the poster URL if one is available.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        available(&self.poster)
    }
}

// --- Details ---

/// Raw response from a detail (`i=`) request.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailEnvelope {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default)]
    pub response: String,
    /// Failure message (present on failure).
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    /// Detail record (present on success).
    #[serde(flatten)]
    pub details: Option<MovieDetails>,
}

/// Normalized detail result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// The record was found.
    Found(Box<MovieDetails>),
    /// The API reported a failure (`Response: "False"`).
    Failed {
        /// API-provided message, or [`NO_RESULTS_MESSAGE`].
        message: String,
    },
}

impl DetailEnvelope {
    /// Normalizes the envelope.
    #[must_use]
    pub fn into_outcome(self) -> DetailOutcome {
        match (self.response == RESPONSE_TRUE, self.details) {
            (true, Some(details)) => DetailOutcome::Found(Box::new(details)),
            _ => DetailOutcome::Failed {
                message: failure_message(self.error),
            },
        }
    }
}

/// External rating entry (`Internet Movie Database`, `Rotten Tomatoes`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rating {
    /// Rating source.
    #[serde(rename = "Source")]
    pub source: String,
    /// Rating value as displayed by the source (`"7.7/10"`, `"85%"`).
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record for a single title. Absent fields hold `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieDetails {
    /// IMDb identifier.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Year or year range.
    #[serde(rename = "Year", default = "not_available")]
    pub year: String,
    /// Kind (`movie`, `series`, `episode`).
    #[serde(rename = "Type", default = "not_available")]
    pub media_type: String,
    /// Poster URL.
    #[serde(rename = "Poster", default = "not_available")]
    pub poster: String,
    /// Certification (`PG-13`, ...).
    #[serde(rename = "Rated", default = "not_available")]
    pub rated: String,
    /// Release date (`15 Jun 2005`).
    #[serde(rename = "Released", default = "not_available")]
    pub released: String,
    /// Runtime (`140 min`).
    #[serde(rename = "Runtime", default = "not_available")]
    pub runtime: String,
    /// Comma-separated genres.
    #[serde(rename = "Genre", default = "not_available")]
    pub genre: String,
    /// Director(s).
    #[serde(rename = "Director", default = "not_available")]
    pub director: String,
    /// Writer(s).
    #[serde(rename = "Writer", default = "not_available")]
    pub writer: String,
    /// Main cast.
    #[serde(rename = "Actors", default = "not_available")]
    pub actors: String,
    /// Plot.
    #[serde(rename = "Plot", default = "not_available")]
    pub plot: String,
    /// Comma-separated languages.
    #[serde(rename = "Language", default = "not_available")]
    pub language: String,
    /// Comma-separated countries.
    #[serde(rename = "Country", default = "not_available")]
    pub country: String,
    /// Awards summary.
    #[serde(rename = "Awards", default = "not_available")]
    pub awards: String,
    /// Ratings from external sources.
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
    /// Metacritic score.
    #[serde(rename = "Metascore", default = "not_available")]
    pub metascore: String,
    /// IMDb rating (`"8.2"`).
    #[serde(rename = "imdbRating", default = "not_available")]
    pub imdb_rating: String,
    /// IMDb vote count (`"1,654,321"`).
    #[serde(rename = "imdbVotes", default = "not_available")]
    pub imdb_votes: String,
    /// Box office gross.
    #[serde(rename = "BoxOffice", default = "not_available")]
    pub box_office: String,
    /// Season count (series only).
    #[serde(rename = "totalSeasons", default = "not_available")]
    pub total_seasons: String,
}

impl MovieDetails {
    /// Returns the genres as a list.
    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        split_list(&self.genre)
    }

    /// Returns the first listed language.
    #[must_use]
    pub fn primary_language(&self) -> Option<&str> {
        split_list(&self.language).into_iter().next()
    }

    /// Returns the first listed country.
    #[must_use]
    pub fn primary_country(&self) -> Option<&str> {
        split_list(&self.country).into_iter().next()
    }

    /// Returns the IMDb rating as a number.
    #[must_use]
    pub fn imdb_rating_value(&self) -> Option<f32> {
        available(&self.imdb_rating).and_then(|r| r.parse::<f32>().ok())
    }

    /// Returns the poster URL if one is available.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        available(&self.poster)
    }
}

/// Splits a `", "`-separated field, yielding nothing for the sentinel.
fn split_list(value: &str) -> Vec<&str> {
    available(value).map_or_else(Vec::new, |v| {
        v.split(", ").map(str::trim).filter(|s| !s.is_empty()).collect()
    })
}

/// Picks the API message or the generic fallback.
fn failure_message(error: Option<String>) -> String {
    error
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| String::from(NO_RESULTS_MESSAGE))
}
