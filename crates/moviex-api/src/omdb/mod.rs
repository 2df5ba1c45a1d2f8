//! OMDb API client module.
//!
//! Handles title search and single-title lookups against the OMDb
//! endpoint and normalizes its `Response: "True" | "False"` envelope.

mod api;
mod client;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, OmdbClient, OmdbClientBuilder};
pub use params::{DetailParams, MediaType, PlotLength, ReleaseYear, SearchFilters, SearchParams};
pub use types::{
    DetailEnvelope, DetailOutcome, Movie, MovieDetails, NO_RESULTS_MESSAGE, NOT_AVAILABLE, Rating,
    SearchEnvelope, SearchOutcome, available, imdb_title_url,
};
