//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::params::{DetailParams, SearchParams};
use super::types::{DetailOutcome, SearchOutcome};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// An `Err` always means the request never produced a usable body
/// (network failure, malformed JSON). API-reported failures come back
/// as `Ok` outcomes.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles by term, page and filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, params: &SearchParams) -> Result<SearchOutcome>;

    /// Fetches the full record for a single title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn details(&self, params: &DetailParams) -> Result<DetailOutcome>;
}
