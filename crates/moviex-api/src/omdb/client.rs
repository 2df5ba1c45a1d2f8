//! `OmdbClient` - OMDb API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalOmdbApi;
use super::params::{DetailParams, SearchParams};
use super::types::{DetailEnvelope, DetailOutcome, SearchEnvelope, SearchOutcome};

/// Default base URL for the OMDb API.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key.
    ///
    /// Optional: without it the key is sent empty and the API answers
    /// every request with an error envelope.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a whole-request timeout (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let api_key = self.api_key.unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("OMDb API key is not set; requests will be rejected by the API");
        }

        let mut builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and query params, then decodes
    /// the JSON body.
    ///
    /// The HTTP status is not the success signal for this API: error
    /// envelopes come back with 401 or 200 alike, so the body is decoded
    /// first and the status only matters when decoding fails.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .build()
            .context("failed to build request")?;

        tracing::debug!(params = ?query, "OMDb API request");

        let result = self.http_client.execute(request).await;
        let response = result.context("request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        match raw_result {
            Ok(parsed) => Ok(parsed),
            Err(e) if !status.is_success() => {
                bail!("OMDb API error (HTTP {status}): {e}: {body}")
            }
            Err(e) => Err(e).context("failed to decode JSON response"),
        }
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> Result<SearchOutcome> {
        let envelope: SearchEnvelope = self.get_json(&params.to_query()).await?;
        Ok(envelope.into_outcome())
    }

    #[instrument(skip_all)]
    async fn details(&self, params: &DetailParams) -> Result<DetailOutcome> {
        let envelope: DetailEnvelope = self.get_json(&params.to_query()).await?;
        Ok(envelope.into_outcome())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::omdb::params::{MediaType, PlotLength, ReleaseYear, SearchFilters};

    fn client_for(server: &MockServer, api_key: &str) -> OmdbClient {
        let base_url = format!("{}/", server.uri());
        OmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key(api_key)
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = OmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_without_api_key_succeeds() {
        // Arrange & Act
        let result = OmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        let client = result.unwrap();
        assert!(client.api_key.is_empty());
    }

    #[test]
    fn test_builder_defaults_base_url() {
        // Arrange & Act
        let client = OmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/").unwrap();

        // Act
        let client = OmdbClient::builder()
            .base_url(custom_url.clone())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[tokio::test]
    async fn test_search_sends_type_and_omits_year() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_batman.json");

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("s", "batman"))
            .and(query_param("page", "1"))
            .and(query_param("type", "movie"))
            .and(query_param_is_missing("y"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");
        let filters = SearchFilters {
            media_type: Some(MediaType::Movie),
            year: None,
        };
        let params = SearchParams::new("batman").filters(filters);

        // Act
        let outcome = client.search(&params).await.unwrap();

        // Assert
        let SearchOutcome::Found {
            results,
            total_results,
        } = outcome
        else {
            panic!("expected Found, got {outcome:?}");
        };
        assert_eq!(total_results, 587);
        assert_eq!(results[0].title, "Batman Begins");
    }

    #[tokio::test]
    async fn test_search_without_filters_sends_no_filter_params() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_batman.json");

        Mock::given(method("GET"))
            .and(query_param("s", "batman"))
            .and(query_param("page", "2"))
            .and(query_param_is_missing("type"))
            .and(query_param_is_missing("y"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");
        let params = SearchParams::new("batman").page(2);

        // Act & Assert (mock expect(1) verifies the query string)
        client.search(&params).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_sends_year() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_batman.json");

        Mock::given(method("GET"))
            .and(query_param("y", "2005"))
            .and(query_param_is_missing("type"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");
        let filters = SearchFilters {
            media_type: None,
            year: Some(ReleaseYear::new(2005).unwrap()),
        };
        let params = SearchParams::new("batman").filters(filters);

        // Act & Assert
        client.search(&params).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_api_failure_is_ok_outcome() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_not_found.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");

        // Act
        let outcome = client
            .search(&SearchParams::new("zzzzzzzz"))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            outcome,
            SearchOutcome::Failed {
                message: String::from("Movie not found!"),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_api_key_is_api_failure() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/invalid_api_key.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "");

        // Act
        let outcome = client.search(&SearchParams::new("batman")).await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            SearchOutcome::Failed {
                message: String::from("Invalid API key!"),
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");

        // Act
        let result = client.search(&SearchParams::new("batman")).await;

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to decode JSON response")
        );
    }

    #[tokio::test]
    async fn test_server_error_with_non_json_body() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");

        // Act
        let result = client.search(&SearchParams::new("batman")).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("OMDb API error"));
        assert!(err.contains("503"));
    }

    #[tokio::test]
    async fn test_details_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/details_tt0372784.json");

        Mock::given(method("GET"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("i", "tt0372784"))
            .and(query_param("plot", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");

        // Act
        let outcome = client
            .details(&DetailParams::new("tt0372784"))
            .await
            .unwrap();

        // Assert
        let DetailOutcome::Found(details) = outcome else {
            panic!("expected Found, got {outcome:?}");
        };
        assert_eq!(details.title, "Batman Begins");
        assert_eq!(details.director, "Christopher Nolan");
    }

    #[tokio::test]
    async fn test_details_short_plot() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/details_tt0372784.json");

        Mock::given(method("GET"))
            .and(query_param("plot", "short"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");
        let params = DetailParams::new("tt0372784").plot(PlotLength::Short);

        // Act & Assert
        client.details(&params).await.unwrap();
    }

    #[tokio::test]
    async fn test_details_not_found() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/details_not_found.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-key");

        // Act
        let outcome = client.details(&DetailParams::new("tt0")).await.unwrap();

        // Assert
        assert!(matches!(outcome, DetailOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Arrange: bind a server, then drop it so the port refuses connections
        let mock_server = MockServer::start().await;
        let base_url = format!("{}/", mock_server.uri());
        drop(mock_server);

        let client = OmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let result = client.search(&SearchParams::new("batman")).await;

        // Assert
        assert!(result.is_err());
    }
}
