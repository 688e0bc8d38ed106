//! PokeAPI HTTP client
//!
//! Every request goes through the shared [`TimedCache`]: a hit is served from
//! memory without touching the network, and only bodies of successful
//! responses are stored.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{LocationArea, LocationPage, Pokemon};
use crate::cache::TimedCache;

/// Base URL for the public PokeAPI
pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Number of location areas per `map` page
const PAGE_SIZE: u32 = 20;

/// Errors that can occur when talking to PokeAPI
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("pokeapi: status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for PokeAPI backed by an injected response cache
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: Client,
    cache: Arc<TimedCache>,
    /// Base URL without a trailing slash (overridable for testing)
    base_url: String,
}

impl PokeApiClient {
    /// Creates a client for the public PokeAPI with the default timeout
    pub fn new(cache: Arc<TimedCache>) -> Result<Self, ApiError> {
        Self::with_base_url(cache, POKEAPI_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Creates a client for a custom base URL and request timeout
    ///
    /// # Arguments
    /// * `cache` - Cache shared with any other clients
    /// * `base_url` - API root, e.g. `https://pokeapi.co/api/v2`
    /// * `timeout` - Per-request timeout
    ///
    /// # Returns
    /// * `Err(ApiError::RequestFailed)` if the HTTP client cannot be built
    pub fn with_base_url(
        cache: Arc<TimedCache>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, cache, base_url))
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(http: Client, cache: Arc<TimedCache>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            cache,
            base_url,
        }
    }

    /// The cache this client reads through
    pub fn cache(&self) -> &Arc<TimedCache> {
        &self.cache
    }

    /// URL of the first page of location areas
    pub fn first_page_url(&self) -> String {
        format!(
            "{}/location-area?offset=0&limit={}",
            self.base_url, PAGE_SIZE
        )
    }

    /// URL of a single location area
    pub fn location_area_url(&self, name: &str) -> String {
        format!("{}/location-area/{}/", self.base_url, name)
    }

    /// URL of a single Pokémon
    pub fn pokemon_url(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }

    /// Returns the raw body for `url`, from the cache when possible
    ///
    /// On a miss the body is fetched and cached, but only if the response
    /// status indicates success.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        if let Some(body) = self.cache.get(url) {
            debug!(bytes = body.len(), "Cache hit");
            return Ok(body);
        }

        debug!("Cache miss, requesting");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "PokeAPI request failed");
            return Err(ApiError::Status(status));
        }

        let body = response.bytes().await?.to_vec();
        self.cache.add(url, body.clone());
        Ok(body)
    }

    /// Fetches a page of location areas
    ///
    /// # Arguments
    /// * `page_url` - A `next`/`previous` link from an earlier page, or `None`
    ///   for the first page
    pub async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationPage, ApiError> {
        let url = match page_url {
            Some(url) => url.to_string(),
            None => self.first_page_url(),
        };
        let body = self.fetch(&url).await?;
        Ok(LocationPage::from_json(&body)?)
    }

    /// Fetches a location area and its Pokémon encounters
    pub async fn location_area(&self, name: &str) -> Result<LocationArea, ApiError> {
        let body = self.fetch(&self.location_area_url(name)).await?;
        Ok(LocationArea::from_json(&body)?)
    }

    /// Fetches a Pokémon by name
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let body = self.fetch(&self.pokemon_url(name)).await?;
        Ok(Pokemon::from_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client(base_url: &str) -> PokeApiClient {
        let cache = Arc::new(TimedCache::new(Duration::from_secs(5)));
        PokeApiClient::with_client(Client::new(), cache, base_url)
    }

    #[tokio::test]
    async fn test_urls_from_base() {
        let client = create_test_client("https://pokeapi.co/api/v2/");

        assert_eq!(
            client.first_page_url(),
            "https://pokeapi.co/api/v2/location-area?offset=0&limit=20"
        );
        assert_eq!(
            client.location_area_url("canalave-city-area"),
            "https://pokeapi.co/api/v2/location-area/canalave-city-area/"
        );
        assert_eq!(
            client.pokemon_url("pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
    }

    #[tokio::test]
    async fn test_fetch_serves_cached_body_without_network() {
        // Nothing listens here; a network call would fail
        let client = create_test_client("http://127.0.0.1:9");
        let url = client.pokemon_url("pikachu");
        client.cache().add(url.as_str(), br#"{"name":"pikachu","base_experience":112,"height":4,"weight":60}"#.as_slice());

        let pokemon = client.pokemon("pikachu").await.expect("served from cache");
        assert_eq!(pokemon.name, "pikachu");
        assert_eq!(pokemon.base_experience, 112);
    }

    #[tokio::test]
    async fn test_parse_error_from_cached_garbage() {
        let client = create_test_client("http://127.0.0.1:9");
        client.cache().add(client.location_area_url("x"), "not json");

        let result = client.location_area("x").await;
        assert!(matches!(result, Err(ApiError::ParseError(_))));
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "pokeapi: status 404 Not Found");
    }
}
