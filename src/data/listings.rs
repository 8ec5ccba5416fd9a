//! Listing API client
//!
//! Fetches businesses within a bounding box from the tourism listing API.
//! Responses are kept in a [`ResponseCache`] keyed by the full request URL;
//! when the API cannot be reached the last cached response for that URL is
//! returned instead, flagged as stale.

use super::{BoundingBox, Business};
use crate::cache::ResponseCache;
use crate::config::ApiSettings;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Header carrying the API key
const API_KEY_HEADER: &str = "X-API-Key";

/// Endpoint returning businesses within a bounding box
const BUSINESSES_ENDPOINT: &str = "/businesses";

/// Errors that can occur when talking to the listing API
#[derive(Debug, Error)]
pub enum ListingError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timeout for {0}")]
    Timeout(String),

    /// The API answered with a non-success status
    #[error("API error: {status} {reason}")]
    Status { status: u16, reason: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The configured base URL or endpoint does not form a valid URL
    #[error("Invalid request URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Per-request caching options
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    /// Read from and write to the response cache
    pub use_cache: bool,
    /// Skip fresh cache hits but still store the response and fall back to
    /// the cache on failure
    pub refresh: bool,
    /// Overrides the client's default time-to-live
    pub cache_ttl: Option<chrono::Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            refresh: false,
            cache_ttl: None,
        }
    }
}

impl RequestOptions {
    /// Options for an explicit user-requested refresh
    pub fn refresh() -> Self {
        Self {
            refresh: true,
            ..Self::default()
        }
    }
}

/// A response together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// The response payload
    pub data: T,
    /// True when the network failed and this is an expired cached copy
    pub stale: bool,
}

/// Envelope of the `/businesses` endpoint
#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    data: Vec<Business>,
}

/// Serializes a bounding box as a JSON string query value
///
/// Keys keep the struct's field order (north, south, east, west).
fn bounds_param(bounds: &BoundingBox) -> Result<Value, ListingError> {
    Ok(Value::String(serde_json::to_string(bounds)?))
}

/// Client for the business listing API
#[derive(Debug, Clone)]
pub struct ListingClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL including the API version path
    base_url: String,
    api_key: String,
    /// Cache of raw JSON responses, shared between clones
    cache: Arc<ResponseCache<Value>>,
    /// Default time-to-live for cached responses
    cache_ttl: chrono::Duration,
}

impl ListingClient {
    /// Creates a client from API settings with a fresh cache
    pub fn new(settings: &ApiSettings) -> Result<Self, ListingError> {
        Self::with_cache(settings, Arc::new(ResponseCache::new()))
    }

    /// Creates a client that uses the given cache
    pub fn with_cache(
        settings: &ApiSettings,
        cache: Arc<ResponseCache<Value>>,
    ) -> Result<Self, ListingError> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            cache,
            cache_ttl: chrono::Duration::seconds(settings.cache_ttl_secs as i64),
        })
    }

    /// The response cache backing this client
    pub fn cache(&self) -> &ResponseCache<Value> {
        &self.cache
    }

    /// Builds the request URL for an endpoint and query parameters
    ///
    /// The endpoint gets a leading slash if it lacks one. String parameters
    /// are appended as-is; objects and arrays are serialized as JSON.
    pub fn build_url(&self, endpoint: &str, params: &[(&str, Value)]) -> Result<Url, ListingError> {
        let endpoint = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{}", endpoint)
        };

        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                match value {
                    Value::String(s) => query.append_pair(key, s),
                    other => query.append_pair(key, &other.to_string()),
                };
            }
        }
        Ok(url)
    }

    /// Fetches businesses inside a bounding box
    ///
    /// # Returns
    /// * `Ok(Fetched)` - Fresh data, or stale cached data if the API failed
    /// * `Err(ListingError)` - If the request fails and nothing was cached for this area
    pub async fn fetch_businesses(
        &self,
        bounds: &BoundingBox,
        options: RequestOptions,
    ) -> Result<Fetched<Vec<Business>>, ListingError> {
        let bounds = bounds_param(bounds)?;
        let fetched: Fetched<ListingResponse> = self
            .get(BUSINESSES_ENDPOINT, &[("bounds", bounds)], options)
            .await?;

        tracing::info!(
            count = fetched.data.data.len(),
            stale = fetched.stale,
            "loaded businesses"
        );

        Ok(Fetched {
            data: fetched.data.data,
            stale: fetched.stale,
        })
    }

    /// Performs a cached GET request and deserializes the JSON body
    ///
    /// # Behavior
    /// - Returns a fresh cached response unless caching is disabled or this is a refresh
    /// - Otherwise requests the URL and caches the raw JSON on success
    /// - On any failure, returns the cached response even if expired
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, Value)],
        options: RequestOptions,
    ) -> Result<Fetched<T>, ListingError> {
        let url = self.build_url(endpoint, params)?;
        let key = url.to_string();

        if options.use_cache && !options.refresh {
            if let Some(cached) = self.cache.get(&key) {
                if let Ok(data) = serde_json::from_value(cached) {
                    return Ok(Fetched { data, stale: false });
                }
            }
        }

        match self.fetch_json::<T>(url, endpoint).await {
            Ok((raw, data)) => {
                if options.use_cache {
                    let ttl = options.cache_ttl.unwrap_or(self.cache_ttl);
                    self.cache.put(key, raw, ttl);
                }
                Ok(Fetched { data, stale: false })
            }
            Err(error) => {
                if options.use_cache {
                    if let Some(cached) = self.cache.get_ignoring_expiry(&key) {
                        if let Ok(data) = serde_json::from_value(cached) {
                            tracing::warn!(%error, url = %key, "using cached data due to connection issues");
                            return Ok(Fetched { data, stale: true });
                        }
                    }
                }
                tracing::error!(%error, url = %key, "listing request failed");
                Err(error)
            }
        }
    }

    /// Requests a URL and returns both the raw JSON and its typed form
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
    ) -> Result<(Value, T), ListingError> {
        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify(e, endpoint))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = response.text().await.map_err(|e| classify(e, endpoint))?;
        let raw: Value = serde_json::from_str(&text)?;
        let data = T::deserialize(&raw)?;
        Ok((raw, data))
    }
}

/// Maps reqwest timeouts to a dedicated error naming the endpoint
fn classify(error: reqwest::Error, endpoint: &str) -> ListingError {
    if error.is_timeout() {
        ListingError::Timeout(endpoint.to_string())
    } else {
        ListingError::HttpError(error)
    }
}
