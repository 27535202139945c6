//! HTTP-backed map provider.
//!
//! Mirrors the usual split between a thin [`AsyncHttpClient`] abstraction
//! (so tests can stub the wire) and the provider that knows the map API's
//! URL scheme and payload format.

use std::time::Duration;

use tracing::debug;

use crate::map::RawMap;

use super::{MapProvider, ProviderError, ProviderFuture};

/// Default base URL of the circuit map API.
pub const DEFAULT_BASE_URL: &str = "https://api.multiviewer.app/api/v1/circuits";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for HTTP GET operations.
///
/// Allows dependency injection of the transport so provider logic is
/// testable without a network.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    ///
    /// A 404 maps to [`ProviderError::NotFound`] (with a placeholder key the
    /// provider re-keys); any other non-success status is
    /// [`ProviderError::Http`].
    fn get(&self, url: &str) -> ProviderFuture<'_, Result<Vec<u8>, ProviderError>>;
}

/// Real HTTP client backed by reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get(&self, url: &str) -> ProviderFuture<'_, Result<Vec<u8>, ProviderError>> {
        let request = self.client.get(url).send();
        let url = url.to_string();
        Box::pin(async move {
            let response = request
                .await
                .map_err(|e| ProviderError::Http(format!("Request failed: {e}")))?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ProviderError::NotFound { circuit_key: 0 });
            }
            if !status.is_success() {
                return Err(ProviderError::Http(format!("HTTP {status} from {url}")));
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| ProviderError::Http(format!("Failed to read response: {e}")))
        })
    }
}

/// Fetches circuit maps from the map API over HTTP.
///
/// The API is keyed by circuit and season year:
/// `{base}/{circuit_key}/{year}`.
pub struct HttpMapProvider<C: AsyncHttpClient> {
    client: C,
    base_url: String,
    year: i32,
}

impl<C: AsyncHttpClient> HttpMapProvider<C> {
    /// Creates a provider against the default map API for the given season.
    pub fn new(client: C, year: i32) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, year)
    }

    /// Creates a provider against a custom base URL.
    pub fn with_base_url(client: C, base_url: impl Into<String>, year: i32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            year,
        }
    }

    fn map_url(&self, circuit_key: u32) -> String {
        format!("{}/{}/{}", self.base_url, circuit_key, self.year)
    }
}

impl<C: AsyncHttpClient> MapProvider for HttpMapProvider<C> {
    fn fetch_map(&self, circuit_key: u32) -> ProviderFuture<'_, Result<RawMap, ProviderError>> {
        Box::pin(async move {
            let url = self.map_url(circuit_key);
            debug!(circuit_key, %url, "Fetching circuit map");

            let body = self.client.get(&url).await.map_err(|e| match e {
                // Re-key the transport-level 404 with the circuit we asked for.
                ProviderError::NotFound { .. } => ProviderError::NotFound { circuit_key },
                other => other,
            })?;

            let map: RawMap = serde_json::from_slice(&body)
                .map_err(|e| ProviderError::Decode(e.to_string()))?;

            debug!(
                circuit_key,
                points = map.x.len(),
                marshal_sectors = map.marshal_sectors.len(),
                "Circuit map fetched"
            );
            Ok(map)
        })
    }
}
