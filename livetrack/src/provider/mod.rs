//! Map provider abstraction.
//!
//! The core never fetches circuit definitions itself; it asks a
//! [`MapProvider`]. The trait is dyn-compatible (boxed futures) so services
//! can hold `Arc<dyn MapProvider>` and tests can inject mocks.
//!
//! A fetch failure is recoverable by design: callers keep their last-known
//! geometry and may retry on their own schedule.

mod http;

pub use http::{AsyncHttpClient, HttpMapProvider, ReqwestClient};

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::map::RawMap;

/// Boxed future returned by dyn-compatible provider methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of circuit map definitions.
pub trait MapProvider: Send + Sync {
    /// Fetches the raw map for a circuit.
    fn fetch_map(&self, circuit_key: u32) -> ProviderFuture<'_, Result<RawMap, ProviderError>>;
}

/// Errors raised while fetching a circuit map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No map exists for this circuit.
    #[error("No map available for circuit {circuit_key}")]
    NotFound { circuit_key: u32 },

    /// Transport-level failure (connection, timeout, non-2xx status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body was not a valid map document.
    #[error("Failed to decode map: {0}")]
    Decode(String),
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Canned-response provider for service-level tests.
    pub struct MockMapProvider {
        pub response: Result<RawMap, ProviderError>,
        /// Artificial resolution delay, for racing stale loads in tests.
        pub delay: Option<std::time::Duration>,
    }

    impl MockMapProvider {
        pub fn ok(map: RawMap) -> Self {
            Self {
                response: Ok(map),
                delay: None,
            }
        }

        pub fn failing(error: ProviderError) -> Self {
            Self {
                response: Err(error),
                delay: None,
            }
        }
    }

    impl MapProvider for MockMapProvider {
        fn fetch_map(
            &self,
            _circuit_key: u32,
        ) -> ProviderFuture<'_, Result<RawMap, ProviderError>> {
            let response = self.response.clone();
            let delay = self.delay;
            Box::pin(async move {
                if let Some(d) = delay {
                    tokio::time::sleep(d).await;
                }
                response
            })
        }
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::NotFound { circuit_key: 22 };
        assert!(err.to_string().contains("circuit 22"));
    }

    #[tokio::test]
    async fn test_mock_provider_propagates_failure() {
        let provider = MockMapProvider::failing(ProviderError::Http("boom".to_string()));
        let err = provider.fetch_map(1).await.unwrap_err();
        assert_eq!(err, ProviderError::Http("boom".to_string()));
    }
}
