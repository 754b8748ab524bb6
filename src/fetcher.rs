//! Page fetcher abstraction for the static strategy.

use async_trait::async_trait;

use crate::Result;

/// Retrieves the raw markup of a URL without executing page scripts.
///
/// Implementations must fail with [`ScrapeError::Fetch`](crate::ScrapeError::Fetch)
/// for network errors and non-2xx responses so the coordinator can tell a
/// recoverable miss from a fatal one.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the markup of `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ScrapeError;

    struct CannedFetcher(Option<&'static str>);

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| ScrapeError::fetch(url, "HTTP 503 Service Unavailable"))
        }
    }

    #[tokio::test]
    async fn test_fetcher_is_object_safe() {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(CannedFetcher(Some("<html></html>")));
        assert_eq!(fetcher.fetch("https://a.test").await.unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recoverable() {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(CannedFetcher(None));
        let err = fetcher.fetch("https://a.test").await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("https://a.test"));
    }
}
