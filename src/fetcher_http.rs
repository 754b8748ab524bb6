//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::fetcher::PageFetcher;
use crate::{Result, ScrapeConfig, ScrapeError};

/// Fetches server-rendered markup with a single GET request.
///
/// Sends the configured desktop-browser user-agent and bounds every request
/// with the configured timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher using the identity and timeout from `config`.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(url, format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| ScrapeError::fetch(url, e))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    /// Serves one canned HTTP response and returns the request head it saw.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (format!("http://{}/s?k=phone", addr), handle)
    }

    #[test]
    fn test_http_fetcher_new() {
        assert_ok!(HttpFetcher::new(&ScrapeConfig::default()));
    }

    #[test]
    fn test_http_fetcher_with_client() {
        let client = Client::builder().user_agent("test-agent").build().unwrap();
        let _fetcher = HttpFetcher::with_client(client);
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_user_agent() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", "<html>ok</html>").await;
        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();

        let html = fetcher.fetch(&url).await.unwrap();
        assert_eq!(html, "<html>ok</html>");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.contains("user-agent: mozilla/5.0 (windows nt 10.0; win64; x64)"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_fetch_error() {
        let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable", "busy").await;
        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { .. }));
        assert!(err.to_string().contains("503"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("http://{}/", addr)).await;
        let err = assert_err!(result);
        assert!(err.is_recoverable());
    }
}
