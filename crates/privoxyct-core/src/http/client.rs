//! Thin wrapper around `reqwest` for streaming downloads.
//!
//! A failed request is fatal to the whole run, so there is deliberately no
//! retry logic here: one GET, one verdict. The body is streamed to disk
//! chunk-by-chunk so the archive is never held in memory.

use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

const DEFAULT_USER_AGENT: &str = concat!("privoxyct/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent,
        })
    }

    /// Perform a single GET request. Non-success statuses are errors.
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Download `url` to `dest`, streaming the body to disk.
    ///
    /// The optional callback receives `(downloaded, total)` after every chunk,
    /// where `total` is the Content-Length or 0 when the server did not send
    /// one. Returns the number of bytes written.
    pub async fn download<F>(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<F>,
    ) -> Result<u64, HttpError>
    where
        F: Fn(u64, u64),
    {
        let response = self.get(url).await?;

        let total_size = response.content_length().unwrap_or(0);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();

        use futures_util::StreamExt;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref callback) = progress {
                callback(downloaded, total_size);
            }
        }

        file.flush().await?;

        Ok(downloaded)
    }

    /// Get the configured user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(5))
            .with_user_agent("Test/1.0".to_string());

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "Test/1.0");
    }

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
        assert_eq!(client.unwrap().user_agent(), DEFAULT_USER_AGENT);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_download_file() {
        use tempfile::TempDir;

        let client = HttpClient::new().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("test_file.bin");

        let result = client
            .download("https://httpbin.org/bytes/100", &dest, None::<fn(u64, u64)>)
            .await;

        assert_eq!(result.unwrap(), 100);
        assert!(dest.exists());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_error_404() {
        let client = HttpClient::new().unwrap();
        let response = client.get("https://httpbin.org/status/404").await;

        if let Err(HttpError::Status { status, .. }) = response {
            assert_eq!(status, 404);
        } else {
            panic!("Expected Status error");
        }
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::Status {
            status: 404,
            url: "https://example.com/not-found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: https://example.com/not-found");
    }
}
