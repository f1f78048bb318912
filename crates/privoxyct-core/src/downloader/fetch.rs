//! Blacklist archive retrieval over HTTP(S).

use std::path::Path;

use crate::http::HttpClient;
use crate::{PrivoxyctError, Result};

/// Downloads the remote archive into the scratch directory.
///
/// There is no retry policy: a failed transfer aborts the whole run.
pub struct ArchiveFetcher<'a> {
    client: &'a HttpClient,
}

impl<'a> ArchiveFetcher<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Download `url` to `dest`, returning the number of bytes written.
    pub async fn fetch<F>(&self, url: &str, dest: &Path, progress: Option<F>) -> Result<u64>
    where
        F: Fn(u64, u64),
    {
        self.client
            .download(url, dest, progress)
            .await
            .map_err(|e| PrivoxyctError::Transfer {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_maps_errors_to_transfer() {
        let client = HttpClient::new().unwrap();
        let fetcher = ArchiveFetcher::new(&client);

        let temp_dir = tempfile::TempDir::new().unwrap();
        let dest = temp_dir.path().join("archive.tar.gz");

        // Unroutable scheme-level failure, no network needed.
        let result = fetcher
            .fetch("http://[invalid", &dest, None::<fn(u64, u64)>)
            .await;

        match result {
            Err(PrivoxyctError::Transfer { url, .. }) => assert_eq!(url, "http://[invalid"),
            other => panic!("Expected Transfer error, got {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_writes_destination() {
        let client = HttpClient::new().unwrap();
        let fetcher = ArchiveFetcher::new(&client);

        let temp_dir = tempfile::TempDir::new().unwrap();
        let dest = temp_dir.path().join("payload.bin");

        let bytes = fetcher
            .fetch("https://httpbin.org/bytes/256", &dest, None::<fn(u64, u64)>)
            .await
            .unwrap();

        assert_eq!(bytes, 256);
        assert!(dest.exists());
    }
}
