use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::StacError;

/// Transfer collaborator. Called exactly once per cache miss; transport
/// failures propagate to the caller unmodified.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, uri: &str, destination: &Path) -> Result<(), StacError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, StacError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("stac-am/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| StacError::Transport(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| StacError::Transport(err.to_string()))?;
        Ok(Self { client })
    }

    fn send_with_retries(&self, uri: &str) -> Result<reqwest::blocking::Response, StacError> {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            match self.client.get(uri).send() {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        debug!(status, attempt, "retrying transfer");
                        thread::sleep(Duration::from_millis(BASE_DELAY_MS * (attempt as u64 + 1)));
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        debug!(attempt, "retrying transfer after transport error");
                        thread::sleep(Duration::from_millis(BASE_DELAY_MS * (attempt as u64 + 1)));
                        attempt += 1;
                        continue;
                    }
                    return Err(StacError::Transport(err.to_string()));
                }
            }
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str, destination: &Path) -> Result<(), StacError> {
        let response = self.send_with_retries(uri)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "transfer failed".to_string());
            return Err(StacError::TransportStatus { status, message });
        }

        // Stream into a sibling temp file, then persist. A failed transfer
        // never leaves a partial destination that would satisfy the cache.
        let parent = destination
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut temp = tempfile::Builder::new()
            .prefix(".stac-am")
            .tempfile_in(&parent)
            .map_err(|err| StacError::Filesystem(err.to_string()))?;
        let mut response = response;
        io::copy(&mut response, temp.as_file_mut())
            .map_err(|err| StacError::Filesystem(err.to_string()))?;
        temp.persist(destination)
            .map_err(|err| StacError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(200));
    }
}
