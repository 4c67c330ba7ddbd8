use crate::error::{ReportError, Result};
use crate::models::{DirectoryEntry, MunicipalityDirectory};
use crate::utils::constants::{
    DEFAULT_DIRECTORY_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, MAX_FETCH_ATTEMPTS,
};
use std::time::Duration;
use tracing::{info, warn};

/// Client for the municipality directory service
pub struct DirectoryClient {
    client: reqwest::Client,
    url: String,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl DirectoryClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }

    /// Attempts are clamped to `1..=MAX_FETCH_ATTEMPTS`
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, MAX_FETCH_ATTEMPTS);
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetch the full directory. Backoff between attempts grows linearly.
    pub async fn fetch_directory(&self) -> Result<MunicipalityDirectory> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.fetch_once().await {
                Ok(directory) => {
                    info!(
                        url = %self.url,
                        entries = directory.len(),
                        attempt,
                        "fetched municipality directory"
                    );
                    return Ok(directory);
                }
                Err(e) => {
                    warn!(url = %self.url, attempt, error = %e, "directory fetch failed");
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_backoff * attempt).await;
                    }
                }
            }
        }

        Err(ReportError::DirectoryUnavailable(format!(
            "{} (after {} attempt{})",
            last_error,
            self.max_attempts,
            if self.max_attempts == 1 { "" } else { "s" }
        )))
    }

    async fn fetch_once(&self) -> Result<MunicipalityDirectory> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::DirectoryUnavailable(format!(
                "{} returned HTTP {}",
                self.url, status
            )));
        }

        let entries: Vec<DirectoryEntry> = response.json().await?;
        Ok(MunicipalityDirectory::from_entries(entries))
    }
}

impl Default for DirectoryClient {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_attempts_are_bounded() {
        let client = DirectoryClient::default().with_max_attempts(50);
        assert_eq!(client.max_attempts(), MAX_FETCH_ATTEMPTS);

        let client = DirectoryClient::default().with_max_attempts(0);
        assert_eq!(client.max_attempts(), 1);
        assert_eq!(client.url(), DEFAULT_DIRECTORY_URL);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_directory_unavailable() {
        // Reserve a port, then free it so nothing is listening there
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = DirectoryClient::new(format!("http://127.0.0.1:{}/municipios", port))
            .with_max_attempts(2)
            .with_retry_backoff(Duration::from_millis(1));

        let result = client.fetch_directory().await;

        match result {
            Err(ReportError::DirectoryUnavailable(message)) => {
                assert!(message.contains("after 2 attempts"), "{}", message)
            }
            other => panic!("expected DirectoryUnavailable, got {:?}", other),
        }
    }
}
