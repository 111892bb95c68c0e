//! HTTP client for the external spam classifier.
//!
//! The classifier accepts a form POST with a `content` field and answers
//! `{"valid": bool}`. Timeouts, transport failures and non-2xx answers are
//! errors; callers treat an error as "not verified".

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use glossa_core::{Error, Result, SpamChecker};

#[derive(Debug, Deserialize)]
struct SpamVerdict {
    valid: bool,
}

/// Spam checker calling the remote classifier over HTTP.
#[derive(Clone)]
pub struct HttpSpamChecker {
    client: reqwest::Client,
    url: String,
}

impl HttpSpamChecker {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl SpamChecker for HttpSpamChecker {
    async fn is_valid(&self, content: &str) -> Result<bool> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .form(&[("content", content)])
            .send()
            .await
            .map_err(|e| {
                warn!(
                    subsystem = "spam",
                    component = "http_client",
                    error = %e,
                    "Spam check unavailable"
                );
                Error::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Request(format!("spam check returned {}", status)));
        }

        let verdict: SpamVerdict = response.json().await?;
        debug!(
            subsystem = "spam",
            component = "http_client",
            op = "is_valid",
            valid = verdict.valid,
            duration_ms = start.elapsed().as_millis() as u64,
            "Spam check complete"
        );
        Ok(verdict.valid)
    }
}
