use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rand::Rng;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 20;
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";
const BACKOFF_JITTER_MS: u64 = 250;

/// Retry behaviour for idempotent GETs. Delays grow as
/// `backoff_base * 2^(attempt-1)`, capped at `max_backoff`, with a little
/// jitter so retries from parallel runs do not line up.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_base: Duration::from_secs(1),
            max_backoff: Duration::from_secs(16),
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(10);
        let exp = self.backoff_base.saturating_mul(1u32 << shift);
        let capped = exp.min(self.max_backoff);
        let jitter = rand::thread_rng().gen_range(0..BACKOFF_JITTER_MS);
        capped + Duration::from_millis(jitter)
    }
}

/// Explicitly constructed HTTP collaborator, passed into every fetcher.
/// Connection pooling comes from the underlying reqwest client.
pub struct FplClient {
    client: Client,
    retry: RetryPolicy,
}

impl FplClient {
    pub fn new(retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;
        Ok(Self { client, retry })
    }

    /// GET a URL and return the response body, retrying network errors,
    /// 429 and 5xx responses per the configured policy.
    pub fn get_text(&self, url: &str) -> Result<String> {
        let mut last_err = None;

        for attempt in 0..=self.retry.max_retries {
            if attempt > 0 {
                thread::sleep(self.retry.delay_for(attempt));
            }

            let resp = match self
                .client
                .get(url)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .send()
            {
                Ok(resp) => resp,
                Err(err) => {
                    last_err = Some(
                        anyhow::Error::new(err).context(format!("request failed: {url}")),
                    );
                    continue;
                }
            };

            let status = resp.status();
            if status.is_success() {
                return resp.text().context("failed reading body");
            }
            if retryable_status(status) {
                last_err = Some(anyhow!("http {status} from {url}"));
                continue;
            }
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("http {status}: {body}"));
        }

        Err(last_err.unwrap_or_else(|| anyhow!("request failed: {url}")))
    }
}

fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
