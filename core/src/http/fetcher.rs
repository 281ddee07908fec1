use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CancelToken, ReqwestClient, TokioSleeper};
use crate::error::FetchError;
use crate::traits::{HttpClient, HttpResponse, Sleeper};

pub const USER_AGENT: &str = "skillscout-discover-skills";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// `base_delay * 2^(attempt - 1)` for a 1-indexed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// GET with retries on transport failures and on 403/429 rate limiting.
///
/// Every other status, 404 included, is returned to the caller on the first
/// attempt. A rate-limited response that survives the last attempt is
/// returned as-is; a transport failure on the last attempt is returned as
/// the error.
#[derive(Clone)]
pub struct Fetcher {
    client: Arc<dyn HttpClient>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    headers: Vec<(String, String)>,
    cancel: CancelToken,
}

impl Fetcher {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            sleeper: Arc::new(TokioSleeper),
            policy: RetryPolicy::default(),
            headers: default_headers(None),
            cancel: CancelToken::new(),
        }
    }

    pub fn github(timeout: Duration) -> Self {
        Self::new(Arc::new(ReqwestClient::new(timeout)))
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.headers = default_headers(token);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if self.cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let result = tokio::select! {
                result = self.client.get(url, &self.headers) => result,
                _ = self.cancel.cancelled() => return Err(FetchError::Cancelled),
            };
            let retries_left = attempt < max_attempts;

            match result {
                Ok(response) if response.is_rate_limited() && retries_left => {
                    let delay = response
                        .retry_after()
                        .unwrap_or_else(|| self.policy.backoff(attempt));
                    warn!(
                        url,
                        status = response.status,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    self.wait(delay).await?;
                }
                Ok(response) => return Ok(response),
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) if retries_left => {
                    let delay = self.policy.backoff(attempt);
                    debug!(url, attempt, error = %e, "Request failed, retrying");
                    last_error = Some(e);
                    self.wait(delay).await?;
                }
                Err(e) => {
                    warn!(url, attempts = max_attempts, error = %e, "Giving up on request");
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Transport("max retries exceeded".into())))
    }

    async fn wait(&self, delay: Duration) -> Result<(), FetchError> {
        tokio::select! {
            _ = self.sleeper.sleep(delay) => Ok(()),
            _ = self.cancel.cancelled() => Err(FetchError::Cancelled),
        }
    }
}

fn default_headers(token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Accept".to_string(), GITHUB_ACCEPT.to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
    ];
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
    headers
}
