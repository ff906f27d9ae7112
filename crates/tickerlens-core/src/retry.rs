//! Retry with exponential backoff and jitter for idempotent provider calls.
//!
//! Only GET requests are retried by [`execute_with_retry`]; any other method
//! is sent exactly once.

use std::time::Duration;

use tracing::warn;

use crate::http_client::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};

/// Backoff strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed {
        delay: Duration,
    },
    /// `base * factor^attempt`, capped at `max`, with optional +/- 50% jitter.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(250),
            factor: 2.0,
            max: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = (base.as_secs_f64() * factor.powi(exponent)).min(max.as_secs_f64());
                let delay = Duration::from_secs_f64(seconds);
                if !jitter {
                    return delay;
                }

                let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                let spread = millis / 2;
                let offset = fastrand::u64(0..=spread * 2);
                Duration::from_millis((millis - spread).saturating_add(offset))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 2,
            backoff: Backoff::default(),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    fn attempts_for(&self, method: HttpMethod) -> u32 {
        if self.enabled && method == HttpMethod::Get {
            self.max_retries + 1
        } else {
            1
        }
    }
}

/// Execute `request`, retrying transient failures of GET requests.
///
/// The last response (even a retryable non-2xx one) or the last transport
/// error is returned once attempts run out.
pub async fn execute_with_retry(
    client: &dyn HttpClient,
    request: HttpRequest,
    config: &RetryConfig,
) -> Result<HttpResponse, HttpError> {
    let attempts = config.attempts_for(request.method);
    let mut attempt = 0;

    loop {
        let outcome = client.execute(request.clone()).await;
        attempt += 1;

        let retry = match &outcome {
            Ok(response) => config.should_retry_status(response.status),
            Err(error) => error.retryable(),
        };
        if !retry || attempt >= attempts {
            return outcome;
        }

        let delay = config.delay_for_attempt(attempt - 1);
        match &outcome {
            Ok(response) => {
                warn!(url = %request.url, status = response.status, attempt, ?delay, "retrying request");
            }
            Err(error) => {
                warn!(url = %request.url, error = %error, attempt, ?delay, "retrying request");
            }
        }
        tokio::time::sleep(delay).await;
    }
}
