//! Retry logic for node reads.
//!
//! Read-only JSON-RPC calls (chain id, accounts, nonce, gas, receipts) are
//! retried with exponential backoff on transient transport errors.
//! Transaction submissions never go through here.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry strategy configuration
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Maximum number of retries
    pub max_retries: usize,
    /// Initial retry delay
    pub initial_delay: Duration,
    /// Maximum retry delay
    pub max_delay: Duration,
    /// Backoff multiplier
    pub multiplier: f64,
}

impl RetryStrategy {
    /// Create a new retry strategy from the dashboard config
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.retry_initial_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
            multiplier: config.retry_multiplier,
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_delay)
            .with_max_interval(self.max_delay)
            .with_multiplier(self.multiplier)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Check if an error is retryable
    pub fn is_retryable(error: &DashboardError) -> bool {
        match error {
            DashboardError::Network(_) => true,
            DashboardError::Http { status, .. } => *status == 429 || *status >= 500,
            DashboardError::InvalidResponse(_) => true,
            // Node-side JSON-RPC errors (reverts, bad params) are final
            _ => false,
        }
    }

    /// Execute a function with retry logic
    pub async fn retry<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.retry_with_predicate(operation, Self::is_retryable)
            .await
    }

    /// Execute a function with retry logic and custom retry predicate
    pub async fn retry_with_predicate<F, Fut, T, P>(
        &self,
        operation: F,
        should_retry: P,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: Fn(&DashboardError) -> bool,
    {
        let mut backoff = self.create_backoff();
        let mut backoff_ms: u128 = 0;
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Attempt {} of {}", attempts, self.max_retries + 1);

            match operation().await {
                Ok(result) => {
                    if attempts > 1 {
                        debug!("Operation succeeded after {} attempts", attempts);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !should_retry(&error) {
                        debug!("Non-retryable error: {:?}", error);
                        return Err(error);
                    }

                    // Out of retries: surface the last error unchanged
                    if attempts > self.max_retries {
                        warn!(
                            "Giving up after {} attempts and {}ms of backoff: {}",
                            attempts, backoff_ms, error
                        );
                        return Err(error);
                    }

                    let Some(delay) = backoff.next_backoff() else {
                        warn!("Backoff exhausted: {}", error);
                        return Err(error);
                    };
                    backoff_ms += delay.as_millis();

                    warn!(
                        "Attempt {} failed: {}. Retrying in {:?}",
                        attempts, error, delay
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
