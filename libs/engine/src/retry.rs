use std::future::Future;
use std::time::Duration;

use eyre::Result;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 30, delay: Duration::from_secs(2) }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }
}

/// Runs `op` until it succeeds or the policy's attempts are used up,
/// returning the last error in that case. A zero attempt budget still runs `op` once.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("{label} succeeded after {attempt} attempts");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                tracing::warn!("Waiting for {label}... ({attempt}/{max_attempts}): {e}");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("{label} failed after {attempt} attempts: {e:?}");
                return Err(e.wrap_err(format!("{label} failed after {attempt} attempts")));
            }
        }
    }
}
