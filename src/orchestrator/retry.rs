use crate::stt::SttError;
use std::time::Duration;
use tokio::time::sleep;

const DEFAULT_BASE_DELAY_MS: u64 = 500;

pub struct RetryPolicy {
    max_retries: u8,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u8) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }

    pub fn with_base_delay(max_retries: u8, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub fn should_retry(&self, attempt: u8, error: &SttError) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        error.is_retryable()
    }

    pub async fn wait_before_retry(&self, attempt: u8) {
        let multiplier = 2u32.saturating_pow(attempt as u32);
        let delay = self.base_delay.saturating_mul(multiplier);

        if !delay.is_zero() {
            tracing::debug!("waiting {}ms before retry", delay.as_millis());
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_after_retry_budget() {
        let policy = RetryPolicy::new(2);
        let err = SttError::Timeout;

        assert!(policy.should_retry(0, &err));
        assert!(policy.should_retry(1, &err));
        assert!(!policy.should_retry(2, &err));
    }

    #[test]
    fn never_retries_invalid_requests() {
        let policy = RetryPolicy::new(2);
        let err = SttError::InvalidRequest("bad mime".into());
        assert!(!policy.should_retry(0, &err));
    }
}
