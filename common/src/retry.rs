use std::time::Duration;

/// Retry policy for outbound payment processor calls.
///
/// Attempts are bounded and backoff is exponential. Only transient
/// failures (network errors, timeouts, 5xx responses) are retried;
/// client errors indicate a malformed request and surface immediately.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the initial request.
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Hard cap on each individual attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Delay before the attempt following `completed` finished attempts.
    ///
    /// Doubles each round: `base_delay * 2^(completed - 1)`, so with the
    /// default base the schedule runs 2s, 4s, 8s.
    pub fn delay_after_attempt(&self, completed: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(completed.saturating_sub(1));
        Duration::from_millis((self.base_delay.as_millis() as u64).saturating_mul(multiplier))
    }

    pub fn can_retry(&self, completed: u32) -> bool {
        completed < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay, Duration::from_secs(2));
        assert_eq!(config.attempt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn exponential_backoff_schedule() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_after_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_after_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_after_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn retry_budget_is_bounded() {
        let config = RetryConfig::default();
        assert!(config.can_retry(1));
        assert!(config.can_retry(2));
        assert!(!config.can_retry(3));
        assert!(!config.can_retry(4));
    }
}
