//! Exchange engine configuration.

/// Default deadline for ACK and response waits, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Default response retry budget for read-class commands.
pub const DEFAULT_RETRY_COUNT: u32 = 5;

/// Default interval between response polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Tunables for [`Exchange`](crate::Exchange).
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Deadline for the ACK wait and for each response attempt.
    pub timeout_ms: u32,
    /// Response decode attempts before giving up with a CRC error.
    /// Retry is reserved for integrity failures; transport failures are
    /// never retried.
    pub retry_count: u32,
    /// Pause between response polls while the peer prepares its reply.
    pub poll_interval_ms: u32,
}

impl ExchangeConfig {
    pub fn new() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_count: DEFAULT_RETRY_COUNT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::new();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.retry_count, DEFAULT_RETRY_COUNT);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_builders() {
        let config = ExchangeConfig::new()
            .with_timeout_ms(500)
            .with_retry_count(2)
            .with_poll_interval_ms(10);
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.retry_count, 2);
        assert_eq!(config.poll_interval_ms, 10);
    }
}
