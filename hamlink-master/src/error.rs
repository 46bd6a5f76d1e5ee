//! Exchange error taxonomy.

use hamlink_protocol::ProtocolError;
use thiserror::Error;

/// Outcome taxonomy of a failed exchange.
///
/// All failures are value-returned; integrity failures (`Crc`) are
/// retried locally up to the configured budget before surfacing, while
/// parameter and transport failures never are.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Malformed request: bad ordinal, missing payload for a write-class
    /// command, or a payload larger than the data field.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),

    /// Reserved for a codec that can reject malformed input; the current
    /// codec never produces this.
    #[error("encoding failed: {0}")]
    Encoding(ProtocolError),

    /// Response failed integrity checks on every attempt in the retry
    /// budget.
    #[error("CRC error after {attempts} response attempts")]
    Crc { attempts: u32 },

    /// No ACK or response observed within the deadline. The exchange
    /// engine does not retry further; the caller may retry the whole
    /// exchange.
    #[error("timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u32 },

    /// The underlying transport reported a transfer failure.
    #[error("transport error: {0}")]
    Spi(String),
}

impl ExchangeError {
    /// Whether a caller may reasonably retry the whole exchange.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::Crc { .. } | ExchangeError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(ExchangeError::Crc { attempts: 5 }.is_retryable());
        assert!(ExchangeError::Timeout { elapsed_ms: 10_000 }.is_retryable());

        assert!(!ExchangeError::InvalidParam("payload required").is_retryable());
        assert!(!ExchangeError::Spi("bus stuck".into()).is_retryable());
        assert!(!ExchangeError::Encoding(ProtocolError::PayloadTooLong { len: 30, max: 29 })
            .is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ExchangeError::Crc { attempts: 5 };
        assert!(err.to_string().contains('5'));

        let err = ExchangeError::Timeout { elapsed_ms: 10_000 };
        assert!(err.to_string().contains("10000"));
    }
}
