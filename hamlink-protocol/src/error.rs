//! Protocol error types.

use thiserror::Error;

/// Errors produced by the chunk codec and command registry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload does not fit the fixed data field. Oversized payloads are
    /// rejected, never truncated.
    #[error("payload too long: {len} bytes (max {max})")]
    PayloadTooLong { len: usize, max: usize },

    /// Recovered chunk failed the integrity check: corruption beyond the
    /// per-codeword FEC correction capacity.
    #[error("CRC mismatch: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch { expected: u16, actual: u16 },

    /// Header byte is not a registered command code.
    #[error("unknown command code: {0:#04x}")]
    UnknownCommandCode(u8),

    /// Wire frame is not exactly one encoded chunk.
    #[error("invalid frame length: {len} bytes (expected {expected})")]
    InvalidFrameLength { len: usize, expected: usize },
}
