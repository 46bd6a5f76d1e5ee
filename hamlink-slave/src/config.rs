//! Receiver configuration.

/// Default idle time after which a partial frame is discarded, in
/// milliseconds.
pub const DEFAULT_STALE_TIMEOUT_MS: u32 = 10_000;

/// Tunables for [`FrameAccumulator`](crate::FrameAccumulator).
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Idle time since the last received byte after which a partial
    /// frame is discarded, so a stalled sender cannot wedge the receiver.
    pub stale_timeout_ms: u32,
}

impl ReceiverConfig {
    pub fn new() -> Self {
        Self {
            stale_timeout_ms: DEFAULT_STALE_TIMEOUT_MS,
        }
    }

    pub fn with_stale_timeout_ms(mut self, stale_timeout_ms: u32) -> Self {
        self.stale_timeout_ms = stale_timeout_ms;
        self
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self::new()
    }
}
