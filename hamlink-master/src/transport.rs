//! Transport abstraction over the synchronous serial link.

use thiserror::Error;

/// Errors reported by a [`Transport`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer has nothing to clock out yet. The exchange engine polls
    /// through this until its deadline; it is never surfaced to callers.
    #[error("no data available")]
    NotReady,

    /// Hard bus failure. Surfaced immediately as
    /// [`ExchangeError::Spi`](crate::ExchangeError::Spi), never retried.
    #[error("bus transfer failed: {0}")]
    Bus(String),
}

/// Byte-level access to the serial link, plus the clock the exchange
/// engine runs its deadlines on.
///
/// Implementations are blocking: the exchange engine is single-threaded
/// and drives one transfer at a time, with no overlapping exchanges.
/// `elapsed_ms` must advance between calls (a stalled clock would turn a
/// lost ACK into a busy loop instead of a timeout).
pub trait Transport {
    /// Asserts the peer's chip-select line.
    fn assert_select(&mut self);

    /// Releases the peer's chip-select line.
    fn release_select(&mut self);

    /// Full-duplex byte exchange: clocks `tx` out while filling `rx`.
    /// Either slice may be empty for a half-duplex transfer.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), TransportError>;

    /// Milliseconds elapsed since an arbitrary fixed origin.
    fn elapsed_ms(&self) -> u32;

    /// Sleeps between response polls.
    fn delay_ms(&mut self, ms: u32);
}
