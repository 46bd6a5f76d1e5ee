//! The master-side exchange state machine.
//!
//! One call to [`Exchange::execute`] drives a full handshake:
//! validate, encode, send, await ACK, and for read-class commands
//! receive and validate the response chunk with a bounded retry budget.

use crate::config::ExchangeConfig;
use crate::error::ExchangeError;
use crate::transport::{Transport, TransportError};
use hamlink_protocol::{Chunk, Command, ACK, ENCODED_CHUNK_SIZE, NACK};
use std::fmt;

/// Drives request/response exchanges over an injected transport.
///
/// The engine is synchronous: sending blocks until the transport
/// completes, and waiting for ACK or a response blocks the calling task
/// up to the configured deadline. There is no explicit cancel primitive;
/// cancellation is implicit via timeout.
pub struct Exchange<T: Transport> {
    transport: T,
    config: ExchangeConfig,
}

impl<T: Transport> Exchange<T> {
    /// Creates an exchange engine with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ExchangeConfig::default())
    }

    pub fn with_config(transport: T, config: ExchangeConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Consumes the engine, giving the transport back.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Executes one command exchange.
    ///
    /// Write-class commands require a non-empty payload and resolve to
    /// `Ok(None)` once the peer ACKs. Read-class commands additionally
    /// wait for a response chunk, NACKing and retrying on integrity
    /// failures, and resolve to `Ok(Some(chunk))` after a final ACK.
    pub fn execute(
        &mut self,
        command: Command,
        payload: &[u8],
    ) -> Result<Option<Chunk>, ExchangeError> {
        if !command.expects_reply() && payload.is_empty() {
            tracing::warn!("{}: payload required for write-class command", command);
            return Err(ExchangeError::InvalidParam(
                "payload required for write-class command",
            ));
        }

        let chunk = Chunk::new(command.code(), payload).map_err(|e| {
            tracing::warn!("{}: {}", command, e);
            ExchangeError::InvalidParam("payload exceeds data field")
        })?;

        tracing::debug!(
            "performing {} ({:#04x}) with {} payload bytes",
            command,
            command.code(),
            payload.len()
        );

        let wire = chunk.encode();
        tracing::trace!("encoded chunk: {}", Hex(&wire));

        let start_ms = self.transport.elapsed_ms();
        self.await_ack(&wire, start_ms)?;

        if !command.expects_reply() {
            return Ok(None);
        }

        let response = self.await_response()?;
        tracing::debug!("{} replied with {:?}", command, response.payload_str());
        Ok(Some(response))
    }

    /// Sends the encoded chunk and polls for a single ACK byte, looping
    /// until the peer acknowledges or the deadline elapses.
    fn await_ack(
        &mut self,
        wire: &[u8; ENCODED_CHUNK_SIZE],
        start_ms: u32,
    ) -> Result<(), ExchangeError> {
        let deadline = start_ms.saturating_add(self.config.timeout_ms);
        let mut last = 0u8;

        loop {
            self.send(wire)?;

            let mut ack = [0u8; 1];
            match self.transfer_selected(&[ACK], &mut ack) {
                Ok(()) => {
                    if ack[0] == ACK {
                        tracing::debug!("ACK received");
                        return Ok(());
                    }
                    last = ack[0];
                }
                Err(TransportError::NotReady) => {}
                Err(e @ TransportError::Bus(_)) => {
                    tracing::warn!("ACK poll failed: {}", e);
                    return Err(ExchangeError::Spi(e.to_string()));
                }
            }

            let now = self.transport.elapsed_ms();
            if now >= deadline {
                tracing::warn!("no valid ACK received ({:#04x})", last);
                return Err(ExchangeError::Timeout {
                    elapsed_ms: now.saturating_sub(start_ms),
                });
            }
        }
    }

    /// Receives and validates the response chunk for a read-class
    /// command. Each attempt waits up to the timeout for a full frame;
    /// a decode failure is answered with a NACK and retried. A valid
    /// response is answered with a final ACK.
    fn await_response(&mut self) -> Result<Chunk, ExchangeError> {
        for attempt in 1..=self.config.retry_count {
            let wire = self.receive_frame()?;

            match Chunk::decode(&wire) {
                Ok(chunk) => {
                    tracing::debug!("valid response on attempt {}", attempt);
                    self.send(&[ACK])?;
                    return Ok(chunk);
                }
                Err(e) => {
                    tracing::warn!("response attempt {} rejected ({}), sending NACK", attempt, e);
                    self.send(&[NACK])?;
                }
            }
        }

        tracing::warn!(
            "invalid response after {} attempts",
            self.config.retry_count
        );
        Err(ExchangeError::Crc {
            attempts: self.config.retry_count,
        })
    }

    /// Polls the transport for one full wire frame, sleeping between
    /// polls, until data arrives or the per-attempt deadline elapses.
    fn receive_frame(&mut self) -> Result<[u8; ENCODED_CHUNK_SIZE], ExchangeError> {
        let start_ms = self.transport.elapsed_ms();
        let deadline = start_ms.saturating_add(self.config.timeout_ms);

        loop {
            let mut wire = [0u8; ENCODED_CHUNK_SIZE];
            match self.transfer_selected(&[], &mut wire) {
                Ok(()) => return Ok(wire),
                Err(TransportError::NotReady) => {
                    let now = self.transport.elapsed_ms();
                    if now >= deadline {
                        tracing::warn!("response timeout");
                        return Err(ExchangeError::Timeout {
                            elapsed_ms: now.saturating_sub(start_ms),
                        });
                    }
                    let interval = self.config.poll_interval_ms;
                    self.transport.delay_ms(interval);
                }
                Err(e @ TransportError::Bus(_)) => {
                    tracing::warn!("response transfer failed: {}", e);
                    return Err(ExchangeError::Spi(e.to_string()));
                }
            }
        }
    }

    /// Transmit-only transfer; any transport error is a hard failure.
    fn send(&mut self, tx: &[u8]) -> Result<(), ExchangeError> {
        self.transfer_selected(tx, &mut []).map_err(|e| {
            tracing::warn!("transfer failed: {}", e);
            ExchangeError::Spi(e.to_string())
        })
    }

    /// One transfer bracketed by chip-select assertion and release.
    fn transfer_selected(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), TransportError> {
        self.transport.assert_select();
        let result = self.transport.transfer(tx, rx);
        self.transport.release_select();
        result
    }
}

/// Space-separated hex rendering for trace output.
struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
