//! hamlink loopback demo.
//!
//! Wires the master-side exchange engine to the slave-side receiver over
//! an in-memory transport with a simulated millisecond clock, then runs
//! one write-class and two read-class exchanges end to end. This carries
//! the same traffic the protocol was built for, minus the physical bus.

use hamlink_master::{Exchange, ExchangeConfig, Transport, TransportError};
use hamlink_protocol::{Command, ENCODED_CHUNK_SIZE};
use hamlink_slave::{CommandHandler, FrameAccumulator, ReceiverConfig, Reply, Responder};
use tracing_subscriber::EnvFilter;

/// Slave-side application state: an in-memory "SD card" log and a fixed
/// RTC reading.
struct DemoHandler {
    log: Vec<String>,
}

impl CommandHandler for DemoHandler {
    fn handle(&mut self, command: Command, payload: &[u8]) -> Option<Vec<u8>> {
        match command {
            Command::SdAppend | Command::SdLineAppend => {
                self.log.push(String::from_utf8_lossy(payload).into_owned());
                None
            }
            Command::SdRead => {
                Some(self.log.last().cloned().unwrap_or_default().into_bytes())
            }
            Command::RtcRead => Some(b"2025-01-03 13:51:42".to_vec()),
            Command::RtcSet => None,
        }
    }
}

/// In-memory bus: bytes clocked out by the master land in the slave's
/// accumulator, and the slave's replies are held until the master polls
/// for them.
struct LoopbackTransport {
    accumulator: FrameAccumulator,
    responder: Responder<DemoHandler>,
    now_ms: u32,
    pending_ack: Option<u8>,
    pending_response: Option<[u8; ENCODED_CHUNK_SIZE]>,
}

impl LoopbackTransport {
    fn new() -> Self {
        Self {
            accumulator: FrameAccumulator::new(ReceiverConfig::new()),
            responder: Responder::new(DemoHandler { log: Vec::new() }),
            now_ms: 0,
            pending_ack: None,
            pending_response: None,
        }
    }

    /// One pass of the slave's main loop.
    fn pump_slave(&mut self) {
        self.accumulator.reset_if_stale(self.now_ms);
        if let Some(wire) = self.accumulator.take_if_ready() {
            let reply = self.responder.on_frame(&wire);
            self.pending_ack = Some(reply.ack_byte());
            if let Reply::Ack { response } = reply {
                self.pending_response = response;
            }
        }
    }
}

impl Transport for LoopbackTransport {
    fn assert_select(&mut self) {}

    fn release_select(&mut self) {}

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), TransportError> {
        self.now_ms += 1;

        // A full frame from the master: feed the slave byte by byte, the
        // way its receive interrupt would.
        if tx.len() == ENCODED_CHUNK_SIZE {
            for &byte in tx {
                self.accumulator.push_byte(byte, self.now_ms);
            }
            self.pump_slave();
            return Ok(());
        }

        // The master polling for the slave's response chunk.
        if rx.len() == ENCODED_CHUNK_SIZE {
            return match self.pending_response.take() {
                Some(frame) => {
                    rx.copy_from_slice(&frame);
                    Ok(())
                }
                None => Err(TransportError::NotReady),
            };
        }

        // The master polling for the acknowledgement byte.
        if rx.len() == 1 {
            rx[0] = self.pending_ack.take().unwrap_or(0);
            return Ok(());
        }

        // A lone control byte from the master (final ACK, or a NACK for
        // a garbled response). Nothing to resend on this clean bus.
        tracing::trace!(
            "slave saw control byte {:#04x}",
            tx.first().copied().unwrap_or(0)
        );
        Ok(())
    }

    fn elapsed_ms(&self) -> u32 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ms += ms;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ExchangeConfig::new()
        .with_timeout_ms(1_000)
        .with_poll_interval_ms(10);
    let mut exchange = Exchange::with_config(LoopbackTransport::new(), config);

    tracing::info!("appending a log line over the link");
    exchange.execute(Command::SdAppend, b"hello from the main module")?;

    tracing::info!("reading the RTC back");
    if let Some(chunk) = exchange.execute(Command::RtcRead, &[])? {
        tracing::info!("RTC replied: {}", chunk.payload_str());
    }

    tracing::info!("reading the last log line back");
    if let Some(chunk) = exchange.execute(Command::SdRead, &[])? {
        tracing::info!("SD replied: {}", chunk.payload_str());
    }

    tracing::info!("link demo complete");
    Ok(())
}
