//! Byte-at-a-time frame accumulation.
//!
//! The interrupt (or poll) path pushes bytes as they arrive; the main
//! loop takes completed frames and periodically discards stale partial
//! ones. The buffer, fill index and ready frame are the only state
//! shared between the two contexts and live behind one mutex, standing
//! in for the disabled-interrupts window a firmware port would use.

use crate::config::ReceiverConfig;
use hamlink_protocol::ENCODED_CHUNK_SIZE;
use parking_lot::Mutex;

#[derive(Debug)]
struct AccumulatorState {
    buf: [u8; ENCODED_CHUNK_SIZE],
    fill: usize,
    ready: Option<[u8; ENCODED_CHUNK_SIZE]>,
    last_byte_ms: u32,
}

/// Fixed-capacity accumulator for incoming wire frames. No allocation;
/// the buffer is sized to exactly one encoded chunk.
pub struct FrameAccumulator {
    stale_timeout_ms: u32,
    state: Mutex<AccumulatorState>,
}

impl FrameAccumulator {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            stale_timeout_ms: config.stale_timeout_ms,
            state: Mutex::new(AccumulatorState {
                buf: [0; ENCODED_CHUNK_SIZE],
                fill: 0,
                ready: None,
                last_byte_ms: 0,
            }),
        }
    }

    /// Appends one received byte; call from the interrupt path.
    ///
    /// Completing the final byte marks the frame ready and resets the
    /// fill index for the next frame. A ready frame that was never taken
    /// is overwritten: latest wins.
    pub fn push_byte(&self, byte: u8, now_ms: u32) {
        let mut state = self.state.lock();
        let fill = state.fill;
        state.buf[fill] = byte;
        state.fill = fill + 1;
        state.last_byte_ms = now_ms;

        if state.fill == ENCODED_CHUNK_SIZE {
            if state.ready.is_some() {
                tracing::warn!("overwriting unconsumed frame");
            }
            state.ready = Some(state.buf);
            state.fill = 0;
        }
    }

    /// Takes a completed frame, if one is pending.
    pub fn take_if_ready(&self) -> Option<[u8; ENCODED_CHUNK_SIZE]> {
        self.state.lock().ready.take()
    }

    /// Discards a partial frame that has been idle past the stale
    /// timeout, so a stalled sender cannot wedge the receiver. Returns
    /// whether anything was discarded.
    pub fn reset_if_stale(&self, now_ms: u32) -> bool {
        let mut state = self.state.lock();
        if state.fill > 0 && now_ms.saturating_sub(state.last_byte_ms) >= self.stale_timeout_ms {
            tracing::warn!("discarding stale partial frame ({} bytes)", state.fill);
            state.fill = 0;
            return true;
        }
        false
    }

    /// Number of bytes accumulated toward the next frame.
    pub fn pending(&self) -> usize {
        self.state.lock().fill
    }
}
