//! # hamlink-protocol
//!
//! Wire protocol implementation for hamlink, the error-corrected link
//! between a low-power coprocessor and a main compute module over a
//! synchronous serial bus with no native error detection.
//!
//! This crate provides:
//! - MSB-first bit codec
//! - Hamming(7,4) forward error correction
//! - CRC-16-CCITT integrity checks
//! - Fixed 32-byte chunk framing with a 56-byte FEC-protected wire image
//! - Closed command registry with ACK/NACK/Abort control codes

pub mod bits;
pub mod chunk;
pub mod command;
pub mod crc;
pub mod error;
pub mod hamming;

pub use chunk::{Chunk, PAD_BYTE};
pub use command::{Command, CommandInfo, ABORT, ACK, COMMANDS, NACK, REPLY_FLAG};
pub use crc::crc16_ccitt;
pub use error::ProtocolError;

/// Length of the payload field in a chunk, in bytes.
pub const DATA_LENGTH: usize = 29;

/// Size of the CRC field in bytes.
pub const CRC_SIZE: usize = 2;

/// Raw chunk size: header (1) + data (29) + CRC (2).
///
/// Fixed by protocol version; changing it requires renegotiating chunk
/// size on both ends, and the new value must keep `CHUNK_SIZE * 8`
/// divisible by 4 or the FEC expansion below is undefined.
pub const CHUNK_SIZE: usize = 32;

/// Hamming(7,4)-expanded wire size of a chunk: 256 bits in 4-bit groups
/// become 64 seven-bit codewords, 448 bits, 56 bytes.
pub const ENCODED_CHUNK_SIZE: usize = CHUNK_SIZE * 7 / 4;
