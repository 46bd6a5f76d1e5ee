//! CRC-16-CCITT checksum (CRC-16/CCITT-FALSE).
//!
//! Polynomial 0x1021, initial register 0xFFFF, bytes processed MSB-first,
//! no final XOR. Protects the logical chunk contents end to end; residual
//! double-bit errors that slip past the per-codeword FEC land here.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// Computes the CRC-16-CCITT checksum of `data`.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = INIT;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
