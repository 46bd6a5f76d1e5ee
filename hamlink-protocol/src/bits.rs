//! MSB-first conversions between byte slices and bit arrays.
//!
//! Bits are stored one per `u8` (0 or 1). Bit `i` of the expanded form
//! is bit `7 - i % 8` of byte `i / 8`. Callers guarantee buffer sizing;
//! there are no error conditions at this layer.

/// Expands `bytes` into `bytes.len() * 8` bits, most significant first.
pub fn bytes_to_bits(bytes: &[u8], bits: &mut [u8]) {
    debug_assert!(bits.len() >= bytes.len() * 8);
    for i in 0..bytes.len() * 8 {
        bits[i] = (bytes[i / 8] >> (7 - (i % 8))) & 1;
    }
}

/// Packs `bits` back into bytes, zero-filling any unused trailing bits
/// of the last byte.
pub fn bits_to_bytes(bits: &[u8], bytes: &mut [u8]) {
    debug_assert!(bytes.len() * 8 >= bits.len());
    for byte in bytes.iter_mut() {
        *byte = 0;
    }
    for (i, &bit) in bits.iter().enumerate() {
        if bit != 0 {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
}
