//! Hamming(7,4) block code.
//!
//! Every 4-bit group is expanded into a 7-bit codeword with parity bits
//! at 1-based positions 1, 2 and 4; data bits occupy positions 3, 5, 6
//! and 7. The code has Hamming distance 3, so any single flipped bit per
//! codeword is located by the syndrome and corrected. Two or more flips
//! within one codeword are beyond its correction capacity and may decode
//! to a wrong nibble; that residual risk is covered by the outer CRC.

/// Data bits per block.
pub const DATA_BITS: usize = 4;

/// Bits per codeword.
pub const CODEWORD_BITS: usize = 7;

/// Parity bits per codeword.
const PARITY_BITS: usize = 3;

/// XOR of all codeword bits whose 1-based position has bit `p` set,
/// including the parity slot itself.
fn parity_check(word: &[u8], p: usize) -> u8 {
    let mask = 1usize << p;
    let mut sum = 0;
    for i in (mask - 1)..word.len() {
        if (i + 1) & mask != 0 {
            sum ^= word[i];
        }
    }
    sum
}

/// 0-based position `i` holds a parity bit iff `i + 1` is a power of two.
fn is_parity_slot(i: usize) -> bool {
    i & (i + 1) == 0
}

/// Encodes one 4-bit group into a 7-bit codeword.
pub fn encode_nibble(data: &[u8; DATA_BITS]) -> [u8; CODEWORD_BITS] {
    let mut word = [0u8; CODEWORD_BITS];

    let mut j = 0;
    for (i, slot) in word.iter_mut().enumerate() {
        if is_parity_slot(i) {
            continue;
        }
        *slot = data[j];
        j += 1;
    }

    // Parity slots are zero above, so each check reduces to the XOR of
    // the covered data bits.
    for p in 0..PARITY_BITS {
        word[(1 << p) - 1] = parity_check(&word, p);
    }
    word
}

/// Syndrome of a received codeword. Zero means all parity checks hold;
/// any other value is the 1-based position of a single flipped bit.
pub fn syndrome(word: &[u8; CODEWORD_BITS]) -> usize {
    let mut s = 0;
    for p in 0..PARITY_BITS {
        s |= (parity_check(word, p) as usize) << p;
    }
    s
}

/// Decodes a 7-bit codeword back into its 4 data bits, correcting at
/// most one flipped bit.
pub fn decode_codeword(word: &[u8; CODEWORD_BITS]) -> [u8; DATA_BITS] {
    let mut word = *word;

    let s = syndrome(&word);
    if s != 0 && s <= CODEWORD_BITS {
        word[s - 1] ^= 1;
    }

    let mut data = [0u8; DATA_BITS];
    let mut j = 0;
    for (i, &bit) in word.iter().enumerate() {
        if is_parity_slot(i) {
            continue;
        }
        data[j] = bit;
        j += 1;
    }
    data
}

/// Applies the block code independently to every consecutive 4-bit group
/// of `bits`, concatenating the codewords into `out`. This is how whole
/// multi-byte buffers gain FEC protection regardless of their semantic
/// structure.
///
/// `bits.len()` must be a multiple of 4; `out` must hold
/// `bits.len() / 4 * 7` bits.
pub fn hamming_encode_74(bits: &[u8], out: &mut [u8]) {
    debug_assert_eq!(bits.len() % DATA_BITS, 0);
    debug_assert!(out.len() >= bits.len() / DATA_BITS * CODEWORD_BITS);

    for (group, data) in bits.chunks_exact(DATA_BITS).enumerate() {
        let data: &[u8; DATA_BITS] = data.try_into().unwrap();
        let word = encode_nibble(data);
        out[group * CODEWORD_BITS..(group + 1) * CODEWORD_BITS].copy_from_slice(&word);
    }
}

/// Inverse of [`hamming_encode_74`]: decodes every consecutive 7-bit
/// codeword of `bits`, correcting up to one flipped bit per codeword.
///
/// `bits.len()` must be a multiple of 7; `out` must hold
/// `bits.len() / 7 * 4` bits.
pub fn hamming_decode_74(bits: &[u8], out: &mut [u8]) {
    debug_assert_eq!(bits.len() % CODEWORD_BITS, 0);
    debug_assert!(out.len() >= bits.len() / CODEWORD_BITS * DATA_BITS);

    for (group, word) in bits.chunks_exact(CODEWORD_BITS).enumerate() {
        let word: &[u8; CODEWORD_BITS] = word.try_into().unwrap();
        let data = decode_codeword(word);
        out[group * DATA_BITS..(group + 1) * DATA_BITS].copy_from_slice(&data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{bits_to_bytes, bytes_to_bits};
    use proptest::prelude::*;

    fn nibble_bits(value: u8) -> [u8; DATA_BITS] {
        let mut data = [0u8; DATA_BITS];
        for (i, bit) in data.iter_mut().enumerate() {
            *bit = (value >> (3 - i)) & 1;
        }
        data
    }

    #[test]
    fn test_clean_codeword_has_zero_syndrome() {
        for value in 0..16u8 {
            let word = encode_nibble(&nibble_bits(value));
            assert_eq!(syndrome(&word), 0, "value {:#x}", value);
        }
    }

    #[test]
    fn test_single_flip_roundtrip_all_values_all_positions() {
        for value in 0..16u8 {
            let data = nibble_bits(value);
            let word = encode_nibble(&data);

            for pos in 0..CODEWORD_BITS {
                let mut corrupted = word;
                corrupted[pos] ^= 1;
                assert_eq!(
                    decode_codeword(&corrupted),
                    data,
                    "value {:#x}, flip at {}",
                    value,
                    pos
                );
            }
        }
    }

    #[test]
    fn test_double_flip_decodes_wrong_nibble() {
        // Two flips in one codeword always mis-correct a third position,
        // yielding a different valid codeword. Documented limitation; the
        // outer CRC exists for this case.
        let data = nibble_bits(0b1010);
        let mut corrupted = encode_nibble(&data);
        corrupted[0] ^= 1;
        corrupted[3] ^= 1;
        assert_ne!(decode_codeword(&corrupted), data);
    }

    #[test]
    fn test_buffer_expansion_ratio() {
        let bytes = [0xA5u8; 8];
        let mut bits = [0u8; 64];
        bytes_to_bits(&bytes, &mut bits);

        let mut encoded = [0u8; 64 / 4 * 7];
        hamming_encode_74(&bits, &mut encoded);

        let mut decoded = [0u8; 64];
        hamming_decode_74(&encoded, &mut decoded);
        assert_eq!(decoded, bits);
    }

    proptest! {
        #[test]
        fn prop_buffer_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
            let mut bits = vec![0u8; bytes.len() * 8];
            bytes_to_bits(&bytes, &mut bits);

            let mut encoded = vec![0u8; bits.len() / 4 * 7];
            hamming_encode_74(&bits, &mut encoded);

            let mut decoded = vec![0u8; bits.len()];
            hamming_decode_74(&encoded, &mut decoded);

            let mut back = vec![0u8; bytes.len()];
            bits_to_bytes(&decoded, &mut back);
            prop_assert_eq!(back, bytes);
        }

        #[test]
        fn prop_one_flip_per_codeword_is_corrected(
            bytes in proptest::collection::vec(any::<u8>(), 1..16),
            seed in any::<u64>(),
        ) {
            let mut bits = vec![0u8; bytes.len() * 8];
            bytes_to_bits(&bytes, &mut bits);

            let mut encoded = vec![0u8; bits.len() / 4 * 7];
            hamming_encode_74(&bits, &mut encoded);

            // Flip one pseudo-random bit in every codeword.
            let groups = encoded.len() / CODEWORD_BITS;
            for g in 0..groups {
                let pos = (seed.wrapping_mul(g as u64 + 1) % CODEWORD_BITS as u64) as usize;
                encoded[g * CODEWORD_BITS + pos] ^= 1;
            }

            let mut decoded = vec![0u8; bits.len()];
            hamming_decode_74(&encoded, &mut decoded);
            prop_assert_eq!(decoded, bits);
        }
    }
}
