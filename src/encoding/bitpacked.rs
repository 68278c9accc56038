use seq_macro::seq;

use super::ceil8;
use crate::error::{Error, Result};

/// The number of values in a bit-packed group. A group of 8 values with
/// bit-width `b` occupies exactly `b` bytes.
pub const GROUP_LEN: usize = 8;

fn pack8_exact<const B: usize>(values: &[u32; GROUP_LEN], out: &mut [u8]) {
    let mut bit = 0;
    for value in values {
        for i in 0..B {
            if value >> i & 1 == 1 {
                out[bit / 8] |= 1 << (bit % 8);
            }
            bit += 1;
        }
    }
}

fn unpack8_exact<const B: usize>(packed: &[u8], out: &mut [u32; GROUP_LEN]) {
    let mut bit = 0;
    for value in out.iter_mut() {
        *value = 0;
        for i in 0..B {
            *value |= u32::from(packed[bit / 8] >> (bit % 8) & 1) << i;
            bit += 1;
        }
    }
}

/// Packs 8 values into `num_bits` bytes of `out`, LSB first within bytes and
/// within the group. `out` must be zeroed.
pub fn pack8(values: &[u32; GROUP_LEN], out: &mut [u8], num_bits: usize) {
    seq!(B in 0..=32 {
        match num_bits {
            #(B => pack8_exact::<B>(values, out),)*
            _ => unreachable!(),
        }
    })
}

/// Unpacks 8 values from `num_bits` bytes of `packed`.
pub fn unpack8(packed: &[u8], out: &mut [u32; GROUP_LEN], num_bits: usize) {
    seq!(B in 0..=32 {
        match num_bits {
            #(B => unpack8_exact::<B>(packed, out),)*
            _ => unreachable!(),
        }
    })
}

/// Encodes `values` in groups of 8, padding the final group with zeros.
pub fn encode(values: &[u32], num_bits: usize, out: &mut Vec<u8>) {
    debug_assert!(num_bits <= 32);
    let mut group = [0u32; GROUP_LEN];
    for chunk in values.chunks(GROUP_LEN) {
        group[..chunk.len()].copy_from_slice(chunk);
        group[chunk.len()..].fill(0);
        let start = out.len();
        out.resize(start + num_bits, 0);
        pack8(&group, &mut out[start..], num_bits);
    }
}

/// Decodes `num_values` values from `packed` into `out`. Fails with
/// [`Error::TruncatedRuns`] if `packed` holds fewer than
/// `ceil8(num_values)` groups.
pub fn extend(packed: &[u8], num_bits: usize, num_values: usize, out: &mut Vec<u32>) -> Result<()> {
    if num_bits == 0 {
        out.extend(std::iter::repeat(0).take(num_values));
        return Ok(());
    }
    let groups = ceil8(num_values);
    if packed.len() < groups * num_bits {
        return Err(Error::TruncatedRuns);
    }
    let mut group = [0u32; GROUP_LEN];
    let mut remaining = num_values;
    for chunk in packed.chunks_exact(num_bits).take(groups) {
        unpack8(chunk, &mut group, num_bits);
        let take = std::cmp::min(remaining, GROUP_LEN);
        out.extend_from_slice(&group[..take]);
        remaining -= take;
    }
    Ok(())
}

/// Decodes `num_values` values from `packed`.
pub fn decode(packed: &[u8], num_bits: usize, num_values: usize) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(num_values);
    extend(packed, num_bits, num_values, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rle() {
        // Test data: 0-7 with bit width 3
        let num_bits = 3;
        let data = vec![0b10001000u8, 0b11000110, 0b11111010];

        let decoded = decode(&data, num_bits, 8).unwrap();
        assert_eq!(decoded, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_encode() {
        let num_bits = 3;
        let values = vec![0u32, 1, 2, 3, 4, 5, 6, 7];

        let mut packed = vec![];
        encode(&values, num_bits, &mut packed);

        let expected = vec![0b10001000u8, 0b11000110, 0b11111010];
        assert_eq!(packed, expected);
    }

    #[test]
    fn test_decode_bool() {
        let num_bits = 1;
        let data = vec![0b10101010];

        let decoded = decode(&data, num_bits, 8).unwrap();
        assert_eq!(decoded, vec![0, 1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn padded_remainder_is_discarded() {
        let num_bits = 3;
        let values = vec![0u32, 1, 2, 3, 4];

        let mut packed = vec![];
        encode(&values, num_bits, &mut packed);
        assert_eq!(packed.len(), 3);

        let decoded = decode(&packed, num_bits, 5).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn zero_width_decodes_zeros() {
        let decoded = decode(&[], 0, 13).unwrap();
        assert_eq!(decoded, vec![0; 13]);
    }

    #[test]
    fn truncated_input_errors() {
        assert_eq!(
            decode(&[0b10001000u8], 3, 8),
            Err(Error::TruncatedRuns)
        );
    }

    #[test]
    fn wide_values_round_trip() {
        let values = vec![u32::MAX, 0, 1, u32::MAX - 1, 77, 1 << 30, 3, 9];
        let mut packed = vec![];
        encode(&values, 32, &mut packed);
        assert_eq!(packed.len(), 32);
        assert_eq!(decode(&packed, 32, 8).unwrap(), values);
    }
}
