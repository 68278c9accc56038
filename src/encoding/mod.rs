use std::convert::TryInto;

pub mod bitpacked;
pub mod dictionary;
pub mod hybrid_rle;
pub mod levels;
pub mod plain;
pub mod uleb128;

pub use crate::parquet_bridge::Encoding;

/// # Panics
/// This function panics iff `values.len() < 4`.
pub fn get_length(values: &[u8]) -> u32 {
    u32::from_le_bytes(values[0..4].try_into().unwrap())
}

/// Returns the ceil of value/8
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}

/// Returns the ceil of log2(x): the number of bits required to represent
/// any value in `0..x`.
#[inline]
pub fn log2(x: u64) -> u32 {
    if x <= 1 {
        0
    } else {
        64 - (x - 1).leading_zeros()
    }
}
