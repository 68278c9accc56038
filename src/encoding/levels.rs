//! Length-framed RLE encoding of repetition and definition levels.
//!
//! A level stream is the hybrid-RLE run data without its bit-width byte,
//! prefixed by a 4-byte little-endian byte length. The bit-width is implicit:
//! it is derived from the maximum level declared by the schema.

use super::{get_length, hybrid_rle, log2};
use crate::error::{Error, Result};

/// Returns the bit-width a stream of levels bounded by `max_level` uses.
#[inline]
pub fn get_bit_width(max_level: i16) -> u32 {
    log2(max_level as u64 + 1)
}

/// Encodes `levels` into a length-prefixed stream.
pub fn encode(levels: &[u32], max_level: i16) -> Vec<u8> {
    let runs = hybrid_rle::encode(levels.iter().copied(), get_bit_width(max_level));
    let mut out = Vec::with_capacity(4 + runs.len());
    out.extend_from_slice(&(runs.len() as u32).to_le_bytes());
    out.extend_from_slice(&runs);
    out
}

/// Decodes exactly `num_levels` levels from a length-prefixed stream,
/// validating that `buffer` is exactly the prefix plus the declared length.
pub fn decode(buffer: &[u8], num_levels: usize, max_level: i16) -> Result<Vec<u32>> {
    if buffer.len() < 4 {
        return Err(Error::MissingLengthPrefix);
    }
    let length = get_length(buffer) as usize;
    if buffer.len() != 4 + length {
        return Err(Error::InvalidSize(format!(
            "level stream declares {} bytes but is framed by {}",
            length,
            buffer.len() - 4
        )));
    }
    hybrid_rle::decode(&buffer[4..], num_levels, get_bit_width(max_level))
}
