// See https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3
mod decoder;
mod encoder;

pub use decoder::{decode, Decoder};
pub use encoder::{encode, Encoder};

/// A single run of the hybrid encoding.
#[derive(Debug, PartialEq, Eq)]
pub enum HybridEncoded<'a> {
    /// A bit-packed run: `num_values` values (a multiple of 8, the tail of
    /// the final group being padding) packed into `packed`.
    Bitpacked { packed: &'a [u8], num_values: usize },
    /// An RLE run: `value` repeated `num_values` times.
    Rle { value: u32, num_values: usize },
}
