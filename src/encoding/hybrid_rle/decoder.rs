use super::super::{bitpacked, ceil8, uleb128};
use super::HybridEncoded;
use crate::error::{Error, Result};

/// An iterator that, given a slice of bytes, returns [`HybridEncoded`] runs.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    values: &'a [u8],
    num_bits: u32,
}

impl<'a> Decoder<'a> {
    /// Returns a new [`Decoder`]; fails if `num_bits` exceeds 32.
    pub fn try_new(values: &'a [u8], num_bits: u32) -> Result<Self> {
        if num_bits > 32 {
            return Err(Error::InvalidBitWidth(num_bits));
        }
        Ok(Self { values, num_bits })
    }

    /// Returns the number of bits being used by this decoder.
    #[inline]
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    fn next_run(&mut self) -> Result<HybridEncoded<'a>> {
        let (indicator, consumed) = uleb128::decode(self.values)?;
        self.values = &self.values[consumed..];
        if indicator & 1 == 1 {
            // is bitpacking
            let num_groups: usize = (indicator >> 1)
                .try_into()
                .map_err(|_| Error::InvalidSize("bit-packed group count".to_string()))?;
            let num_bytes = num_groups
                .checked_mul(self.num_bits as usize)
                .ok_or_else(|| Error::InvalidSize("bit-packed run length".to_string()))?;
            let num_values = num_groups
                .checked_mul(8)
                .ok_or_else(|| Error::InvalidSize("bit-packed run length".to_string()))?;
            if num_bytes > self.values.len() {
                return Err(Error::TruncatedRuns);
            }
            let result = HybridEncoded::Bitpacked {
                packed: &self.values[..num_bytes],
                num_values,
            };
            self.values = &self.values[num_bytes..];
            Ok(result)
        } else {
            // is rle
            let num_values: usize = (indicator >> 1)
                .try_into()
                .map_err(|_| Error::InvalidSize("RLE run length".to_string()))?;
            if num_values == 0 {
                return Err(Error::InvalidRunHeader(
                    "RLE run with a zero count".to_string(),
                ));
            }
            // repeated-value uses a fixed width of round-up-to-next-byte(bit-width)
            let rle_bytes = ceil8(self.num_bits as usize);
            if rle_bytes > self.values.len() {
                return Err(Error::TruncatedRuns);
            }
            let mut bytes = [0u8; std::mem::size_of::<u32>()];
            self.values[..rle_bytes]
                .iter()
                .enumerate()
                .for_each(|(i, byte)| bytes[i] = *byte);
            let value = u32::from_le_bytes(bytes);
            self.values = &self.values[rle_bytes..];
            Ok(HybridEncoded::Rle { value, num_values })
        }
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<HybridEncoded<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.next_run())
    }
}

/// Decodes exactly `num_values` values from `values`. The run data must be
/// consumed exactly: surplus runs or values fail with
/// [`Error::UnconsumedData`], missing values with [`Error::TruncatedRuns`].
/// Padding in the final bit-packed group is discarded.
pub fn decode(values: &[u8], num_values: usize, num_bits: u32) -> Result<Vec<u32>> {
    let mut decoder = Decoder::try_new(values, num_bits)?;
    let mut out = Vec::with_capacity(num_values);
    for run in &mut decoder {
        let run = run?;
        if out.len() == num_values {
            return Err(Error::UnconsumedData);
        }
        match run {
            HybridEncoded::Bitpacked {
                packed,
                num_values: available,
            } => {
                let remaining = num_values - out.len();
                let take = std::cmp::min(remaining, available);
                // whole padding groups are surplus data
                if available - take >= 8 {
                    return Err(Error::UnconsumedData);
                }
                bitpacked::extend(packed, num_bits as usize, take, &mut out)?;
            }
            HybridEncoded::Rle {
                value,
                num_values: count,
            } => {
                if count > num_values - out.len() {
                    return Err(Error::UnconsumedData);
                }
                out.extend(std::iter::repeat(value).take(count));
            }
        }
    }
    if out.len() != num_values {
        return Err(Error::TruncatedRuns);
    }
    Ok(out)
}
