use super::super::{bitpacked, ceil8, uleb128};

/// The maximum number of values a single bit-packed run may hold before the
/// encoder forces its emission.
const MAX_BITPACKED_RUN: usize = 64;

/// The number of identical trailing values after which the encoder switches
/// to an RLE run.
const RLE_THRESHOLD: usize = 8;

/// An encoder of the RLE/bit-packing hybrid format.
///
/// Values are greedily accumulated into a bit-packed buffer; once
/// [`RLE_THRESHOLD`] identical values accumulate at its tail, the buffer is
/// split into a bit-packed prefix and a running RLE run.
#[derive(Debug)]
pub struct Encoder {
    num_bits: u32,
    buffer: Vec<u32>,
    tail_count: usize,
    rle_value: u32,
    rle_count: usize,
    out: Vec<u8>,
}

impl Encoder {
    /// Returns a new [`Encoder`].
    ///
    /// # Panics
    /// Iff `num_bits > 32`.
    pub fn new(num_bits: u32) -> Self {
        assert!(num_bits <= 32);
        Self {
            num_bits,
            buffer: Vec::with_capacity(MAX_BITPACKED_RUN),
            tail_count: 0,
            rle_value: 0,
            rle_count: 0,
            out: vec![],
        }
    }

    pub fn put(&mut self, value: u32) {
        debug_assert!(self.num_bits == 32 || u64::from(value) < 1u64 << self.num_bits);
        if self.rle_count > 0 {
            if value == self.rle_value {
                self.rle_count += 1;
                return;
            }
            self.flush_rle();
        }

        if self.buffer.last() == Some(&value) {
            self.tail_count += 1;
        } else {
            self.tail_count = 1;
        }
        self.buffer.push(value);

        if self.tail_count == RLE_THRESHOLD {
            // split off the repeated tail and seed an RLE run with it
            let prefix = self.buffer.len() - RLE_THRESHOLD;
            if prefix > 0 {
                flush_bitpacked(&self.buffer[..prefix], self.num_bits, &mut self.out);
            }
            self.rle_value = value;
            self.rle_count = RLE_THRESHOLD;
            self.buffer.clear();
            self.tail_count = 0;
        } else if self.buffer.len() == MAX_BITPACKED_RUN {
            flush_bitpacked(&self.buffer, self.num_bits, &mut self.out);
            self.buffer.clear();
            self.tail_count = 0;
        }
    }

    pub fn extend<I: IntoIterator<Item = u32>>(&mut self, values: I) {
        values.into_iter().for_each(|value| self.put(value));
    }

    /// Flushes pending runs and returns the encoded bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.rle_count > 0 {
            self.flush_rle();
        } else if !self.buffer.is_empty() {
            flush_bitpacked(&self.buffer, self.num_bits, &mut self.out);
        }
        self.out
    }

    fn flush_rle(&mut self) {
        let header = (self.rle_count as u64) << 1;
        let mut container = [0; 10];
        let used = uleb128::encode(header, &mut container);
        self.out.extend_from_slice(&container[..used]);
        let bytes = self.rle_value.to_le_bytes();
        self.out
            .extend_from_slice(&bytes[..ceil8(self.num_bits as usize)]);
        self.rle_count = 0;
    }
}

fn flush_bitpacked(values: &[u32], num_bits: u32, out: &mut Vec<u8>) {
    let header = ((ceil8(values.len()) as u64) << 1) | 1;
    let mut container = [0; 10];
    let used = uleb128::encode(header, &mut container);
    out.extend_from_slice(&container[..used]);
    bitpacked::encode(values, num_bits as usize, out);
}

/// Encodes `iterator` with the hybrid format at `num_bits`, without the
/// dictionary framing's leading bit-width byte.
pub fn encode<I: IntoIterator<Item = u32>>(iterator: I, num_bits: u32) -> Vec<u8> {
    let mut encoder = Encoder::new(num_bits);
    encoder.extend(iterator);
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::super::decode;
    use super::*;

    #[test]
    fn trailing_value_after_run() {
        // eight zeros collapse into an RLE run; the trailing one is
        // bit-packed on its own
        let values = [0u32, 0, 0, 0, 0, 0, 0, 0, 1];
        let encoded = encode(values.iter().copied(), 1);

        assert_eq!(encoded, vec![0b00010000, 0x00, 0b00000011, 0b00000001]);
        assert_eq!(decode(&encoded, values.len(), 1).unwrap(), values);
    }

    #[test]
    fn bitpacked_only() {
        let values = [0u32, 1, 2, 1, 2, 1, 1, 0, 3];
        let encoded = encode(values.iter().copied(), 2);

        assert_eq!(
            encoded,
            vec![
                (2 << 1 | 1),
                0b01_10_01_00,
                0b00_01_01_10,
                0b_00_00_00_11,
                0b_00_00_00_00, // group padding
            ]
        );
        assert_eq!(decode(&encoded, values.len(), 2).unwrap(), values);
    }

    #[test]
    fn prefix_then_run() {
        // a bit-packed prefix of 2 values, then an RLE run of 9
        let values = [2u32, 1, 3, 3, 3, 3, 3, 3, 3, 3, 3];
        let encoded = encode(values.iter().copied(), 2);

        assert_eq!(
            encoded,
            vec![
                0b00000011, // bit-packed, 1 group
                0b00_00_01_10,
                0b00_00_00_00, // group padding
                0b00010010, // rle, 9 values
                0b00000011,
            ]
        );
        assert_eq!(decode(&encoded, values.len(), 2).unwrap(), values);
    }

    #[test]
    fn bitpacked_run_is_capped() {
        let values = (0..130u32).map(|x| x % 3).collect::<Vec<_>>();
        let encoded = encode(values.iter().copied(), 2);

        // two full 64-value runs and a trailing one
        assert_eq!(encoded[0], (8 << 1) | 1);
        assert_eq!(decode(&encoded, values.len(), 2).unwrap(), values);
    }

    #[test]
    fn zero_width_run() {
        let values = vec![0u32; 17];
        let encoded = encode(values.iter().copied(), 0);

        // a single RLE run with no value bytes
        assert_eq!(encoded, vec![17 << 1]);
        assert_eq!(decode(&encoded, values.len(), 0).unwrap(), values);
    }

    #[test]
    fn alternating_long() {
        let values = (0..128u32).map(|x| x % 4).collect::<Vec<_>>();
        let encoded = encode(values.iter().copied(), 2);
        assert_eq!(decode(&encoded, values.len(), 2).unwrap(), values);
    }

    #[test]
    fn random_round_trip() {
        use rand::Rng;
        let mut rng = rand::rngs::mock::StepRng::new(0, 982_451_653);
        for num_bits in [0u32, 1, 2, 7, 16, 32] {
            let max = 1u64 << num_bits;
            let values = (0..1000)
                .map(|_| (rng.gen::<u64>() % max) as u32)
                .collect::<Vec<_>>();
            let encoded = encode(values.iter().copied(), num_bits);
            assert_eq!(decode(&encoded, values.len(), num_bits).unwrap(), values);
        }
    }
}
