use crate::error::{Error, Result};

/// The maximum number of bytes a `u64` varint may span.
const MAX_VARINT_LEN: usize = 10;

/// Decodes a ULEB128-encoded `u64` from the start of `values`, returning the
/// value and the number of bytes consumed.
pub fn decode(values: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0;
    let mut shift = 0;

    let mut consumed = 0;
    for byte in values {
        if consumed == MAX_VARINT_LEN {
            return Err(Error::MalformedVarint);
        }
        consumed += 1;

        result |= u64::from(byte & 0x7f) << shift;

        if byte & 0x80 == 0 {
            return Ok((result, consumed));
        }

        shift += 7;
    }
    // the continuation bit of the last available byte was set
    Err(Error::TruncatedRuns)
}

/// Encodes `value` into `container`, returning the number of bytes used.
///
/// # Panics
/// Iff `container` has fewer than 10 bytes.
pub fn encode(mut value: u64, container: &mut [u8]) -> usize {
    let mut consumed = 0;
    let mut iter = container.iter_mut();
    loop {
        let byte = iter.next().unwrap();
        if value < 128 {
            *byte = value as u8;
            consumed += 1;
            break;
        }
        *byte = 0x80 | (value & 0x7f) as u8;
        value >>= 7;
        consumed += 1;
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_1() {
        let data = vec![0xe5, 0x8e, 0x26, 0xDE, 0xAD, 0xBE, 0xEF];
        let (value, len) = decode(&data).unwrap();
        assert_eq!(value, 624_485);
        assert_eq!(len, 3);
    }

    #[test]
    fn decode_2() {
        let data = vec![0b00010000, 0b00000001, 0b00000011, 0b00000011];
        let (value, len) = decode(&data).unwrap();
        assert_eq!(value, 16);
        assert_eq!(len, 1);
    }

    #[test]
    fn decode_overlong() {
        let data = vec![0x80; 11];
        assert_eq!(decode(&data), Err(Error::MalformedVarint));
    }

    #[test]
    fn decode_truncated() {
        let data = vec![0x80, 0x80];
        assert_eq!(decode(&data), Err(Error::TruncatedRuns));
    }

    #[test]
    fn round_trip() {
        let mut container = [0u8; 10];
        for value in [0u64, 1, 127, 128, 624_485, u64::from(u32::MAX), u64::MAX] {
            let used = encode(value, &mut container);
            let (decoded, consumed) = decode(&container[..used]).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, used);
        }
    }
}
