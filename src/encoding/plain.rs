//! The PLAIN encoding: native little-endian layouts for fixed-width types,
//! LSB-first bit-packing for booleans, 4-byte little-endian length prefixes
//! for byte arrays.

use std::convert::TryInto;

use super::ceil8;
use crate::error::{Error, Result};
use crate::types::NativeType;

pub fn encode_native<T: NativeType>(values: &[T], buffer: &mut Vec<u8>) {
    buffer.reserve(values.len() * std::mem::size_of::<T::Bytes>());
    values
        .iter()
        .for_each(|value| buffer.extend_from_slice(value.to_le_bytes().as_ref()));
}

pub fn decode_native<T: NativeType>(buffer: &[u8], num_values: usize) -> Result<Vec<T>> {
    let size = std::mem::size_of::<T::Bytes>();
    if buffer.len() < num_values * size {
        return Err(Error::InsufficientData);
    }
    Ok(buffer
        .chunks_exact(size)
        .take(num_values)
        .map(|chunk| {
            // infallible by construction
            let chunk: T::Bytes = chunk.try_into().unwrap();
            T::from_le_bytes(chunk)
        })
        .collect())
}

pub fn encode_boolean(values: &[bool], buffer: &mut Vec<u8>) {
    buffer.reserve(ceil8(values.len()));
    for chunk in values.chunks(8) {
        let mut byte = 0u8;
        chunk.iter().enumerate().for_each(|(i, value)| {
            byte |= (*value as u8) << i;
        });
        buffer.push(byte);
    }
}

pub fn decode_boolean(buffer: &[u8], num_values: usize) -> Result<Vec<bool>> {
    if buffer.len() < ceil8(num_values) {
        return Err(Error::InsufficientData);
    }
    Ok((0..num_values)
        .map(|i| buffer[i / 8] >> (i % 8) & 1 == 1)
        .collect())
}

pub fn encode_byte_array(values: &[Vec<u8>], buffer: &mut Vec<u8>) -> Result<()> {
    for value in values {
        let length: i32 = value
            .len()
            .try_into()
            .map_err(|_| Error::InvalidData("a byte array exceeds i32::MAX bytes".to_string()))?;
        buffer.extend_from_slice(&(length as u32).to_le_bytes());
        buffer.extend_from_slice(value);
    }
    Ok(())
}

pub fn decode_byte_array(buffer: &[u8], num_values: usize) -> Result<Vec<Vec<u8>>> {
    let mut values = Vec::with_capacity(num_values);
    let mut offset = 0;
    for _ in 0..num_values {
        if buffer.len() < offset + 4 {
            return Err(Error::InsufficientData);
        }
        let length = u32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4;
        if buffer.len() < offset + length {
            return Err(Error::InsufficientData);
        }
        values.push(buffer[offset..offset + length].to_vec());
        offset += length;
    }
    Ok(values)
}

/// Counts the byte arrays `buffer` holds, consuming it exactly.
pub fn count_byte_arrays(buffer: &[u8]) -> Result<usize> {
    let mut count = 0;
    let mut offset = 0;
    while offset < buffer.len() {
        if buffer.len() < offset + 4 {
            return Err(Error::InsufficientData);
        }
        let length = u32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4 + length;
        if buffer.len() < offset {
            return Err(Error::InsufficientData);
        }
        count += 1;
    }
    Ok(count)
}

pub fn encode_fixed_len_byte_array(
    values: &[Vec<u8>],
    buffer: &mut Vec<u8>,
    length: usize,
) -> Result<()> {
    for value in values {
        if value.len() != length {
            return Err(Error::ValueSizeMismatch {
                expected: length,
                got: value.len(),
            });
        }
        buffer.extend_from_slice(value);
    }
    Ok(())
}

pub fn decode_fixed_len_byte_array(
    buffer: &[u8],
    num_values: usize,
    length: usize,
) -> Result<Vec<Vec<u8>>> {
    if buffer.len() < num_values * length {
        return Err(Error::InsufficientData);
    }
    Ok(buffer
        .chunks_exact(length)
        .take(num_values)
        .map(|chunk| chunk.to_vec())
        .collect())
}

/// UTF-8 strings share the byte-array layout.
pub fn encode_utf8(values: &[String], buffer: &mut Vec<u8>) -> Result<()> {
    for value in values {
        let length: i32 = value
            .len()
            .try_into()
            .map_err(|_| Error::InvalidData("a string exceeds i32::MAX bytes".to_string()))?;
        buffer.extend_from_slice(&(length as u32).to_le_bytes());
        buffer.extend_from_slice(value.as_bytes());
    }
    Ok(())
}

pub fn decode_utf8(buffer: &[u8], num_values: usize) -> Result<Vec<String>> {
    decode_byte_array(buffer, num_values)?
        .into_iter()
        .map(|value| {
            String::from_utf8(value)
                .map_err(|e| Error::InvalidData(format!("invalid utf8: {}", e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_round_trip() {
        let values = vec![1i32, -1, i32::MAX, i32::MIN, 0];
        let mut buffer = vec![];
        encode_native(&values, &mut buffer);
        assert_eq!(buffer.len(), 20);
        assert_eq!(decode_native::<i32>(&buffer, 5).unwrap(), values);
    }

    #[test]
    fn native_truncated() {
        let mut buffer = vec![];
        encode_native(&[1i64], &mut buffer);
        buffer.pop();
        assert_eq!(
            decode_native::<i64>(&buffer, 1),
            Err(Error::InsufficientData)
        );
    }

    #[test]
    fn int96_layout() {
        let values: Vec<[u32; 3]> = vec![[1, 2, 3]];
        let mut buffer = vec![];
        encode_native(&values, &mut buffer);
        assert_eq!(buffer.len(), 12);
        assert_eq!(decode_native::<[u32; 3]>(&buffer, 1).unwrap(), values);
    }

    #[test]
    fn boolean_bit_packing() {
        let values = vec![true, false, false, true, true, true, false, false, true];
        let mut buffer = vec![];
        encode_boolean(&values, &mut buffer);
        assert_eq!(buffer, vec![0b00111001, 0b00000001]);
        assert_eq!(decode_boolean(&buffer, 9).unwrap(), values);
    }

    #[test]
    fn byte_array_round_trip() {
        let values = vec![b"hello".to_vec(), vec![], b"parquet".to_vec()];
        let mut buffer = vec![];
        encode_byte_array(&values, &mut buffer).unwrap();
        assert_eq!(&buffer[..4], &5u32.to_le_bytes());
        assert_eq!(decode_byte_array(&buffer, 3).unwrap(), values);
    }

    #[test]
    fn byte_array_truncated() {
        let values = vec![b"hello".to_vec()];
        let mut buffer = vec![];
        encode_byte_array(&values, &mut buffer).unwrap();
        assert_eq!(
            decode_byte_array(&buffer[..7], 1),
            Err(Error::InsufficientData)
        );
        assert_eq!(decode_byte_array(&[1, 0], 1), Err(Error::InsufficientData));
    }

    #[test]
    fn byte_array_counting() {
        let values = vec![b"hello".to_vec(), vec![], b"x".to_vec()];
        let mut buffer = vec![];
        encode_byte_array(&values, &mut buffer).unwrap();
        assert_eq!(count_byte_arrays(&buffer).unwrap(), 3);
        assert_eq!(count_byte_arrays(&[]).unwrap(), 0);
        assert_eq!(
            count_byte_arrays(&buffer[..buffer.len() - 1]),
            Err(Error::InsufficientData)
        );
    }

    #[test]
    fn fixed_len_checks_length() {
        let values = vec![vec![1u8, 2, 3]];
        let mut buffer = vec![];
        assert_eq!(
            encode_fixed_len_byte_array(&values, &mut buffer, 4),
            Err(Error::ValueSizeMismatch {
                expected: 4,
                got: 3
            })
        );
        encode_fixed_len_byte_array(&values, &mut buffer, 3).unwrap();
        assert_eq!(buffer, vec![1, 2, 3]);
        assert_eq!(decode_fixed_len_byte_array(&buffer, 1, 3).unwrap(), values);
    }

    #[test]
    fn utf8_round_trip() {
        let values = vec!["a".to_string(), "é".to_string()];
        let mut buffer = vec![];
        encode_utf8(&values, &mut buffer).unwrap();
        assert_eq!(decode_utf8(&buffer, 2).unwrap(), values);
    }

    #[test]
    fn invalid_utf8_errors() {
        let values = vec![vec![0xFFu8, 0xFE]];
        let mut buffer = vec![];
        encode_byte_array(&values, &mut buffer).unwrap();
        assert!(matches!(
            decode_utf8(&buffer, 1),
            Err(Error::InvalidData(_))
        ));
    }
}
