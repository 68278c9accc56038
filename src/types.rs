use std::cmp::Ordering;
use std::convert::TryFrom;
use std::hash::Hash;

use crate::encoding::plain;
use crate::error::Result;
use crate::schema::types::PhysicalType;

/// A physical native representation of a Parquet fixed-sized type.
pub trait NativeType:
    std::fmt::Debug + Send + Sync + 'static + Copy + Clone + PartialEq + Default
{
    type Bytes: AsRef<[u8]>
        + Copy
        + Clone
        + Hash
        + Eq
        + for<'a> TryFrom<&'a [u8], Error = std::array::TryFromSliceError>;

    fn to_le_bytes(&self) -> Self::Bytes;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    const TYPE: PhysicalType;
}

macro_rules! native {
    ($type:ty, $physical_type:expr) => {
        impl NativeType for $type {
            type Bytes = [u8; std::mem::size_of::<Self>()];
            #[inline]
            fn to_le_bytes(&self) -> Self::Bytes {
                Self::to_le_bytes(*self)
            }

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }

            const TYPE: PhysicalType = $physical_type;
        }
    };
}

native!(i32, PhysicalType::Int32);
native!(i64, PhysicalType::Int64);
native!(f32, PhysicalType::Float);
native!(f64, PhysicalType::Double);

/// `[u32; 3]` is the legacy INT96: an opaque 12-byte little-endian container.
impl NativeType for [u32; 3] {
    type Bytes = [u8; 12];

    #[inline]
    fn to_le_bytes(&self) -> Self::Bytes {
        let mut bytes = [0; 12];
        self.iter().enumerate().for_each(|(i, value)| {
            bytes[i * 4..(i + 1) * 4].copy_from_slice(&value.to_le_bytes())
        });
        bytes
    }

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        let mut words = [0u32; 3];
        (0..3).for_each(|i| {
            words[i] = u32::from_le_bytes(bytes[i * 4..(i + 1) * 4].try_into().unwrap())
        });
        words
    }

    const TYPE: PhysicalType = PhysicalType::Int96;
}

/// A value that can flow through a typed column: PLAIN codable, dictionary
/// keyable, and orderable for statistics.
///
/// Implemented by `bool`, the [`NativeType`]s and `Vec<u8>` (byte arrays and
/// fixed-length byte arrays).
pub trait ParquetValue: Clone + PartialEq + std::fmt::Debug {
    type DictKey: Hash + Eq + std::fmt::Debug;

    /// Whether a column of `physical_type` holds values of this type.
    fn matches(physical_type: &PhysicalType) -> bool;

    fn dict_key(&self) -> Self::DictKey;

    /// The number of bytes [`ParquetValue::plain_encode`] appends for this
    /// value. Booleans round up to one byte.
    fn plain_encoded_len(&self) -> usize;

    /// PLAIN-encodes `values` into `buffer`. `fixed_length` is the schema's
    /// `type_length` for `FIXED_LEN_BYTE_ARRAY` columns and `None` otherwise.
    fn plain_encode(values: &[Self], buffer: &mut Vec<u8>, fixed_length: Option<usize>)
        -> Result<()>;

    /// Decodes exactly `num_values` PLAIN-encoded values from `buffer`.
    fn plain_decode(
        buffer: &[u8],
        num_values: usize,
        fixed_length: Option<usize>,
    ) -> Result<Vec<Self>>;

    /// The PLAIN-encoded size every value of this type occupies, when fixed:
    /// `None` for variable-length byte arrays and bit-packed booleans.
    fn plain_fixed_size(fixed_length: Option<usize>) -> Option<usize>;

    /// Statistics ordering: signed for integers, IEEE for floats, byte-wise
    /// lexicographic for byte arrays.
    fn compare(&self, other: &Self) -> Ordering;

    /// NaNs are excluded from min/max accumulation.
    fn is_nan(&self) -> bool {
        false
    }

    fn supports_dictionary() -> bool {
        true
    }

    /// The raw statistics representation: native little-endian bytes for
    /// fixed-width types, the raw bytes for byte arrays. No length prefix.
    fn stats_bytes(&self) -> Vec<u8>;
}

macro_rules! parquet_value_native {
    ($type:ty) => {
        impl ParquetValue for $type {
            type DictKey = <$type as NativeType>::Bytes;

            fn matches(physical_type: &PhysicalType) -> bool {
                physical_type == &<$type as NativeType>::TYPE
            }

            fn dict_key(&self) -> Self::DictKey {
                self.to_le_bytes()
            }

            fn plain_encoded_len(&self) -> usize {
                std::mem::size_of::<Self>()
            }

            fn plain_encode(
                values: &[Self],
                buffer: &mut Vec<u8>,
                _fixed_length: Option<usize>,
            ) -> Result<()> {
                plain::encode_native(values, buffer);
                Ok(())
            }

            fn plain_decode(
                buffer: &[u8],
                num_values: usize,
                _fixed_length: Option<usize>,
            ) -> Result<Vec<Self>> {
                plain::decode_native(buffer, num_values)
            }

            fn plain_fixed_size(_fixed_length: Option<usize>) -> Option<usize> {
                Some(std::mem::size_of::<Self>())
            }

            fn compare(&self, other: &Self) -> Ordering {
                self.partial_cmp(other).unwrap_or(Ordering::Equal)
            }

            fn stats_bytes(&self) -> Vec<u8> {
                self.to_le_bytes().as_ref().to_vec()
            }
        }
    };
}

parquet_value_native!(i32);
parquet_value_native!(i64);
parquet_value_native!([u32; 3]);

macro_rules! parquet_value_float {
    ($type:ty) => {
        impl ParquetValue for $type {
            type DictKey = <$type as NativeType>::Bytes;

            fn matches(physical_type: &PhysicalType) -> bool {
                physical_type == &<$type as NativeType>::TYPE
            }

            fn dict_key(&self) -> Self::DictKey {
                self.to_le_bytes()
            }

            fn plain_encoded_len(&self) -> usize {
                std::mem::size_of::<Self>()
            }

            fn plain_encode(
                values: &[Self],
                buffer: &mut Vec<u8>,
                _fixed_length: Option<usize>,
            ) -> Result<()> {
                plain::encode_native(values, buffer);
                Ok(())
            }

            fn plain_decode(
                buffer: &[u8],
                num_values: usize,
                _fixed_length: Option<usize>,
            ) -> Result<Vec<Self>> {
                plain::decode_native(buffer, num_values)
            }

            fn plain_fixed_size(_fixed_length: Option<usize>) -> Option<usize> {
                Some(std::mem::size_of::<Self>())
            }

            fn compare(&self, other: &Self) -> Ordering {
                self.partial_cmp(other).unwrap_or(Ordering::Equal)
            }

            fn is_nan(&self) -> bool {
                <$type>::is_nan(*self)
            }

            fn stats_bytes(&self) -> Vec<u8> {
                self.to_le_bytes().as_ref().to_vec()
            }
        }
    };
}

parquet_value_float!(f32);
parquet_value_float!(f64);

impl ParquetValue for bool {
    type DictKey = bool;

    fn matches(physical_type: &PhysicalType) -> bool {
        physical_type == &PhysicalType::Boolean
    }

    fn dict_key(&self) -> Self::DictKey {
        *self
    }

    fn plain_encoded_len(&self) -> usize {
        1
    }

    fn plain_encode(values: &[Self], buffer: &mut Vec<u8>, _: Option<usize>) -> Result<()> {
        plain::encode_boolean(values, buffer);
        Ok(())
    }

    fn plain_decode(buffer: &[u8], num_values: usize, _: Option<usize>) -> Result<Vec<Self>> {
        plain::decode_boolean(buffer, num_values)
    }

    fn plain_fixed_size(_fixed_length: Option<usize>) -> Option<usize> {
        None
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn supports_dictionary() -> bool {
        false
    }

    fn stats_bytes(&self) -> Vec<u8> {
        vec![*self as u8]
    }
}

impl ParquetValue for Vec<u8> {
    type DictKey = Vec<u8>;

    fn matches(physical_type: &PhysicalType) -> bool {
        matches!(
            physical_type,
            PhysicalType::ByteArray | PhysicalType::FixedLenByteArray(_)
        )
    }

    fn dict_key(&self) -> Self::DictKey {
        self.clone()
    }

    fn plain_encoded_len(&self) -> usize {
        self.len() + std::mem::size_of::<u32>()
    }

    fn plain_encode(
        values: &[Self],
        buffer: &mut Vec<u8>,
        fixed_length: Option<usize>,
    ) -> Result<()> {
        match fixed_length {
            Some(length) => plain::encode_fixed_len_byte_array(values, buffer, length),
            None => plain::encode_byte_array(values, buffer),
        }
    }

    fn plain_decode(
        buffer: &[u8],
        num_values: usize,
        fixed_length: Option<usize>,
    ) -> Result<Vec<Self>> {
        match fixed_length {
            Some(length) => plain::decode_fixed_len_byte_array(buffer, num_values, length),
            None => plain::decode_byte_array(buffer, num_values),
        }
    }

    fn plain_fixed_size(fixed_length: Option<usize>) -> Option<usize> {
        fixed_length
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn stats_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}
