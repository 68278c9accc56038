use parquet_format_safe::Type;

use crate::error::{Error, Result};

/// The on-disk representation of leaf values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    /// Read-only legacy 12-byte type.
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(i32),
}

impl PhysicalType {
    /// The declared length of `FIXED_LEN_BYTE_ARRAY` values, if any.
    pub fn fixed_length(&self) -> Option<usize> {
        match self {
            PhysicalType::FixedLenByteArray(length) => Some(*length as usize),
            _ => None,
        }
    }
}

pub fn type_to_physical_type(type_: &Type, length: Option<i32>) -> Result<PhysicalType> {
    Ok(match *type_ {
        Type::BOOLEAN => PhysicalType::Boolean,
        Type::INT32 => PhysicalType::Int32,
        Type::INT64 => PhysicalType::Int64,
        Type::INT96 => PhysicalType::Int96,
        Type::FLOAT => PhysicalType::Float,
        Type::DOUBLE => PhysicalType::Double,
        Type::BYTE_ARRAY => PhysicalType::ByteArray,
        Type::FIXED_LEN_BYTE_ARRAY => {
            let length = length.ok_or_else(|| {
                Error::OutOfSpec("Length must be defined for FixedLenByteArray".to_string())
            })?;
            if length <= 0 {
                return Err(Error::OutOfSpec(format!(
                    "FixedLenByteArray must have a positive length; it is {}",
                    length
                )));
            }
            PhysicalType::FixedLenByteArray(length)
        }
        _ => return Err(Error::OutOfSpec("Thrift type out of range".to_string())),
    })
}

pub fn physical_type_to_type(physical_type: &PhysicalType) -> (Type, Option<i32>) {
    match physical_type {
        PhysicalType::Boolean => (Type::BOOLEAN, None),
        PhysicalType::Int32 => (Type::INT32, None),
        PhysicalType::Int64 => (Type::INT64, None),
        PhysicalType::Int96 => (Type::INT96, None),
        PhysicalType::Float => (Type::FLOAT, None),
        PhysicalType::Double => (Type::DOUBLE, None),
        PhysicalType::ByteArray => (Type::BYTE_ARRAY, None),
        PhysicalType::FixedLenByteArray(length) => (Type::FIXED_LEN_BYTE_ARRAY, Some(*length)),
    }
}
