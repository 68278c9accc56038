// see https://github.com/apache/parquet-format/blob/master/LogicalTypes.md
use crate::error::{Error, Result};
use crate::parquet_bridge::{IntegerType, PrimitiveLogicalType, TimeUnit};

use super::{PhysicalType, PrimitiveConvertedType};

fn check_decimal_invariants(
    physical_type: &PhysicalType,
    precision: i32,
    scale: i32,
) -> Result<()> {
    if precision < 1 {
        return Err(Error::OutOfSpec(format!(
            "DECIMAL precision must be larger than 0; It is {}",
            precision
        )));
    }
    if scale < 0 {
        return Err(Error::OutOfSpec(format!(
            "DECIMAL scale must not be negative; It is {}",
            scale
        )));
    }
    if scale > precision {
        return Err(Error::OutOfSpec(format!(
            "Invalid DECIMAL: scale ({}) cannot be greater than precision ({})",
            scale, precision
        )));
    }

    match physical_type {
        PhysicalType::Int32 => {
            if !(1..=9).contains(&precision) {
                return Err(Error::OutOfSpec(format!(
                    "Cannot represent INT32 as DECIMAL with precision {}",
                    precision
                )));
            }
        }
        PhysicalType::Int64 => {
            if !(1..=18).contains(&precision) {
                return Err(Error::OutOfSpec(format!(
                    "Cannot represent INT64 as DECIMAL with precision {}",
                    precision
                )));
            }
        }
        PhysicalType::FixedLenByteArray(length) => {
            let max_precision = (2f64.powi(8 * length - 1) - 1f64).log10().floor() as i32;

            if precision > max_precision {
                return Err(Error::OutOfSpec(format!(
                    "Cannot represent FIXED_LEN_BYTE_ARRAY as DECIMAL with length {} and \
                    precision {}. The max precision can only be {}",
                    length, precision, max_precision
                )));
            }
        }
        PhysicalType::ByteArray => {}
        _ => {
            return Err(Error::OutOfSpec(
                "DECIMAL can only annotate INT32, INT64, BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY"
                    .to_string(),
            ))
        }
    };
    Ok(())
}

pub fn check_converted_invariants(
    physical_type: &PhysicalType,
    converted_type: &Option<PrimitiveConvertedType>,
) -> Result<()> {
    let converted_type = match converted_type {
        Some(converted_type) => converted_type,
        None => return Ok(()),
    };

    use PrimitiveConvertedType::*;
    match converted_type {
        Utf8 | Bson | Json => {
            if physical_type != &PhysicalType::ByteArray {
                return Err(Error::OutOfSpec(format!(
                    "{:?} can only annotate BYTE_ARRAY fields",
                    converted_type
                )));
            }
        }
        Decimal(precision, scale) => {
            check_decimal_invariants(physical_type, *precision, *scale)?;
        }
        Date | TimeMillis | Uint8 | Uint16 | Uint32 | Int8 | Int16 | Int32 => {
            if physical_type != &PhysicalType::Int32 {
                return Err(Error::OutOfSpec(format!(
                    "{:?} can only annotate INT32",
                    converted_type
                )));
            }
        }
        TimeMicros | TimestampMillis | TimestampMicros | Uint64 | Int64 => {
            if physical_type != &PhysicalType::Int64 {
                return Err(Error::OutOfSpec(format!(
                    "{:?} can only annotate INT64",
                    converted_type
                )));
            }
        }
        Interval => {
            if physical_type != &PhysicalType::FixedLenByteArray(12) {
                return Err(Error::OutOfSpec(
                    "INTERVAL can only annotate FIXED_LEN_BYTE_ARRAY(12)".to_string(),
                ));
            }
        }
        Enum => {
            if physical_type != &PhysicalType::ByteArray {
                return Err(Error::OutOfSpec(
                    "ENUM can only annotate BYTE_ARRAY fields".to_string(),
                ));
            }
        }
    };
    Ok(())
}

pub fn check_logical_invariants(
    physical_type: &PhysicalType,
    logical_type: &Option<PrimitiveLogicalType>,
) -> Result<()> {
    let logical_type = match logical_type {
        Some(logical_type) => logical_type,
        None => return Ok(()),
    };

    // Check that the logical type and physical type are compatible
    match (logical_type, physical_type) {
        (PrimitiveLogicalType::Enum, PhysicalType::ByteArray) => {}
        (PrimitiveLogicalType::Decimal(precision, scale), _) => {
            check_decimal_invariants(physical_type, *precision as i32, *scale as i32)?;
        }
        (PrimitiveLogicalType::Date, PhysicalType::Int32) => {}
        (
            PrimitiveLogicalType::Time {
                unit: TimeUnit::Milliseconds,
                ..
            },
            PhysicalType::Int32,
        ) => {}
        (PrimitiveLogicalType::Time { unit, .. }, PhysicalType::Int64) => {
            if unit == &TimeUnit::Milliseconds {
                return Err(Error::OutOfSpec(
                    "Cannot use millisecond unit on INT64 type".to_string(),
                ));
            }
        }
        (PrimitiveLogicalType::Timestamp { .. }, PhysicalType::Int64) => {}
        (PrimitiveLogicalType::Integer(integer), PhysicalType::Int32) => {
            let (bit_width, _) = (*integer).into();
            if bit_width > 32 {
                return Err(Error::OutOfSpec(format!(
                    "INTEGER({}) cannot annotate INT32",
                    bit_width
                )));
            }
        }
        (PrimitiveLogicalType::Integer(integer), PhysicalType::Int64) => {
            if integer != &IntegerType::Int64 && integer != &IntegerType::UInt64 {
                return Err(Error::OutOfSpec(
                    "Only INTEGER(64) can annotate INT64".to_string(),
                ));
            }
        }
        // Null type
        (PrimitiveLogicalType::Unknown, PhysicalType::Int32) => {}
        (PrimitiveLogicalType::String, PhysicalType::ByteArray) => {}
        (PrimitiveLogicalType::Json, PhysicalType::ByteArray) => {}
        (PrimitiveLogicalType::Bson, PhysicalType::ByteArray) => {}
        // https://github.com/apache/parquet-format/blob/master/LogicalTypes.md#uuid
        (PrimitiveLogicalType::Uuid, PhysicalType::FixedLenByteArray(16)) => {}
        (PrimitiveLogicalType::Float16, PhysicalType::FixedLenByteArray(2)) => {}
        (a, b) => {
            return Err(Error::OutOfSpec(format!(
                "Cannot annotate {:?} from {:?} fields",
                a, b
            )))
        }
    };
    Ok(())
}
