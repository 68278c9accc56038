use parquet_format_safe::ConvertedType;

use crate::error::{Error, Result};
use crate::parquet_bridge::{IntegerType, PrimitiveLogicalType, TimeUnit};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveConvertedType {
    Utf8,
    /// an enum is converted into a binary field
    Enum,
    /// A decimal value. This must be accompanied by a (maximum) precision and
    /// a scale in the `SchemaElement`.
    // (precision, scale)
    Decimal(i32, i32),
    /// A date, stored as days since Unix epoch, encoded as INT32.
    Date,
    /// Milliseconds since midnight, stored as INT32.
    TimeMillis,
    /// Microseconds since midnight, stored as INT64.
    TimeMicros,
    /// Milliseconds since the Unix epoch, stored as INT64.
    TimestampMillis,
    /// Microseconds since the Unix epoch, stored as INT64.
    TimestampMicros,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    /// A JSON document embedded within a single UTF8 column.
    Json,
    /// A BSON document embedded within a single BINARY column.
    Bson,
    /// A FIXED_LEN_BYTE_ARRAY(12) of three little-endian unsigned integers:
    /// months, days, milliseconds.
    Interval,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupConvertedType {
    /// a map is converted as an optional field containing a repeated
    /// key/value pair
    Map,
    /// a key/value pair is converted into a group of two fields
    MapKeyValue,
    /// a list is converted into an optional field containing a repeated
    /// field for its values
    List,
}

pub fn converted_to_primitive_converted(
    ty: &ConvertedType,
    maybe_decimal: Option<(i32, i32)>,
) -> Result<PrimitiveConvertedType> {
    use PrimitiveConvertedType::*;
    Ok(match *ty {
        ConvertedType::UTF8 => Utf8,
        ConvertedType::ENUM => Enum,
        ConvertedType::DECIMAL => {
            if let Some((precision, scale)) = maybe_decimal {
                Decimal(precision, scale)
            } else {
                return Err(Error::OutOfSpec(
                    "DECIMAL requires a precision and scale".to_string(),
                ));
            }
        }
        ConvertedType::DATE => Date,
        ConvertedType::TIME_MILLIS => TimeMillis,
        ConvertedType::TIME_MICROS => TimeMicros,
        ConvertedType::TIMESTAMP_MILLIS => TimestampMillis,
        ConvertedType::TIMESTAMP_MICROS => TimestampMicros,
        ConvertedType::UINT_8 => Uint8,
        ConvertedType::UINT_16 => Uint16,
        ConvertedType::UINT_32 => Uint32,
        ConvertedType::UINT_64 => Uint64,
        ConvertedType::INT_8 => Int8,
        ConvertedType::INT_16 => Int16,
        ConvertedType::INT_32 => Int32,
        ConvertedType::INT_64 => Int64,
        ConvertedType::JSON => Json,
        ConvertedType::BSON => Bson,
        ConvertedType::INTERVAL => Interval,
        _ => {
            return Err(Error::OutOfSpec(format!(
                "Converted type {:?} cannot annotate a primitive type",
                ty
            )))
        }
    })
}

pub fn primitive_converted_to_converted(
    ty: &PrimitiveConvertedType,
) -> (ConvertedType, Option<(i32, i32)>) {
    use PrimitiveConvertedType::*;
    match ty {
        Utf8 => (ConvertedType::UTF8, None),
        Enum => (ConvertedType::ENUM, None),
        Decimal(precision, scale) => (ConvertedType::DECIMAL, Some((*precision, *scale))),
        Date => (ConvertedType::DATE, None),
        TimeMillis => (ConvertedType::TIME_MILLIS, None),
        TimeMicros => (ConvertedType::TIME_MICROS, None),
        TimestampMillis => (ConvertedType::TIMESTAMP_MILLIS, None),
        TimestampMicros => (ConvertedType::TIMESTAMP_MICROS, None),
        Uint8 => (ConvertedType::UINT_8, None),
        Uint16 => (ConvertedType::UINT_16, None),
        Uint32 => (ConvertedType::UINT_32, None),
        Uint64 => (ConvertedType::UINT_64, None),
        Int8 => (ConvertedType::INT_8, None),
        Int16 => (ConvertedType::INT_16, None),
        Int32 => (ConvertedType::INT_32, None),
        Int64 => (ConvertedType::INT_64, None),
        Json => (ConvertedType::JSON, None),
        Bson => (ConvertedType::BSON, None),
        Interval => (ConvertedType::INTERVAL, None),
    }
}

pub fn converted_to_group_converted(ty: &ConvertedType) -> Result<GroupConvertedType> {
    use GroupConvertedType::*;
    Ok(match *ty {
        ConvertedType::MAP => Map,
        ConvertedType::MAP_KEY_VALUE => MapKeyValue,
        ConvertedType::LIST => List,
        _ => {
            return Err(Error::OutOfSpec(format!(
                "Converted type {:?} cannot annotate a group type",
                ty
            )))
        }
    })
}

pub fn group_converted_to_converted(ty: &GroupConvertedType) -> ConvertedType {
    use GroupConvertedType::*;
    match ty {
        Map => ConvertedType::MAP,
        MapKeyValue => ConvertedType::MAP_KEY_VALUE,
        List => ConvertedType::LIST,
    }
}

/// The legacy converted type equivalent to a logical annotation, for
/// backward compatibility. `None` for annotations without a legacy name
/// (UUID, Float16, unknown, nanosecond units).
pub fn logical_to_converted(
    logical: &PrimitiveLogicalType,
) -> Option<PrimitiveConvertedType> {
    use PrimitiveConvertedType::*;
    match logical {
        PrimitiveLogicalType::String => Some(Utf8),
        PrimitiveLogicalType::Enum => Some(Enum),
        PrimitiveLogicalType::Decimal(precision, scale) => {
            Some(Decimal(*precision as i32, *scale as i32))
        }
        PrimitiveLogicalType::Date => Some(Date),
        PrimitiveLogicalType::Time { unit, .. } => match unit {
            TimeUnit::Milliseconds => Some(TimeMillis),
            TimeUnit::Microseconds => Some(TimeMicros),
            TimeUnit::Nanoseconds => None,
        },
        PrimitiveLogicalType::Timestamp { unit, .. } => match unit {
            TimeUnit::Milliseconds => Some(TimestampMillis),
            TimeUnit::Microseconds => Some(TimestampMicros),
            TimeUnit::Nanoseconds => None,
        },
        PrimitiveLogicalType::Integer(integer) => Some(match integer {
            IntegerType::Int8 => Int8,
            IntegerType::Int16 => Int16,
            IntegerType::Int32 => Int32,
            IntegerType::Int64 => Int64,
            IntegerType::UInt8 => Uint8,
            IntegerType::UInt16 => Uint16,
            IntegerType::UInt32 => Uint32,
            IntegerType::UInt64 => Uint64,
        }),
        PrimitiveLogicalType::Json => Some(Json),
        PrimitiveLogicalType::Bson => Some(Bson),
        PrimitiveLogicalType::Unknown
        | PrimitiveLogicalType::Uuid
        | PrimitiveLogicalType::Float16 => None,
    }
}
