mod binary;
mod boolean;
mod fixed_len_binary;
mod primitive;

use std::sync::Arc;

pub use binary::BinaryStatistics;
pub use boolean::BooleanStatistics;
pub use fixed_len_binary::FixedLenStatistics;
pub use primitive::PrimitiveStatistics;

use parquet_format_safe::Statistics as ParquetStatistics;

use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::schema::types::PhysicalType;

/// A trait used to describe specific statistics. Each physical type has its
/// own struct. Each of them can be `downcast_ref` from `dyn Statistics`.
pub trait Statistics: Send + Sync + std::fmt::Debug {
    fn as_any(&self) -> &dyn std::any::Any;

    fn physical_type(&self) -> &PhysicalType;

    fn null_count(&self) -> Option<i64>;
}

impl PartialEq for &dyn Statistics {
    fn eq(&self, other: &Self) -> bool {
        self.physical_type() == other.physical_type() && {
            match self.physical_type() {
                PhysicalType::Boolean => {
                    self.as_any().downcast_ref::<BooleanStatistics>()
                        == other.as_any().downcast_ref::<BooleanStatistics>()
                }
                PhysicalType::Int32 => {
                    self.as_any().downcast_ref::<PrimitiveStatistics<i32>>()
                        == other.as_any().downcast_ref::<PrimitiveStatistics<i32>>()
                }
                PhysicalType::Int64 => {
                    self.as_any().downcast_ref::<PrimitiveStatistics<i64>>()
                        == other.as_any().downcast_ref::<PrimitiveStatistics<i64>>()
                }
                PhysicalType::Float => {
                    self.as_any().downcast_ref::<PrimitiveStatistics<f32>>()
                        == other.as_any().downcast_ref::<PrimitiveStatistics<f32>>()
                }
                PhysicalType::Double => {
                    self.as_any().downcast_ref::<PrimitiveStatistics<f64>>()
                        == other.as_any().downcast_ref::<PrimitiveStatistics<f64>>()
                }
                PhysicalType::ByteArray => {
                    self.as_any().downcast_ref::<BinaryStatistics>()
                        == other.as_any().downcast_ref::<BinaryStatistics>()
                }
                PhysicalType::FixedLenByteArray(_) => {
                    self.as_any().downcast_ref::<FixedLenStatistics>()
                        == other.as_any().downcast_ref::<FixedLenStatistics>()
                }
                PhysicalType::Int96 => false,
            }
        }
    }
}

/// Deserializes the statistics in the column chunk metadata into typed
/// statistics, following the column's physical type.
pub fn deserialize_statistics(
    statistics: &ParquetStatistics,
    descriptor: &ColumnDescriptor,
) -> Result<Arc<dyn Statistics>> {
    match descriptor.physical_type() {
        PhysicalType::Boolean => boolean::read(statistics),
        PhysicalType::Int32 => primitive::read::<i32>(statistics),
        PhysicalType::Int64 => primitive::read::<i64>(statistics),
        PhysicalType::Float => primitive::read::<f32>(statistics),
        PhysicalType::Double => primitive::read::<f64>(statistics),
        PhysicalType::ByteArray => binary::read(statistics),
        PhysicalType::FixedLenByteArray(length) => {
            fixed_len_binary::read(statistics, *length as usize)
        }
        PhysicalType::Int96 => Err(Error::OutOfSpec(
            "INT96 columns do not carry statistics".to_string(),
        )),
    }
}

/// Serializes typed statistics into their thrift representation. Both the
/// deprecated and the modern slots are populated identically, with raw
/// little-endian or raw bytes and no length prefixes.
pub fn serialize_statistics(statistics: &dyn Statistics) -> ParquetStatistics {
    match statistics.physical_type() {
        PhysicalType::Boolean => boolean::write(statistics.as_any().downcast_ref().unwrap()),
        PhysicalType::Int32 => primitive::write::<i32>(statistics.as_any().downcast_ref().unwrap()),
        PhysicalType::Int64 => primitive::write::<i64>(statistics.as_any().downcast_ref().unwrap()),
        PhysicalType::Float => primitive::write::<f32>(statistics.as_any().downcast_ref().unwrap()),
        PhysicalType::Double => {
            primitive::write::<f64>(statistics.as_any().downcast_ref().unwrap())
        }
        PhysicalType::ByteArray => binary::write(statistics.as_any().downcast_ref().unwrap()),
        PhysicalType::FixedLenByteArray(_) => {
            fixed_len_binary::write(statistics.as_any().downcast_ref().unwrap())
        }
        PhysicalType::Int96 => unreachable!(),
    }
}
