use std::sync::Arc;

use parquet_format_safe::Statistics as ParquetStatistics;

use super::Statistics;
use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveStatistics<T: NativeType> {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<T>,
    pub max_value: Option<T>,
}

impl<T: NativeType> Statistics for PrimitiveStatistics<T> {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &T::TYPE
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

fn decode<T: NativeType>(bytes: &[u8]) -> Result<T> {
    if bytes.len() != std::mem::size_of::<T::Bytes>() {
        return Err(Error::OutOfSpec(
            "the bounds of primitive statistics MUST be the size of the type".to_string(),
        ));
    }
    Ok(T::from_le_bytes(bytes.try_into().unwrap()))
}

pub fn read<T: NativeType>(v: &ParquetStatistics) -> Result<Arc<dyn Statistics>> {
    let max_value = v
        .max_value
        .as_deref()
        .or(v.max.as_deref())
        .map(decode::<T>)
        .transpose()?;
    let min_value = v
        .min_value
        .as_deref()
        .or(v.min.as_deref())
        .map(decode::<T>)
        .transpose()?;
    Ok(Arc::new(PrimitiveStatistics::<T> {
        null_count: v.null_count,
        distinct_count: v.distinct_count,
        max_value,
        min_value,
    }))
}

pub fn write<T: NativeType>(v: &PrimitiveStatistics<T>) -> ParquetStatistics {
    ParquetStatistics {
        null_count: v.null_count,
        distinct_count: v.distinct_count,
        max_value: v.max_value.map(|x| x.to_le_bytes().as_ref().to_vec()),
        min_value: v.min_value.map(|x| x.to_le_bytes().as_ref().to_vec()),
        max: v.max_value.map(|x| x.to_le_bytes().as_ref().to_vec()),
        min: v.min_value.map(|x| x.to_le_bytes().as_ref().to_vec()),
    }
}
