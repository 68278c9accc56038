use std::sync::Arc;

use parquet_format_safe::Statistics as ParquetStatistics;

use super::Statistics;
use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

#[derive(Debug, Clone, PartialEq)]
pub struct FixedLenStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<Vec<u8>>,
    pub max_value: Option<Vec<u8>>,
    pub physical_type: PhysicalType,
}

impl Statistics for FixedLenStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &self.physical_type
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

fn check(bytes: &[u8], length: usize) -> Result<Vec<u8>> {
    if bytes.len() != length {
        return Err(Error::OutOfSpec(format!(
            "the bounds of fixed-length statistics MUST have {} bytes",
            length
        )));
    }
    Ok(bytes.to_vec())
}

pub fn read(v: &ParquetStatistics, length: usize) -> Result<Arc<dyn Statistics>> {
    let max_value = v
        .max_value
        .as_deref()
        .or(v.max.as_deref())
        .map(|bytes| check(bytes, length))
        .transpose()?;
    let min_value = v
        .min_value
        .as_deref()
        .or(v.min.as_deref())
        .map(|bytes| check(bytes, length))
        .transpose()?;
    Ok(Arc::new(FixedLenStatistics {
        null_count: v.null_count,
        distinct_count: v.distinct_count,
        max_value,
        min_value,
        physical_type: PhysicalType::FixedLenByteArray(length as i32),
    }))
}

pub fn write(v: &FixedLenStatistics) -> ParquetStatistics {
    ParquetStatistics {
        null_count: v.null_count,
        distinct_count: v.distinct_count,
        max_value: v.max_value.clone(),
        min_value: v.min_value.clone(),
        max: v.max_value.clone(),
        min: v.min_value.clone(),
    }
}
