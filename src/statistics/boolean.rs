use std::sync::Arc;

use parquet_format_safe::Statistics as ParquetStatistics;

use super::Statistics;
use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<bool>,
    pub max_value: Option<bool>,
}

impl Statistics for BooleanStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &PhysicalType::Boolean
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

fn decode(bytes: &[u8]) -> Result<bool> {
    if bytes.len() != 1 {
        return Err(Error::OutOfSpec(
            "the bounds of boolean statistics MUST be a single byte".to_string(),
        ));
    }
    Ok(bytes[0] != 0)
}

pub fn read(v: &ParquetStatistics) -> Result<Arc<dyn Statistics>> {
    let max_value = v
        .max_value
        .as_deref()
        .or(v.max.as_deref())
        .map(decode)
        .transpose()?;
    let min_value = v
        .min_value
        .as_deref()
        .or(v.min.as_deref())
        .map(decode)
        .transpose()?;
    Ok(Arc::new(BooleanStatistics {
        null_count: v.null_count,
        distinct_count: v.distinct_count,
        max_value,
        min_value,
    }))
}

pub fn write(v: &BooleanStatistics) -> ParquetStatistics {
    ParquetStatistics {
        null_count: v.null_count,
        distinct_count: v.distinct_count,
        max_value: v.max_value.map(|x| vec![x as u8]),
        min_value: v.min_value.map(|x| vec![x as u8]),
        max: v.max_value.map(|x| vec![x as u8]),
        min: v.min_value.map(|x| vec![x as u8]),
    }
}
