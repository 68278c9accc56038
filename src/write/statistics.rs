use parquet_format_safe::Statistics as ParquetStatistics;

use crate::types::ParquetValue;

/// A running (min, max, null count) accumulator for one column chunk.
///
/// Integers compare signed, floats IEEE with NaN excluded from the bounds,
/// byte arrays byte-wise lexicographically.
#[derive(Debug)]
pub(crate) struct StatisticsAccumulator<T: ParquetValue> {
    min: Option<T>,
    max: Option<T>,
    null_count: i64,
}

impl<T: ParquetValue> StatisticsAccumulator<T> {
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
            null_count: 0,
        }
    }

    pub fn update(&mut self, value: &T) {
        if value.is_nan() {
            return;
        }
        match &self.min {
            Some(min) if value.compare(min) != std::cmp::Ordering::Less => {}
            _ => self.min = Some(value.clone()),
        }
        match &self.max {
            Some(max) if value.compare(max) != std::cmp::Ordering::Greater => {}
            _ => self.max = Some(value.clone()),
        }
    }

    pub fn update_nulls(&mut self, nulls: usize) {
        self.null_count += nulls as i64;
    }

    pub fn null_count(&self) -> i64 {
        self.null_count
    }

    /// Serializes the bounds into both the deprecated and the modern slots
    /// identically: raw little-endian bytes for fixed-width types, the raw
    /// bytes for byte arrays, with no length prefixes.
    pub fn serialize(&self) -> ParquetStatistics {
        let min = self.min.as_ref().map(|value| value.stats_bytes());
        let max = self.max.as_ref().map(|value| value.stats_bytes());
        ParquetStatistics {
            null_count: Some(self.null_count),
            distinct_count: None,
            min_value: min.clone(),
            max_value: max.clone(),
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_bounds() {
        let mut stats = StatisticsAccumulator::<i32>::new();
        for value in [3, -7, 11, 0] {
            stats.update(&value);
        }
        stats.update_nulls(2);
        let serialized = stats.serialize();
        assert_eq!(serialized.min_value, Some((-7i32).to_le_bytes().to_vec()));
        assert_eq!(serialized.max_value, Some(11i32.to_le_bytes().to_vec()));
        assert_eq!(serialized.min, serialized.min_value);
        assert_eq!(serialized.null_count, Some(2));
    }

    #[test]
    fn nan_is_excluded_from_bounds() {
        let mut stats = StatisticsAccumulator::<f64>::new();
        for value in [1.0, f64::NAN, -2.0] {
            stats.update(&value);
        }
        let serialized = stats.serialize();
        assert_eq!(serialized.min_value, Some((-2.0f64).to_le_bytes().to_vec()));
        assert_eq!(serialized.max_value, Some(1.0f64.to_le_bytes().to_vec()));
        assert_eq!(serialized.null_count, Some(0));
    }

    #[test]
    fn binary_bounds_are_lexicographic() {
        let mut stats = StatisticsAccumulator::<Vec<u8>>::new();
        for value in [b"b".to_vec(), b"aa".to_vec(), b"c".to_vec()] {
            stats.update(&value);
        }
        let serialized = stats.serialize();
        // no length prefix in the serialized bounds
        assert_eq!(serialized.min_value, Some(b"aa".to_vec()));
        assert_eq!(serialized.max_value, Some(b"c".to_vec()));
    }
}
