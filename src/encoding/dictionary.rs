//! A single-pass dictionary builder with a PLAIN dictionary page and an
//! RLE-encoded index stream, falling back once a configured cap is exceeded.

use std::collections::HashMap;

use super::{hybrid_rle, log2};
use crate::error::Result;
use crate::types::ParquetValue;

/// Default maximum number of distinct values a dictionary may hold.
pub const DEFAULT_MAX_ENTRIES: usize = 64 * 1024;
/// Default maximum PLAIN-encoded size of the dictionary, in bytes.
pub const DEFAULT_MAX_BYTES: usize = 1024 * 1024;

/// Builds a dictionary of unique values in first-seen order while buffering,
/// per page, the indices of the written values.
///
/// Once the number of distinct values or their encoded size would exceed the
/// caps, the builder falls back: the index buffer is dropped and subsequent
/// values are only counted. Fallback is sticky for the lifetime of the
/// builder (one column chunk).
#[derive(Debug)]
pub struct DictEncoder<T: ParquetValue> {
    values: Vec<T>,
    value_to_index: HashMap<T::DictKey, u32>,
    indices: Vec<u32>,
    fallen_back: bool,
    total_value_count: usize,
    dict_bytes: usize,
    sealed: bool,
    max_entries: usize,
    max_bytes: usize,
    fixed_length: Option<usize>,
}

impl<T: ParquetValue> DictEncoder<T> {
    pub fn new(max_entries: usize, max_bytes: usize, fixed_length: Option<usize>) -> Self {
        Self {
            values: vec![],
            value_to_index: HashMap::new(),
            indices: vec![],
            fallen_back: false,
            total_value_count: 0,
            dict_bytes: 0,
            sealed: false,
            max_entries,
            max_bytes,
            fixed_length,
        }
    }

    pub fn push(&mut self, value: &T) {
        self.total_value_count += 1;
        if self.fallen_back {
            return;
        }
        if let Some(index) = self.value_to_index.get(&value.dict_key()) {
            self.indices.push(*index);
            return;
        }
        let encoded_len = value.plain_encoded_len();
        if self.sealed
            || self.values.len() >= self.max_entries
            || self.dict_bytes + encoded_len > self.max_bytes
        {
            self.fallen_back = true;
            self.indices = vec![];
            return;
        }
        let index = self.values.len() as u32;
        self.value_to_index.insert(value.dict_key(), index);
        self.dict_bytes += encoded_len;
        self.values.push(value.clone());
        self.indices.push(index);
    }

    /// Whether pages of this chunk should be dictionary-encoded: false once
    /// fallen back or while the dictionary is empty.
    pub fn should_use_dictionary(&self) -> bool {
        !self.fallen_back && !self.values.is_empty()
    }

    pub fn fallen_back(&self) -> bool {
        self.fallen_back
    }

    /// The dictionary, in first-seen order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn num_entries(&self) -> usize {
        self.values.len()
    }

    pub fn total_value_count(&self) -> usize {
        self.total_value_count
    }

    /// Marks the dictionary page as emitted. The dictionary is never mutated
    /// thereafter: a later novel value triggers fallback instead.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// The PLAIN-encoded dictionary page body.
    pub fn dictionary_data(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.dict_bytes);
        T::plain_encode(&self.values, &mut buffer, self.fixed_length)?;
        Ok(buffer)
    }

    /// The bit-width of the index stream.
    pub fn bit_width(&self) -> u32 {
        log2(self.values.len() as u64)
    }

    /// The data-page body: a bit-width byte followed by the RLE-encoded
    /// indices of the current page.
    pub fn indices_data(&self) -> Vec<u8> {
        let bit_width = self.bit_width();
        let runs = hybrid_rle::encode(self.indices.iter().copied(), bit_width);
        let mut out = Vec::with_capacity(1 + runs.len());
        out.push(bit_width as u8);
        out.extend_from_slice(&runs);
        out
    }

    pub fn page_indices(&self) -> &[u32] {
        &self.indices
    }

    /// Releases the per-page index buffer after a page flush. The dictionary
    /// and the total value count persist.
    pub fn clear_page_indices(&mut self) {
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::hybrid_rle;

    #[test]
    fn indices_in_first_seen_order() {
        let mut encoder = DictEncoder::<i32>::new(100, 1024, None);
        for value in [7, 3, 7, 7, 5] {
            encoder.push(&value);
        }
        assert_eq!(encoder.values(), &[7, 3, 5]);
        assert_eq!(encoder.page_indices(), &[0, 1, 0, 0, 2]);
        assert_eq!(encoder.bit_width(), 2);
        assert!(encoder.should_use_dictionary());
        assert_eq!(encoder.total_value_count(), 5);
    }

    #[test]
    fn indices_round_trip() {
        let mut encoder = DictEncoder::<Vec<u8>>::new(100, 1024, None);
        let values: Vec<Vec<u8>> = (0..100).map(|i| vec![(i % 4) as u8]).collect();
        for value in &values {
            encoder.push(value);
        }
        let data = encoder.indices_data();
        let bit_width = data[0] as u32;
        assert_eq!(bit_width, 2);
        let indices = hybrid_rle::decode(&data[1..], 100, bit_width).unwrap();
        let decoded: Vec<Vec<u8>> = indices
            .iter()
            .map(|index| encoder.values()[*index as usize].clone())
            .collect();
        assert_eq!(decoded, values);
    }

    #[test]
    fn falls_back_on_cardinality() {
        let mut encoder = DictEncoder::<i32>::new(2, 1024, None);
        encoder.push(&1);
        encoder.push(&2);
        assert!(!encoder.fallen_back());
        encoder.push(&3);
        assert!(encoder.fallen_back());
        assert!(!encoder.should_use_dictionary());
        assert!(encoder.page_indices().is_empty());

        // fallback is sticky, values are still counted
        encoder.push(&1);
        assert!(encoder.fallen_back());
        assert_eq!(encoder.total_value_count(), 4);
    }

    #[test]
    fn falls_back_on_bytes() {
        let mut encoder = DictEncoder::<Vec<u8>>::new(100, 10, None);
        encoder.push(&vec![0u8; 4]); // 8 encoded bytes
        assert!(!encoder.fallen_back());
        encoder.push(&vec![1u8; 4]);
        assert!(encoder.fallen_back());
    }

    #[test]
    fn sealed_dictionary_rejects_novel_values() {
        let mut encoder = DictEncoder::<i32>::new(100, 1024, None);
        encoder.push(&1);
        encoder.seal();
        encoder.push(&1);
        assert!(!encoder.fallen_back());
        encoder.push(&2);
        assert!(encoder.fallen_back());
    }

    #[test]
    fn page_indices_are_cleared_but_dictionary_persists() {
        let mut encoder = DictEncoder::<i32>::new(100, 1024, None);
        encoder.push(&1);
        encoder.push(&2);
        encoder.clear_page_indices();
        assert!(encoder.page_indices().is_empty());
        assert_eq!(encoder.num_entries(), 2);
        encoder.push(&2);
        assert_eq!(encoder.page_indices(), &[1]);
        assert_eq!(encoder.total_value_count(), 3);
    }

    #[test]
    fn single_entry_dictionary_has_zero_width() {
        let mut encoder = DictEncoder::<i32>::new(100, 1024, None);
        for _ in 0..10 {
            encoder.push(&42);
        }
        assert_eq!(encoder.bit_width(), 0);
        let data = encoder.indices_data();
        assert_eq!(data[0], 0);
        let indices = hybrid_rle::decode(&data[1..], 10, 0).unwrap();
        assert_eq!(indices, vec![0; 10]);
    }
}
