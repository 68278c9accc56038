use parquet_format_safe::{ColumnChunk, ColumnMetaData, Statistics};

use crate::compression::Compression;
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

use super::column_descriptor::ColumnDescriptor;

/// Metadata for a column chunk.
// This contains the `ColumnDescriptor` associated with the chunk so that
// deserializers have access to the descriptor (e.g. physical, converted,
// logical).
#[derive(Debug, Clone)]
pub struct ColumnChunkMetaData {
    column_chunk: ColumnChunk,
    column_descr: ColumnDescriptor,
    compression: Compression,
}

/// Represents common operations for a column chunk.
impl ColumnChunkMetaData {
    /// File where the column chunk is stored.
    ///
    /// If not set, assumed to belong to the same file as the metadata.
    /// This path is relative to the current file.
    pub fn file_path(&self) -> &Option<String> {
        &self.column_chunk.file_path
    }

    fn column_metadata(&self) -> &ColumnMetaData {
        self.column_chunk.meta_data.as_ref().unwrap()
    }

    /// Descriptor for this column.
    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.column_descr
    }

    /// The physical type of this column.
    pub fn physical_type(&self) -> &PhysicalType {
        self.column_descr.physical_type()
    }

    /// Total number of values in this column chunk: the number of level
    /// entries, not the number of present values.
    pub fn num_values(&self) -> i64 {
        self.column_metadata().num_values
    }

    /// The [`Compression`] of this column.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the total compressed data size of this column chunk,
    /// including page headers.
    pub fn compressed_size(&self) -> i64 {
        self.column_metadata().total_compressed_size
    }

    /// Returns the total uncompressed data size of this column chunk,
    /// including page headers.
    pub fn uncompressed_size(&self) -> i64 {
        self.column_metadata().total_uncompressed_size
    }

    /// Returns the offset for the column data.
    pub fn data_page_offset(&self) -> i64 {
        self.column_metadata().data_page_offset
    }

    /// Returns the offset for the dictionary page, if any.
    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.column_metadata().dictionary_page_offset
    }

    /// Returns the encodings ever used in this column chunk.
    pub fn encodings(&self) -> Result<Vec<Encoding>> {
        self.column_metadata()
            .encodings
            .iter()
            .map(|encoding| (*encoding).try_into())
            .collect()
    }

    /// Returns the raw statistics of this column chunk, if any.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.column_metadata().statistics.as_ref()
    }

    /// Returns the offset and length in bytes of the column chunk within
    /// the file.
    pub fn byte_range(&self) -> Result<(u64, u64)> {
        let start = if let Some(dict_page_offset) = self.dictionary_page_offset() {
            dict_page_offset
        } else {
            self.data_page_offset()
        };
        let length = self.compressed_size();
        if start < 0 || length < 0 {
            return Err(Error::InvalidFile(
                "a column chunk has a negative offset or length".to_string(),
            ));
        }
        Ok((start as u64, length as u64))
    }

    /// Method to convert from Thrift.
    pub fn try_from_thrift(
        column_descr: ColumnDescriptor,
        column_chunk: ColumnChunk,
    ) -> Result<Self> {
        let metadata = column_chunk.meta_data.as_ref().ok_or_else(|| {
            Error::InvalidFile("a column chunk is missing its metadata".to_string())
        })?;
        if metadata.num_values < 0 {
            return Err(Error::InvalidFile(format!(
                "a column chunk declares {} values",
                metadata.num_values
            )));
        }
        let compression = metadata.codec.try_into()?;
        Ok(Self {
            column_chunk,
            column_descr,
            compression,
        })
    }

    /// Method to convert to Thrift.
    pub fn into_thrift(self) -> ColumnChunk {
        self.column_chunk
    }
}
