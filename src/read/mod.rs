mod column;
mod compression;
pub mod deserialize;
pub mod levels;
mod metadata;
mod page;

use std::io::{Read, Seek, SeekFrom};

pub use column::{read_column_chunk, ColumnChunkData};
pub use compression::decompress;
pub use metadata::read_metadata;
pub use page::PageReader;

use crate::error::{Error, Result};
use crate::metadata::{ColumnChunkMetaData, FileMetaData, RowGroupMetaData, SchemaDescriptor};
use crate::types::ParquetValue;

/// Returns a new [`PageReader`] by seeking `reader` to the beginning of
/// `column_chunk`.
pub fn get_page_iterator<R: Read + Seek>(
    column_chunk: &ColumnChunkMetaData,
    mut reader: R,
) -> Result<PageReader<R>> {
    let (start, _) = column_chunk.byte_range()?;
    reader.seek(SeekFrom::Start(start))?;
    Ok(PageReader::new(reader, column_chunk))
}

/// A handle over an open parquet file: the decoded footer plus the
/// random-access input, able to open any row group by ordinal and any
/// column by index.
pub struct FileReader<R: Read + Seek> {
    reader: R,
    metadata: FileMetaData,
}

impl<R: Read + Seek> FileReader<R> {
    /// Opens the file: verifies both magic frames and decodes the footer.
    pub fn try_new(mut reader: R) -> Result<Self> {
        let metadata = read_metadata(&mut reader)?;
        Ok(Self { reader, metadata })
    }

    pub fn metadata(&self) -> &FileMetaData {
        &self.metadata
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        self.metadata.schema()
    }

    pub fn num_row_groups(&self) -> usize {
        self.metadata.row_groups.len()
    }

    /// The metadata of the row group at `ordinal`.
    pub fn row_group(&self, ordinal: usize) -> Result<&RowGroupMetaData> {
        self.metadata.row_groups.get(ordinal).ok_or_else(|| {
            Error::SchemaMismatch(format!(
                "row group {} out of bounds for a file with {} row groups",
                ordinal,
                self.metadata.row_groups.len()
            ))
        })
    }

    /// Reads and decodes the column chunk at (`row_group`, `column`).
    /// Fails with [`Error::SchemaMismatch`] if either index is out of bounds
    /// or the column's physical type does not hold `T`.
    pub fn read_column<T: ParquetValue>(
        &mut self,
        row_group: usize,
        column: usize,
    ) -> Result<ColumnChunkData<T>> {
        let row_group = self.metadata.row_groups.get(row_group).ok_or_else(|| {
            Error::SchemaMismatch(format!(
                "row group {} out of bounds for a file with {} row groups",
                row_group,
                self.metadata.row_groups.len()
            ))
        })?;
        let column_chunk = row_group.columns().get(column).ok_or_else(|| {
            Error::SchemaMismatch(format!(
                "column {} out of bounds for a schema with {} leaves",
                column,
                row_group.columns().len()
            ))
        })?;
        read_column_chunk(&mut self.reader, column_chunk)
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
