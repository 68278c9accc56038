use parquet_format_safe::{RowGroup, SortingColumn};

use crate::error::{Error, Result};

use super::{ColumnChunkMetaData, SchemaDescriptor};

/// Metadata for a row group.
#[derive(Debug, Clone)]
pub struct RowGroupMetaData {
    columns: Vec<ColumnChunkMetaData>,
    num_rows: usize,
    total_byte_size: usize,
    sorting_columns: Option<Vec<SortingColumn>>,
    ordinal: Option<i16>,
}

impl RowGroupMetaData {
    /// Number of rows in this row group.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Total byte size of all the uncompressed column data in this row group.
    pub fn total_byte_size(&self) -> usize {
        self.total_byte_size
    }

    /// Returns the column chunks of this row group, one per leaf.
    pub fn columns(&self) -> &[ColumnChunkMetaData] {
        &self.columns
    }

    /// The sort order of the rows, if declared.
    pub fn sorting_columns(&self) -> Option<&[SortingColumn]> {
        self.sorting_columns.as_deref()
    }

    /// The ordinal position of this row group in the file, if declared.
    pub fn ordinal(&self) -> Option<i16> {
        self.ordinal
    }

    /// Method to convert from Thrift.
    pub fn try_from_thrift(
        schema_descr: &SchemaDescriptor,
        rg: RowGroup,
    ) -> Result<RowGroupMetaData> {
        if schema_descr.num_columns() != rg.columns.len() {
            return Err(Error::InvalidFile(format!(
                "a row group holds {} column chunks but the schema has {} leaves",
                rg.columns.len(),
                schema_descr.num_columns()
            )));
        }
        if rg.num_rows < 0 || rg.total_byte_size < 0 {
            return Err(Error::InvalidFile(
                "a row group declares a negative size".to_string(),
            ));
        }
        let columns = rg
            .columns
            .into_iter()
            .zip(schema_descr.columns())
            .map(|(column_chunk, descriptor)| {
                ColumnChunkMetaData::try_from_thrift(descriptor.clone(), column_chunk)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RowGroupMetaData {
            columns,
            num_rows: rg.num_rows as usize,
            total_byte_size: rg.total_byte_size as usize,
            sorting_columns: rg.sorting_columns,
            ordinal: rg.ordinal,
        })
    }
}
