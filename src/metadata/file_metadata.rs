use parquet_format_safe::{ColumnOrder, FileMetaData as TFileMetaData, KeyValue};

use crate::error::{Error, Result};

use super::{RowGroupMetaData, SchemaDescriptor};

/// Metadata for a Parquet file.
#[derive(Debug, Clone)]
pub struct FileMetaData {
    /// version of this file.
    pub version: i32,

    /// number of rows in the file.
    pub num_rows: usize,

    /// String message for application that wrote this file.
    pub created_by: Option<String>,

    /// The row groups of this file.
    pub row_groups: Vec<RowGroupMetaData>,

    /// key_value_metadata of this file.
    pub key_value_metadata: Option<Vec<KeyValue>>,

    /// schema descriptor.
    pub schema_descr: SchemaDescriptor,

    /// Column (sort) order used for `min` and `max` values of each column
    /// in this file, as declared by the writer.
    pub column_orders: Option<Vec<ColumnOrder>>,
}

impl FileMetaData {
    /// Returns the [`SchemaDescriptor`] that describes schema of this file.
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema_descr
    }

    /// Returns key/value metadata of this file.
    pub fn key_value_metadata(&self) -> &Option<Vec<KeyValue>> {
        &self.key_value_metadata
    }

    /// Method to convert from Thrift.
    pub fn try_from_thrift(metadata: TFileMetaData) -> Result<Self> {
        if metadata.num_rows < 0 {
            return Err(Error::InvalidFile(format!(
                "the footer declares {} rows",
                metadata.num_rows
            )));
        }
        let schema_descr = SchemaDescriptor::try_from_thrift(&metadata.schema)?;

        let row_groups = metadata
            .row_groups
            .into_iter()
            .map(|rg| RowGroupMetaData::try_from_thrift(&schema_descr, rg))
            .collect::<Result<Vec<_>>>()?;

        Ok(FileMetaData {
            version: metadata.version,
            num_rows: metadata.num_rows as usize,
            created_by: metadata.created_by,
            row_groups,
            key_value_metadata: metadata.key_value_metadata,
            schema_descr,
            column_orders: metadata.column_orders,
        })
    }
}
