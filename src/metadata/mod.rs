mod column_chunk_metadata;
mod column_descriptor;
mod file_metadata;
mod row_group_metadata;
mod schema_descriptor;

pub use column_chunk_metadata::ColumnChunkMetaData;
pub use column_descriptor::ColumnDescriptor;
pub use file_metadata::FileMetaData;
pub use row_group_metadata::RowGroupMetaData;
pub use schema_descriptor::SchemaDescriptor;

pub use parquet_format_safe::{KeyValue, SortingColumn};
