use parquet_native::metadata::SchemaDescriptor;
use parquet_native::schema::types::{ParquetType, PhysicalType};
use parquet_native::schema::Repetition;

mod errors;
mod nested;
mod roundtrip;

/// A schema with a single flat column.
pub fn single_column(
    physical_type: PhysicalType,
    repetition: Repetition,
) -> SchemaDescriptor {
    let column = ParquetType::try_from_primitive(
        "col".to_string(),
        physical_type,
        repetition,
        None,
        None,
        None,
    )
    .unwrap();
    SchemaDescriptor::new("schema".to_string(), vec![column])
}
