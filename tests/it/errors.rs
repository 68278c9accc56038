use std::io::Cursor;

use parquet_native::error::{Error, Result};
use parquet_native::read::{read_metadata, FileReader};
use parquet_native::schema::types::{ParquetType, PhysicalType};
use parquet_native::schema::Repetition;
use parquet_native::write::{FileWriter, WriteOptions};

use super::single_column;

fn two_column_schema() -> parquet_native::metadata::SchemaDescriptor {
    let a = ParquetType::try_from_primitive(
        "a".to_string(),
        PhysicalType::Int32,
        Repetition::Required,
        None,
        None,
        None,
    )
    .unwrap();
    let b = ParquetType::try_from_primitive(
        "b".to_string(),
        PhysicalType::Int64,
        Repetition::Required,
        None,
        None,
        None,
    )
    .unwrap();
    parquet_native::metadata::SchemaDescriptor::new("schema".to_string(), vec![a, b])
}

#[test]
fn truncated_file_is_rejected() {
    let mut reader = Cursor::new(b"PAR1PAR".to_vec());
    assert!(matches!(
        read_metadata(&mut reader),
        Err(Error::InvalidFile(_))
    ));
}

#[test]
fn corrupt_magic_is_rejected() {
    let mut reader = Cursor::new(b"PAR1 not a parquet file XXXX".to_vec());
    assert!(matches!(
        read_metadata(&mut reader),
        Err(Error::InvalidFile(_))
    ));

    let mut reader = Cursor::new(b"XXXX some bytes then magicPAR1".to_vec());
    assert!(matches!(
        read_metadata(&mut reader),
        Err(Error::InvalidFile(_))
    ));
}

#[test]
fn empty_footer_is_rejected() {
    // two magic frames and a zero footer length
    let mut data = b"PAR1".to_vec();
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(b"PAR1");
    assert!(matches!(
        read_metadata(&mut Cursor::new(data)),
        Err(Error::InvalidFile(_))
    ));
}

#[test]
fn non_sequential_column_writes_are_rejected() -> Result<()> {
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        two_column_schema(),
        WriteOptions::default(),
        None,
    );
    writer.start()?;
    let mut row_group = writer.row_group()?;
    assert!(matches!(
        row_group.column(1).map(|_| ()),
        Err(Error::InvalidState(_))
    ));

    row_group.column(0)?.write_values(&[1i32])?;
    row_group.column(1)?.write_values(&[2i64])?;
    // going back to an already-finished column is not sequential
    assert!(matches!(
        row_group.column(0).map(|_| ()),
        Err(Error::InvalidState(_))
    ));
    row_group.close()?;
    Ok(())
}

#[test]
fn row_count_mismatch_is_rejected() -> Result<()> {
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        two_column_schema(),
        WriteOptions::default(),
        None,
    );
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&[1i32, 2])?;
    row_group.column(1)?.write_values(&[1i64])?;
    assert!(matches!(
        row_group.close(),
        Err(Error::InvalidState(_))
    ));
    Ok(())
}

#[test]
fn mixing_required_and_nullable_writers_is_rejected() -> Result<()> {
    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );
    writer.start()?;
    let mut row_group = writer.row_group()?;
    let column = row_group.column(0)?;
    assert!(matches!(
        column.write_optional_values(&[Some(1i32)]),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        column.write_list(&[Some(vec![1i32])]),
        Err(Error::InvalidState(_))
    ));
    Ok(())
}

#[test]
fn wrong_type_is_a_schema_mismatch() -> Result<()> {
    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );
    writer.start()?;
    {
        let mut row_group = writer.row_group()?;
        let column = row_group.column(0)?;
        assert!(matches!(
            column.write_values(&[1i64]),
            Err(Error::SchemaMismatch(_))
        ));
        column.write_values(&[1i32])?;
        row_group.close()?;
    }
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    assert!(matches!(
        reader.read_column::<i64>(0, 0).map(|_| ()),
        Err(Error::SchemaMismatch(_))
    ));
    // out-of-bounds indices are schema mismatches as well
    assert!(matches!(
        reader.read_column::<i32>(0, 1).map(|_| ()),
        Err(Error::SchemaMismatch(_))
    ));
    assert!(matches!(
        reader.read_column::<i32>(1, 0).map(|_| ()),
        Err(Error::SchemaMismatch(_))
    ));
    Ok(())
}

#[test]
fn int96_columns_are_read_only() -> Result<()> {
    let schema = single_column(PhysicalType::Int96, Repetition::Required);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );
    writer.start()?;
    let mut row_group = writer.row_group()?;
    assert!(matches!(
        row_group.column(0).map(|_| ()),
        Err(Error::SchemaMismatch(_))
    ));
    Ok(())
}

#[test]
fn fixed_len_value_size_is_checked() -> Result<()> {
    let schema = single_column(PhysicalType::FixedLenByteArray(4), Repetition::Required);
    let options = WriteOptions {
        dictionary: None,
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&[vec![1u8, 2, 3]])?;
    // the mismatch surfaces when the page is encoded
    assert!(matches!(
        row_group.close(),
        Err(Error::ValueSizeMismatch { expected: 4, got: 3 })
    ));
    Ok(())
}
