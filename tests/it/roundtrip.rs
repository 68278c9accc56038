use std::io::Cursor;

use parquet_native::compression::Compression;
use parquet_native::encoding::Encoding;
use parquet_native::error::Result;
use parquet_native::page::CompressedPage;
use parquet_native::read::{get_page_iterator, FileReader};
use parquet_native::schema::types::PhysicalType;
use parquet_native::schema::Repetition;
use parquet_native::statistics::{deserialize_statistics, PrimitiveStatistics};
use parquet_native::write::{
    DictionaryOptions, FileWriter, Version, WriteOptions,
};

use super::single_column;

fn plain_options() -> WriteOptions {
    WriteOptions {
        dictionary: None,
        ..Default::default()
    }
}

#[test]
fn required_int32() -> Result<()> {
    // a required INT32 column, uncompressed, PLAIN only
    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, plain_options(), None);

    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&[1i32, 2, 3, 4, 5])?;
    row_group.close()?;
    let (size, writer) = writer.end(None)?;

    let data = writer.into_inner();
    assert!(size >= 12);
    assert_eq!(data.len() as u64, size);

    let mut reader = FileReader::try_new(Cursor::new(data))?;
    assert_eq!(reader.metadata().num_rows, 5);
    assert_eq!(reader.num_row_groups(), 1);

    let encodings = reader.row_group(0)?.columns()[0].encodings()?;
    assert!(encodings.contains(&Encoding::Plain));
    assert!(!encodings.contains(&Encoding::RleDictionary));

    let column = reader.read_column::<i32>(0, 0)?;
    assert_eq!(column.into_values()?, vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[test]
fn optional_int64_with_statistics() -> Result<()> {
    let schema = single_column(PhysicalType::Int64, Repetition::Optional);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        Some("parquet-native".to_string()),
    );

    let values = vec![Some(10i64), None, Some(30), None, Some(50)];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_optional_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;

    let chunk = &reader.row_group(0)?.columns()[0];
    assert_eq!(chunk.num_values(), 5);
    let statistics = chunk.statistics().expect("statistics were written");
    let statistics = deserialize_statistics(statistics, chunk.descriptor())?;
    let statistics = statistics
        .as_any()
        .downcast_ref::<PrimitiveStatistics<i64>>()
        .unwrap();
    assert_eq!(statistics.null_count, Some(2));
    assert_eq!(statistics.min_value, Some(10));
    assert_eq!(statistics.max_value, Some(50));

    let column = reader.read_column::<i64>(0, 0)?;
    assert_eq!(column.into_optional()?, values);
    Ok(())
}

#[test]
fn dictionary_encoded_strings() -> Result<()> {
    let schema = single_column(PhysicalType::ByteArray, Repetition::Required);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );

    let values: Vec<Vec<u8>> = ["a", "b", "a", "b", "a", "b", "a", "b"]
        .iter()
        .map(|value| value.as_bytes().to_vec())
        .collect();

    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;
    let data = writer.into_inner();

    let mut reader = FileReader::try_new(Cursor::new(data.clone()))?;
    let chunk = &reader.row_group(0)?.columns()[0];
    assert!(chunk.dictionary_page_offset().is_some());
    let encodings = chunk.encodings()?;
    assert!(encodings.contains(&Encoding::Plain));
    assert!(encodings.contains(&Encoding::RleDictionary));

    // the chunk starts with a dictionary page of the two distinct values,
    // followed by a single data page
    let mut pages = get_page_iterator(chunk, Cursor::new(data))?;
    match pages.next().unwrap()? {
        CompressedPage::Dict(dict) => assert_eq!(dict.num_values, 2),
        CompressedPage::Data(_) => panic!("the dictionary page must come first"),
    }
    assert!(matches!(pages.next().unwrap()?, CompressedPage::Data(_)));
    assert!(pages.next().is_none());

    let column = reader.read_column::<Vec<u8>>(0, 0)?;
    assert_eq!(column.into_values()?, values);
    Ok(())
}

#[test]
fn dictionary_fallback_keeps_both_encodings() -> Result<()> {
    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let options = WriteOptions {
        // flush a page per write call
        data_page_size: 1,
        dictionary: Some(DictionaryOptions {
            max_entries: 2,
            max_bytes: 1024,
        }),
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);

    writer.start()?;
    let mut row_group = writer.row_group()?;
    // first page: 2 distinct values, dictionary-indexed
    row_group.column(0)?.write_values(&[1i32, 2, 1])?;
    // second page: a third distinct value falls the dictionary back to PLAIN
    row_group.column(0)?.write_values(&[3i32, 4, 5])?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let chunk = &reader.row_group(0)?.columns()[0];
    let encodings = chunk.encodings()?;
    assert!(encodings.contains(&Encoding::RleDictionary));
    assert!(encodings.contains(&Encoding::Plain));
    assert!(chunk.dictionary_page_offset().is_some());

    let column = reader.read_column::<i32>(0, 0)?;
    assert_eq!(column.into_values()?, vec![1, 2, 1, 3, 4, 5]);
    Ok(())
}

#[test]
fn boolean_round_trip() -> Result<()> {
    let schema = single_column(PhysicalType::Boolean, Repetition::Required);
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, plain_options(), None);

    let values = vec![true, false, true, true, false, false, true, false, true];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let column = reader.read_column::<bool>(0, 0)?;
    assert_eq!(column.into_values()?, values);
    Ok(())
}

#[test]
fn fixed_len_byte_array_round_trip() -> Result<()> {
    let schema = single_column(PhysicalType::FixedLenByteArray(3), Repetition::Optional);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );

    let values = vec![
        Some(vec![1u8, 2, 3]),
        None,
        Some(vec![7u8, 8, 9]),
        Some(vec![1u8, 2, 3]),
    ];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_optional_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let column = reader.read_column::<Vec<u8>>(0, 0)?;
    assert_eq!(column.into_optional()?, values);
    Ok(())
}

#[test]
fn multiple_row_groups_and_columns() -> Result<()> {
    use parquet_native::schema::types::ParquetType;

    let id = ParquetType::try_from_primitive(
        "id".to_string(),
        PhysicalType::Int32,
        Repetition::Required,
        None,
        None,
        None,
    )
    .unwrap();
    let name = ParquetType::try_from_primitive(
        "name".to_string(),
        PhysicalType::ByteArray,
        Repetition::Optional,
        None,
        None,
        None,
    )
    .unwrap();
    let schema = parquet_native::metadata::SchemaDescriptor::new(
        "schema".to_string(),
        vec![id, name],
    );

    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );
    writer.start()?;

    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&[1i32, 2])?;
    row_group
        .column(1)?
        .write_optional_values(&[Some(b"ab".to_vec()), None])?;
    row_group.close()?;

    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&[3i32])?;
    row_group
        .column(1)?
        .write_optional_values(&[Some(b"c".to_vec())])?;
    row_group.close()?;

    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    // the footer's row count is the sum across row groups
    assert_eq!(reader.metadata().num_rows, 3);
    assert_eq!(reader.num_row_groups(), 2);
    assert_eq!(reader.row_group(0)?.num_rows(), 2);
    assert_eq!(reader.row_group(1)?.num_rows(), 1);
    assert_eq!(reader.row_group(0)?.ordinal(), Some(0));
    assert_eq!(reader.row_group(1)?.ordinal(), Some(1));

    assert_eq!(reader.read_column::<i32>(0, 0)?.into_values()?, vec![1, 2]);
    assert_eq!(reader.read_column::<i32>(1, 0)?.into_values()?, vec![3]);
    assert_eq!(
        reader.read_column::<Vec<u8>>(1, 1)?.into_optional()?,
        vec![Some(b"c".to_vec())]
    );
    Ok(())
}

#[test]
fn chunk_sizes_include_page_headers() -> Result<()> {
    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, plain_options(), None);

    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&[1i32, 2, 3])?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;
    let data = writer.into_inner();

    let reader = FileReader::try_new(Cursor::new(data))?;
    let row_group = reader.row_group(0)?;
    let chunk = &row_group.columns()[0];
    // uncompressed body is 12 bytes of PLAIN int32; the header makes it larger
    assert!(chunk.uncompressed_size() > 12);
    assert_eq!(chunk.uncompressed_size(), chunk.compressed_size());
    assert_eq!(
        row_group.total_byte_size() as i64,
        chunk.uncompressed_size()
    );
    Ok(())
}

#[test]
fn data_page_v2_round_trip() -> Result<()> {
    let schema = single_column(PhysicalType::Int64, Repetition::Optional);
    let options = WriteOptions {
        version: Version::V2,
        dictionary: None,
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);

    let values = vec![Some(1i64), None, None, Some(-7), Some(9)];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_optional_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let column = reader.read_column::<i64>(0, 0)?;
    assert_eq!(column.into_optional()?, values);
    Ok(())
}

fn compressed_round_trip(compression: Compression) -> Result<()> {
    let schema = single_column(PhysicalType::Double, Repetition::Required);
    let options = WriteOptions {
        compression,
        dictionary: None,
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);

    let values = (0..1000).map(|i| i as f64 / 3.0).collect::<Vec<_>>();
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let chunk = &reader.row_group(0)?.columns()[0];
    assert_eq!(chunk.compression(), compression);
    let column = reader.read_column::<f64>(0, 0)?;
    assert_eq!(column.into_values()?, values);
    Ok(())
}

#[cfg(feature = "snappy")]
#[test]
fn snappy_round_trip() -> Result<()> {
    compressed_round_trip(Compression::Snappy)
}

#[cfg(feature = "gzip")]
#[test]
fn gzip_round_trip() -> Result<()> {
    compressed_round_trip(Compression::Gzip)
}

#[cfg(feature = "zstd")]
#[test]
fn zstd_round_trip() -> Result<()> {
    compressed_round_trip(Compression::Zstd)
}

#[test]
fn multiple_pages_per_chunk() -> Result<()> {
    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let options = WriteOptions {
        data_page_size: 64,
        dictionary: None,
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);

    let values = (0..1000i32).collect::<Vec<_>>();
    writer.start()?;
    let mut row_group = writer.row_group()?;
    for chunk in values.chunks(10) {
        row_group.column(0)?.write_values(chunk)?;
    }
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    assert_eq!(reader.row_group(0)?.columns()[0].num_values(), 1000);
    let column = reader.read_column::<i32>(0, 0)?;
    assert_eq!(column.into_values()?, values);
    Ok(())
}

#[test]
fn key_value_metadata_round_trips() -> Result<()> {
    use parquet_native::metadata::KeyValue;

    let schema = single_column(PhysicalType::Int32, Repetition::Required);
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, plain_options(), None);
    writer.start()?;
    let (_, writer) = writer.end(Some(vec![KeyValue {
        key: "origin".to_string(),
        value: Some("it-test".to_string()),
    }]))?;

    let reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let kv = reader.metadata().key_value_metadata().as_ref().unwrap();
    assert_eq!(kv[0].key, "origin");
    assert_eq!(kv[0].value.as_deref(), Some("it-test"));
    Ok(())
}

#[test]
fn random_optional_round_trip() -> Result<()> {
    use rand::Rng;
    let mut rng = rand::rngs::mock::StepRng::new(7, 2_654_435_761);

    let schema = single_column(PhysicalType::Int64, Repetition::Optional);
    let options = WriteOptions {
        data_page_size: 256,
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);

    let values = (0..2000)
        .map(|_| {
            if rng.gen::<u64>() % 4 == 0 {
                None
            } else {
                Some(rng.gen::<u64>() as i64)
            }
        })
        .collect::<Vec<_>>();

    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_optional_values(&values)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let column = reader.read_column::<i64>(0, 0)?;
    assert_eq!(column.into_optional()?, values);
    Ok(())
}
