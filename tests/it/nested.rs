use std::io::Cursor;

use parquet_native::error::Result;
use parquet_native::metadata::SchemaDescriptor;
use parquet_native::nested::Nested;
use parquet_native::read::FileReader;
use parquet_native::schema::types::{ParquetType, PhysicalType};
use parquet_native::schema::Repetition;
use parquet_native::write::{FileWriter, Version, WriteOptions};

fn list_schema(element_repetition: Repetition) -> SchemaDescriptor {
    let element = ParquetType::try_from_primitive(
        "element".to_string(),
        PhysicalType::Int32,
        element_repetition,
        None,
        None,
        None,
    )
    .unwrap();
    let list = ParquetType::try_list("col".to_string(), Repetition::Optional, element).unwrap();
    SchemaDescriptor::new("schema".to_string(), vec![list])
}

#[test]
fn list_round_trip() -> Result<()> {
    // [[1, 2], [], None, [3]]
    let schema = list_schema(Repetition::Required);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );

    let lists = vec![Some(vec![1i32, 2]), Some(vec![]), None, Some(vec![3])];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_list(&lists)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    // one level entry per list entry, even empty and null ones
    assert_eq!(reader.row_group(0)?.columns()[0].num_values(), 5);
    assert_eq!(reader.metadata().num_rows, 4);

    let column = reader.read_column::<i32>(0, 0)?;
    assert_eq!(column.values, vec![1, 2, 3]);
    assert_eq!(column.rep_levels, vec![0, 1, 0, 0, 0]);
    assert_eq!(column.def_levels, vec![2, 2, 1, 0, 2]);

    let rows = column.into_nested()?;
    assert_eq!(
        rows,
        vec![
            Nested::List(vec![Nested::Value(1), Nested::Value(2)]),
            Nested::List(vec![]),
            Nested::Null,
            Nested::List(vec![Nested::Value(3)]),
        ]
    );
    Ok(())
}

#[test]
fn list_with_nullable_elements_round_trip() -> Result<()> {
    let schema = list_schema(Repetition::Optional);
    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );

    let lists = vec![
        Some(vec![Some(1i32), None, Some(2)]),
        None,
        Some(vec![None]),
        Some(vec![]),
    ];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_list_with_nullable_elements(&lists)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let rows = reader.read_column::<i32>(0, 0)?.into_nested()?;
    assert_eq!(
        rows,
        vec![
            Nested::List(vec![Nested::Value(1), Nested::Null, Nested::Value(2)]),
            Nested::Null,
            Nested::List(vec![Nested::Null]),
            Nested::List(vec![]),
        ]
    );
    Ok(())
}

#[test]
fn two_level_nesting_round_trip() -> Result<()> {
    let element = ParquetType::try_from_primitive(
        "element".to_string(),
        PhysicalType::Int64,
        Repetition::Required,
        None,
        None,
        None,
    )
    .unwrap();
    let inner = ParquetType::try_list("inner".to_string(), Repetition::Optional, element).unwrap();
    let outer = ParquetType::try_list("col".to_string(), Repetition::Optional, inner).unwrap();
    let schema = SchemaDescriptor::new("schema".to_string(), vec![outer]);

    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );

    let rows = vec![
        Nested::List(vec![
            Nested::List(vec![Nested::Value(1i64), Nested::Value(2)]),
            Nested::List(vec![]),
            Nested::Null,
        ]),
        Nested::Null,
        Nested::List(vec![]),
        Nested::List(vec![Nested::List(vec![Nested::Value(3)])]),
    ];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_nested(&rows)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let recovered = reader.read_column::<i64>(0, 0)?.into_nested()?;
    assert_eq!(recovered, rows);
    Ok(())
}

#[test]
fn nested_v2_round_trip() -> Result<()> {
    let schema = list_schema(Repetition::Required);
    let options = WriteOptions {
        version: Version::V2,
        ..Default::default()
    };
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options, None);

    let lists = vec![Some(vec![7i32]), None, Some(vec![8, 9, 10]), Some(vec![])];
    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.column(0)?.write_list(&lists)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;
    let rows = reader.read_column::<i32>(0, 0)?.into_nested()?;
    assert_eq!(
        rows,
        vec![
            Nested::List(vec![Nested::Value(7)]),
            Nested::Null,
            Nested::List(vec![
                Nested::Value(8),
                Nested::Value(9),
                Nested::Value(10)
            ]),
            Nested::List(vec![]),
        ]
    );
    Ok(())
}

#[test]
fn map_round_trip() -> Result<()> {
    let key = ParquetType::try_from_primitive(
        "key".to_string(),
        PhysicalType::ByteArray,
        Repetition::Required,
        None,
        None,
        None,
    )
    .unwrap();
    let value = ParquetType::try_from_primitive(
        "value".to_string(),
        PhysicalType::Int64,
        Repetition::Optional,
        None,
        None,
        None,
    )
    .unwrap();
    let map = ParquetType::try_map("col".to_string(), Repetition::Optional, key, value).unwrap();
    let schema = SchemaDescriptor::new("schema".to_string(), vec![map]);
    assert_eq!(schema.num_columns(), 2);

    let mut writer = FileWriter::new(
        Cursor::new(vec![]),
        schema,
        WriteOptions::default(),
        None,
    );

    // entries are sorted by key on write
    let maps: Vec<Option<Vec<(Vec<u8>, Option<i64>)>>> = vec![
        Some(vec![
            (b"b".to_vec(), Some(2)),
            (b"a".to_vec(), Some(1)),
            (b"c".to_vec(), None),
        ]),
        None,
        Some(vec![]),
        Some(vec![(b"z".to_vec(), Some(26))]),
    ];

    writer.start()?;
    let mut row_group = writer.row_group()?;
    row_group.map_columns(0)?.write(&maps)?;
    row_group.close()?;
    let (_, writer) = writer.end(None)?;

    let mut reader = FileReader::try_new(Cursor::new(writer.into_inner()))?;

    let keys = reader.read_column::<Vec<u8>>(0, 0)?;
    // the two leaves share the repetition stream
    assert_eq!(keys.rep_levels, vec![0, 1, 1, 0, 0, 0]);
    let keys = keys.into_nested()?;
    assert_eq!(
        keys,
        vec![
            Nested::List(vec![
                Nested::Value(b"a".to_vec()),
                Nested::Value(b"b".to_vec()),
                Nested::Value(b"c".to_vec()),
            ]),
            Nested::Null,
            Nested::List(vec![]),
            Nested::List(vec![Nested::Value(b"z".to_vec())]),
        ]
    );

    let values = reader.read_column::<i64>(0, 1)?;
    assert_eq!(values.rep_levels, vec![0, 1, 1, 0, 0, 0]);
    let values = values.into_nested()?;
    assert_eq!(
        values,
        vec![
            Nested::List(vec![
                Nested::Value(1),
                Nested::Value(2),
                Nested::Null,
            ]),
            Nested::Null,
            Nested::List(vec![]),
            Nested::List(vec![Nested::Value(26)]),
        ]
    );
    Ok(())
}

#[test]
fn shred_reconstruct_random_round_trip() -> Result<()> {
    use rand::Rng;
    let mut rng = rand::rngs::mock::StepRng::new(3, 2_246_822_519);

    let schema = list_schema(Repetition::Optional);
    let descriptor = schema.column(0).clone();

    let rows: Vec<Nested<i32>> = (0..500)
        .map(|_| match rng.gen::<u64>() % 4 {
            0 => Nested::Null,
            1 => Nested::List(vec![]),
            _ => {
                let len = (rng.gen::<u64>() % 5) as usize;
                Nested::List(
                    (0..len)
                        .map(|_| {
                            if rng.gen::<u64>() % 5 == 0 {
                                Nested::Null
                            } else {
                                Nested::Value(rng.gen::<u64>() as i32)
                            }
                        })
                        .collect(),
                )
            }
        })
        .collect();

    let mut values = vec![];
    let mut def_levels = vec![];
    let mut rep_levels = vec![];
    parquet_native::write::levels::shred_nested(
        &rows,
        &descriptor,
        &mut values,
        &mut def_levels,
        &mut rep_levels,
    )?;
    assert!(def_levels.len() >= values.len());

    let recovered = parquet_native::read::deserialize::to_nested(
        values,
        &rep_levels,
        &def_levels,
        &descriptor,
    )?;
    assert_eq!(recovered, rows);
    Ok(())
}
