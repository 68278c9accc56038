use std::collections::HashSet;
use std::convert::TryInto;
use std::io::Write;

use parquet_format_safe::{ColumnChunk, ColumnMetaData, RowGroup, SortingColumn, Statistics};

use crate::compression::Compression;
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::page::PageType;
use crate::schema::types::physical_type_to_type;

use super::column::{ClosedColumn, ColumnValue, ColumnWriter};
use super::file::FileWriter;
use super::levels::map_streams;
use super::page::{write_page, PageWriteSpec};

/// Writes one row group: column writers are created lazily, filled
/// sequentially in schema order, and serialized to the sink at
/// [`RowGroupWriter::close`].
pub struct RowGroupWriter<'a, W: Write> {
    file: &'a mut FileWriter<W>,
    columns: Vec<Option<ColumnWriter>>,
    created: usize,
    sorting_columns: Option<Vec<SortingColumn>>,
    ordinal: usize,
}

impl<'a, W: Write> RowGroupWriter<'a, W> {
    pub(super) fn new(file: &'a mut FileWriter<W>) -> Self {
        let num_columns = file.schema.num_columns();
        let ordinal = file.row_groups.len();
        Self {
            file,
            columns: (0..num_columns).map(|_| None).collect(),
            created: 0,
            sorting_columns: None,
            ordinal,
        }
    }

    /// The column writer of leaf `i`. Columns must be filled in schema
    /// order: only the last created column and its successor are reachable.
    pub fn column(&mut self, i: usize) -> Result<&mut ColumnWriter> {
        if i >= self.columns.len() {
            return Err(Error::SchemaMismatch(format!(
                "column {} out of bounds for a schema with {} leaves",
                i,
                self.columns.len()
            )));
        }
        if i == self.created {
            let descriptor = self.file.schema.column(i).clone();
            self.columns[i] = Some(ColumnWriter::try_new(descriptor, self.file.options)?);
            self.created += 1;
        } else if i + 1 != self.created {
            return Err(Error::InvalidState(
                "the columns of a row group must be written sequentially".to_string(),
            ));
        }
        Ok(self.columns[i].as_mut().unwrap())
    }

    /// A writer over the two adjacent leaves of a map column, `key_column`
    /// being the index of the key leaf.
    pub fn map_columns(&mut self, key_column: usize) -> Result<MapWriter<'_>> {
        if key_column + 1 >= self.columns.len() {
            return Err(Error::SchemaMismatch(format!(
                "a map at column {} needs two leaves; the schema has {}",
                key_column,
                self.columns.len()
            )));
        }
        if key_column == self.created {
            for i in [key_column, key_column + 1] {
                let descriptor = self.file.schema.column(i).clone();
                self.columns[i] = Some(ColumnWriter::try_new(descriptor, self.file.options)?);
            }
            self.created += 2;
        } else if key_column + 2 != self.created {
            return Err(Error::InvalidState(
                "the columns of a row group must be written sequentially".to_string(),
            ));
        }

        let (left, right) = self.columns.split_at_mut(key_column + 1);
        let keys = left[key_column].as_mut().unwrap();
        let values = right[0].as_mut().unwrap();
        if keys.descriptor().max_rep_level() == 0
            || keys.descriptor().max_rep_level() != values.descriptor().max_rep_level()
        {
            return Err(Error::SchemaMismatch(format!(
                "columns {} and {} do not form a map",
                key_column,
                key_column + 1
            )));
        }
        Ok(MapWriter { keys, values })
    }

    /// Declares the sort order of the rows in this row group.
    pub fn set_sorting_columns(&mut self, sorting_columns: Vec<SortingColumn>) {
        self.sorting_columns = Some(sorting_columns);
    }

    /// Closes the row group: verifies that every column holds the same
    /// number of rows, writes all pages to the sink and records the row
    /// group's metadata in the file writer.
    pub fn close(self) -> Result<()> {
        let Self {
            file,
            columns,
            created: _,
            sorting_columns,
            ordinal,
        } = self;

        let closed = columns
            .into_iter()
            .enumerate()
            .map(|(i, column)| match column {
                Some(column) => column.close(),
                // untouched columns are materialized empty
                None => {
                    ColumnWriter::try_new(file.schema.column(i).clone(), file.options)?.close()
                }
            })
            .collect::<Result<Vec<ClosedColumn>>>()?;

        let num_rows = closed.first().map(|column| column.num_rows).unwrap_or(0);
        for column in &closed {
            if column.num_rows != num_rows {
                return Err(Error::InvalidState(format!(
                    "every column of a row group must have the same number of rows; \
                    column \"{}\" has {} but {} were expected",
                    column.descriptor.name(),
                    column.num_rows,
                    num_rows
                )));
            }
        }

        let initial_offset = file.offset;
        let mut columns_thrift = vec![];
        for column in closed {
            let mut specs = vec![];
            for page in &column.pages {
                let spec = write_page(&mut file.writer, file.offset, page)?;
                file.offset += spec.bytes_written;
                specs.push(spec);
            }
            columns_thrift.push(build_column_chunk(
                &specs,
                &column.descriptor,
                column.compression,
                column.statistics,
            )?);
        }

        let total_byte_size = columns_thrift
            .iter()
            .map(|column| column.meta_data.as_ref().unwrap().total_uncompressed_size)
            .sum();
        let total_compressed_size = columns_thrift
            .iter()
            .map(|column| column.meta_data.as_ref().unwrap().total_compressed_size)
            .sum();

        file.row_groups.push(RowGroup {
            columns: columns_thrift,
            total_byte_size,
            num_rows: num_rows as i64,
            sorting_columns,
            file_offset: if num_rows > 0 {
                Some(initial_offset as i64)
            } else {
                None
            },
            total_compressed_size: Some(total_compressed_size),
            ordinal: Some(ordinal as i16),
        });
        Ok(())
    }
}

/// Writes maps by fanning each entry out into the key and value leaves,
/// which share the repetition shape but have independent definition levels.
pub struct MapWriter<'a> {
    keys: &'a mut ColumnWriter,
    values: &'a mut ColumnWriter,
}

impl<'a> MapWriter<'a> {
    pub fn write<K: ColumnValue + Ord, V: ColumnValue>(
        &mut self,
        maps: &[Option<Vec<(K, Option<V>)>>],
    ) -> Result<()> {
        let (keys, values) = map_streams(maps);
        self.keys.write_nested(&keys)?;
        self.values.write_nested(&values)
    }
}

fn build_column_chunk(
    specs: &[PageWriteSpec],
    descriptor: &ColumnDescriptor,
    compression: Compression,
    statistics: Option<Statistics>,
) -> Result<ColumnChunk> {
    // the chunk totals include the page headers
    let total_compressed_size = specs
        .iter()
        .map(|spec| spec.header_size as i64 + spec.header.compressed_page_size as i64)
        .sum();
    let total_uncompressed_size = specs
        .iter()
        .map(|spec| spec.header_size as i64 + spec.header.uncompressed_page_size as i64)
        .sum();

    let mut data_page_offset = None;
    let mut dictionary_page_offset = None;
    let mut num_values = 0i64;
    let mut encodings = HashSet::new();
    for spec in specs {
        let type_: PageType = spec.header.type_.try_into()?;
        match type_ {
            PageType::DataPage => {
                let header = spec.header.data_page_header.as_ref().unwrap();
                data_page_offset.get_or_insert(spec.offset as i64);
                num_values += header.num_values as i64;
                encodings.insert(header.encoding);
                encodings.insert(Encoding::Rle.into());
            }
            PageType::DataPageV2 => {
                let header = spec.header.data_page_header_v2.as_ref().unwrap();
                data_page_offset.get_or_insert(spec.offset as i64);
                num_values += header.num_values as i64;
                encodings.insert(header.encoding);
                encodings.insert(Encoding::Rle.into());
            }
            PageType::DictionaryPage => {
                let header = spec.header.dictionary_page_header.as_ref().unwrap();
                dictionary_page_offset = Some(spec.offset as i64);
                encodings.insert(header.encoding);
            }
            PageType::IndexPage => unreachable!(),
        }
    }

    let (type_, _) = physical_type_to_type(descriptor.physical_type());

    let metadata = ColumnMetaData {
        type_,
        encodings: encodings.into_iter().collect(),
        path_in_schema: descriptor.path_in_schema().to_vec(),
        codec: compression.into(),
        num_values,
        total_uncompressed_size,
        total_compressed_size,
        key_value_metadata: None,
        data_page_offset: data_page_offset.unwrap_or(0),
        index_page_offset: None,
        dictionary_page_offset,
        statistics,
        encoding_stats: None,
        bloom_filter_offset: None,
    };

    Ok(ColumnChunk {
        file_path: None, // same file
        // 0 signals that the metadata lives in the footer
        file_offset: 0,
        meta_data: Some(metadata),
        offset_index_offset: None,
        offset_index_length: None,
        column_index_offset: None,
        column_index_length: None,
        crypto_metadata: None,
        encrypted_column_metadata: None,
    })
}
