use parquet_format_safe::{
    DataPageHeader as DataPageHeaderV1, DataPageHeaderV2, Statistics as ParquetStatistics,
};

use crate::compression::{create_codec, Compression};
use crate::encoding::dictionary::DictEncoder;
use crate::encoding::{hybrid_rle, levels as level_coding, Encoding};
use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::nested::{self, Nested};
use crate::page::{CompressedDataPage, CompressedDictPage, CompressedPage, DataPageHeader};
use crate::schema::types::PhysicalType;
use crate::types::ParquetValue;

use super::levels::shred_nested;
use super::statistics::StatisticsAccumulator;
use super::{Version, WriteOptions};

/// A closed column chunk: its pages in emission order plus everything the
/// row-group writer needs to serialize it.
pub(crate) struct ClosedColumn {
    pub descriptor: ColumnDescriptor,
    pub compression: Compression,
    pub pages: Vec<CompressedPage>,
    pub statistics: Option<ParquetStatistics>,
    pub num_rows: usize,
}

/// Buffers the values and levels of one column chunk, flushing encoded and
/// compressed pages once the buffered size exceeds the configured page size.
///
/// The first flush emits the dictionary page (when dictionary encoding is
/// active); once the dictionary falls back, subsequent pages are PLAIN.
#[derive(Debug)]
pub struct TypedColumnWriter<T: ParquetValue> {
    descriptor: ColumnDescriptor,
    options: WriteOptions,
    fixed_length: Option<usize>,

    // buffers of the current page
    values: Vec<T>,
    def_levels: Vec<u32>,
    rep_levels: Vec<u32>,
    page_rows: usize,
    buffered_bytes: usize,

    // chunk state
    dict: Option<DictEncoder<T>>,
    dict_page_emitted: bool,
    pages: Vec<CompressedPage>,
    statistics: StatisticsAccumulator<T>,
    num_rows: usize,
}

impl<T: ParquetValue> TypedColumnWriter<T> {
    fn new(descriptor: ColumnDescriptor, options: WriteOptions, fixed_length: Option<usize>) -> Self {
        let dict = match options.dictionary {
            Some(caps) if T::supports_dictionary() => Some(DictEncoder::new(
                caps.max_entries,
                caps.max_bytes,
                fixed_length,
            )),
            _ => None,
        };
        Self {
            descriptor,
            options,
            fixed_length,
            values: vec![],
            def_levels: vec![],
            rep_levels: vec![],
            page_rows: 0,
            buffered_bytes: 0,
            dict,
            dict_page_emitted: false,
            pages: vec![],
            statistics: StatisticsAccumulator::new(),
            num_rows: 0,
        }
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// The number of rows written so far.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Writes values of a required flat column.
    pub fn write_values(&mut self, values: &[T]) -> Result<()> {
        if self.descriptor.max_def_level() != 0 || self.descriptor.max_rep_level() != 0 {
            return Err(Error::InvalidState(format!(
                "column \"{}\" is not a required flat column",
                self.descriptor.name()
            )));
        }
        self.append(values.to_vec(), vec![], vec![], values.len())
    }

    /// Writes values of a nullable flat column.
    pub fn write_optional_values(&mut self, values: &[Option<T>]) -> Result<()> {
        if self.descriptor.max_rep_level() != 0 {
            return Err(Error::InvalidState(format!(
                "column \"{}\" is nested; use the list or nested writers",
                self.descriptor.name()
            )));
        }
        if self.descriptor.max_def_level() == 0 {
            return Err(Error::InvalidState(format!(
                "column \"{}\" is required; nulls cannot be written to it",
                self.descriptor.name()
            )));
        }
        let max_def = self.descriptor.max_def_level() as u32;
        let def_levels = values
            .iter()
            .map(|value| match value {
                Some(_) => max_def,
                None => max_def - 1,
            })
            .collect();
        let present = values.iter().filter_map(|value| value.clone()).collect();
        self.append(present, def_levels, vec![], values.len())
    }

    /// Writes optional lists of required elements.
    pub fn write_list(&mut self, lists: &[Option<Vec<T>>]) -> Result<()> {
        self.write_nested(&nested::from_lists(lists))
    }

    /// Writes optional lists of optional elements.
    pub fn write_list_with_nullable_elements(
        &mut self,
        lists: &[Option<Vec<Option<T>>>],
    ) -> Result<()> {
        self.write_nested(&nested::from_nullable_lists(lists))
    }

    /// Writes arbitrarily nested values, one node per row.
    pub fn write_nested(&mut self, items: &[Nested<T>]) -> Result<()> {
        if self.descriptor.max_rep_level() == 0 {
            return Err(Error::InvalidState(format!(
                "column \"{}\" is flat; use the value writers",
                self.descriptor.name()
            )));
        }
        let mut values = vec![];
        let mut def_levels = vec![];
        let mut rep_levels = vec![];
        shred_nested(
            items,
            &self.descriptor,
            &mut values,
            &mut def_levels,
            &mut rep_levels,
        )?;
        self.append(values, def_levels, rep_levels, items.len())
    }

    fn append(
        &mut self,
        values: Vec<T>,
        def_levels: Vec<u32>,
        rep_levels: Vec<u32>,
        rows: usize,
    ) -> Result<()> {
        for value in &values {
            if let Some(dict) = &mut self.dict {
                dict.push(value);
            }
            if self.options.write_statistics {
                self.statistics.update(value);
            }
            self.buffered_bytes += value.plain_encoded_len();
        }
        if self.options.write_statistics {
            let num_levels = if self.descriptor.max_def_level() > 0 {
                def_levels.len()
            } else {
                values.len()
            };
            self.statistics.update_nulls(num_levels - values.len());
        }
        self.buffered_bytes += def_levels.len() + rep_levels.len();

        self.values.extend(values);
        self.def_levels.extend(def_levels);
        self.rep_levels.extend(rep_levels);
        self.num_rows += rows;
        self.page_rows += rows;

        if self.buffered_bytes >= self.options.data_page_size {
            self.flush_page()?;
        }
        Ok(())
    }

    /// Encodes, compresses and stores the buffered page, emitting the
    /// dictionary page ahead of the first dictionary-indexed data page.
    fn flush_page(&mut self) -> Result<()> {
        let max_def = self.descriptor.max_def_level();
        let max_rep = self.descriptor.max_rep_level();
        let num_values = if max_def > 0 {
            self.def_levels.len()
        } else {
            self.values.len()
        };
        if num_values == 0 {
            return Ok(());
        }
        let compression = self.options.compression;

        let use_dict = self
            .dict
            .as_ref()
            .map_or(false, |dict| dict.should_use_dictionary());
        if use_dict && !self.dict_page_emitted {
            let dict = self.dict.as_mut().unwrap();
            let body = dict.dictionary_data()?;
            let uncompressed_page_size = body.len();
            let buffer = compress(compression, body)?;
            self.pages.push(CompressedPage::Dict(CompressedDictPage::new(
                buffer,
                compression,
                uncompressed_page_size,
                dict.num_entries(),
            )));
            dict.seal();
            self.dict_page_emitted = true;
        }

        let (encoding, encoded_values) = if use_dict {
            (
                Encoding::RleDictionary,
                self.dict.as_ref().unwrap().indices_data(),
            )
        } else {
            let mut buffer = vec![];
            T::plain_encode(&self.values, &mut buffer, self.fixed_length)?;
            (Encoding::Plain, buffer)
        };

        let page = match self.options.version {
            Version::V1 => {
                let mut body = vec![];
                if max_rep > 0 {
                    body.extend_from_slice(&level_coding::encode(&self.rep_levels, max_rep));
                }
                if max_def > 0 {
                    body.extend_from_slice(&level_coding::encode(&self.def_levels, max_def));
                }
                body.extend_from_slice(&encoded_values);

                let uncompressed_page_size = body.len();
                let buffer = compress(compression, body)?;
                let header = DataPageHeaderV1 {
                    num_values: num_values as i32,
                    encoding: encoding.into(),
                    definition_level_encoding: Encoding::Rle.into(),
                    repetition_level_encoding: Encoding::Rle.into(),
                    statistics: None,
                };
                CompressedPage::Data(CompressedDataPage::new(
                    DataPageHeader::V1(header),
                    buffer,
                    compression,
                    uncompressed_page_size,
                ))
            }
            Version::V2 => {
                let rep = if max_rep > 0 {
                    hybrid_rle::encode(
                        self.rep_levels.iter().copied(),
                        level_coding::get_bit_width(max_rep),
                    )
                } else {
                    vec![]
                };
                let def = if max_def > 0 {
                    hybrid_rle::encode(
                        self.def_levels.iter().copied(),
                        level_coding::get_bit_width(max_def),
                    )
                } else {
                    vec![]
                };
                let uncompressed_page_size = rep.len() + def.len() + encoded_values.len();

                let num_rows = if max_rep > 0 {
                    self.page_rows
                } else {
                    num_values
                };
                let header = DataPageHeaderV2 {
                    num_values: num_values as i32,
                    num_nulls: (num_values - self.values.len()) as i32,
                    num_rows: num_rows as i32,
                    encoding: encoding.into(),
                    definition_levels_byte_length: def.len() as i32,
                    repetition_levels_byte_length: rep.len() as i32,
                    is_compressed: Some(compression != Compression::Uncompressed),
                    statistics: None,
                };

                let mut buffer = rep;
                buffer.extend_from_slice(&def);
                buffer.extend(compress(compression, encoded_values)?);
                CompressedPage::Data(CompressedDataPage::new(
                    DataPageHeader::V2(header),
                    buffer,
                    compression,
                    uncompressed_page_size,
                ))
            }
        };
        self.pages.push(page);

        self.values.clear();
        self.def_levels.clear();
        self.rep_levels.clear();
        self.page_rows = 0;
        self.buffered_bytes = 0;
        if let Some(dict) = &mut self.dict {
            dict.clear_page_indices();
        }
        Ok(())
    }

    pub(crate) fn close(mut self) -> Result<ClosedColumn> {
        self.flush_page()?;
        let statistics = if self.options.write_statistics {
            Some(self.statistics.serialize())
        } else {
            None
        };
        Ok(ClosedColumn {
            descriptor: self.descriptor,
            compression: self.options.compression,
            pages: self.pages,
            statistics,
            num_rows: self.num_rows,
        })
    }
}

fn compress(compression: Compression, body: Vec<u8>) -> Result<Vec<u8>> {
    match create_codec(&compression)? {
        Some(mut codec) => codec.compress(&body),
        None => Ok(body),
    }
}

/// A column writer of any physical type. Typed writes go through
/// [`ColumnWriter::typed`] or the generic convenience methods; both fail
/// with [`Error::SchemaMismatch`] when the requested Rust type does not
/// match the column.
#[derive(Debug)]
pub enum ColumnWriter {
    Boolean(TypedColumnWriter<bool>),
    Int32(TypedColumnWriter<i32>),
    Int64(TypedColumnWriter<i64>),
    Float(TypedColumnWriter<f32>),
    Double(TypedColumnWriter<f64>),
    ByteArray(TypedColumnWriter<Vec<u8>>),
    FixedLenByteArray(TypedColumnWriter<Vec<u8>>),
}

macro_rules! dispatch {
    ($self:expr, $writer:ident => $e:expr) => {
        match $self {
            ColumnWriter::Boolean($writer) => $e,
            ColumnWriter::Int32($writer) => $e,
            ColumnWriter::Int64($writer) => $e,
            ColumnWriter::Float($writer) => $e,
            ColumnWriter::Double($writer) => $e,
            ColumnWriter::ByteArray($writer) => $e,
            ColumnWriter::FixedLenByteArray($writer) => $e,
        }
    };
}

impl ColumnWriter {
    pub(crate) fn try_new(descriptor: ColumnDescriptor, options: WriteOptions) -> Result<Self> {
        let physical_type = *descriptor.physical_type();
        Ok(match physical_type {
            PhysicalType::Boolean => {
                ColumnWriter::Boolean(TypedColumnWriter::new(descriptor, options, None))
            }
            PhysicalType::Int32 => {
                ColumnWriter::Int32(TypedColumnWriter::new(descriptor, options, None))
            }
            PhysicalType::Int64 => {
                ColumnWriter::Int64(TypedColumnWriter::new(descriptor, options, None))
            }
            PhysicalType::Float => {
                ColumnWriter::Float(TypedColumnWriter::new(descriptor, options, None))
            }
            PhysicalType::Double => {
                ColumnWriter::Double(TypedColumnWriter::new(descriptor, options, None))
            }
            PhysicalType::ByteArray => {
                ColumnWriter::ByteArray(TypedColumnWriter::new(descriptor, options, None))
            }
            PhysicalType::FixedLenByteArray(length) => ColumnWriter::FixedLenByteArray(
                TypedColumnWriter::new(descriptor, options, Some(length as usize)),
            ),
            PhysicalType::Int96 => {
                return Err(Error::SchemaMismatch(format!(
                    "column \"{}\" is INT96, which is read-only",
                    descriptor.name()
                )))
            }
        })
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        dispatch!(self, writer => writer.descriptor())
    }

    pub fn num_rows(&self) -> usize {
        dispatch!(self, writer => writer.num_rows())
    }

    /// The typed writer backing this column.
    pub fn typed<T: ColumnValue>(&mut self) -> Result<&mut TypedColumnWriter<T>> {
        T::typed(self)
    }

    pub fn write_values<T: ColumnValue>(&mut self, values: &[T]) -> Result<()> {
        T::typed(self)?.write_values(values)
    }

    pub fn write_optional_values<T: ColumnValue>(&mut self, values: &[Option<T>]) -> Result<()> {
        T::typed(self)?.write_optional_values(values)
    }

    pub fn write_list<T: ColumnValue>(&mut self, lists: &[Option<Vec<T>>]) -> Result<()> {
        T::typed(self)?.write_list(lists)
    }

    pub fn write_list_with_nullable_elements<T: ColumnValue>(
        &mut self,
        lists: &[Option<Vec<Option<T>>>],
    ) -> Result<()> {
        T::typed(self)?.write_list_with_nullable_elements(lists)
    }

    pub fn write_nested<T: ColumnValue>(&mut self, items: &[Nested<T>]) -> Result<()> {
        T::typed(self)?.write_nested(items)
    }

    pub(crate) fn close(self) -> Result<ClosedColumn> {
        dispatch!(self, writer => writer.close())
    }
}

/// Maps a Rust value type to the [`ColumnWriter`] variants able to hold it.
pub trait ColumnValue: ParquetValue {
    fn typed(writer: &mut ColumnWriter) -> Result<&mut TypedColumnWriter<Self>>
    where
        Self: Sized;
}

macro_rules! column_value {
    ($type:ty, $variant:ident) => {
        impl ColumnValue for $type {
            fn typed(writer: &mut ColumnWriter) -> Result<&mut TypedColumnWriter<Self>> {
                match writer {
                    ColumnWriter::$variant(writer) => Ok(writer),
                    other => Err(Error::SchemaMismatch(format!(
                        "column \"{}\" does not hold {}",
                        other.descriptor().name(),
                        stringify!($type)
                    ))),
                }
            }
        }
    };
}

column_value!(bool, Boolean);
column_value!(i32, Int32);
column_value!(i64, Int64);
column_value!(f32, Float);
column_value!(f64, Double);

impl ColumnValue for Vec<u8> {
    fn typed(writer: &mut ColumnWriter) -> Result<&mut TypedColumnWriter<Self>> {
        match writer {
            ColumnWriter::ByteArray(writer) => Ok(writer),
            ColumnWriter::FixedLenByteArray(writer) => Ok(writer),
            other => Err(Error::SchemaMismatch(format!(
                "column \"{}\" does not hold byte arrays",
                other.descriptor().name()
            ))),
        }
    }
}
