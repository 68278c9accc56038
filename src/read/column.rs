use std::io::{Read, Seek, SeekFrom};

use crate::encoding::{hybrid_rle, levels, Encoding};
use crate::error::{Error, Result};
use crate::metadata::{ColumnChunkMetaData, ColumnDescriptor};
use crate::nested::Nested;
use crate::page::{DataPage, DataPageHeader, DataPageHeaderExt, Page};
use crate::types::ParquetValue;

use super::compression::decompress;
use super::deserialize;
use super::levels::{split_buffer_v1, split_buffer_v2};
use super::page::PageReader;

/// The decoded streams of one column chunk: the present values and the
/// parallel level streams.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunkData<T: ParquetValue> {
    pub values: Vec<T>,
    pub def_levels: Vec<u32>,
    pub rep_levels: Vec<u32>,
    pub descriptor: ColumnDescriptor,
}

impl<T: ParquetValue> ColumnChunkData<T> {
    /// The values of a required flat column.
    pub fn into_values(self) -> Result<Vec<T>> {
        if self.descriptor.max_def_level() != 0 {
            return Err(Error::SchemaMismatch(format!(
                "column \"{}\" is not required",
                self.descriptor.name()
            )));
        }
        Ok(self.values)
    }

    /// The values of a nullable flat column.
    pub fn into_optional(self) -> Result<Vec<Option<T>>> {
        if self.descriptor.max_rep_level() != 0 {
            return Err(Error::SchemaMismatch(format!(
                "column \"{}\" is nested",
                self.descriptor.name()
            )));
        }
        deserialize::to_optional(
            self.values,
            &self.def_levels,
            self.descriptor.max_def_level(),
        )
    }

    /// The reconstructed nested values of a list column.
    pub fn into_nested(self) -> Result<Vec<Nested<T>>> {
        deserialize::to_nested(
            self.values,
            &self.rep_levels,
            &self.def_levels,
            &self.descriptor,
        )
    }
}

/// Reads and decodes an entire column chunk: pages are iterated, levels and
/// values decoded and concatenated in order.
pub fn read_column_chunk<R: Read + Seek, T: ParquetValue>(
    reader: &mut R,
    column: &ColumnChunkMetaData,
) -> Result<ColumnChunkData<T>> {
    if !T::matches(column.physical_type()) {
        return Err(Error::SchemaMismatch(format!(
            "column \"{}\" has physical type {:?}",
            column.descriptor().name(),
            column.physical_type()
        )));
    }
    let descriptor = column.descriptor().clone();
    let fixed_length = column.physical_type().fixed_length();

    let (start, _) = column.byte_range()?;
    reader.seek(SeekFrom::Start(start))?;
    let pages = PageReader::new(reader, column);

    let mut dict: Option<Vec<T>> = None;
    let mut values = vec![];
    let mut def_levels = vec![];
    let mut rep_levels = vec![];

    for page in pages {
        match decompress(page?)? {
            Page::Dict(page) => {
                if dict.is_some() {
                    return Err(Error::OutOfSpec(
                        "a column chunk can have at most one dictionary page".to_string(),
                    ));
                }
                if !(values.is_empty() && def_levels.is_empty()) {
                    return Err(Error::OutOfSpec(
                        "the dictionary page must be the first page of the chunk".to_string(),
                    ));
                }
                if !T::supports_dictionary() {
                    return Err(Error::OutOfSpec(format!(
                        "{:?} columns cannot be dictionary-encoded",
                        column.physical_type()
                    )));
                }
                // the page body must hold exactly the declared value count
                let actual = match T::plain_fixed_size(fixed_length) {
                    Some(size) => {
                        if page.buffer.len() % size != 0 {
                            return Err(Error::InvalidSize(
                                "a dictionary page body must be a whole number of values"
                                    .to_string(),
                            ));
                        }
                        page.buffer.len() / size
                    }
                    None => crate::encoding::plain::count_byte_arrays(&page.buffer)?,
                };
                if actual != page.num_values {
                    return Err(Error::DictionaryValueCountMismatch {
                        expected: page.num_values,
                        got: actual,
                    });
                }
                dict = Some(T::plain_decode(
                    &page.buffer,
                    page.num_values,
                    fixed_length,
                )?);
            }
            Page::Data(page) => decode_page(
                &page,
                &descriptor,
                fixed_length,
                dict.as_deref(),
                &mut values,
                &mut def_levels,
                &mut rep_levels,
            )?,
        }
    }

    // the chunk metadata counts level entries, not present values
    let total = if descriptor.max_def_level() > 0 {
        def_levels.len()
    } else {
        values.len()
    };
    if total as i64 != column.num_values() {
        return Err(Error::ValueMismatch {
            expected: column.num_values() as usize,
            got: total,
        });
    }

    Ok(ColumnChunkData {
        values,
        def_levels,
        rep_levels,
        descriptor,
    })
}

fn decode_page<T: ParquetValue>(
    page: &DataPage,
    descriptor: &ColumnDescriptor,
    fixed_length: Option<usize>,
    dict: Option<&[T]>,
    values: &mut Vec<T>,
    def_levels: &mut Vec<u32>,
    rep_levels: &mut Vec<u32>,
) -> Result<()> {
    let num_values = page.num_values();
    let max_rep = descriptor.max_rep_level();
    let max_def = descriptor.max_def_level();

    let (rep, def, value_bytes) = match page.header() {
        DataPageHeader::V1(header) => {
            if max_rep > 0 && header.repetition_level_encoding() != Encoding::Rle {
                return Err(Error::UnsupportedEncoding(
                    header.repetition_level_encoding(),
                ));
            }
            if max_def > 0 && header.definition_level_encoding() != Encoding::Rle {
                return Err(Error::UnsupportedEncoding(
                    header.definition_level_encoding(),
                ));
            }
            split_buffer_v1(page.buffer(), max_rep > 0, max_def > 0)?
        }
        DataPageHeader::V2(header) => split_buffer_v2(
            page.buffer(),
            header.repetition_levels_byte_length as usize,
            header.definition_levels_byte_length as usize,
        )?,
    };

    // levels in v1 pages carry their own length prefix; in v2 pages the
    // header frames them
    let page_rep = match (max_rep > 0, page.header()) {
        (false, _) => vec![],
        (true, DataPageHeader::V1(_)) => levels::decode(rep, num_values, max_rep)?,
        (true, DataPageHeader::V2(_)) => {
            hybrid_rle::decode(rep, num_values, levels::get_bit_width(max_rep))?
        }
    };
    let page_def = match (max_def > 0, page.header()) {
        (false, _) => vec![],
        (true, DataPageHeader::V1(_)) => levels::decode(def, num_values, max_def)?,
        (true, DataPageHeader::V2(_)) => {
            hybrid_rle::decode(def, num_values, levels::get_bit_width(max_def))?
        }
    };

    let num_present = if max_def > 0 {
        page_def
            .iter()
            .filter(|&&level| level as i16 == max_def)
            .count()
    } else {
        num_values
    };

    if let DataPageHeader::V2(header) = page.header() {
        let num_nulls = num_values - num_present;
        if header.num_nulls as usize != num_nulls {
            return Err(Error::ValueMismatch {
                expected: header.num_nulls as usize,
                got: num_nulls,
            });
        }
    }

    let page_values = match page.encoding() {
        Encoding::Plain => T::plain_decode(value_bytes, num_present, fixed_length)?,
        Encoding::RleDictionary | Encoding::PlainDictionary => {
            let dict = dict.ok_or_else(|| {
                Error::OutOfSpec(
                    "a dictionary-encoded page must be preceded by a dictionary page".to_string(),
                )
            })?;
            if num_present == 0 {
                vec![]
            } else {
                if value_bytes.is_empty() {
                    return Err(Error::InsufficientData);
                }
                let bit_width = value_bytes[0] as u32;
                let indices = hybrid_rle::decode(&value_bytes[1..], num_present, bit_width)?;
                indices
                    .into_iter()
                    .map(|index| {
                        dict.get(index as usize).cloned().ok_or(
                            Error::DictionaryIndexOutOfBounds {
                                index: index as usize,
                                length: dict.len(),
                            },
                        )
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        }
        other => return Err(Error::UnsupportedEncoding(other)),
    };

    values.extend(page_values);
    def_levels.extend(page_def);
    rep_levels.extend(page_rep);
    Ok(())
}
