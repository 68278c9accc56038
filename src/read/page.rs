use std::convert::TryInto;
use std::io::Read;

use parquet_format_safe::thrift::protocol::TCompactInputProtocol;

use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::metadata::ColumnChunkMetaData;
use crate::page::{
    CompressedDataPage, CompressedDictPage, CompressedPage, DataPageHeader, PageType,
    ParquetPageHeader,
};

/// The maximum number of bytes thrift is allowed to allocate while reading a
/// page header.
const MAX_PAGE_HEADER_SIZE: usize = 1024 * 1024;

/// A fallible [`Iterator`] of [`CompressedPage`]. This iterator reads pages
/// back to back until all the values of the column chunk have been covered.
/// Index pages are skipped.
pub struct PageReader<R: Read> {
    // The source
    reader: R,

    compression: Compression,

    // The number of values we have seen so far.
    seen_num_values: i64,

    // The number of total values in this column chunk.
    total_num_values: i64,
}

impl<R: Read> PageReader<R> {
    /// Returns a new [`PageReader`].
    ///
    /// It assumes that the reader has been `seeked` to the beginning of
    /// `column`.
    pub fn new(reader: R, column: &ColumnChunkMetaData) -> Self {
        Self {
            reader,
            total_num_values: column.num_values(),
            compression: column.compression(),
            seen_num_values: 0,
        }
    }

    /// Returns the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_page(&mut self) -> Result<Option<CompressedPage>> {
        while self.seen_num_values < self.total_num_values {
            let page_header = read_page_header(&mut self.reader)?;

            let read_size: usize = page_header
                .compressed_page_size
                .try_into()
                .map_err(|_| Error::OutOfSpec("a page cannot have a negative size".to_string()))?;
            let mut buffer = vec![0; read_size];
            self.reader.read_exact(&mut buffer)?;

            let type_: PageType = page_header.type_.try_into()?;
            if type_ == PageType::IndexPage {
                // not part of the data stream
                continue;
            }
            let page = finish_page(page_header, buffer, self.compression)?;
            if let CompressedPage::Data(page) = &page {
                self.seen_num_values += page.num_values() as i64;
            }
            return Ok(Some(page));
        }
        Ok(None)
    }
}

impl<R: Read> Iterator for PageReader<R> {
    type Item = Result<CompressedPage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page().transpose()
    }
}

/// Reads Page header from Thrift.
pub(crate) fn read_page_header<R: Read>(reader: &mut R) -> Result<ParquetPageHeader> {
    let mut prot = TCompactInputProtocol::new(reader, MAX_PAGE_HEADER_SIZE);
    let page_header = ParquetPageHeader::read_from_in_protocol(&mut prot)?;
    Ok(page_header)
}

fn finish_page(
    page_header: ParquetPageHeader,
    data: Vec<u8>,
    compression: Compression,
) -> Result<CompressedPage> {
    let type_: PageType = page_header.type_.try_into()?;
    let uncompressed_page_size: usize = page_header
        .uncompressed_page_size
        .try_into()
        .map_err(|_| Error::OutOfSpec("a page cannot have a negative size".to_string()))?;
    match type_ {
        PageType::DictionaryPage => {
            let dict_header = page_header.dictionary_page_header.as_ref().ok_or_else(|| {
                Error::OutOfSpec(
                    "a dictionary page must contain a dictionary header".to_string(),
                )
            })?;
            let num_values: usize = dict_header.num_values.try_into().map_err(|_| {
                Error::OutOfSpec("a dictionary page cannot have a negative count".to_string())
            })?;

            Ok(CompressedPage::Dict(CompressedDictPage::new(
                data,
                compression,
                uncompressed_page_size,
                num_values,
            )))
        }
        PageType::DataPage => {
            let header = page_header.data_page_header.ok_or_else(|| {
                Error::OutOfSpec("a v1 data page must contain a v1 header".to_string())
            })?;

            Ok(CompressedPage::Data(CompressedDataPage::new(
                DataPageHeader::V1(header),
                data,
                compression,
                uncompressed_page_size,
            )))
        }
        PageType::DataPageV2 => {
            let header = page_header.data_page_header_v2.ok_or_else(|| {
                Error::OutOfSpec("a v2 data page must contain a v2 header".to_string())
            })?;

            Ok(CompressedPage::Data(CompressedDataPage::new(
                DataPageHeader::V2(header),
                data,
                compression,
                uncompressed_page_size,
            )))
        }
        PageType::IndexPage => unreachable!(),
    }
}
