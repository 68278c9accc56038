pub use parquet_format_safe::{
    DataPageHeader as DataPageHeaderV1, DataPageHeaderV2, PageHeader as ParquetPageHeader,
};

pub use crate::parquet_bridge::{DataPageHeaderExt, PageType};

use crate::compression::Compression;
use crate::encoding::Encoding;

/// The header of a data page, either version.
#[derive(Debug, Clone)]
pub enum DataPageHeader {
    V1(DataPageHeaderV1),
    V2(DataPageHeaderV2),
}

impl DataPageHeader {
    /// The number of level entries in the page.
    pub fn num_values(&self) -> usize {
        match self {
            DataPageHeader::V1(d) => d.num_values as usize,
            DataPageHeader::V2(d) => d.num_values as usize,
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            DataPageHeader::V1(d) => d.encoding(),
            DataPageHeader::V2(d) => d.encoding(),
        }
    }
}

/// A [`DataPage`] is an uncompressed, encoded representation of a Parquet
/// data page. It holds actual data and thus cloning it is expensive.
#[derive(Debug, Clone)]
pub struct DataPage {
    header: DataPageHeader,
    buffer: Vec<u8>,
}

impl DataPage {
    pub fn new(header: DataPageHeader, buffer: Vec<u8>) -> Self {
        Self { header, buffer }
    }

    pub fn header(&self) -> &DataPageHeader {
        &self.header
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn num_values(&self) -> usize {
        self.header.num_values()
    }

    pub fn encoding(&self) -> Encoding {
        self.header.encoding()
    }
}

/// A [`CompressedDataPage`] is a compressed, encoded representation of a
/// Parquet data page. It holds actual data and thus cloning it is expensive.
#[derive(Debug)]
pub struct CompressedDataPage {
    pub(crate) header: DataPageHeader,
    pub(crate) buffer: Vec<u8>,
    pub(crate) compression: Compression,
    pub(crate) uncompressed_page_size: usize,
}

impl CompressedDataPage {
    pub fn new(
        header: DataPageHeader,
        buffer: Vec<u8>,
        compression: Compression,
        uncompressed_page_size: usize,
    ) -> Self {
        Self {
            header,
            buffer,
            compression,
            uncompressed_page_size,
        }
    }

    pub fn header(&self) -> &DataPageHeader {
        &self.header
    }

    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_page_size
    }

    pub fn compressed_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn num_values(&self) -> usize {
        self.header.num_values()
    }
}

/// An uncompressed dictionary page: the PLAIN-encoded dictionary values.
#[derive(Debug, Clone)]
pub struct EncodedDictPage {
    pub buffer: Vec<u8>,
    pub num_values: usize,
}

impl EncodedDictPage {
    pub fn new(buffer: Vec<u8>, num_values: usize) -> Self {
        Self { buffer, num_values }
    }
}

/// A compressed dictionary page.
#[derive(Debug)]
pub struct CompressedDictPage {
    pub buffer: Vec<u8>,
    pub compression: Compression,
    pub uncompressed_page_size: usize,
    pub num_values: usize,
}

impl CompressedDictPage {
    pub fn new(
        buffer: Vec<u8>,
        compression: Compression,
        uncompressed_page_size: usize,
        num_values: usize,
    ) -> Self {
        Self {
            buffer,
            compression,
            uncompressed_page_size,
            num_values,
        }
    }
}

/// An uncompressed page.
#[derive(Debug)]
pub enum Page {
    Data(DataPage),
    Dict(EncodedDictPage),
}

/// A compressed page. Pages move through the pipeline as
/// `Page -> CompressedPage` on write and `CompressedPage -> Page` on read.
#[derive(Debug)]
pub enum CompressedPage {
    Data(CompressedDataPage),
    Dict(CompressedDictPage),
}

impl CompressedPage {
    pub fn compressed_size(&self) -> usize {
        match self {
            CompressedPage::Data(page) => page.buffer.len(),
            CompressedPage::Dict(page) => page.buffer.len(),
        }
    }

    pub fn uncompressed_size(&self) -> usize {
        match self {
            CompressedPage::Data(page) => page.uncompressed_page_size,
            CompressedPage::Dict(page) => page.uncompressed_page_size,
        }
    }
}
