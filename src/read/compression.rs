use crate::compression::{self, create_codec};
use crate::error::{Error, Result};
use crate::page::{CompressedDataPage, CompressedPage, DataPage, DataPageHeader, EncodedDictPage, Page};

fn decompress_data(page: CompressedDataPage) -> Result<DataPage> {
    let codec = create_codec(&page.compression)?;
    let buffer = if let Some(mut codec) = codec {
        match &page.header {
            DataPageHeader::V1(_) => {
                // the whole body is compressed
                codec.decompress(&page.buffer, page.uncompressed_page_size)?
            }
            DataPageHeader::V2(header) => {
                // levels are uncompressed, only the values segment is
                let offset = (header.definition_levels_byte_length
                    + header.repetition_levels_byte_length)
                    as usize;
                if offset > page.buffer.len() || offset > page.uncompressed_page_size {
                    return Err(Error::InvalidSize(
                        "the level sections are larger than the page".to_string(),
                    ));
                }
                // when the flag is missing the page is considered compressed
                let is_compressed = header.is_compressed.unwrap_or(true);
                if is_compressed {
                    let mut buffer = page.buffer[..offset].to_vec();
                    buffer.extend(
                        codec.decompress(
                            &page.buffer[offset..],
                            page.uncompressed_page_size - offset,
                        )?,
                    );
                    buffer
                } else {
                    compression::passthrough(&page.buffer, page.uncompressed_page_size)?
                }
            }
        }
    } else {
        compression::passthrough(&page.buffer, page.uncompressed_page_size)?
    };
    Ok(DataPage::new(page.header, buffer))
}

/// Decompresses a page, validating that the body expands to the size its
/// header advertises.
pub fn decompress(page: CompressedPage) -> Result<Page> {
    match page {
        CompressedPage::Data(page) => decompress_data(page).map(Page::Data),
        CompressedPage::Dict(page) => {
            let codec = create_codec(&page.compression)?;
            let buffer = if let Some(mut codec) = codec {
                codec.decompress(&page.buffer, page.uncompressed_page_size)?
            } else {
                compression::passthrough(&page.buffer, page.uncompressed_page_size)?
            };
            Ok(Page::Dict(EncodedDictPage::new(buffer, page.num_values)))
        }
    }
}
