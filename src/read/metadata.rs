use std::cmp::min;
use std::convert::TryInto;
use std::io::{Read, Seek, SeekFrom};

use parquet_format_safe::thrift::protocol::TCompactInputProtocol;
use parquet_format_safe::FileMetaData as TFileMetaData;

use crate::error::{Error, Result};
use crate::metadata::FileMetaData;
use crate::{DEFAULT_FOOTER_READ_SIZE, FOOTER_SIZE, MAX_METADATA_SIZE, PARQUET_MAGIC};

/// The smallest valid file: two magic frames and a 4-byte footer length.
pub(crate) const HEADER_SIZE: u64 = PARQUET_MAGIC.len() as u64;
pub(crate) const MIN_FILE_SIZE: u64 = HEADER_SIZE + FOOTER_SIZE;

fn metadata_len(buffer: &[u8], len: usize) -> i32 {
    i32::from_le_bytes(buffer[len - 8..len - 4].try_into().unwrap())
}

// see (unstable) Seek::stream_len
fn stream_len(seek: &mut impl Seek) -> std::result::Result<u64, std::io::Error> {
    let old_pos = seek.seek(SeekFrom::Current(0))?;
    let len = seek.seek(SeekFrom::End(0))?;

    // Avoid seeking a third time when we were already at the end of the
    // stream. The branch is usually way cheaper than a seek operation.
    if old_pos != len {
        seek.seek(SeekFrom::Start(old_pos))?;
    }

    Ok(len)
}

/// Reads a file's metadata.
// Layout of Parquet file
// +---------------------------+-----+---+
// |      Rest of file         |  B  | A |
// +---------------------------+-----+---+
// where A: parquet footer, B: parquet metadata.
//
// The reader first reads DEFAULT_FOOTER_READ_SIZE bytes from the end of the
// file. If it is not enough according to the length indicated in the footer,
// it reads more bytes.
pub fn read_metadata<R: Read + Seek>(reader: &mut R) -> Result<FileMetaData> {
    let file_size = stream_len(reader)?;
    if file_size < MIN_FILE_SIZE {
        return Err(Error::InvalidFile(format!(
            "the file is only {} bytes, smaller than the header and footer frames",
            file_size
        )));
    }

    // check the leading magic
    let mut magic = [0u8; HEADER_SIZE as usize];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut magic)?;
    if magic != PARQUET_MAGIC {
        return Err(Error::InvalidFile("corrupt header magic".to_string()));
    }

    // read and cache up to DEFAULT_FOOTER_READ_SIZE bytes from the end and
    // process the footer
    let default_end_len = min(DEFAULT_FOOTER_READ_SIZE, file_size) as usize;
    reader.seek(SeekFrom::End(-(default_end_len as i64)))?;
    let mut buffer = vec![0; default_end_len];
    reader.read_exact(&mut buffer)?;

    // check the trailing magic
    if buffer[default_end_len - 4..] != PARQUET_MAGIC {
        return Err(Error::InvalidFile("corrupt footer magic".to_string()));
    }

    let metadata_len = metadata_len(&buffer, default_end_len);
    if metadata_len < 0 {
        return Err(Error::InvalidFile(format!(
            "the footer length is negative ({})",
            metadata_len
        )));
    }
    let metadata_len = metadata_len as u64;
    if metadata_len == 0 {
        return Err(Error::InvalidFile(
            "the footer must contain at least a schema".to_string(),
        ));
    }

    let footer_len = FOOTER_SIZE + metadata_len;
    if footer_len + HEADER_SIZE > file_size {
        return Err(Error::InvalidFile(format!(
            "the footer declares {} bytes, which overlaps the header frame",
            metadata_len
        )));
    }

    let t_file_metadata = if (footer_len as usize) <= buffer.len() {
        // the whole metadata is in the bytes we already read
        let start = buffer.len() - footer_len as usize;
        deserialize_metadata(&buffer[start..])
    } else {
        // the tail read by default is not long enough; read again including
        // all metadata.
        reader.seek(SeekFrom::End(-(footer_len as i64)))?;
        let mut buffer = vec![0; metadata_len as usize];
        reader.read_exact(&mut buffer)?;
        deserialize_metadata(&buffer)
    }?;

    FileMetaData::try_from_thrift(t_file_metadata)
}

/// Deserializes a thrift-encoded [`TFileMetaData`] from the start of `data`.
fn deserialize_metadata(data: &[u8]) -> Result<TFileMetaData> {
    let mut prot = TCompactInputProtocol::new(data, MAX_METADATA_SIZE);
    Ok(TFileMetaData::read_from_in_protocol(&mut prot)?)
}
