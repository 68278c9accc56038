use std::io::Write;

use parquet_format_safe::thrift::protocol::TCompactOutputProtocol;
use parquet_format_safe::{FileMetaData, RowGroup};

pub use crate::metadata::KeyValue;
use crate::{
    error::{Error, Result},
    metadata::SchemaDescriptor,
    FOOTER_SIZE, PARQUET_MAGIC,
};

use super::{row_group::RowGroupWriter, WriteOptions};

pub(super) fn start_file<W: Write>(writer: &mut W) -> Result<u64> {
    writer.write_all(&PARQUET_MAGIC)?;
    Ok(PARQUET_MAGIC.len() as u64)
}

pub(super) fn end_file<W: Write>(mut writer: &mut W, metadata: FileMetaData) -> Result<u64> {
    // Write metadata
    let mut protocol = TCompactOutputProtocol::new(&mut writer);
    let metadata_len = metadata.write_to_out_protocol(&mut protocol)? as i32;

    // Write footer
    let metadata_bytes = metadata_len.to_le_bytes();
    let mut footer_buffer = [0u8; FOOTER_SIZE as usize];
    (0..4).for_each(|i| {
        footer_buffer[i] = metadata_bytes[i];
    });

    (&mut footer_buffer[4..]).write_all(&PARQUET_MAGIC)?;
    writer.write_all(&footer_buffer)?;
    Ok(metadata_len as u64 + FOOTER_SIZE)
}

/// An interface to write a parquet file.
/// Use `start` to write the header, `row_group` to write each row group,
/// and `end` to write the footer.
pub struct FileWriter<W: Write> {
    pub(super) writer: W,
    pub(super) schema: SchemaDescriptor,
    pub(super) options: WriteOptions,
    created_by: Option<String>,

    pub(super) offset: u64,
    pub(super) row_groups: Vec<RowGroup>,
}

// Accessors
impl<W: Write> FileWriter<W> {
    /// The options assigned to the file
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// The [`SchemaDescriptor`] assigned to this file
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }
}

impl<W: Write> FileWriter<W> {
    /// Returns a new [`FileWriter`].
    pub fn new(
        writer: W,
        schema: SchemaDescriptor,
        options: WriteOptions,
        created_by: Option<String>,
    ) -> Self {
        Self {
            writer,
            schema,
            options,
            created_by,
            offset: 0,
            row_groups: vec![],
        }
    }

    /// Writes the header of the file.
    pub fn start(&mut self) -> Result<()> {
        if self.offset != 0 {
            return Err(Error::InvalidState(
                "the file has already been started".to_string(),
            ));
        }
        self.offset = start_file(&mut self.writer)?;
        Ok(())
    }

    /// Opens a new row group. Its columns are filled through the returned
    /// writer; the row group is serialized on [`RowGroupWriter::close`].
    pub fn row_group(&mut self) -> Result<RowGroupWriter<'_, W>> {
        if self.offset == 0 {
            return Err(Error::InvalidState(
                "you must call `start` before writing the first row group".to_string(),
            ));
        }
        Ok(RowGroupWriter::new(self))
    }

    /// Writes the footer of the parquet file. Returns the total size of the
    /// file and the underlying writer.
    pub fn end(mut self, key_value_metadata: Option<Vec<KeyValue>>) -> Result<(u64, W)> {
        if self.offset == 0 {
            return Err(Error::InvalidState(
                "you must call `start` before ending the file".to_string(),
            ));
        }

        // compute file stats
        let num_rows = self.row_groups.iter().map(|group| group.num_rows).sum();

        let metadata = FileMetaData::new(
            self.options.version.into(),
            self.schema.into_thrift()?,
            num_rows,
            self.row_groups,
            key_value_metadata,
            self.created_by,
            None,
            None,
            None,
        );

        let len = end_file(&mut self.writer, metadata)?;
        Ok((self.offset + len, self.writer))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::Result;
    use crate::read::read_metadata;
    use crate::schema::types::{ParquetType, PhysicalType};

    #[test]
    fn empty_file_round_trips() -> Result<()> {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::from_physical(
                "col".to_string(),
                PhysicalType::Int32,
            )],
        );
        let mut writer = FileWriter::new(
            Cursor::new(vec![]),
            schema,
            WriteOptions::default(),
            Some("parquet-native".to_string()),
        );

        writer.start()?;
        let (size, writer) = writer.end(None)?;

        let data = writer.into_inner();
        assert_eq!(data.len() as u64, size);

        let metadata = read_metadata(&mut Cursor::new(data))?;
        assert_eq!(metadata.num_rows, 0);
        assert_eq!(metadata.created_by.as_deref(), Some("parquet-native"));
        Ok(())
    }

    #[test]
    fn row_group_requires_start() {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::from_physical(
                "col".to_string(),
                PhysicalType::Int32,
            )],
        );
        let mut writer =
            FileWriter::new(Cursor::new(vec![]), schema, WriteOptions::default(), None);
        assert!(matches!(
            writer.row_group().map(|_| ()),
            Err(Error::InvalidState(_))
        ));
    }
}
