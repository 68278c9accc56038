use crate::parquet_bridge::{Compression, Encoding};

/// Errors generated by this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The file is not a parquet file: magic mismatch, truncation, or a
    /// footer missing required fields.
    InvalidFile(String),
    /// The parquet file is known to be out of spec.
    OutOfSpec(String),
    /// The file advertises an encoding this crate does not implement.
    UnsupportedEncoding(Encoding),
    /// The file advertises a codec this crate does not implement or that was
    /// not enabled at compile time.
    UnsupportedCodec(Compression),
    /// A ULEB128 run header spans more than 10 bytes.
    MalformedVarint,
    /// The run data ended before the declared number of values was decoded.
    TruncatedRuns,
    /// Bytes or runs were left over after the declared number of values.
    UnconsumedData,
    /// A run header is invalid, e.g. an RLE run with a zero count.
    InvalidRunHeader(String),
    /// A bit-width outside `0..=32`.
    InvalidBitWidth(u32),
    /// The number of decoded items differs from the expected number.
    ValueMismatch { expected: usize, got: usize },
    /// A level stream is shorter than its 4-byte length prefix.
    MissingLengthPrefix,
    /// A declared size does not match the data it frames.
    InvalidSize(String),
    /// A PLAIN-encoded buffer ended mid-value.
    InsufficientData,
    /// A PLAIN-encoded value is invalid, e.g. non-UTF8 string bytes or an
    /// oversized byte array.
    InvalidData(String),
    /// A `FIXED_LEN_BYTE_ARRAY` value whose length differs from the schema's
    /// `type_length`.
    ValueSizeMismatch { expected: usize, got: usize },
    /// A dictionary index points past the end of the dictionary.
    DictionaryIndexOutOfBounds { index: usize, length: usize },
    /// A dictionary page declared a different number of values than it holds.
    DictionaryValueCountMismatch { expected: usize, got: usize },
    /// The column does not have the requested type, or the column index is
    /// out of bounds.
    SchemaMismatch(String),
    /// An operation was attempted outside the writer's state machine.
    InvalidState(String),
    /// An error from the underlying sink or input.
    IoError(String),
    /// A compression codec failed; carries the offending codec.
    CompressionFailed(Compression, String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidFile(message) => write!(fmt, "invalid parquet file: {}", message),
            Error::OutOfSpec(message) => write!(fmt, "file out of spec: {}", message),
            Error::UnsupportedEncoding(encoding) => {
                write!(fmt, "encoding {:?} is not supported", encoding)
            }
            Error::UnsupportedCodec(codec) => {
                write!(fmt, "compression {:?} is not supported", codec)
            }
            Error::MalformedVarint => write!(fmt, "a varint spans more than 10 bytes"),
            Error::TruncatedRuns => write!(fmt, "run data ended before all values were decoded"),
            Error::UnconsumedData => write!(fmt, "data left over after decoding all values"),
            Error::InvalidRunHeader(message) => write!(fmt, "invalid run header: {}", message),
            Error::InvalidBitWidth(width) => {
                write!(fmt, "bit-width {} is outside the supported range 0..=32", width)
            }
            Error::ValueMismatch { expected, got } => {
                write!(fmt, "expected {} items, decoded {}", expected, got)
            }
            Error::MissingLengthPrefix => {
                write!(fmt, "a level stream requires a 4-byte length prefix")
            }
            Error::InvalidSize(message) => write!(fmt, "invalid size: {}", message),
            Error::InsufficientData => write!(fmt, "buffer ended mid-value"),
            Error::InvalidData(message) => write!(fmt, "invalid data: {}", message),
            Error::ValueSizeMismatch { expected, got } => write!(
                fmt,
                "fixed-length value has {} bytes, the schema declares {}",
                got, expected
            ),
            Error::DictionaryIndexOutOfBounds { index, length } => write!(
                fmt,
                "dictionary index {} out of bounds for a dictionary of {} values",
                index, length
            ),
            Error::DictionaryValueCountMismatch { expected, got } => write!(
                fmt,
                "dictionary page declared {} values but holds {}",
                expected, got
            ),
            Error::SchemaMismatch(message) => write!(fmt, "schema mismatch: {}", message),
            Error::InvalidState(message) => write!(fmt, "invalid state: {}", message),
            Error::IoError(message) => write!(fmt, "underlying IO error: {}", message),
            Error::CompressionFailed(codec, message) => {
                write!(fmt, "codec {:?} failed: {}", codec, message)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IoError(e.to_string())
    }
}

impl From<parquet_format_safe::thrift::Error> for Error {
    fn from(e: parquet_format_safe::thrift::Error) -> Error {
        Error::OutOfSpec(format!("invalid thrift: {}", e))
    }
}

#[cfg(feature = "snappy")]
impl From<snap::Error> for Error {
    fn from(e: snap::Error) -> Error {
        Error::CompressionFailed(Compression::Snappy, e.to_string())
    }
}

/// A specialized `Result` for errors of this crate.
pub type Result<T> = std::result::Result<T, Error>;
