// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

pub use super::parquet_bridge::Compression;

use crate::error::{Error, Result};

/// Parquet compression codec interface.
pub trait Codec: std::fmt::Debug {
    /// Compresses `input` and returns the compressed bytes.
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses `input`, which is known to expand to exactly
    /// `uncompressed_size` bytes.
    fn decompress(&mut self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>>;
}

/// Given the compression type `codec`, returns a codec used to compress and
/// decompress bytes for the compression type.
/// This returns `None` if the codec type is `UNCOMPRESSED`: callers pass the
/// bytes through unchanged, after checking the declared size.
pub fn create_codec(codec: &Compression) -> Result<Option<Box<dyn Codec>>> {
    #[allow(unreachable_patterns)]
    match *codec {
        #[cfg(feature = "gzip")]
        Compression::Gzip => Ok(Some(Box::new(GzipCodec::new()))),
        #[cfg(feature = "snappy")]
        Compression::Snappy => Ok(Some(Box::new(SnappyCodec::new()))),
        #[cfg(feature = "zstd")]
        Compression::Zstd => Ok(Some(Box::new(ZstdCodec::new()))),
        Compression::Uncompressed => Ok(None),
        _ => Err(Error::UnsupportedCodec(*codec)),
    }
}

/// The `UNCOMPRESSED` pass-through: returns `input` unchanged and requires
/// its length to equal the declared uncompressed size.
pub fn passthrough(input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
    if input.len() != uncompressed_size {
        return Err(Error::InvalidSize(format!(
            "uncompressed page declares {} bytes but holds {}",
            uncompressed_size,
            input.len()
        )));
    }
    Ok(input.to_vec())
}

#[cfg(feature = "snappy")]
mod snappy_codec {
    use snap::raw::{decompress_len, Decoder, Encoder};

    use super::Codec;
    use crate::error::{Error, Result};
    use crate::parquet_bridge::Compression;

    /// Codec for Snappy compression format.
    #[derive(Debug)]
    pub struct SnappyCodec {
        decoder: Decoder,
        encoder: Encoder,
    }

    impl SnappyCodec {
        pub(crate) fn new() -> Self {
            Self {
                decoder: Decoder::new(),
                encoder: Encoder::new(),
            }
        }
    }

    impl Codec for SnappyCodec {
        fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
            self.encoder
                .compress_vec(input)
                .map_err(|e| Error::CompressionFailed(Compression::Snappy, e.to_string()))
        }

        fn decompress(&mut self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
            let len = decompress_len(input)
                .map_err(|e| Error::CompressionFailed(Compression::Snappy, e.to_string()))?;
            if len != uncompressed_size {
                return Err(Error::InvalidSize(format!(
                    "snappy stream expands to {} bytes, the page header declares {}",
                    len, uncompressed_size
                )));
            }
            self.decoder
                .decompress_vec(input)
                .map_err(|e| Error::CompressionFailed(Compression::Snappy, e.to_string()))
        }
    }
}
#[cfg(feature = "snappy")]
pub use snappy_codec::*;

#[cfg(feature = "gzip")]
mod gzip_codec {
    use std::io::{Read, Write};

    use flate2::{read, write};

    use super::Codec;
    use crate::error::{Error, Result};
    use crate::parquet_bridge::Compression;

    /// Codec for GZIP compression algorithm.
    #[derive(Debug)]
    pub struct GzipCodec {}

    impl GzipCodec {
        pub(crate) fn new() -> Self {
            Self {}
        }
    }

    impl Codec for GzipCodec {
        fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
            let mut encoder =
                write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(input)
                .and_then(|_| encoder.finish())
                .map_err(|e| Error::CompressionFailed(Compression::Gzip, e.to_string()))
        }

        fn decompress(&mut self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
            let mut output = vec![0; uncompressed_size];
            let mut decoder = read::GzDecoder::new(input);
            decoder
                .read_exact(&mut output)
                .map_err(|e| Error::CompressionFailed(Compression::Gzip, e.to_string()))?;
            Ok(output)
        }
    }
}
#[cfg(feature = "gzip")]
pub use gzip_codec::*;

#[cfg(feature = "zstd")]
mod zstd_codec {
    use std::io::{Read, Write};

    use super::Codec;
    use crate::error::{Error, Result};
    use crate::parquet_bridge::Compression;

    /// Codec for Zstandard compression algorithm.
    #[derive(Debug)]
    pub struct ZstdCodec {}

    impl ZstdCodec {
        pub(crate) fn new() -> Self {
            Self {}
        }
    }

    /// Compression level (1-21) for ZSTD. Choose 1 here for better compression speed.
    const ZSTD_COMPRESSION_LEVEL: i32 = 1;

    impl Codec for ZstdCodec {
        fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
            let mut encoder = zstd::Encoder::new(Vec::new(), ZSTD_COMPRESSION_LEVEL)
                .map_err(|e| Error::CompressionFailed(Compression::Zstd, e.to_string()))?;
            encoder
                .write_all(input)
                .and_then(|_| encoder.finish())
                .map_err(|e| Error::CompressionFailed(Compression::Zstd, e.to_string()))
        }

        fn decompress(&mut self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
            let mut output = vec![0; uncompressed_size];
            let mut decoder = zstd::Decoder::new(input)
                .map_err(|e| Error::CompressionFailed(Compression::Zstd, e.to_string()))?;
            decoder
                .read_exact(&mut output)
                .map_err(|e| Error::CompressionFailed(Compression::Zstd, e.to_string()))?;
            Ok(output)
        }
    }
}
#[cfg(feature = "zstd")]
pub use zstd_codec::*;
