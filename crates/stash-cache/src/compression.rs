//! Streaming compression codecs for cache archives.
//!
//! The save path layers a tar builder over one of these writers, so packing,
//! compressing, and hashing happen in a single pass with bounded buffering.

use crate::types::CompressionScheme;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use stash_core::{Error, Result};
use std::io::{Read, Write};

/// Compressing writer for the selected scheme.
pub enum CompressWriter<W: Write> {
    Gzip(GzEncoder<W>),
    Lz4(FrameEncoder<W>),
}

impl<W: Write> CompressWriter<W> {
    pub fn new(scheme: CompressionScheme, writer: W) -> Self {
        match scheme {
            CompressionScheme::Gzip => {
                CompressWriter::Gzip(GzEncoder::new(writer, flate2::Compression::default()))
            }
            CompressionScheme::Lz4 => CompressWriter::Lz4(FrameEncoder::new(writer)),
        }
    }

    /// Flush trailing frames and return the inner writer.
    pub fn finish(self) -> Result<W> {
        match self {
            CompressWriter::Gzip(encoder) => encoder
                .finish()
                .map_err(|e| Error::Archive(format!("Gzip finish failed: {}", e))),
            CompressWriter::Lz4(encoder) => encoder
                .finish()
                .map_err(|e| Error::Archive(format!("LZ4 finish failed: {}", e))),
        }
    }
}

impl<W: Write> Write for CompressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            CompressWriter::Gzip(encoder) => encoder.write(buf),
            CompressWriter::Lz4(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            CompressWriter::Gzip(encoder) => encoder.flush(),
            CompressWriter::Lz4(encoder) => encoder.flush(),
        }
    }
}

/// Decompressing reader for the selected scheme.
pub fn decode_reader<'a, R: Read + 'a>(scheme: CompressionScheme, reader: R) -> Box<dyn Read + 'a> {
    match scheme {
        CompressionScheme::Gzip => Box::new(GzDecoder::new(reader)),
        CompressionScheme::Lz4 => Box::new(FrameDecoder::new(reader)),
    }
}
