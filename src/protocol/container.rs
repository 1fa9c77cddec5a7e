//! Container layout: `[frequency header][MSB-first payload]`, no separator
//! beyond the header's closing brace.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{analyze, decode, encode, HuffmanTree, Symbol};
use crate::error::{CodecError, Result};
use crate::protocol::header::{read_header, write_header};
use crate::utils::bits::{BitBuffer, BitReader, BitWriter};
use crate::utils::io::{create_sink, open_source};

#[derive(Debug, Clone, Serialize)]
pub struct CompressionStats {
    pub input_bytes: u64,
    pub distinct_symbols: usize,
    pub header_bytes: usize,
    pub payload_bits: usize,
    pub payload_bytes: usize,
    pub container_bytes: usize,
}

impl CompressionStats {
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.container_bytes as f64 / self.input_bytes as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compressed {
    pub stats: CompressionStats,
    /// Encoded payload, end-of-stream codeword included.
    pub bits: BitBuffer,
}

/// Analyzes `source`, rewinds it, and writes header plus payload to `dest`.
pub fn compress<R, W>(source: &mut R, dest: W) -> Result<Compressed>
where
    R: Read + Seek,
    W: Write,
{
    let start = source.stream_position().map_err(CodecError::source_io)?;
    let table = analyze(&mut *source)?;
    let tree = HuffmanTree::build(&table)?;
    let map = tree.encoding_map();
    debug!("Built tree: {} symbols, root count {}", table.len(), tree.root().count());

    source
        .seek(SeekFrom::Start(start))
        .map_err(CodecError::source_io)?;

    let mut dest = dest;
    let header_bytes = write_header(&mut dest, &table).map_err(CodecError::sink_io)?;

    let mut writer = BitWriter::new(dest);
    let bits = encode(&mut *source, &map, Some(&mut writer))?;
    writer.finish()?;

    let input_bytes = table
        .iter()
        .filter(|(symbol, _)| !symbol.is_end_of_stream())
        .map(|(_, count)| *count)
        .sum();
    let payload_bytes = (bits.len() + 7) / 8;
    let stats = CompressionStats {
        input_bytes,
        distinct_symbols: table.len(),
        header_bytes,
        payload_bits: bits.len(),
        payload_bytes,
        container_bytes: header_bytes + payload_bytes,
    };
    debug!("Encoded {} bytes into {} bits", stats.input_bytes, stats.payload_bits);

    Ok(Compressed { stats, bits })
}

/// Reads the header, rebuilds the tree and decodes the payload into `dest`.
pub fn decompress<R, W>(container: R, mut dest: W) -> Result<Vec<u8>>
where
    R: Read,
    W: Write,
{
    let mut container = container;
    let (table, header_len) = read_header(&mut container)?;
    if !table.contains_key(Symbol::EndOfStream) {
        return Err(CodecError::malformed(header_len, "header has no end-of-stream entry"));
    }
    let tree = HuffmanTree::build(&table)?;
    debug!("Header: {} bytes, {} symbols", header_len, table.len());

    let mut reader = BitReader::new(container);
    let decoded = decode(&mut reader, &tree, Some(&mut dest))?;
    dest.flush().map_err(CodecError::sink_io)?;
    Ok(decoded)
}

pub fn compress_bytes(input: &[u8]) -> Result<(Vec<u8>, Compressed)> {
    let mut out = Vec::new();
    let compressed = compress(&mut Cursor::new(input), &mut out)?;
    Ok((out, compressed))
}

pub fn decompress_bytes(container: &[u8]) -> Result<Vec<u8>> {
    decompress(container, std::io::sink())
}

/// Compresses `input` next to itself, named per `config`.
pub fn compress_file(input: &Path, config: &Config) -> Result<(PathBuf, Compressed)> {
    let output = config.compressed_path(input);
    guard_overwrite(&output, config)?;

    let mut source = open_source(input)?;
    let sink = create_sink(&output)?;
    let compressed = compress(&mut source, sink)
        .map_err(|e| discard_output(with_paths(e, input, &output), &output))?;

    info!(
        "Compressed {:?} -> {:?} ({} -> {} bytes)",
        input, output, compressed.stats.input_bytes, compressed.stats.container_bytes
    );
    Ok((output, compressed))
}

/// Decompresses `input` next to itself, named per `config`.
pub fn decompress_file(input: &Path, config: &Config) -> Result<(PathBuf, Vec<u8>)> {
    let output = config.decompressed_path(input);
    guard_overwrite(&output, config)?;

    let source = open_source(input)?;
    let sink = create_sink(&output)?;
    let decoded = decompress(source, sink)
        .map_err(|e| discard_output(with_paths(e, input, &output), &output))?;

    info!("Decompressed {:?} -> {:?} ({} bytes)", input, output, decoded.len());
    Ok((output, decoded))
}

fn guard_overwrite(output: &Path, config: &Config) -> Result<()> {
    if !config.overwrite && output.exists() {
        warn!("Refusing to overwrite {:?}", output);
        return Err(CodecError::SinkUnavailable {
            path: Some(output.to_path_buf()),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "output exists"),
        });
    }
    Ok(())
}

// The sink is dropped by now, so whatever it flushed can be removed.
fn discard_output(err: CodecError, output: &Path) -> CodecError {
    if let Err(e) = std::fs::remove_file(output) {
        warn!("Could not remove partial output {:?}: {}", output, e);
    } else {
        debug!("Removed partial output {:?}", output);
    }
    err
}

// Attach file names to bare I/O failures from the streaming layer.
fn with_paths(err: CodecError, input: &Path, output: &Path) -> CodecError {
    match err {
        CodecError::SourceUnavailable { path: None, source } => CodecError::SourceUnavailable {
            path: Some(input.to_path_buf()),
            source,
        },
        CodecError::SinkUnavailable { path: None, source } => CodecError::SinkUnavailable {
            path: Some(output.to_path_buf()),
            source,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_is_header_then_payload() {
        let (bytes, compressed) = compress_bytes(b"aaa").unwrap();
        // {97:3, 256:1} then 1110 padded
        let mut expected = b"{97:3, 256:1}".to_vec();
        expected.push(0b1110_0000);

        assert_eq!(bytes, expected);
        assert_eq!(compressed.stats.payload_bits, 4);
        assert_eq!(compressed.stats.header_bytes, 13);
        assert_eq!(compressed.stats.container_bytes, 14);
        assert_eq!(compressed.stats.input_bytes, 3);
    }

    #[test]
    fn empty_input_is_header_only() {
        let (bytes, compressed) = compress_bytes(b"").unwrap();
        assert_eq!(bytes, b"{256:1}");
        assert!(compressed.bits.is_empty());
        assert_eq!(decompress_bytes(&bytes).unwrap(), b"");
    }

    #[test]
    fn round_trips_binary_data() {
        let input: Vec<u8> = (0..=255u8).chain((0..64).map(|i| i * 3)).collect();
        let (bytes, _) = compress_bytes(&input).unwrap();
        assert_eq!(decompress_bytes(&bytes).unwrap(), input);
    }

    #[test]
    fn compress_rewinds_to_starting_position() {
        let mut source = Cursor::new(b"skip:payload".to_vec());
        source.set_position(5);
        let mut out = Vec::new();
        compress(&mut source, &mut out).unwrap();
        assert_eq!(decompress_bytes(&out).unwrap(), b"payload");
    }

    #[test]
    fn truncated_payload_is_reported() {
        let (mut bytes, _) = compress_bytes(b"hello hello hello").unwrap();
        bytes.pop();
        match decompress_bytes(&bytes) {
            Err(CodecError::TruncatedPayload { .. }) => {}
            other => panic!("expected TruncatedPayload, got {:?}", other),
        }
    }

    #[test]
    fn header_without_end_of_stream_is_malformed() {
        match decompress_bytes(b"{97:3}\xe0") {
            Err(CodecError::MalformedHeader { .. }) => {}
            other => panic!("expected MalformedHeader, got {:?}", other),
        }
        assert!(matches!(
            decompress_bytes(b"{}"),
            Err(CodecError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn counts_summing_past_u64_are_malformed() {
        match decompress_bytes(b"{97:18446744073709551615, 256:1}\x80") {
            Err(CodecError::MalformedHeader { .. }) => {}
            other => panic!("expected MalformedHeader, got {:?}", other),
        }
    }

    #[test]
    fn zero_count_end_of_stream_decodes_empty() {
        assert_eq!(decompress_bytes(b"{256:0}").unwrap(), b"");
        assert_eq!(decompress_bytes(b"{256:0}\xff").unwrap(), b"");
    }

    #[test]
    fn decodes_into_destination() {
        let (bytes, _) = compress_bytes(b"to be or not to be").unwrap();
        let mut out = Vec::new();
        let decoded = decompress(&bytes[..], &mut out).unwrap();
        assert_eq!(out, decoded);
        assert_eq!(out, b"to be or not to be");
    }
}
