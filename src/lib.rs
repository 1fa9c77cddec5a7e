//! Lossless byte-stream compression with a Huffman prefix code.
//!
//! A compressed container is the frequency table written as text
//! (`{97:3, 256:1}`) followed by the MSB-first bit payload, which always
//! ends with the end-of-stream codeword.
//!
//! ```
//! let (container, _) = huffpack::compress_bytes(b"aaa")?;
//! assert_eq!(huffpack::decompress_bytes(&container)?, b"aaa");
//! # Ok::<(), huffpack::CodecError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod protocol;
pub mod utils;

pub use config::Config;
pub use engine::{
    analyze, analyze_bytes, decode, encode, encode_bytes, Codeword, EncodingMap,
    FrequencyTable, HuffmanNode, HuffmanTree, Symbol, SymbolTable,
};
pub use error::{CodecError, Result};
pub use protocol::{
    compress, compress_bytes, compress_file, decompress, decompress_bytes, decompress_file,
    Compressed, CompressionStats,
};
pub use utils::bits::{BitBuffer, BitReader, BitSink, BitSource, BitWriter};
