pub mod symbols;
pub mod table;
pub mod frequency;
pub mod huffman;
pub mod compressor;
pub mod decompressor;

pub use symbols::Symbol;
pub use table::{EncodingMap, FrequencyTable, SymbolTable};
pub use frequency::{analyze, analyze_bytes};
pub use huffman::{Codeword, HuffmanNode, HuffmanTree};
pub use compressor::{encode, encode_bytes};
pub use decompressor::decode;
