use std::io::{BufReader, Read};

use crate::engine::huffman::Codeword;
use crate::engine::symbols::Symbol;
use crate::engine::table::EncodingMap;
use crate::error::{CodecError, Result};
use crate::utils::bits::{BitBuffer, BitSink};

/// Encodes every byte of `source` followed by the end-of-stream codeword.
///
/// The full bit sequence is always returned; when `sink` is attached every
/// bit is also written to it as produced. A symbol with an empty codeword
/// (single-leaf tree) contributes no bits.
pub fn encode<R: Read>(
    source: R,
    map: &EncodingMap,
    mut sink: Option<&mut dyn BitSink>,
) -> Result<BitBuffer> {
    let mut bits = BitBuffer::new();
    let mut emit = |code: &Codeword| -> Result<()> {
        for &bit in code.bits() {
            bits.push(bit);
            if let Some(sink) = sink.as_mut() {
                sink.write_bit(bit)?;
            }
        }
        Ok(())
    };

    for byte in BufReader::new(source).bytes() {
        let byte = byte.map_err(CodecError::source_io)?;
        emit(lookup(map, Symbol::Byte(byte))?)?;
    }
    emit(lookup(map, Symbol::EndOfStream)?)?;

    Ok(bits)
}

pub fn encode_bytes(data: &[u8], map: &EncodingMap) -> Result<BitBuffer> {
    encode(data, map, None)
}

fn lookup(map: &EncodingMap, symbol: Symbol) -> Result<&Codeword> {
    map.get(symbol)
        .map_err(|_| CodecError::UnencodableSymbol(symbol))
}
