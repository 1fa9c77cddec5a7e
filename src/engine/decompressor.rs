use std::io::Write;

use crate::engine::huffman::{HuffmanNode, HuffmanTree};
use crate::engine::symbols::Symbol;
use crate::error::{CodecError, Result};
use crate::utils::bits::BitSource;

/// Walks `tree` bit by bit until the end-of-stream leaf is reached.
///
/// No bits past the end-of-stream codeword are consumed. Running out of bits
/// first is a [`CodecError::TruncatedPayload`]. Every decoded byte is also
/// written to `output` when attached.
pub fn decode<B: BitSource + ?Sized>(
    source: &mut B,
    tree: &HuffmanTree,
    mut output: Option<&mut dyn Write>,
) -> Result<Vec<u8>> {
    let root = tree.root();
    if let HuffmanNode::Leaf { symbol, .. } = root {
        // a lone leaf consumes no bits, so only end-of-stream can terminate
        if !symbol.is_end_of_stream() {
            return Err(CodecError::MissingEndOfStream);
        }
    }

    let mut decoded = Vec::new();
    let mut current = root;

    loop {
        match current {
            HuffmanNode::Leaf { symbol: Symbol::EndOfStream, .. } => return Ok(decoded),
            HuffmanNode::Leaf { symbol: Symbol::Byte(byte), .. } => {
                if let Some(out) = output.as_mut() {
                    out.write_all(&[*byte]).map_err(CodecError::sink_io)?;
                }
                decoded.push(*byte);
                current = root;
            }
            HuffmanNode::Internal { zero, one, .. } => {
                current = match source.read_bit()? {
                    Some(false) => &**zero,
                    Some(true) => &**one,
                    None => {
                        return Err(CodecError::TruncatedPayload {
                            decoded: decoded.len(),
                        })
                    }
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compressor::encode_bytes;
    use crate::engine::frequency::analyze_bytes;
    use crate::engine::table::FrequencyTable;
    use crate::utils::bits::BitBuffer;

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&analyze_bytes(data)).unwrap()
    }

    #[test]
    fn decodes_what_was_encoded() {
        let data = b"she sells sea shells by the sea shore";
        let tree = tree_for(data);
        let mut bits = encode_bytes(data, &tree.encoding_map()).unwrap();

        let mut out = Vec::new();
        let decoded = decode(&mut bits, &tree, Some(&mut out)).unwrap();

        assert_eq!(decoded, data);
        assert_eq!(out, data);
    }

    #[test]
    fn lone_end_of_stream_leaf_reads_nothing() {
        let tree = tree_for(b"");
        let mut bits = BitBuffer::from_bytes(&[0xAB]);

        assert!(decode(&mut bits, &tree, None).unwrap().is_empty());
        assert_eq!(bits.read_bit().unwrap(), Some(true));
    }

    #[test]
    fn stops_at_end_of_stream_before_padding() {
        let tree = tree_for(b"aaa");
        // 1110 then four padding ones that would decode as more 'a's
        let mut bits = BitBuffer::from_bytes(&[0b1110_1111]);

        assert_eq!(decode(&mut bits, &tree, None).unwrap(), b"aaa");
    }

    #[test]
    fn missing_end_of_stream_is_truncation() {
        let tree = tree_for(b"aaa");
        let mut bits = BitBuffer::new();
        for _ in 0..3 {
            bits.push(true);
        }

        match decode(&mut bits, &tree, None) {
            Err(CodecError::TruncatedPayload { decoded: 3 }) => {}
            other => panic!("expected TruncatedPayload, got {:?}", other),
        }
    }

    #[test]
    fn lone_byte_leaf_is_rejected() {
        let mut table = FrequencyTable::new();
        table.put(Symbol::Byte(b'x'), 4);
        let tree = HuffmanTree::build(&table).unwrap();

        assert!(matches!(
            decode(&mut BitBuffer::new(), &tree, None),
            Err(CodecError::MissingEndOfStream)
        ));
    }
}
