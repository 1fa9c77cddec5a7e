use std::io::{BufReader, Read};

use crate::engine::symbols::Symbol;
use crate::engine::table::FrequencyTable;
use crate::error::{CodecError, Result};

/// Counts every byte read from `source` until exhaustion, then adds the
/// end-of-stream symbol with a count of one.
pub fn analyze<R: Read>(source: R) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::new();
    for byte in BufReader::new(source).bytes() {
        let byte = byte.map_err(CodecError::source_io)?;
        *table.get_or_insert_with(Symbol::Byte(byte), || 0) += 1;
    }
    table.put(Symbol::EndOfStream, 1);
    Ok(table)
}

/// In-memory variant of [`analyze`]; cannot fail.
pub fn analyze_bytes(data: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for &byte in data {
        *table.get_or_insert_with(Symbol::Byte(byte), || 0) += 1;
    }
    table.put(Symbol::EndOfStream, 1);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_bytes_and_adds_end_of_stream() {
        let table = analyze_bytes(b"aaa");
        assert_eq!(table.len(), 2);
        assert_eq!(*table.get(Symbol::Byte(b'a')).unwrap(), 3);
        assert_eq!(*table.get(Symbol::EndOfStream).unwrap(), 1);
    }

    #[test]
    fn empty_input_still_has_end_of_stream() {
        let table = analyze(Cursor::new(Vec::<u8>::new())).unwrap();
        assert_eq!(table.keys(), vec![Symbol::EndOfStream]);
    }

    #[test]
    fn stream_and_slice_agree() {
        let data = b"hello, world\n\x00\xff\xff".to_vec();
        let streamed = analyze(Cursor::new(data.clone())).unwrap();
        let sliced = analyze_bytes(&data);
        assert_eq!(streamed, sliced);
        assert_eq!(streamed.keys(), sliced.keys());
    }
}
