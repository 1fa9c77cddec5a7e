//! Frequency table header: `{key:value, key:value}` in table iteration order.

use std::io::{self, Read, Write};

use crate::engine::symbols::Symbol;
use crate::engine::table::FrequencyTable;
use crate::error::{CodecError, Result};
use crate::protocol::constants::{
    HEADER_CLOSE, HEADER_ENTRY_SEPARATOR, HEADER_KV_SEPARATOR, HEADER_OPEN, MAX_HEADER_DIGITS,
};

pub fn write_header<W: Write>(writer: &mut W, table: &FrequencyTable) -> io::Result<usize> {
    let bytes = header_bytes(table);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

pub fn header_bytes(table: &FrequencyTable) -> Vec<u8> {
    let entries: Vec<String> = table
        .iter()
        .map(|(symbol, count)| format!("{}:{}", symbol.code(), count))
        .collect();

    let mut out = Vec::new();
    out.push(HEADER_OPEN);
    out.extend_from_slice(entries.join(", ").as_bytes());
    out.push(HEADER_CLOSE);
    out
}

/// Reads exactly one header from `reader` and stops after the closing brace,
/// leaving the payload unread. Returns the table and the header length.
pub fn read_header<R: Read>(reader: &mut R) -> Result<(FrequencyTable, usize)> {
    let mut parser = HeaderParser { reader, offset: 0 };
    let table = parser.parse()?;
    Ok((table, parser.offset))
}

pub fn parse_header(bytes: &[u8]) -> Result<(FrequencyTable, usize)> {
    read_header(&mut &bytes[..])
}

struct HeaderParser<'a, R: Read> {
    reader: &'a mut R,
    offset: usize,
}

impl<R: Read> HeaderParser<'_, R> {
    fn parse(&mut self) -> Result<FrequencyTable> {
        if self.next_byte()? != HEADER_OPEN {
            return Err(CodecError::malformed(0, "expected '{'"));
        }

        let mut table = FrequencyTable::new();
        let mut total: u64 = 0;
        let mut byte = self.next_byte()?;
        if byte == HEADER_CLOSE {
            return Ok(table);
        }

        loop {
            let (key, after_key) = self.number(byte)?;
            if after_key != HEADER_KV_SEPARATOR {
                return Err(CodecError::malformed(self.offset - 1, "expected ':' after key"));
            }
            let key_offset = self.offset;
            let symbol = u16::try_from(key)
                .ok()
                .and_then(Symbol::from_code)
                .ok_or_else(|| {
                    CodecError::malformed(key_offset, format!("key {} is not a symbol", key))
                })?;

            let count_offset = self.offset;
            let first = self.next_byte()?;
            let (count, after_count) = self.number(first)?;
            // the tree root carries the sum of every count
            total = total
                .checked_add(count)
                .ok_or_else(|| CodecError::malformed(count_offset, "total count overflows u64"))?;
            table.put(symbol, count);

            if after_count == HEADER_CLOSE {
                return Ok(table);
            }
            if after_count != HEADER_ENTRY_SEPARATOR[0] {
                return Err(CodecError::malformed(self.offset - 1, "expected ', ' or '}'"));
            }
            if self.next_byte()? != HEADER_ENTRY_SEPARATOR[1] {
                return Err(CodecError::malformed(self.offset - 1, "expected space after ','"));
            }
            byte = self.next_byte()?;
        }
    }

    // Decimal run starting with `first`; returns it with the byte that ended it.
    fn number(&mut self, first: u8) -> Result<(u64, u8)> {
        let start = self.offset - 1;
        let mut digits = 0usize;
        let mut value: u64 = 0;
        let mut byte = first;

        while byte.is_ascii_digit() {
            digits += 1;
            if digits > MAX_HEADER_DIGITS {
                return Err(CodecError::malformed(start, "number too long"));
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((byte - b'0') as u64))
                .ok_or_else(|| CodecError::malformed(start, "number out of range"))?;
            byte = self.next_byte()?;
        }

        if digits == 0 {
            return Err(CodecError::malformed(start, "expected a number"));
        }
        Ok((value, byte))
    }

    fn next_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    return Err(CodecError::malformed(self.offset, "unexpected end of header"))
                }
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CodecError::source_io(e)),
            }
        }
        self.offset += 1;
        Ok(byte[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frequency::analyze_bytes;

    fn text(table: &FrequencyTable) -> String {
        String::from_utf8(header_bytes(table)).unwrap()
    }

    #[test]
    fn writes_in_table_order() {
        assert_eq!(text(&analyze_bytes(b"aaa")), "{97:3, 256:1}");
        assert_eq!(text(&analyze_bytes(b"abc")), "{98:1, 99:1, 97:1, 256:1}");
        assert_eq!(text(&FrequencyTable::new()), "{}");
    }

    #[test]
    fn parses_and_reports_length() {
        let (table, len) = parse_header(b"{97:3, 256:1}\xff\x00").unwrap();
        assert_eq!(len, 13);
        assert_eq!(table, analyze_bytes(b"aaa"));
    }

    #[test]
    fn empty_table_parses() {
        let (table, len) = parse_header(b"{}").unwrap();
        assert!(table.is_empty());
        assert_eq!(len, 2);
    }

    #[test]
    fn reader_stops_at_closing_brace() {
        let data = b"{256:1}rest".to_vec();
        let mut reader = &data[..];
        read_header(&mut reader).unwrap();
        assert_eq!(reader, b"rest");
    }

    #[test]
    fn largest_total_is_accepted() {
        let (table, _) = parse_header(b"{97:18446744073709551614, 256:1}").unwrap();
        assert_eq!(*table.get(Symbol::Byte(97)).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn overflowing_total_points_at_offending_count() {
        match parse_header(b"{97:18446744073709551615, 256:1}") {
            Err(CodecError::MalformedHeader { offset, .. }) => assert_eq!(offset, 30),
            other => panic!("expected MalformedHeader, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_keys_overwrite() {
        let (table, _) = parse_header(b"{5:1, 5:9}").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(*table.get(Symbol::Byte(5)).unwrap(), 9);
    }

    #[test]
    fn rejects_bad_grammar() {
        let cases: &[&[u8]] = &[
            b"",
            b"97:3}",
            b"{97:3",
            b"{97:3,256:1}",
            b"{97-3}",
            b"{:3}",
            b"{97:}",
            b"{257:1}",
            b"{97:3, }",
            b"{97:99999999999999999999999}",
            b"{97:18446744073709551615, 256:1}",
            b"{0:9223372036854775808, 1:9223372036854775808}",
        ];
        for case in cases {
            match parse_header(case) {
                Err(CodecError::MalformedHeader { .. }) => {}
                other => panic!("{:?} should be malformed, got {:?}", String::from_utf8_lossy(case), other),
            }
        }
    }
}
