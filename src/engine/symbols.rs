use std::fmt;

use crate::protocol::constants::END_OF_STREAM_CODE;

/// A coded unit: one raw byte, or the synthetic end-of-stream marker that
/// is always encoded last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Byte(u8),
    EndOfStream,
}

impl Symbol {
    /// Numeric code used on the wire: `0..=255` for bytes, `256` for end-of-stream.
    pub fn code(self) -> u16 {
        match self {
            Symbol::Byte(b) => b as u16,
            Symbol::EndOfStream => END_OF_STREAM_CODE,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0..=255 => Some(Symbol::Byte(code as u8)),
            END_OF_STREAM_CODE => Some(Symbol::EndOfStream),
            _ => None,
        }
    }

    pub fn is_end_of_stream(self) -> bool {
        matches!(self, Symbol::EndOfStream)
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::Byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
