/// Wire code of the end-of-stream symbol.
pub const END_OF_STREAM_CODE: u16 = 256;

/// Bucket count of the symbol table. Fixed so that key iteration order, and
/// therefore header bytes, stay compatible with existing `.huf` files.
pub const TABLE_BUCKETS: usize = 10;

pub const HEADER_OPEN: u8 = b'{';
pub const HEADER_CLOSE: u8 = b'}';
pub const HEADER_KV_SEPARATOR: u8 = b':';
pub const HEADER_ENTRY_SEPARATOR: &[u8] = b", ";

/// Longest decimal run accepted for a key or count (fits u64).
pub const MAX_HEADER_DIGITS: usize = 20;

pub const DEFAULT_COMPRESSED_SUFFIX: &str = ".huf";
pub const DEFAULT_UNCOMPRESSED_MARKER: &str = "_unc";
