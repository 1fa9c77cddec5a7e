pub mod constants;
pub mod header;
pub mod container;

pub use container::*;
pub use header::{header_bytes, parse_header, read_header, write_header};
