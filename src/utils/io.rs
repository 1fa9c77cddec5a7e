use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{CodecError, Result};

/// Open `path` for buffered reading or fail with `SourceUnavailable`
pub fn open_source(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CodecError::SourceUnavailable {
            path: Some(path.to_path_buf()),
            source,
        })
}

/// Create (or truncate) `path` for buffered writing or fail with `SinkUnavailable`
pub fn create_sink(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CodecError::SinkUnavailable {
            path: Some(path.to_path_buf()),
            source,
        })
}

/// Read the whole of `path`
pub fn read_all(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CodecError::SourceUnavailable {
        path: Some(path.to_path_buf()),
        source,
    })
}
