use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::engine::symbols::Symbol;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    KeyNotFound(Symbol),
    UnencodableSymbol(Symbol),
    EmptyTable,
    MissingEndOfStream,
    CountOverflow,
    SourceUnavailable {
        path: Option<PathBuf>,
        source: io::Error,
    },
    SinkUnavailable {
        path: Option<PathBuf>,
        source: io::Error,
    },
    MalformedHeader {
        offset: usize,
        reason: String,
    },
    TruncatedPayload {
        decoded: usize,
    },
}

impl CodecError {
    pub(crate) fn source_io(source: io::Error) -> Self {
        CodecError::SourceUnavailable { path: None, source }
    }

    pub(crate) fn sink_io(source: io::Error) -> Self {
        CodecError::SinkUnavailable { path: None, source }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedHeader {
            offset,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::KeyNotFound(symbol) =>
                write!(f, "key {} is not in the symbol table", symbol.code()),
            CodecError::UnencodableSymbol(symbol) =>
                write!(f, "symbol {} has no codeword", symbol.code()),
            CodecError::EmptyTable =>
                write!(f, "cannot build a tree from an empty symbol table"),
            CodecError::MissingEndOfStream =>
                write!(f, "tree has no reachable end-of-stream leaf"),
            CodecError::CountOverflow =>
                write!(f, "symbol counts sum past u64::MAX"),
            CodecError::SourceUnavailable { path: Some(path), source } =>
                write!(f, "cannot read {}: {}", path.display(), source),
            CodecError::SourceUnavailable { path: None, source } =>
                write!(f, "cannot read source: {}", source),
            CodecError::SinkUnavailable { path: Some(path), source } =>
                write!(f, "cannot write {}: {}", path.display(), source),
            CodecError::SinkUnavailable { path: None, source } =>
                write!(f, "cannot write output: {}", source),
            CodecError::MalformedHeader { offset, reason } =>
                write!(f, "malformed header at byte {}: {}", offset, reason),
            CodecError::TruncatedPayload { decoded } =>
                write!(f, "payload ended before end-of-stream after {} bytes", decoded),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::SourceUnavailable { source, .. }
            | CodecError::SinkUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}
