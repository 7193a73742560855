//! Errors raised while loading, saving or editing containers.

use std::io;

use crate::compression::Compression;
use crate::model::ChunkId;

/// Fatal error while loading a container. A malformed record aborts the load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("bad file magic {0:02x?}, expected \"CHN2\"")]
    BadMagic([u8; 4]),
    /// Big-endian data, an unsupported or unknown character set, or a
    /// rejected anomaly in strict mode.
    #[error("unsupported file: {0}")]
    Unsupported(String),
    #[error("{what} truncated: expected {expected:#x} bytes, got {actual:#x}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("index declares {count} chunks, limit is {limit}")]
    TooManyChunks { count: u32, limit: u32 },
    #[error("duplicate chunk {0}")]
    DuplicateChunk(ChunkId),
    #[error(transparent)]
    Codec(chunky_core::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<chunky_core::Error> for LoadError {
    fn from(err: chunky_core::Error) -> Self {
        use chunky_core::Error as E;
        match err {
            E::Truncated {
                what,
                expected,
                actual,
            } => Self::Truncated {
                what,
                expected,
                actual,
            },
            E::UnknownCharacterSet(_)
            | E::UnknownEndianness(_)
            | E::UnsupportedCharacterSet(_)
            | E::UnsupportedEndianness(_) => Self::Unsupported(err.to_string()),
            other => Self::Codec(other),
        }
    }
}

impl From<ContainerError> for LoadError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::DuplicateChunk(id) => Self::DuplicateChunk(id),
        }
    }
}

/// Fatal error while saving a container.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("name of chunk {id} is {len} characters long, limit is 255")]
    NameTooLong { id: ChunkId, len: usize },
    #[error("unsupported container: {0}")]
    Unsupported(String),
    #[error("payload of chunk {id} is {size:#x} bytes, limit is 0xffffff")]
    PayloadTooLarge { id: ChunkId, size: usize },
    #[error("chunk {id} has {count} children, limit is 65535")]
    TooManyChildren { id: ChunkId, count: usize },
    #[error("chunk {id} is referenced {count} times, limit is 65535")]
    TooManyParents { id: ChunkId, count: usize },
    #[error("file would be {0:#x} bytes, offsets are limited to 32 bits")]
    FileTooLarge(usize),
    #[error(transparent)]
    Codec(chunky_core::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<chunky_core::Error> for SaveError {
    fn from(err: chunky_core::Error) -> Self {
        use chunky_core::Error as E;
        match err {
            E::UnsupportedCharacterSet(_) | E::UnsupportedEndianness(_) => {
                Self::Unsupported(err.to_string())
            }
            other => Self::Codec(other),
        }
    }
}

/// Error decoding or encoding a GRPB list or string table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StringTableError {
    /// A list shape this codec does not understand.
    #[error("unsupported list format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported string table: {0}")]
    Unsupported(String),
    #[error("{what} truncated: expected {expected:#x} bytes, got {actual:#x}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("list section of {0:#x} bytes does not fit in 32 bits")]
    TooLarge(usize),
    #[error(transparent)]
    Codec(chunky_core::Error),
}

impl From<chunky_core::Error> for StringTableError {
    fn from(err: chunky_core::Error) -> Self {
        use chunky_core::Error as E;
        match err {
            E::Truncated {
                what,
                expected,
                actual,
            } => Self::Truncated {
                what,
                expected,
                actual,
            },
            E::UnknownCharacterSet(_)
            | E::UnknownEndianness(_)
            | E::UnsupportedCharacterSet(_)
            | E::UnsupportedEndianness(_) => Self::Unsupported(err.to_string()),
            other => Self::Codec(other),
        }
    }
}

/// Violation of a container invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("duplicate chunk {0}")]
    DuplicateChunk(ChunkId),
}

/// A payload was requested for semantic use but is stored compressed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload of chunk {id} is compressed ({compression})")]
    Compressed {
        id: ChunkId,
        compression: Compression,
    },
}
