//! Errors raised by the primitive codecs.

use crate::{CharacterSet, Endianness};

/// Primitive decode/encode failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A structure declared more bytes than were available.
    #[error("{what} truncated: expected {expected:#x} bytes, got {actual:#x}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unknown character set marker: {0:#06x}")]
    UnknownCharacterSet(u16),
    #[error("unknown endianness marker: {0:#06x}")]
    UnknownEndianness(u16),
    #[error("{0} character set is not supported")]
    UnsupportedCharacterSet(CharacterSet),
    #[error("{0} data is not supported")]
    UnsupportedEndianness(Endianness),
    #[error("string of {len} units exceeds the limit of {max}")]
    StringTooLong { len: usize, max: usize },
    #[error("character {ch:?} cannot be encoded as {charset}")]
    UnencodableChar { ch: char, charset: CharacterSet },
    #[error("invalid UTF-16 string data")]
    InvalidUtf16,
    /// Tags hold at most four single-byte characters.
    #[error("invalid tag {0:?}")]
    InvalidTag(String),
    #[error("value {value:#x} does not fit in {bits} bits")]
    Overflow { value: u64, bits: u32 },
}

impl Error {
    pub(crate) fn truncated(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::Truncated {
            what,
            expected,
            actual,
        }
    }
}

/// Result type for primitive codec operations.
pub type Result<T> = std::result::Result<T, Error>;
