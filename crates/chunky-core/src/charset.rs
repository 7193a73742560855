//! Endianness and character set markers.
//!
//! Both are stored as a pair of u16 values at the start of every header
//! (file header, index header, GRPB lists, scripts). The markers are
//! palindromic byte pairs so they read the same in either byte order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ByteReader, Error, Result};

/// Byte order of multi-byte values inside a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    pub const LITTLE_MARKER: u16 = 0x0001;
    pub const BIG_MARKER: u16 = 0x0100;

    pub fn from_marker(marker: u16) -> Result<Self> {
        match marker {
            Self::LITTLE_MARKER => Ok(Self::Little),
            Self::BIG_MARKER => Ok(Self::Big),
            other => Err(Error::UnknownEndianness(other)),
        }
    }

    pub fn marker(self) -> u16 {
        match self {
            Self::Little => Self::LITTLE_MARKER,
            Self::Big => Self::BIG_MARKER,
        }
    }

    /// Only little-endian data can be read or written.
    pub fn ensure_supported(self) -> Result<Self> {
        match self {
            Self::Little => Ok(self),
            Self::Big => Err(Error::UnsupportedEndianness(self)),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little-endian"),
            Self::Big => write!(f, "big-endian"),
        }
    }
}

/// Character set used for strings in a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterSet {
    /// Single-byte text, handled as ISO-8859-1.
    #[default]
    Ansi,
    Utf16Le,
    Utf16Be,
    Macintosh,
}

impl CharacterSet {
    pub const MACINTOSH_MARKER: u16 = 0x0202;
    pub const ANSI_MARKER: u16 = 0x0303;
    pub const UTF16BE_MARKER: u16 = 0x0404;
    pub const UTF16LE_MARKER: u16 = 0x0505;

    pub fn from_marker(marker: u16) -> Result<Self> {
        match marker {
            Self::ANSI_MARKER => Ok(Self::Ansi),
            Self::UTF16LE_MARKER => Ok(Self::Utf16Le),
            Self::UTF16BE_MARKER => Ok(Self::Utf16Be),
            Self::MACINTOSH_MARKER => Ok(Self::Macintosh),
            other => Err(Error::UnknownCharacterSet(other)),
        }
    }

    pub fn marker(self) -> u16 {
        match self {
            Self::Ansi => Self::ANSI_MARKER,
            Self::Utf16Le => Self::UTF16LE_MARKER,
            Self::Utf16Be => Self::UTF16BE_MARKER,
            Self::Macintosh => Self::MACINTOSH_MARKER,
        }
    }

    /// Whether strings in this character set can be read and written.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Ansi | Self::Utf16Le)
    }

    pub fn ensure_supported(self) -> Result<Self> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(Error::UnsupportedCharacterSet(self))
        }
    }

    /// Whether code units are 16 bits wide.
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Utf16Le | Self::Utf16Be)
    }

    /// Size of one code unit in bytes. Also the width of the Pascal length prefix.
    pub fn unit_size(self) -> usize {
        if self.is_wide() { 2 } else { 1 }
    }

    /// Largest length a Pascal string prefix can hold, in code units.
    pub fn max_units(self) -> usize {
        if self.is_wide() {
            u16::MAX as usize
        } else {
            u8::MAX as usize
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ansi => "ANSI",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Macintosh => "Macintosh",
        };
        f.write_str(name)
    }
}

/// Read the `(endianness, character set)` marker pair.
///
/// Unknown marker values are errors; whether a known value is supported is
/// left to the caller, since some headers only record it.
pub fn read_markers(reader: &mut ByteReader<'_>) -> Result<(Endianness, CharacterSet)> {
    let endianness = Endianness::from_marker(reader.u16()?)?;
    let charset = CharacterSet::from_marker(reader.u16()?)?;
    Ok((endianness, charset))
}

/// Append the `(endianness, character set)` marker pair.
pub fn write_markers(out: &mut Vec<u8>, endianness: Endianness, charset: CharacterSet) {
    out.extend_from_slice(&endianness.marker().to_le_bytes());
    out.extend_from_slice(&charset.marker().to_le_bytes());
}
