//! Four-character type tags.
//!
//! Tags are written on disk as a little-endian u32 of the big-endian
//! character sequence, i.e. byte-reversed: `"MBMP"` is stored as `PMBM`.
//! Short tags are padded with NUL before reversal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A chunk or file type identifier, held in reading order.
///
/// Ordering matches the on-disk id ordering: comparing the
/// NUL-padded bytes is the same as comparing the on-disk u32 values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag([u8; 4]);

impl Tag {
    /// Tag from reading-order bytes (NUL-padded).
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Tag from at most four single-byte characters.
    ///
    /// Shorter text is padded with NUL, not spaces: `"GST"` and `"GST "`
    /// are different tags.
    pub fn new(text: &str) -> Result<Self> {
        let mut bytes = [0u8; 4];
        let mut len = 0;
        for ch in text.chars() {
            let byte = u8::try_from(ch as u32).map_err(|_| Error::InvalidTag(text.to_string()))?;
            if len == 4 {
                return Err(Error::InvalidTag(text.to_string()));
            }
            bytes[len] = byte;
            len += 1;
        }
        Ok(Self(bytes))
    }

    /// Decode the on-disk (byte-reversed) representation.
    pub fn from_raw(mut raw: [u8; 4]) -> Self {
        raw.reverse();
        Self(raw)
    }

    /// Encode to the on-disk (byte-reversed) representation.
    pub fn to_raw(self) -> [u8; 4] {
        let mut raw = self.0;
        raw.reverse();
        raw
    }

    /// Reading-order bytes, including NUL padding.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    fn trimmed(&self) -> &[u8] {
        let len = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &self.0[..len]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.trimmed() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.to_string())
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}
