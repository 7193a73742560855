//! Compression identification.
//!
//! Compressed payloads start with a four-byte scheme marker. Decompression
//! itself is not implemented.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compression {
    Uncompressed,
    Kcdc,
    Kcd2,
}

impl Compression {
    pub const KCDC_MARKER: [u8; 4] = *b"KCDC";
    pub const KCD2_MARKER: [u8; 4] = *b"KCD2";

    /// Identify the scheme from the first four payload bytes.
    pub fn identify(payload: &[u8]) -> Self {
        match payload.get(..4) {
            Some(m) if m == Self::KCDC_MARKER => Self::Kcdc,
            Some(m) if m == Self::KCD2_MARKER => Self::Kcd2,
            _ => Self::Uncompressed,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncompressed => write!(f, "uncompressed"),
            Self::Kcdc => write!(f, "KCDC"),
            Self::Kcd2 => write!(f, "KCD2"),
        }
    }
}
