//! Bounds-checked little-endian reads over a byte slice.
//!
//! Every declared size in a chunky file comes from untrusted input, so reads
//! never index past the slice: a short read reports the structure being
//! decoded together with the expected and available byte counts.

use crate::{Error, Result, Tag};

/// Largest value representable by the packed 24-bit size field.
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Cursor over a byte slice.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    /// Create a reader; `what` names the structure in truncation errors.
    pub fn new(bytes: &'a [u8], what: &'static str) -> Self {
        Self { bytes, pos: 0, what }
    }

    /// Rename the structure reported by subsequent truncation errors.
    pub fn context(&mut self, what: &'static str) -> &mut Self {
        self.what = what;
        self
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Fail unless `len` more bytes are available.
    pub fn require(&self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(Error::truncated(self.what, len, self.remaining()));
        }
        Ok(())
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.require(len)?;
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    /// Packed 24-bit little-endian integer.
    pub fn u24(&mut self) -> Result<u32> {
        Ok(unpack_u24(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Byte-reversed on-disk tag.
    pub fn tag(&mut self) -> Result<Tag> {
        Ok(Tag::from_raw(self.array()?))
    }
}

/// Decode a packed 24-bit little-endian integer.
pub fn unpack_u24(bytes: [u8; 3]) -> u32 {
    bytes[0] as u32 | (bytes[1] as u32) << 8 | (bytes[2] as u32) << 16
}

/// Encode a value as a packed 24-bit little-endian integer.
pub fn pack_u24(value: u32) -> Result<[u8; 3]> {
    if value > U24_MAX {
        return Err(Error::Overflow {
            value: value as u64,
            bits: 24,
        });
    }
    let [b0, b1, b2, _] = value.to_le_bytes();
    Ok([b0, b1, b2])
}
