//! GRPB lists: a 20-byte header, a heap, then fixed-width index entries.
//!
//! The meaning of an index entry depends on the list; string tables use
//! 8-byte `(heap offset, id)` pairs.

use chunky_core::{ByteReader, CharacterSet, Endianness, read_markers, write_markers};

use crate::error::StringTableError;

pub const GROUP_HEADER_SIZE: usize = 20;

/// Expected value of the trailing header field. Its meaning is unknown.
pub const GROUP_SENTINEL: u32 = 0xFFFF_FFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupHeader {
    pub endianness: Endianness,
    pub character_set: CharacterSet,
    pub entry_size: u32,
    pub entry_count: u32,
    pub heap_size: u32,
}

/// Borrowed view of a decoded GRPB list.
#[derive(Clone, Copy, Debug)]
pub struct GroupList<'a> {
    pub header: GroupHeader,
    pub heap: &'a [u8],
    index: &'a [u8],
}

impl<'a> GroupList<'a> {
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, StringTableError> {
        let mut r = ByteReader::new(bytes, "list header");
        let (endianness, character_set) = read_markers(&mut r)?;
        endianness.ensure_supported()?;
        let entry_size = r.u32()?;
        let entry_count = r.u32()?;
        let heap_size = r.u32()?;
        let sentinel = r.u32()?;
        if sentinel != GROUP_SENTINEL {
            return Err(StringTableError::UnsupportedFormat(format!(
                "list sentinel is {sentinel:#x}, expected {GROUP_SENTINEL:#x}"
            )));
        }
        if entry_size == 0 {
            return Err(StringTableError::UnsupportedFormat(
                "zero-width list entries".to_string(),
            ));
        }

        let heap = r.context("list heap").take(heap_size as usize)?;
        let index_len = (entry_size as usize)
            .checked_mul(entry_count as usize)
            .ok_or(StringTableError::Truncated {
                what: "list index",
                expected: usize::MAX,
                actual: r.remaining(),
            })?;
        let index = r.context("list index").take(index_len)?;

        Ok(Self {
            header: GroupHeader {
                endianness,
                character_set,
                entry_size,
                entry_count,
                heap_size,
            },
            heap,
            index,
        })
    }

    /// Index entries, each `entry_size` bytes wide.
    pub fn entries(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.index.chunks_exact(self.header.entry_size as usize)
    }

    pub fn len(&self) -> usize {
        self.header.entry_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encode a GRPB list from a heap and concatenated index entries.
pub fn encode_group(
    endianness: Endianness,
    character_set: CharacterSet,
    entry_size: u32,
    heap: &[u8],
    index: &[u8],
) -> Result<Vec<u8>, StringTableError> {
    if entry_size == 0 || index.len() % entry_size as usize != 0 {
        return Err(StringTableError::UnsupportedFormat(format!(
            "index of {} bytes is not a whole number of {entry_size}-byte entries",
            index.len()
        )));
    }
    let entry_count = u32::try_from(index.len() / entry_size as usize)
        .map_err(|_| StringTableError::TooLarge(index.len()))?;
    let heap_size =
        u32::try_from(heap.len()).map_err(|_| StringTableError::TooLarge(heap.len()))?;

    let mut out = Vec::with_capacity(GROUP_HEADER_SIZE + heap.len() + index.len());
    write_markers(&mut out, endianness, character_set);
    for value in [entry_size, entry_count, heap_size, GROUP_SENTINEL] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(heap);
    out.extend_from_slice(index);
    Ok(out)
}
