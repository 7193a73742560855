//! String tables (`GSTX` chunks).
//!
//! A GRPB list whose heap holds Pascal strings and whose 8-byte index
//! entries are `(heap offset, id)` pairs.

use chunky_core::{ByteReader, CharacterSet, Endianness, Tag};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StringTableError;
use crate::group::{GroupList, encode_group};

/// Tag of string table chunks.
pub const STRING_TABLE_TAG: Tag = Tag::from_bytes(*b"GSTX");

/// Width of a string table index entry.
pub const STRING_ENTRY_SIZE: u32 = 8;

/// Id to string mapping. Iteration follows insertion order, which is also
/// the heap order written by [`StringTable::to_bytes`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTable {
    pub character_set: CharacterSet,
    strings: IndexMap<u32, String>,
}

impl StringTable {
    pub fn new(character_set: CharacterSet) -> Self {
        Self {
            character_set,
            strings: IndexMap::new(),
        }
    }

    /// Set the string for `id`, returning the previous one.
    ///
    /// Replacing keeps the id's original position.
    pub fn insert(&mut self, id: u32, value: impl Into<String>) -> Option<String> {
        self.strings.insert(id, value.into())
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    pub fn remove(&mut self, id: u32) -> Option<String> {
        self.strings.shift_remove(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.strings.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.strings.iter().map(|(&id, s)| (id, s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Decode a string table payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StringTableError> {
        let list = GroupList::from_bytes(bytes)?;
        if list.header.entry_size != STRING_ENTRY_SIZE {
            return Err(StringTableError::UnsupportedFormat(format!(
                "{}-byte list entries, string tables use {STRING_ENTRY_SIZE}",
                list.header.entry_size
            )));
        }
        let charset = list.header.character_set.ensure_supported()?;

        let mut table = Self::new(charset);
        for entry in list.entries() {
            let mut r = ByteReader::new(entry, "string table entry");
            let offset = r.u32()? as usize;
            let id = r.u32()?;
            let Some(data) = list.heap.get(offset..) else {
                return Err(StringTableError::Truncated {
                    what: "string heap",
                    expected: offset,
                    actual: list.heap.len(),
                });
            };
            let (value, _) = chunky_core::decode_string(charset, data)?;
            table.strings.insert(id, value);
        }
        Ok(table)
    }

    /// Encode in iteration order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StringTableError> {
        self.character_set.ensure_supported()?;

        let mut heap = Vec::new();
        let mut index = Vec::with_capacity(self.strings.len() * STRING_ENTRY_SIZE as usize);
        for (&id, value) in &self.strings {
            let offset =
                u32::try_from(heap.len()).map_err(|_| StringTableError::TooLarge(heap.len()))?;
            heap.extend(chunky_core::encode_string(self.character_set, value)?);
            index.extend_from_slice(&offset.to_le_bytes());
            index.extend_from_slice(&id.to_le_bytes());
        }

        encode_group(
            Endianness::Little,
            self.character_set,
            STRING_ENTRY_SIZE,
            &heap,
            &index,
        )
    }
}

impl FromIterator<(u32, String)> for StringTable {
    /// Collects into an ANSI table.
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            character_set: CharacterSet::Ansi,
            strings: iter.into_iter().collect(),
        }
    }
}
