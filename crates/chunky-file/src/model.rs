//! In-memory model of a chunky file.
//!
//! A [`Container`] owns an ordered list of [`Chunk`]s keyed by [`ChunkId`].
//! Order is significant: the loader preserves index order and the writer
//! lays payloads out in container order.

use std::fmt;

use chunky_core::{CharacterSet, Endianness, Tag, Version};
use serde::{Deserialize, Serialize};

use crate::compression::Compression;
use crate::error::{ContainerError, PayloadError};

/// Version written by the authoring application.
pub const DEFAULT_VERSION: Version = Version::new(5, 4);

/// File type of movies and templates.
pub const DEFAULT_FILE_TYPE: Tag = Tag::from_bytes(*b"SOC ");

/// Unique key of a chunk: `(tag, number)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ChunkId {
    pub tag: Tag,
    pub number: u32,
}

impl ChunkId {
    pub const fn new(tag: Tag, number: u32) -> Self {
        Self { tag, number }
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag, self.number)
    }
}

/// Directed edge from the owning chunk to `target`.
///
/// `local_id` is only meaningful inside the owning chunk (scripts use it to
/// find their string table) and must be unique within one child list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ChunkChild {
    pub local_id: u32,
    pub target: ChunkId,
}

impl ChunkChild {
    pub const fn new(local_id: u32, target: ChunkId) -> Self {
        Self { local_id, target }
    }
}

/// Chunk flag bits. Unknown bits are preserved.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkFlags(u8);

impl ChunkFlags {
    /// No other chunk references this one.
    pub const LONER: u8 = 0x02;
    /// Payload is stored compressed.
    pub const COMPRESSED: u8 = 0x04;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn is_loner(self) -> bool {
        self.0 & Self::LONER != 0
    }

    pub fn is_compressed(self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }

    pub fn set_loner(&mut self, loner: bool) {
        self.set(Self::LONER, loner);
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.set(Self::COMPRESSED, compressed);
    }

    fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

/// One record of a container.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Chunk {
    id: ChunkId,
    pub name: Option<String>,
    pub flags: ChunkFlags,
    pub children: Vec<ChunkChild>,
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(id: ChunkId, payload: Vec<u8>) -> Self {
        Self {
            id,
            name: None,
            flags: ChunkFlags::default(),
            children: Vec::new(),
            payload,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_flags(mut self, flags: ChunkFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_child(mut self, local_id: u32, target: ChunkId) -> Self {
        self.children.push(ChunkChild::new(local_id, target));
        self
    }

    /// The chunk's key. Immutable once created.
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Find a child edge by its chunk-local id.
    pub fn child(&self, local_id: u32) -> Option<&ChunkChild> {
        self.children.iter().find(|c| c.local_id == local_id)
    }

    /// Compression scheme named by the payload's leading bytes.
    ///
    /// Only meaningful when the chunk is flagged compressed.
    pub fn compression(&self) -> Compression {
        if self.flags.is_compressed() {
            Compression::identify(&self.payload)
        } else {
            Compression::Uncompressed
        }
    }

    /// Stored payload bytes, compressed or not.
    pub fn raw_payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload ready for semantic use.
    ///
    /// Compressed payloads are identified but never decompressed here.
    pub fn decoded_payload(&self) -> Result<&[u8], PayloadError> {
        if self.flags.is_compressed() {
            return Err(PayloadError::Compressed {
                id: self.id,
                compression: Compression::identify(&self.payload),
            });
        }
        Ok(&self.payload)
    }
}

/// A chunky file: the unit of load and save.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "ContainerData")]
pub struct Container {
    pub endianness: Endianness,
    pub character_set: CharacterSet,
    pub file_type: Tag,
    pub version: Version,
    chunks: Vec<Chunk>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_TYPE)
    }
}

impl Container {
    /// Empty little-endian ANSI container.
    pub fn new(file_type: Tag) -> Self {
        Self {
            endianness: Endianness::Little,
            character_set: CharacterSet::Ansi,
            file_type,
            version: DEFAULT_VERSION,
            chunks: Vec::new(),
        }
    }

    pub fn with_character_set(mut self, character_set: CharacterSet) -> Self {
        self.character_set = character_set;
        self
    }

    /// Append a chunk. Ids must stay unique.
    pub fn insert(&mut self, chunk: Chunk) -> Result<(), ContainerError> {
        if self.contains(chunk.id) {
            return Err(ContainerError::DuplicateChunk(chunk.id));
        }
        self.chunks.push(chunk);
        Ok(())
    }

    /// Remove a chunk, keeping the order of the rest.
    pub fn remove(&mut self, id: ChunkId) -> Option<Chunk> {
        let pos = self.chunks.iter().position(|c| c.id == id)?;
        Some(self.chunks.remove(pos))
    }

    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.chunks.iter_mut().find(|c| c.id == id)
    }

    /// Chunk `tag:number`. Tags compare as all four bytes, so a space-padded
    /// tag such as `GST ` must be given with its space.
    pub fn find(&self, tag: Tag, number: u32) -> Option<&Chunk> {
        self.get(ChunkId::new(tag, number))
    }

    /// All chunks with the given tag, in container order.
    ///
    /// No padding is added: [`Tag::new`] pads short text with NUL, so
    /// `Tag::new("GST")` finds no `GST ` chunks.
    pub fn by_tag(&self, tag: Tag) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter().filter(move |c| c.id.tag == tag)
    }

    pub fn contains(&self, id: ChunkId) -> bool {
        self.get(id).is_some()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

/// Unvalidated container shape used for deserialization.
#[derive(Deserialize)]
struct ContainerData {
    endianness: Endianness,
    character_set: CharacterSet,
    file_type: Tag,
    version: Version,
    chunks: Vec<Chunk>,
}

impl TryFrom<ContainerData> for Container {
    type Error = ContainerError;

    fn try_from(data: ContainerData) -> Result<Self, Self::Error> {
        let mut container = Container {
            endianness: data.endianness,
            character_set: data.character_set,
            file_type: data.file_type,
            version: data.version,
            chunks: Vec::with_capacity(data.chunks.len()),
        };
        for chunk in data.chunks {
            container.insert(chunk)?;
        }
        Ok(container)
    }
}
