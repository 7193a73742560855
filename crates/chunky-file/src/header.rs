//! Fixed-layout structures of a chunky file.
//!
//! ```text
//! header (128) | payloads | index header (20) | attribute records | index entries
//! ```
//!
//! Attribute record offsets in the index entries are relative to the end of
//! the index header.

use chunky_core::{
    ByteReader, CharacterSet, Endianness, Tag, Version, pack_u24, read_markers, write_markers,
};

use crate::error::{LoadError, SaveError};
use crate::model::{ChunkChild, ChunkFlags, ChunkId};

/// File signature.
pub const MAGIC: [u8; 4] = *b"CHN2";

/// Bytes reserved for the file header.
pub const FILE_HEADER_SIZE: usize = 128;

/// Bytes of the file header that carry fields; the rest is zero padding.
pub const FILE_HEADER_FIELDS: usize = 36;

pub const INDEX_HEADER_SIZE: usize = 20;

/// Expected value of the first legacy index header field.
pub const INDEX_SENTINEL: u32 = 0xFFFF_FFFF;

/// Expected value of the second legacy index header field.
pub const INDEX_LEGACY: u32 = 20;

pub const INDEX_ENTRY_SIZE: usize = 8;

/// Fixed part of an attribute record.
pub const ATTRIBUTE_FIXED_SIZE: usize = 20;

pub const CHILD_RECORD_SIZE: usize = 12;

/// Longest chunk name the writer accepts.
pub const MAX_NAME_LEN: usize = 255;

/// File header: first 128 bytes of a chunky file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub file_type: Tag,
    pub version: Version,
    pub endianness: Endianness,
    pub character_set: CharacterSet,
    pub file_size: u32,
    pub index_offset: u32,
    pub index_size: u32,
    pub post_index_offset: u32,
    pub post_index_size: u32,
}

impl FileHeader {
    /// Decode the header fields. The magic is checked before anything else.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut r = ByteReader::new(bytes, "file header");
        let magic = r.array::<4>()?;
        if magic != MAGIC {
            return Err(LoadError::BadMagic(magic));
        }

        let file_type = r.tag()?;
        let version = Version::new(r.u16()?, r.u16()?);
        let (endianness, character_set) = read_markers(&mut r)?;
        Ok(Self {
            file_type,
            version,
            endianness,
            character_set,
            file_size: r.u32()?,
            index_offset: r.u32()?,
            index_size: r.u32()?,
            post_index_offset: r.u32()?,
            post_index_size: r.u32()?,
        })
    }

    /// Encode to the full 128-byte region.
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut fields = Vec::with_capacity(FILE_HEADER_FIELDS);
        fields.extend_from_slice(&MAGIC);
        fields.extend_from_slice(&self.file_type.to_raw());
        fields.extend_from_slice(&self.version.major.to_le_bytes());
        fields.extend_from_slice(&self.version.minor.to_le_bytes());
        write_markers(&mut fields, self.endianness, self.character_set);
        for value in [
            self.file_size,
            self.index_offset,
            self.index_size,
            self.post_index_offset,
            self.post_index_size,
        ] {
            fields.extend_from_slice(&value.to_le_bytes());
        }

        let mut bytes = [0u8; FILE_HEADER_SIZE];
        bytes[..FILE_HEADER_FIELDS].copy_from_slice(&fields);
        bytes
    }
}

/// Header of the index region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexHeader {
    pub endianness: Endianness,
    pub character_set: CharacterSet,
    pub entry_count: u32,
    pub attributes_size: u32,
    pub sentinel: u32,
    pub legacy: u32,
}

impl IndexHeader {
    pub fn new(
        endianness: Endianness,
        character_set: CharacterSet,
        entry_count: u32,
        attributes_size: u32,
    ) -> Self {
        Self {
            endianness,
            character_set,
            entry_count,
            attributes_size,
            sentinel: INDEX_SENTINEL,
            legacy: INDEX_LEGACY,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut r = ByteReader::new(bytes, "index header");
        let (endianness, character_set) = read_markers(&mut r)?;
        Ok(Self {
            endianness,
            character_set,
            entry_count: r.u32()?,
            attributes_size: r.u32()?,
            sentinel: r.u32()?,
            legacy: r.u32()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; INDEX_HEADER_SIZE] {
        let mut out = Vec::with_capacity(INDEX_HEADER_SIZE);
        write_markers(&mut out, self.endianness, self.character_set);
        for value in [
            self.entry_count,
            self.attributes_size,
            self.sentinel,
            self.legacy,
        ] {
            out.extend_from_slice(&value.to_le_bytes());
        }

        let mut bytes = [0u8; INDEX_HEADER_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }
}

/// Location of one attribute record, relative to the end of the index header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: u32,
    pub size: u32,
}

impl IndexEntry {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            offset: r.u32()?,
            size: r.u32()?,
        })
    }

    pub fn to_bytes(self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        bytes[0..4].copy_from_slice(&self.offset.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }
}

/// Per-chunk attribute record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeRecord {
    pub id: ChunkId,
    /// Absolute file offset of the payload.
    pub payload_offset: u32,
    pub flags: ChunkFlags,
    pub payload_size: u32,
    /// Informational on load; recomputed on save.
    pub parent_count: u16,
    pub children: Vec<ChunkChild>,
    pub name: Option<String>,
}

impl AttributeRecord {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut r = ByteReader::new(bytes, "attribute record");
        let id = ChunkId::new(r.tag()?, r.u32()?);
        let payload_offset = r.u32()?;
        let flags = ChunkFlags::from_bits(r.u8()?);
        let payload_size = r.u24()?;
        let child_count = r.u16()? as usize;
        let parent_count = r.u16()?;

        r.context("chunk children")
            .require(child_count * CHILD_RECORD_SIZE)?;
        let mut children = Vec::with_capacity(child_count);
        for _ in 0..child_count {
            let target = ChunkId::new(r.tag()?, r.u32()?);
            let local_id = r.u32()?;
            children.push(ChunkChild::new(local_id, target));
        }

        let name = if r.is_empty() {
            None
        } else {
            let (name, _, _) = chunky_core::decode_string_with_charset(r.rest())?;
            Some(name)
        };

        Ok(Self {
            id,
            payload_offset,
            flags,
            payload_size,
            parent_count,
            children,
            name,
        })
    }

    /// Encode without trailing alignment padding.
    ///
    /// Names are always written in the single-byte character set, followed
    /// by a NUL. Empty names are omitted.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        let child_count =
            u16::try_from(self.children.len()).map_err(|_| SaveError::TooManyChildren {
                id: self.id,
                count: self.children.len(),
            })?;
        let size = pack_u24(self.payload_size).map_err(|_| SaveError::PayloadTooLarge {
            id: self.id,
            size: self.payload_size as usize,
        })?;

        let mut out =
            Vec::with_capacity(ATTRIBUTE_FIXED_SIZE + CHILD_RECORD_SIZE * self.children.len());
        out.extend_from_slice(&self.id.tag.to_raw());
        out.extend_from_slice(&self.id.number.to_le_bytes());
        out.extend_from_slice(&self.payload_offset.to_le_bytes());
        out.push(self.flags.bits());
        out.extend_from_slice(&size);
        out.extend_from_slice(&child_count.to_le_bytes());
        out.extend_from_slice(&self.parent_count.to_le_bytes());

        for child in &self.children {
            out.extend_from_slice(&child.target.tag.to_raw());
            out.extend_from_slice(&child.target.number.to_le_bytes());
            out.extend_from_slice(&child.local_id.to_le_bytes());
        }

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            let len = name.chars().count();
            if len > MAX_NAME_LEN {
                return Err(SaveError::NameTooLong { id: self.id, len });
            }
            out.extend(chunky_core::encode_string_with_charset(
                CharacterSet::Ansi,
                name,
            )?);
            out.push(0);
        }

        Ok(out)
    }
}
