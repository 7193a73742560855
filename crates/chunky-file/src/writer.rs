//! Container writer.
//!
//! Offsets, sizes and parent counts are derived from the container; nothing
//! stored on a loaded chunk beyond its id, flags, name, children and payload
//! survives a save.

use std::collections::HashMap;
use std::io::Write;

use chunky_core::U24_MAX;

use crate::config::SaveConfig;
use crate::error::SaveError;
use crate::header::{
    AttributeRecord, FILE_HEADER_SIZE, FileHeader, INDEX_HEADER_SIZE, IndexEntry, IndexHeader,
};
use crate::model::{ChunkId, Container};

/// Serializes containers.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    config: SaveConfig,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SaveConfig) -> Self {
        Self { config }
    }

    /// Encode a container to a complete file image.
    pub fn to_bytes(&self, container: &Container) -> Result<Vec<u8>, SaveError> {
        container.endianness.ensure_supported()?;
        container.character_set.ensure_supported()?;

        let mut out = vec![0u8; FILE_HEADER_SIZE];

        let mut payload_offsets = Vec::with_capacity(container.len());
        for chunk in container {
            let size = chunk.payload.len();
            if size > U24_MAX as usize {
                return Err(SaveError::PayloadTooLarge {
                    id: chunk.id(),
                    size,
                });
            }
            payload_offsets.push(offset32(out.len())?);
            out.extend_from_slice(&chunk.payload);
        }

        let parents = parent_counts(container);

        let index_offset = out.len();
        out.extend_from_slice(&[0u8; INDEX_HEADER_SIZE]);
        let attributes_start = out.len();

        let mut entries: Vec<(ChunkId, IndexEntry)> = Vec::with_capacity(container.len());
        for (chunk, payload_offset) in container.iter().zip(payload_offsets) {
            let id = chunk.id();
            let parent_count = parents.get(&id).copied().unwrap_or(0);
            let record = AttributeRecord {
                id,
                payload_offset,
                flags: chunk.flags,
                payload_size: chunk.payload.len() as u32,
                parent_count: u16::try_from(parent_count).map_err(|_| {
                    SaveError::TooManyParents {
                        id,
                        count: parent_count,
                    }
                })?,
                children: chunk.children.clone(),
                name: chunk.name.clone(),
            };
            let bytes = record.to_bytes()?;

            let relative = out.len() - attributes_start;
            entries.push((
                id,
                IndexEntry {
                    offset: offset32(relative)?,
                    size: offset32(bytes.len())?,
                },
            ));
            out.extend_from_slice(&bytes);

            // Padding counts toward the records region, not the record.
            let padding = (4 - (out.len() - attributes_start) % 4) % 4;
            out.resize(out.len() + padding, 0);
        }
        let attributes_size = offset32(out.len() - attributes_start)?;

        // Readers binary-search the index by id.
        entries.sort_by_key(|(id, _)| *id);
        for (_, entry) in &entries {
            out.extend_from_slice(&entry.to_bytes());
        }

        let total = offset32(out.len())?;
        let index_offset = offset32(index_offset)?;
        let index = IndexHeader::new(
            container.endianness,
            container.character_set,
            offset32(entries.len())?,
            attributes_size,
        );
        let index_start = index_offset as usize;
        out[index_start..index_start + INDEX_HEADER_SIZE].copy_from_slice(&index.to_bytes());

        let header = FileHeader {
            file_type: container.file_type,
            version: self.config.version.unwrap_or(container.version),
            endianness: container.endianness,
            character_set: container.character_set,
            file_size: total,
            index_offset,
            index_size: total - index_offset,
            post_index_offset: total,
            post_index_size: 0,
        };
        out[..FILE_HEADER_SIZE].copy_from_slice(&header.to_bytes());

        tracing::debug!(
            file_type = %container.file_type,
            chunks = container.len(),
            size = total,
            "encoded container"
        );
        Ok(out)
    }

    /// Encode a container and write it to `dst`.
    pub fn write_to<W: Write>(
        &self,
        container: &Container,
        dst: &mut W,
    ) -> Result<(), SaveError> {
        let bytes = self.to_bytes(container)?;
        dst.write_all(&bytes)?;
        Ok(())
    }
}

/// Encode a container with default options.
pub fn save(container: &Container) -> Result<Vec<u8>, SaveError> {
    Writer::new().to_bytes(container)
}

/// Encode a container with default options and write it to `dst`.
pub fn save_to<W: Write>(container: &Container, dst: &mut W) -> Result<(), SaveError> {
    Writer::new().write_to(container, dst)
}

/// Number of child edges pointing at each chunk id.
fn parent_counts(container: &Container) -> HashMap<ChunkId, usize> {
    let mut counts = HashMap::new();
    for chunk in container {
        for child in &chunk.children {
            *counts.entry(child.target).or_insert(0) += 1;
        }
    }
    counts
}

fn offset32(value: usize) -> Result<u32, SaveError> {
    u32::try_from(value).map_err(|_| SaveError::FileTooLarge(value))
}
