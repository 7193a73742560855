//! Container loader.
//!
//! Reads a chunky file from any seekable source. Every declared offset and
//! size is checked against the real stream length before anything is
//! allocated or read.

use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom};

use chunky_core::ByteReader;

use crate::config::LoadConfig;
use crate::error::LoadError;
use crate::header::{
    AttributeRecord, FILE_HEADER_FIELDS, FileHeader, INDEX_ENTRY_SIZE, INDEX_HEADER_SIZE,
    INDEX_LEGACY, INDEX_SENTINEL, IndexEntry, IndexHeader,
};
use crate::model::{Chunk, Container};

/// Non-fatal anomaly found while loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadWarning {
    /// The index header sentinel was not `0xFFFFFFFF`.
    IndexSentinel(u32),
    /// The index header legacy field was not `20`.
    IndexLegacy(u32),
    /// The header's file size disagrees with the stream length.
    FileSize { declared: u32, actual: u64 },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexSentinel(value) => write!(
                f,
                "index header sentinel is {value:#x}, expected {INDEX_SENTINEL:#x}"
            ),
            Self::IndexLegacy(value) => write!(
                f,
                "index header legacy field is {value}, expected {INDEX_LEGACY}"
            ),
            Self::FileSize { declared, actual } => write!(
                f,
                "header declares {declared:#x} bytes but the file has {actual:#x}"
            ),
        }
    }
}

/// A loaded container together with the anomalies tolerated on the way.
#[derive(Clone, Debug)]
pub struct Loaded {
    pub container: Container,
    pub warnings: Vec<LoadWarning>,
}

/// Parses chunky files.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    config: LoadConfig,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Load a container. Chunks keep index order.
    pub fn load<R: Read + Seek>(&self, src: &mut R) -> Result<Loaded, LoadError> {
        let mut source = Source::new(src)?;
        let mut warnings = Vec::new();

        // A short file still gets its magic checked first.
        let header_len = FILE_HEADER_FIELDS.min(source.len as usize);
        let header = FileHeader::from_bytes(&source.read_at(0, header_len, "file header")?)?;
        header.endianness.ensure_supported()?;
        header.character_set.ensure_supported()?;
        tracing::debug!(
            file_type = %header.file_type,
            version = %header.version,
            charset = %header.character_set,
            file_size = header.file_size,
            index_offset = header.index_offset,
            "parsed file header"
        );
        if header.file_size as u64 != source.len {
            self.tolerate(
                &mut warnings,
                LoadWarning::FileSize {
                    declared: header.file_size,
                    actual: source.len,
                },
            )?;
        }

        let index_offset = header.index_offset as u64;
        let index = IndexHeader::from_bytes(&source.read_at(
            index_offset,
            INDEX_HEADER_SIZE,
            "index header",
        )?)?;
        index.endianness.ensure_supported()?;
        if index.sentinel != INDEX_SENTINEL {
            self.tolerate(&mut warnings, LoadWarning::IndexSentinel(index.sentinel))?;
        }
        if index.legacy != INDEX_LEGACY {
            self.tolerate(&mut warnings, LoadWarning::IndexLegacy(index.legacy))?;
        }
        if index.entry_count > self.config.max_chunks {
            return Err(LoadError::TooManyChunks {
                count: index.entry_count,
                limit: self.config.max_chunks,
            });
        }
        tracing::debug!(
            entries = index.entry_count,
            attributes_size = index.attributes_size,
            "parsed index header"
        );

        let attributes_start = index_offset + INDEX_HEADER_SIZE as u64;
        let entries_start = attributes_start + index.attributes_size as u64;
        let entries_bytes = source.read_at(
            entries_start,
            index.entry_count as usize * INDEX_ENTRY_SIZE,
            "index entries",
        )?;
        let mut entries_reader = ByteReader::new(&entries_bytes, "index entries");

        let mut container = Container::new(header.file_type);
        container.endianness = header.endianness;
        container.character_set = header.character_set;
        container.version = header.version;

        for _ in 0..index.entry_count {
            let entry = IndexEntry::read(&mut entries_reader)?;
            let record_bytes = source.read_at(
                attributes_start + entry.offset as u64,
                entry.size as usize,
                "attribute record",
            )?;
            let record = AttributeRecord::from_bytes(&record_bytes)?;
            let payload = source.read_at(
                record.payload_offset as u64,
                record.payload_size as usize,
                "chunk payload",
            )?;
            tracing::trace!(
                chunk = %record.id,
                flags = record.flags.bits(),
                size = record.payload_size,
                children = record.children.len(),
                parents = record.parent_count,
                "read chunk"
            );

            let mut chunk = Chunk::new(record.id, payload).with_flags(record.flags);
            chunk.name = record.name.filter(|n| !n.is_empty());
            chunk.children = record.children;
            container.insert(chunk)?;
        }

        Ok(Loaded {
            container,
            warnings,
        })
    }

    fn tolerate(
        &self,
        warnings: &mut Vec<LoadWarning>,
        warning: LoadWarning,
    ) -> Result<(), LoadError> {
        if self.config.strict {
            return Err(LoadError::Unsupported(warning.to_string()));
        }
        tracing::warn!(%warning, "suspicious chunky file");
        warnings.push(warning);
        Ok(())
    }
}

/// Load a container with default options, discarding warnings.
pub fn load<R: Read + Seek>(src: &mut R) -> Result<Container, LoadError> {
    Loader::new().load(src).map(|loaded| loaded.container)
}

/// Load a container from an in-memory file image.
pub fn load_bytes(bytes: &[u8]) -> Result<Container, LoadError> {
    load(&mut Cursor::new(bytes))
}

/// Seekable source with a known length.
struct Source<'a, R> {
    inner: &'a mut R,
    len: u64,
}

impl<'a, R: Read + Seek> Source<'a, R> {
    fn new(inner: &'a mut R) -> Result<Self, LoadError> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    /// Read exactly `len` bytes at `offset`, failing before allocation when
    /// the stream is too short.
    fn read_at(
        &mut self,
        offset: u64,
        len: usize,
        what: &'static str,
    ) -> Result<Vec<u8>, LoadError> {
        let available = self.len.saturating_sub(offset);
        if len as u64 > available {
            return Err(LoadError::Truncated {
                what,
                expected: len,
                actual: available as usize,
            });
        }

        self.inner.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::with_capacity(len);
        self.inner.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(LoadError::Truncated {
                what,
                expected: len,
                actual: buf.len(),
            });
        }
        Ok(buf)
    }
}
