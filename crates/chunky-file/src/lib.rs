//! Chunky container files (`CHN2`).
//!
//! # Example
//!
//! ```
//! use chunky_core::Tag;
//! use chunky_file::{Chunk, ChunkId, Container};
//!
//! let gstx = ChunkId::new(Tag::new("GSTX").unwrap(), 1);
//! let mut container = Container::new(Tag::new("SOC ").unwrap());
//! container.insert(Chunk::new(gstx, vec![1, 2, 3])).unwrap();
//!
//! let bytes = chunky_file::save(&container).unwrap();
//! let loaded = chunky_file::load_bytes(&bytes).unwrap();
//! assert_eq!(loaded, container);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod compression;
mod config;
mod error;
pub mod group;
pub mod header;
mod loader;
mod model;
mod string_table;
mod writer;

#[cfg(test)]
mod string_table_tests;

pub use compression::Compression;
pub use config::{LoadConfig, SaveConfig};
pub use error::{ContainerError, LoadError, PayloadError, SaveError, StringTableError};
pub use loader::{LoadWarning, Loaded, Loader, load, load_bytes};
pub use model::{
    Chunk, ChunkChild, ChunkFlags, ChunkId, Container, DEFAULT_FILE_TYPE, DEFAULT_VERSION,
};
pub use string_table::{STRING_ENTRY_SIZE, STRING_TABLE_TAG, StringTable};
pub use writer::{Writer, save, save_to};
