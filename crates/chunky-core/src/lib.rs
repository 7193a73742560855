#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Primitive codecs shared by the chunky container and script crates.
//!
//! Everything here is a pure transformation over byte slices:
//! - Fixed-width little-endian integers, including the packed 24-bit size field
//! - Pascal strings whose length prefix depends on the character set
//! - Four-character tags, stored byte-reversed on disk
//! - Character set / endianness markers and their support matrix

mod bytes;
mod charset;
mod error;
mod pascal;
mod tag;
mod version;

#[cfg(test)]
mod bytes_tests;

pub use bytes::{ByteReader, U24_MAX, pack_u24, unpack_u24};
pub use charset::{CharacterSet, Endianness, read_markers, write_markers};
pub use error::{Error, Result};
pub use pascal::{
    decode_string, decode_string_with_charset, encode_string, encode_string_with_charset,
    encoded_len,
};
pub use tag::Tag;
pub use version::Version;
