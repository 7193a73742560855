//! Length-prefixed ("Pascal") strings.
//!
//! The prefix width follows the character set: one byte for single-byte
//! sets, two bytes for 16-bit sets. The prefix counts code units, not bytes.

use crate::{ByteReader, CharacterSet, Error, Result};

/// Decode a Pascal string, returning it with the number of bytes consumed.
pub fn decode_string(charset: CharacterSet, bytes: &[u8]) -> Result<(String, usize)> {
    charset.ensure_supported()?;
    let mut reader = ByteReader::new(bytes, "string length");
    let units = match charset.unit_size() {
        2 => reader.u16()? as usize,
        _ => reader.u8()? as usize,
    };
    let data = reader.context("string data").take(units * charset.unit_size())?;

    let value = match charset {
        CharacterSet::Utf16Le => {
            let units = data
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<std::result::Result<String, _>>()
                .map_err(|_| Error::InvalidUtf16)?
        }
        _ => data.iter().map(|&b| b as char).collect(),
    };

    Ok((value, reader.position()))
}

/// Decode a `u16` character set marker followed by a Pascal string in that set.
///
/// Returns the string, the bytes consumed (marker included) and the set.
pub fn decode_string_with_charset(bytes: &[u8]) -> Result<(String, usize, CharacterSet)> {
    let mut reader = ByteReader::new(bytes, "string character set");
    let charset = CharacterSet::from_marker(reader.u16()?)?;
    let (value, consumed) = decode_string(charset, reader.rest())?;
    Ok((value, consumed + 2, charset))
}

/// Encode a Pascal string.
pub fn encode_string(charset: CharacterSet, value: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_len(charset, value)?);
    append_string(&mut out, charset, value)?;
    Ok(out)
}

/// Encode a character set marker followed by a Pascal string in that set.
pub fn encode_string_with_charset(charset: CharacterSet, value: &str) -> Result<Vec<u8>> {
    charset.ensure_supported()?;
    let mut out = charset.marker().to_le_bytes().to_vec();
    append_string(&mut out, charset, value)?;
    Ok(out)
}

/// Encoded size of a Pascal string in bytes, prefix included.
pub fn encoded_len(charset: CharacterSet, value: &str) -> Result<usize> {
    charset.ensure_supported()?;
    let units = unit_count(charset, value);
    Ok(charset.unit_size() * (units + 1))
}

fn unit_count(charset: CharacterSet, value: &str) -> usize {
    if charset.is_wide() {
        value.encode_utf16().count()
    } else {
        value.chars().count()
    }
}

fn append_string(out: &mut Vec<u8>, charset: CharacterSet, value: &str) -> Result<()> {
    charset.ensure_supported()?;
    let units = unit_count(charset, value);
    if units > charset.max_units() {
        return Err(Error::StringTooLong {
            len: units,
            max: charset.max_units(),
        });
    }

    match charset {
        CharacterSet::Utf16Le => {
            out.extend_from_slice(&(units as u16).to_le_bytes());
            for unit in value.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        _ => {
            out.push(units as u8);
            for ch in value.chars() {
                let byte = u8::try_from(ch as u32)
                    .map_err(|_| Error::UnencodableChar { ch, charset })?;
                out.push(byte);
            }
        }
    }
    Ok(())
}
