//! Six-bit packed variable names.
//!
//! Up to eight characters from `[0-9A-Za-z_]` are packed most significant
//! bit first into six bytes. Code 0 is padding.
//!
//! | code   | character |
//! | ------ | --------- |
//! | 0      | (none)    |
//! | 1-10   | `0`-`9`   |
//! | 11-36  | `A`-`Z`   |
//! | 37-62  | `a`-`z`   |
//! | 63     | `_`       |

use crate::error::ScriptError;

/// Packed name size in bytes.
pub const PACKED_NAME_SIZE: usize = 6;

/// Longest name that fits; longer names are truncated.
pub const MAX_NAME_CHARS: usize = 8;

const BITS_PER_CHAR: usize = 6;

/// Six-bit code of a name character.
pub fn pack_char(ch: char) -> Option<u8> {
    let code = match ch {
        '0'..='9' => ch as u8 - b'0' + 1,
        'A'..='Z' => ch as u8 - b'A' + 11,
        'a'..='z' => ch as u8 - b'a' + 37,
        '_' => 63,
        _ => return None,
    };
    Some(code)
}

/// Character of a six-bit code, `None` for padding.
pub fn unpack_char(code: u8) -> Option<char> {
    let ch = match code & 0x3F {
        0 => return None,
        c @ 1..=10 => b'0' + c - 1,
        c @ 11..=36 => b'A' + c - 11,
        c @ 37..=62 => b'a' + c - 37,
        _ => b'_',
    };
    Some(ch as char)
}

/// Pack a variable name, truncating it to eight characters.
pub fn pack_name(name: &str) -> Result<[u8; PACKED_NAME_SIZE], ScriptError> {
    let mut packed = [0u8; PACKED_NAME_SIZE];
    let mut bit = 0;
    for ch in name.chars().take(MAX_NAME_CHARS) {
        let code = pack_char(ch).ok_or_else(|| ScriptError::InvalidVariableChar {
            ch,
            name: name.to_string(),
        })?;
        for i in (0..BITS_PER_CHAR).rev() {
            if (code >> i) & 1 == 1 {
                packed[bit / 8] |= 0x80 >> (bit % 8);
            }
            bit += 1;
        }
    }
    Ok(packed)
}

/// Unpack a variable name, stopping at the first padding code.
pub fn unpack_name(packed: &[u8; PACKED_NAME_SIZE]) -> String {
    let mut name = String::with_capacity(MAX_NAME_CHARS);
    for index in 0..MAX_NAME_CHARS {
        let mut code = 0u8;
        for i in 0..BITS_PER_CHAR {
            let bit = index * BITS_PER_CHAR + i;
            let value = (packed[bit / 8] >> (7 - bit % 8)) & 1;
            code = (code << 1) | value;
        }
        match unpack_char(code) {
            Some(ch) => name.push(ch),
            None => break,
        }
    }
    name
}
