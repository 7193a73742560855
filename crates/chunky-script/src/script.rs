//! Script chunks (`GLSC`, `GLOP`): a 16-byte header and an instruction stream.

use chunky_core::{ByteReader, CharacterSet, Endianness, Tag, Version, read_markers, write_markers};
use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::instruction::Instruction;

pub const SCRIPT_HEADER_SIZE: usize = 16;

/// Value of the header word following the markers.
pub const SCRIPT_RESERVED: u32 = 4;

/// Compiler version written by the authoring application.
pub const DEFAULT_COMPILER_VERSION: Version = Version::new(0x1D, 0x10);

/// Address of the first instruction.
///
/// The interpreter numbers words from the compiler version word, which is
/// word 1; the instruction stream starts one word later.
pub const FIRST_ADDRESS: u32 = 2;

/// Tags of chunks that hold scripts.
pub const SCRIPT_TAGS: [Tag; 2] = [Tag::from_bytes(*b"GLSC"), Tag::from_bytes(*b"GLOP")];

/// A decoded script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub endianness: Endianness,
    pub character_set: CharacterSet,
    pub compiler_version: Version,
    /// Execution order.
    pub instructions: Vec<Instruction>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            endianness: Endianness::Little,
            character_set: CharacterSet::Ansi,
            compiler_version: DEFAULT_COMPILER_VERSION,
            instructions: Vec::new(),
        }
    }
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body size as stored in the header: instruction words plus the version word.
    pub fn body_size(&self) -> usize {
        self.instructions
            .iter()
            .map(Instruction::word_count)
            .sum::<usize>()
            + 1
    }

    /// Address of the last instruction, if any.
    pub fn last_address(&self) -> Option<u32> {
        self.instructions.last().map(|i| i.address)
    }

    /// Renumber instruction addresses from their sizes.
    pub fn assign_addresses(&mut self) {
        let mut address = FIRST_ADDRESS;
        for instruction in &mut self.instructions {
            instruction.address = address;
            address += instruction.word_count() as u32;
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        disassemble(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        assemble(self)
    }
}

/// Decode a script payload.
pub fn disassemble(bytes: &[u8]) -> Result<Script, ScriptError> {
    let mut r = ByteReader::new(bytes, "script header");
    let (endianness, character_set) = read_markers(&mut r)?;
    endianness.ensure_supported()?;
    let reserved = r.u32()?;
    let body_size = r.u32()?;
    let compiler_version = Version::new(r.u8()? as u16, r.u8()? as u16);
    r.skip(2)?;
    if reserved != SCRIPT_RESERVED {
        tracing::debug!(reserved, "unexpected script header word");
    }

    // The body size counts the version word, which sits inside the header.
    let body_len = 4 * (body_size as u64).saturating_sub(1);
    let body_len = usize::try_from(body_len).unwrap_or(usize::MAX);
    let body = r.context("script body").take(body_len)?;
    tracing::debug!(
        charset = %character_set,
        compiler = %compiler_version,
        words = body_size,
        "parsed script header"
    );

    let mut body = ByteReader::new(body, "script body");
    let mut instructions = Vec::new();
    while !body.is_empty() {
        let address = FIRST_ADDRESS + (body.position() / 4) as u32;
        let mut instruction = Instruction::decode(&mut body)?;
        instruction.address = address;
        tracing::trace!(address, opcode = instruction.opcode, "decoded instruction");
        instructions.push(instruction);
    }

    Ok(Script {
        endianness,
        character_set,
        compiler_version,
        instructions,
    })
}

/// Encode a script payload.
pub fn assemble(script: &Script) -> Result<Vec<u8>, ScriptError> {
    script.endianness.ensure_supported()?;
    let body_size = script.body_size();
    let body_words = u32::try_from(body_size).map_err(|_| ScriptError::TooLarge(body_size))?;

    let mut out = Vec::with_capacity(SCRIPT_HEADER_SIZE + 4 * body_size);
    write_markers(&mut out, script.endianness, script.character_set);
    out.extend_from_slice(&SCRIPT_RESERVED.to_le_bytes());
    out.extend_from_slice(&body_words.to_le_bytes());
    let version = [
        script.compiler_version.major as u8,
        script.compiler_version.minor as u8,
    ];
    out.extend_from_slice(&version);
    out.extend_from_slice(&version);

    for instruction in &script.instructions {
        instruction.encode(&mut out)?;
    }
    Ok(out)
}
