//! Bytecode instructions.
//!
//! ```text
//! fixed:     | opcode (u16) | count | 0      | params...
//! variable:  | V1 | V0      | count | opcode | V5 | V4 | V3 | V2 | params...
//! ```
//!
//! `V0..V5` is the packed variable name. The count byte of a variable
//! instruction includes its second header word.

use chunky_core::ByteReader;
use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::varname::{PACKED_NAME_SIZE, pack_name, unpack_name};

/// Opcode of the implicit push pseudo-instruction.
pub const PUSH_OPCODE: u16 = 0;

/// Bias of parameter words that hold an instruction address.
pub const ADDRESS_BIAS: u32 = 0xCC00_0000;

/// Bias of parameter words that hold a string id.
pub const STRING_BIAS: u32 = 0x8000_0000;

/// Low 24 bits carry the value of a biased word.
pub const BIAS_VALUE_MASK: u32 = 0x00FF_FFFF;

const MAX_FIXED_PARAMS: usize = u8::MAX as usize;
const MAX_VARIABLE_PARAMS: usize = u8::MAX as usize - 1;

/// One script instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// 0 for push, otherwise the interpreter opcode.
    pub opcode: u16,
    pub variable: Option<String>,
    pub params: Vec<u32>,
    /// Position in 32-bit words, as numbered by the interpreter.
    pub address: u32,
}

impl Instruction {
    pub fn new(opcode: u16) -> Self {
        Self {
            opcode,
            ..Self::default()
        }
    }

    /// Push pseudo-instruction carrying `params`.
    pub fn push(params: Vec<u32>) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = Some(name.into());
        self
    }

    pub fn with_params(mut self, params: Vec<u32>) -> Self {
        self.params = params;
        self
    }

    pub fn is_push(&self) -> bool {
        self.opcode == PUSH_OPCODE
    }

    pub fn is_variable(&self) -> bool {
        self.variable.is_some()
    }

    /// Encoded size in 32-bit words.
    pub fn word_count(&self) -> usize {
        let header = if self.is_variable() { 2 } else { 1 };
        header + self.params.len()
    }

    /// Decode one instruction. The address is left at 0.
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, ScriptError> {
        let header = r.context("instruction header").array::<4>()?;
        let (opcode, variable, count) = if header[3] == 0 {
            let opcode = u16::from_le_bytes([header[0], header[1]]);
            (opcode, None, header[2] as usize)
        } else {
            let tail = r.context("variable name").array::<4>()?;
            let packed: [u8; PACKED_NAME_SIZE] =
                [header[1], header[0], tail[3], tail[2], tail[1], tail[0]];
            let count = (header[2] as usize).saturating_sub(1);
            (header[3] as u16, Some(unpack_name(&packed)), count)
        };

        r.context("instruction parameters").require(count * 4)?;
        let mut params = Vec::with_capacity(count);
        for _ in 0..count {
            params.push(r.u32()?);
        }

        Ok(Self {
            opcode,
            variable,
            params,
            address: 0,
        })
    }

    /// Append the encoded instruction to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), ScriptError> {
        match &self.variable {
            None => {
                let count = param_count(self.params.len(), MAX_FIXED_PARAMS)?;
                out.extend_from_slice(&self.opcode.to_le_bytes());
                out.extend_from_slice(&[count, 0]);
            }
            Some(name) => {
                let opcode = u8::try_from(self.opcode)
                    .ok()
                    .filter(|&op| op != 0)
                    .ok_or(ScriptError::VariableOpcodeOutOfRange(self.opcode))?;
                let count = param_count(self.params.len(), MAX_VARIABLE_PARAMS)?;
                let packed = pack_name(name)?;
                out.extend_from_slice(&[packed[1], packed[0], count + 1, opcode]);
                out.extend_from_slice(&[packed[5], packed[4], packed[3], packed[2]]);
            }
        }
        for param in &self.params {
            out.extend_from_slice(&param.to_le_bytes());
        }
        Ok(())
    }
}

fn param_count(count: usize, max: usize) -> Result<u8, ScriptError> {
    if count > max {
        return Err(ScriptError::TooManyParams { count, max });
    }
    Ok(count as u8)
}

/// Parameter word referring to the instruction at `address`.
///
/// The interpreter adds the value to its instruction pointer and then
/// increments it, so targets are stored minus one.
pub fn address_param(address: u32) -> u32 {
    ADDRESS_BIAS.wrapping_add(address.wrapping_sub(1) & BIAS_VALUE_MASK)
}

/// Parameter word referring to string `id`.
pub fn string_param(id: u32) -> u32 {
    STRING_BIAS.wrapping_add(id)
}
