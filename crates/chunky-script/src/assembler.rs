//! Two-pass script assembler.
//!
//! Pass one lays out instructions as statements arrive: pending push
//! operands are gathered into one push instruction, emitted before the next
//! real instruction, and every instruction gets its final address. Labels do
//! not end a push; a label defined between operands addresses the push they
//! end up in. [`Assembler::end_push`] starts a new push explicitly.
//! Operands may name labels defined later; pass two ([`Assembler::finish`])
//! resolves them to address words, falling back to named constants.

use std::collections::HashMap;

use crate::error::{AssembleError, ScriptError};
use crate::instruction::{Instruction, PUSH_OPCODE, address_param, string_param};
use crate::script::{FIRST_ADDRESS, Script};
use crate::varname::pack_name;

/// Label defined at the first instruction.
pub const START_LABEL: &str = "start";

/// A parameter word before label resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Value(u32),
    /// Resolved to `0xCC000000 + (address - 1)`.
    Label(String),
}

impl Operand {
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }

    /// String id reference, biased by `0x80000000`.
    pub fn string(id: u32) -> Self {
        Self::Value(string_param(id))
    }
}

impl From<u32> for Operand {
    fn from(value: u32) -> Self {
        Self::Value(value)
    }
}

/// Instruction with unresolved operands.
#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingInstruction {
    opcode: u16,
    variable: Option<String>,
    params: Vec<Operand>,
    address: u32,
}

/// Builds a [`Script`] from labels, pushes and instructions.
///
/// Label names are case-insensitive.
#[derive(Clone, Debug)]
pub struct Assembler {
    script: Script,
    instructions: Vec<PendingInstruction>,
    pending: Vec<Operand>,
    labels: HashMap<String, u32>,
    constants: HashMap<String, u32>,
    address: u32,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(Script::new())
    }
}

impl Assembler {
    /// Assemble into `script`, keeping its header fields. Existing
    /// instructions are discarded.
    pub fn new(mut script: Script) -> Self {
        script.instructions.clear();
        let labels = HashMap::from([(START_LABEL.to_string(), FIRST_ADDRESS)]);
        Self {
            script,
            instructions: Vec::new(),
            pending: Vec::new(),
            labels,
            constants: HashMap::new(),
            address: FIRST_ADDRESS,
        }
    }

    /// Address the next instruction will get.
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Define a label at the current position.
    ///
    /// With pushes pending this is the address of the push they form.
    pub fn label(&mut self, name: &str) -> Result<&mut Self, AssembleError> {
        let key = name.to_ascii_lowercase();
        if self.labels.contains_key(&key) {
            return Err(AssembleError::DuplicateLabel(name.to_string()));
        }
        tracing::trace!(label = %key, address = self.address, "label");
        self.labels.insert(key, self.address);
        Ok(self)
    }

    /// Name a value for operands that match no label.
    pub fn constant(&mut self, name: &str, value: u32) -> &mut Self {
        self.constants.insert(name.to_ascii_lowercase(), value);
        self
    }

    /// Queue an operand for the next push instruction.
    pub fn push(&mut self, operand: impl Into<Operand>) -> &mut Self {
        self.pending.push(operand.into());
        self
    }

    /// Emit pending operands now, so later ones form a separate push.
    pub fn end_push(&mut self) -> &mut Self {
        self.flush();
        self
    }

    /// Append an instruction without parameters.
    pub fn instruction(
        &mut self,
        opcode: u16,
        variable: Option<&str>,
    ) -> Result<&mut Self, ScriptError> {
        if let Some(name) = variable {
            pack_name(name)?;
            if opcode == PUSH_OPCODE || opcode > u8::MAX as u16 {
                return Err(ScriptError::VariableOpcodeOutOfRange(opcode));
            }
        }
        self.flush();
        self.emit(PendingInstruction {
            opcode,
            variable: variable.map(str::to_string),
            params: Vec::new(),
            address: 0,
        });
        Ok(self)
    }

    /// Resolve labels and produce the script.
    pub fn finish(mut self) -> Result<Script, AssembleError> {
        self.flush();
        let (labels, constants) = (self.labels, self.constants);
        for pending in self.instructions {
            let params = pending
                .params
                .into_iter()
                .map(|operand| match operand {
                    Operand::Value(value) => Ok(value),
                    Operand::Label(name) => {
                        let key = name.to_ascii_lowercase();
                        labels
                            .get(&key)
                            .map(|&address| address_param(address))
                            .or_else(|| constants.get(&key).copied())
                            .ok_or(AssembleError::UndefinedLabel(name))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            self.script.instructions.push(Instruction {
                opcode: pending.opcode,
                variable: pending.variable,
                params,
                address: pending.address,
            });
        }
        Ok(self.script)
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let params = std::mem::take(&mut self.pending);
        self.emit(PendingInstruction {
            opcode: PUSH_OPCODE,
            variable: None,
            params,
            address: 0,
        });
    }

    fn emit(&mut self, mut instruction: PendingInstruction) {
        instruction.address = self.address;
        let header = if instruction.variable.is_some() { 2 } else { 1 };
        self.address += (header + instruction.params.len()) as u32;
        self.instructions.push(instruction);
    }
}
