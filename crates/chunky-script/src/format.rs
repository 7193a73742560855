//! Readable listings of scripts.
//!
//! ```text
//! @L_0002:	PushThisVar	siiLoop
//! @L_0004:	Push	$L_0002
//!         	Push	string:0x3
//! @L_0007:	Go
//! @end:
//! ```
//!
//! Every parameter word is listed as an implicit push, so the listing
//! reassembles with [`assemble_text`](crate::assemble_text). Pushes run on
//! through labels when reassembled, so an `EndPush` line closes them where
//! the next push or a referenced address would otherwise move. Constant
//! names reassemble only with
//! [`assemble_text_with_constants`](crate::assemble_text_with_constants)
//! given the same map.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chunky_file::ChunkId;

use crate::instruction::{ADDRESS_BIAS, BIAS_VALUE_MASK, STRING_BIAS};
use crate::opcode::{OpcodeTable, PUSH_MNEMONIC};
use crate::script::Script;

/// Closes the push formed by the preceding `Push` lines.
const END_PUSH: &str = "EndPush";

/// Blank address column of continuation lines.
const NO_ADDRESS: &str = "        ";

/// Formatter options.
#[derive(Clone, Debug)]
pub struct FormatConfig {
    pub opcodes: OpcodeTable,
    /// Names shown instead of matching parameter values.
    pub constants: HashMap<u32, String>,
    /// Chunk the script came from; enables the title block.
    pub chunk: Option<ChunkId>,
    pub chunk_name: Option<String>,
    pub file_name: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            opcodes: OpcodeTable::base(),
            constants: HashMap::new(),
            chunk: None,
            chunk_name: None,
            file_name: None,
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opcodes(mut self, opcodes: OpcodeTable) -> Self {
        self.opcodes = opcodes;
        self
    }

    pub fn constant(mut self, value: u32, name: impl Into<String>) -> Self {
        self.constants.insert(value, name.into());
        self
    }

    pub fn chunk(mut self, id: ChunkId) -> Self {
        self.chunk = Some(id);
        self
    }

    pub fn chunk_name(mut self, name: impl Into<String>) -> Self {
        self.chunk_name = Some(name.into());
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// Render a script as assembly text.
pub fn format_script(script: &Script, config: &FormatConfig) -> String {
    Listing { script, config }.to_string()
}

/// Render one parameter word.
///
/// Address words pointing past `last_address` render as `@end`.
pub fn format_param(
    value: u32,
    last_address: Option<u32>,
    constants: &HashMap<u32, String>,
) -> String {
    if let Some(name) = constants.get(&value) {
        return name.clone();
    }
    match value & !BIAS_VALUE_MASK {
        ADDRESS_BIAS => {
            let target = (value & BIAS_VALUE_MASK) + 1;
            if last_address.is_none_or(|last| target > last) {
                "@end".to_string()
            } else {
                format!("$L_{target:04x}")
            }
        }
        STRING_BIAS => format!("string:0x{:x}", value & BIAS_VALUE_MASK),
        _ if is_printable_tag(value) => {
            let text: String = value.to_be_bytes().iter().map(|&b| b as char).collect();
            format!("'{text}'")
        }
        _ => format!("{value:#x}"),
    }
}

fn is_printable_tag(value: u32) -> bool {
    value.to_be_bytes().iter().all(|b| (0x20..=0x7E).contains(b))
}

struct Listing<'a> {
    script: &'a Script,
    config: &'a FormatConfig,
}

impl Listing<'_> {
    /// Addresses that rendered address words name, and whether any render
    /// as `@end`.
    fn targets(&self, last_address: Option<u32>) -> (HashSet<u32>, bool) {
        let mut targets = HashSet::new();
        let mut end = false;
        let words = self.script.instructions.iter().flat_map(|i| &i.params);
        for &value in words {
            if self.config.constants.contains_key(&value)
                || value & !BIAS_VALUE_MASK != ADDRESS_BIAS
            {
                continue;
            }
            let target = (value & BIAS_VALUE_MASK) + 1;
            if last_address.is_none_or(|last| target > last) {
                end = true;
            } else {
                targets.insert(target);
            }
        }
        (targets, end)
    }

    fn title(&self, f: &mut fmt::Formatter<'_>, id: ChunkId) -> fmt::Result {
        let mut title = String::new();
        if let Some(file) = &self.config.file_name {
            title.push_str(file);
            title.push(' ');
        }
        title.push_str(&id.to_string());
        if let Some(name) = &self.config.chunk_name {
            title.push_str(&format!(" ({name})"));
        }
        title.push_str(&format!(" (0x{:x})", id.number));

        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.chars().count()))?;
        writeln!(f)
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.config.chunk {
            self.title(f, id)?;
        }

        let last_address = self.script.last_address();
        let (targets, end_referenced) = self.targets(last_address);
        let mut pushing = false;
        for instruction in &self.script.instructions {
            let starts_push = instruction.is_push() && !instruction.params.is_empty();
            if pushing && (starts_push || targets.contains(&instruction.address)) {
                writeln!(f, "{NO_ADDRESS}\t{END_PUSH}")?;
            }
            if instruction.is_push() && instruction.params.is_empty() {
                continue;
            }
            pushing = !instruction.params.is_empty();

            let label = format!("@L_{:04x}:", instruction.address);
            let mut address = label.as_str();

            if !instruction.is_push() {
                write!(
                    f,
                    "{address}\t{}",
                    self.config.opcodes.mnemonic(instruction.opcode)
                )?;
                if let Some(variable) = &instruction.variable {
                    write!(f, "\t{variable}")?;
                }
                writeln!(f)?;
                address = NO_ADDRESS;
            }

            for &param in &instruction.params {
                let value = format_param(param, last_address, &self.config.constants);
                writeln!(f, "{address}\t{PUSH_MNEMONIC}\t{value}")?;
                address = NO_ADDRESS;
            }
        }
        if pushing && end_referenced {
            writeln!(f, "{NO_ADDRESS}\t{END_PUSH}")?;
        }
        writeln!(f, "@end:")
    }
}
