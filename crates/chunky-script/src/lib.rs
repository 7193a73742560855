//! Script bytecode for chunky files.
//!
//! Scripts live in `GLSC` and `GLOP` chunks. This crate decodes them into
//! [`Script`]s, encodes them back, renders listings and assembles text.
//!
//! # Example
//!
//! ```
//! use chunky_script::{FormatConfig, OpcodeTable, assemble_text, format_script};
//!
//! let source = "script GLSC 1\nloop:\npush loop\nGo\n";
//! let assembly = assemble_text(source, &OpcodeTable::base()).unwrap();
//! let (_, script) = assembly.script.unwrap();
//!
//! let bytes = chunky_script::assemble(&script).unwrap();
//! assert_eq!(chunky_script::disassemble(&bytes).unwrap(), script);
//! assert!(format_script(&script, &FormatConfig::new()).contains("Push\t$L_0002"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod assembler;
mod error;
mod format;
mod instruction;
pub mod lexer;
mod opcode;
mod script;
mod text;
mod varname;

#[cfg(test)]
mod opcode_tests;
#[cfg(test)]
mod script_tests;
#[cfg(test)]
mod text_tests;
#[cfg(test)]
mod varname_tests;

pub use assembler::{Assembler, Operand, START_LABEL};
pub use error::{AssembleError, ScriptError};
pub use format::{FormatConfig, format_param, format_script};
pub use instruction::{
    ADDRESS_BIAS, BIAS_VALUE_MASK, Instruction, PUSH_OPCODE, STRING_BIAS, address_param,
    string_param,
};
pub use opcode::{OpcodeTable, PUSH_MNEMONIC};
pub use script::{
    DEFAULT_COMPILER_VERSION, FIRST_ADDRESS, SCRIPT_HEADER_SIZE, SCRIPT_RESERVED, SCRIPT_TAGS,
    Script, assemble, disassemble,
};
pub use text::{ASSEMBLY_FILE_TYPE, Assembly, assemble_text, assemble_text_with_constants};
pub use varname::{MAX_NAME_CHARS, PACKED_NAME_SIZE, pack_char, pack_name, unpack_char, unpack_name};
