//! Opcode mnemonics.

use std::collections::{BTreeMap, HashMap};

/// Variable opcodes: they carry a packed variable name.
const VARIABLE_OPCODES: [(u16, &str); 16] = [
    (0x01, "PushLocVar"),
    (0x02, "PopLocVar"),
    (0x03, "PushThisVar"),
    (0x04, "PopThisVar"),
    (0x05, "PushGlobalVar"),
    (0x06, "PopGlobalVar"),
    (0x07, "PushRemoteVar"),
    (0x08, "PopRemoteVar"),
    (0x09, "PushLocArray"),
    (0x0A, "PopLocArray"),
    (0x0B, "PushThisArray"),
    (0x0C, "PopThisArray"),
    (0x0D, "PushGlobalArray"),
    (0x0E, "PopGlobalArray"),
    (0x0F, "PushRemoteArray"),
    (0x10, "PopRemoteArray"),
];

/// Interpreter operators, numbered from 0x100.
const FIXED_OPCODES: [&str; 61] = [
    "Add", "Sub", "Mul", "Div", "Mod", "Neg", "Inc", "Dec", "Shr", "Shl", "BOr", "BAnd", "BXor",
    "BNot", "LXor", "LNot", "Eq", "Ne", "Gt", "Lt", "Ge", "Le", "Abs", "Rnd", "MulDiv", "Dup",
    "Pop", "Swap", "Rot", "Rev", "DupList", "PopList", "RndList", "Select", "GoEq", "GoNe",
    "GoGt", "GoLt", "GoGe", "GoLe", "GoZ", "GoNz", "Go", "Exit", "Return", "SetReturn", "Shuffle",
    "ShuffleList", "NextCard", "Match", "Pause", "CopyStr", "MoveStr", "NukeStr", "MergeStrs",
    "ScaleTime", "NumToStr", "StrToNum", "ConcatStrs", "LenStr", "CopySubStr",
];

const FIXED_BASE: u16 = 0x100;

/// Mnemonic of the push pseudo-instruction.
pub const PUSH_MNEMONIC: &str = "Push";

/// Opcode to mnemonic mapping. Name lookup ignores case.
#[derive(Clone, Debug, Default)]
pub struct OpcodeTable {
    names: BTreeMap<u16, String>,
    codes: HashMap<String, u16>,
}

impl OpcodeTable {
    /// An empty table. Every opcode renders as `Op0x..`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The interpreter's base opcode set.
    pub fn base() -> Self {
        let mut table = Self::empty();
        for (code, name) in VARIABLE_OPCODES {
            table.insert(code, name);
        }
        for (code, name) in (FIXED_BASE..).zip(FIXED_OPCODES) {
            table.insert(code, name);
        }
        table
    }

    /// Register a mnemonic, replacing any previous one for `code`.
    pub fn insert(&mut self, code: u16, mnemonic: impl Into<String>) {
        let mnemonic = mnemonic.into();
        if let Some(old) = self.names.insert(code, mnemonic.clone()) {
            self.codes.remove(&old.to_ascii_lowercase());
        }
        self.codes.insert(mnemonic.to_ascii_lowercase(), code);
    }

    pub fn get(&self, code: u16) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Mnemonic for display, `Op0x<hex>` when unknown.
    pub fn mnemonic(&self, code: u16) -> String {
        match self.get(code) {
            Some(name) => name.to_string(),
            None => format!("Op0x{code:x}"),
        }
    }

    /// Opcode for a mnemonic, accepting the `Op0x<hex>` spelling.
    pub fn lookup(&self, mnemonic: &str) -> Option<u16> {
        let lower = mnemonic.to_ascii_lowercase();
        if let Some(&code) = self.codes.get(&lower) {
            return Some(code);
        }
        let hex = lower.strip_prefix("op0x")?;
        u16::from_str_radix(hex, 16).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.names.iter().map(|(&code, name)| (code, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
