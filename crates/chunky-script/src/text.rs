//! Text assembly.
//!
//! One statement per line, `#` starts a comment:
//!
//! ```text
//! stringtable 1
//! string 3 "Hello world"
//! script GLSC 0x10
//! loop:
//!     push string:3
//!     push 'MBMP'
//!     PushThisVar siiLoop
//!     push loop
//!     Go
//! ```
//!
//! Lines may start with any number of `name:` or `@name:` labels. Push
//! operands are numbers, `string:<id>`, four-character `'TAGS'` or label
//! references (`name`, `$name`, `@name`). A name that is not a label may
//! also be a constant passed to [`assemble_text_with_constants`]. Consecutive
//! `push` lines form one push instruction, labels between them included;
//! `endpush` ends it. Commands, mnemonics and labels ignore case.

use std::collections::HashMap;

use chunky_core::{CharacterSet, Tag};
use chunky_file::{Chunk, ChunkFlags, ChunkId, Container, STRING_TABLE_TAG, StringTable};

use crate::assembler::{Assembler, Operand};
use crate::error::AssembleError;
use crate::lexer::{Token, TokenKind, lex};
use crate::opcode::OpcodeTable;
use crate::script::{SCRIPT_TAGS, Script};

/// File type of containers produced by [`Assembly::to_container`].
pub const ASSEMBLY_FILE_TYPE: Tag = Tag::from_bytes(*b"ASMX");

/// Chunks produced from assembly text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    pub script: Option<(ChunkId, Script)>,
    pub strings: Option<(ChunkId, StringTable)>,
}

impl Assembly {
    /// Pack the assembly into a little-endian ANSI container.
    ///
    /// The string table is a loner; the script refers to it as child 0.
    pub fn to_container(&self) -> Result<Container, AssembleError> {
        let mut container =
            Container::new(ASSEMBLY_FILE_TYPE).with_character_set(CharacterSet::Ansi);

        if let Some((id, strings)) = &self.strings {
            let flags = ChunkFlags::from_bits(ChunkFlags::LONER);
            container.insert(Chunk::new(*id, strings.to_bytes()?).with_flags(flags))?;
        }
        if let Some((id, script)) = &self.script {
            let mut chunk = Chunk::new(*id, script.to_bytes()?);
            if let Some((strings_id, _)) = &self.strings {
                chunk = chunk.with_child(0, *strings_id);
            }
            container.insert(chunk)?;
        }
        Ok(container)
    }
}

/// Assemble a text listing.
///
/// Errors carry the 1-based line they were raised on.
pub fn assemble_text(source: &str, opcodes: &OpcodeTable) -> Result<Assembly, AssembleError> {
    assemble_text_with_constants(source, opcodes, &HashMap::new())
}

/// Assemble a text listing whose operands may name `constants`.
///
/// Takes the same map as [`FormatConfig::constants`](crate::FormatConfig),
/// so listings formatted with named values reassemble. Labels win over
/// constants of the same name.
pub fn assemble_text_with_constants(
    source: &str,
    opcodes: &OpcodeTable,
    constants: &HashMap<u32, String>,
) -> Result<Assembly, AssembleError> {
    let tokens = lex(source);
    let mut assembler = Assembler::default();
    for (&value, name) in constants {
        assembler.constant(name, value);
    }
    let mut state = TextAssembler {
        source,
        opcodes,
        assembler,
        script: None,
        strings: None,
    };

    for (index, line) in tokens.split(|t| t.kind == TokenKind::Newline).enumerate() {
        let line: Vec<&Token> = line.iter().filter(|t| !t.kind.is_trivia()).collect();
        state
            .statement(&line)
            .map_err(|err| err.at_line(index + 1))?;
    }

    let script = match state.script {
        Some(id) => Some((id, state.assembler.finish()?)),
        None => None,
    };
    Ok(Assembly {
        script,
        strings: state.strings,
    })
}

struct TextAssembler<'s> {
    source: &'s str,
    opcodes: &'s OpcodeTable,
    assembler: Assembler,
    script: Option<ChunkId>,
    strings: Option<(ChunkId, StringTable)>,
}

impl<'s> TextAssembler<'s> {
    fn statement(&mut self, mut line: &[&Token]) -> Result<(), AssembleError> {
        if let Some(garbage) = line.iter().find(|t| t.kind == TokenKind::Garbage) {
            let text = self.text(garbage);
            return Err(AssembleError::Syntax(format!("unexpected {text:?}")));
        }

        while let Some((name, rest)) = self.leading_label(line) {
            self.assembler.label(name)?;
            line = rest;
        }

        let Some((command, args)) = line.split_first() else {
            return Ok(());
        };
        if command.kind != TokenKind::Ident {
            return Err(AssembleError::Syntax(format!(
                "expected a command, found {:?}",
                self.text(command)
            )));
        }

        let command = self.text(command);
        match command.to_ascii_lowercase().as_str() {
            "stringtable" => self.string_table(args),
            "string" => self.string(args),
            "script" => self.script(args),
            "push" => self.push(args),
            "endpush" => self.end_push(args),
            _ => self.instruction(command, args),
        }
    }

    /// `name:` or `@name:` at the start of `line`.
    fn leading_label<'t, 'k>(
        &self,
        line: &'t [&'k Token],
    ) -> Option<(&'s str, &'t [&'k Token])> {
        let line = match line.first() {
            Some(t) if t.kind == TokenKind::At => &line[1..],
            _ => line,
        };
        match line {
            [name, colon, rest @ ..]
                if name.kind == TokenKind::Ident && colon.kind == TokenKind::Colon =>
            {
                Some((self.text(name), rest))
            }
            _ => None,
        }
    }

    fn string_table(&mut self, args: &[&Token]) -> Result<(), AssembleError> {
        let [number] = args else {
            return Err(syntax("stringtable <chunk-number>"));
        };
        let number = self.number(number)?;
        if self.strings.is_some() {
            return Err(AssembleError::DuplicateDirective("string table"));
        }
        let id = ChunkId::new(STRING_TABLE_TAG, number);
        tracing::debug!(%id, "string table");
        self.strings = Some((id, StringTable::new(CharacterSet::Ansi)));
        Ok(())
    }

    /// `string <id> <text>`: the rest of the line, surrounding quotes removed.
    fn string(&mut self, args: &[&Token]) -> Result<(), AssembleError> {
        let usage = || syntax("string <id> <text>");
        let [id, text @ ..] = args else {
            return Err(usage());
        };
        let (Some(first), Some(last)) = (text.first(), text.last()) else {
            return Err(usage());
        };
        let id = self.number(id)?;
        let text = &self.source[first.span.start..last.span.end];
        let text = text.trim_matches('"');

        let Some((_, strings)) = &mut self.strings else {
            return Err(AssembleError::Syntax("string outside of a string table".into()));
        };
        tracing::debug!(id, text, "string");
        strings.insert(id, text);
        Ok(())
    }

    fn script(&mut self, args: &[&Token]) -> Result<(), AssembleError> {
        let [tag, number] = args else {
            return Err(syntax("script <GLSC|GLOP> <chunk-number>"));
        };
        let tag_text = self.text(tag).to_ascii_uppercase();
        let tag = SCRIPT_TAGS
            .into_iter()
            .find(|t| t.to_string() == tag_text)
            .ok_or_else(|| {
                AssembleError::Syntax(format!("script chunks are GLSC or GLOP, not {tag_text}"))
            })?;
        let number = self.number(number)?;
        if self.script.is_some() {
            return Err(AssembleError::DuplicateDirective("script"));
        }
        let id = ChunkId::new(tag, number);
        tracing::debug!(%id, "script");
        self.script = Some(id);
        Ok(())
    }

    fn push(&mut self, args: &[&Token]) -> Result<(), AssembleError> {
        self.require_script()?;
        let operand = self.operand(args)?;
        self.assembler.push(operand);
        Ok(())
    }

    fn end_push(&mut self, args: &[&Token]) -> Result<(), AssembleError> {
        if !args.is_empty() {
            return Err(syntax("endpush"));
        }
        self.require_script()?;
        self.assembler.end_push();
        Ok(())
    }

    fn instruction(&mut self, mnemonic: &str, args: &[&Token]) -> Result<(), AssembleError> {
        let opcode = self
            .opcodes
            .lookup(mnemonic)
            .ok_or_else(|| AssembleError::UnknownMnemonic(mnemonic.to_string()))?;
        let variable = match args {
            [] => None,
            [name] if name.kind == TokenKind::Ident => Some(self.text(name)),
            _ => return Err(syntax("<mnemonic> [variable]")),
        };
        self.require_script()?;
        self.assembler.instruction(opcode, variable)?;
        Ok(())
    }

    fn operand(&self, args: &[&Token]) -> Result<Operand, AssembleError> {
        use TokenKind::*;

        let kinds: Vec<TokenKind> = args.iter().map(|t| t.kind).collect();
        match (kinds.as_slice(), args) {
            ([Number], [value]) => Ok(Operand::Value(self.number(value)?)),
            ([Ident, Colon, Number], [prefix, _, id])
                if self.text(prefix).eq_ignore_ascii_case("string") =>
            {
                Ok(Operand::string(self.number(id)?))
            }
            ([Quoted], [tag]) => self.quoted(tag).map(Operand::Value),
            ([Ident], [name]) | ([Dollar | At, Ident], [_, name]) => {
                Ok(Operand::label(self.text(name)))
            }
            _ => Err(syntax("push <number|string:<id>|'TAGS'|label>")),
        }
    }

    /// `'ABCD'` as a big-endian word.
    fn quoted(&self, token: &Token) -> Result<u32, AssembleError> {
        let text = self.text(token);
        let inner = &text[1..text.len() - 1];
        let bytes: Vec<u8> = inner
            .chars()
            .map(|ch| u8::try_from(ch as u32).ok())
            .collect::<Option<_>>()
            .unwrap_or_default();
        let bytes: [u8; 4] = bytes.try_into().map_err(|_| {
            AssembleError::Syntax(format!("{text} is not four single-byte characters"))
        })?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn number(&self, token: &Token) -> Result<u32, AssembleError> {
        let text = self.text(token);
        if token.kind != TokenKind::Number {
            return Err(AssembleError::Syntax(format!("expected a number, found {text:?}")));
        }
        let parsed = match text.get(..2) {
            Some("0x" | "0X") => u32::from_str_radix(&text[2..], 16),
            _ => text.parse(),
        };
        parsed.map_err(|_| AssembleError::Syntax(format!("number {text} does not fit in 32 bits")))
    }

    fn require_script(&self) -> Result<(), AssembleError> {
        match self.script {
            Some(_) => Ok(()),
            None => Err(AssembleError::MissingScript),
        }
    }

    fn text(&self, token: &Token) -> &'s str {
        token.text(self.source)
    }
}

fn syntax(usage: &str) -> AssembleError {
    AssembleError::Syntax(format!("syntax: {usage}"))
}
