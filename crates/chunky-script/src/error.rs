//! Script codec and assembler errors.

use chunky_file::{ContainerError, StringTableError};

/// Error encoding or decoding script bytecode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("{what} truncated: expected {expected:#x} bytes, got {actual:#x}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported script: {0}")]
    Unsupported(String),
    #[error("invalid character {ch:?} in variable name {name:?}")]
    InvalidVariableChar { ch: char, name: String },
    /// Variable instructions store their opcode in a single non-zero byte.
    #[error("opcode {0:#x} cannot carry a variable name")]
    VariableOpcodeOutOfRange(u16),
    #[error("instruction has {count} parameters, limit is {max}")]
    TooManyParams { count: usize, max: usize },
    #[error("script body of {0} words does not fit in 32 bits")]
    TooLarge(usize),
}

impl From<chunky_core::Error> for ScriptError {
    fn from(err: chunky_core::Error) -> Self {
        match err {
            chunky_core::Error::Truncated {
                what,
                expected,
                actual,
            } => Self::Truncated {
                what,
                expected,
                actual,
            },
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// Error turning assembly into a script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("undefined label {0:?}")]
    UndefinedLabel(String),
    #[error("label {0:?} is already defined")]
    DuplicateLabel(String),
    #[error("unknown mnemonic {0:?}")]
    UnknownMnemonic(String),
    #[error("{0}")]
    Syntax(String),
    #[error("{0} is already defined")]
    DuplicateDirective(&'static str),
    #[error("instruction outside of a script")]
    MissingScript,
    /// Error raised while handling one line of assembly text.
    #[error("line {line}: {error}")]
    Line {
        line: usize,
        #[source]
        error: Box<AssembleError>,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    StringTable(#[from] StringTableError),
    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl AssembleError {
    /// Attach a 1-based line number.
    pub fn at_line(self, line: usize) -> Self {
        Self::Line {
            line,
            error: Box::new(self),
        }
    }

    /// The error without line information.
    pub fn kind(&self) -> &Self {
        match self {
            Self::Line { error, .. } => error.kind(),
            other => other,
        }
    }
}
