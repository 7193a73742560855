//! Lexer for assembly text.
//!
//! Produces span-based tokens; text is sliced from the source when needed.
//! Consecutive unrecognized characters are coalesced into one `Garbage` token.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token(":")]
    Colon,

    #[token("@")]
    At,

    #[token("$")]
    Dollar,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"[0-9]+")]
    Number,

    /// Double-quoted text, no escapes.
    #[regex(r#""[^"\n]*""#)]
    Str,

    /// Single-quoted four-character tag.
    #[regex(r"'[^'\n]*'")]
    Quoted,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    /// Coalesced unrecognized characters.
    Garbage,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }
}

/// Tokenize `source`, keeping trivia.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token {
                        kind: TokenKind::Garbage,
                        span: start..lexer.span().start,
                    });
                }
                tokens.push(Token {
                    kind,
                    span: lexer.span(),
                });
            }
            Err(()) => {
                error_start.get_or_insert(lexer.span().start);
            }
        }
    }
    if let Some(start) = error_start {
        tokens.push(Token {
            kind: TokenKind::Garbage,
            span: start..source.len(),
        });
    }

    tokens
}
