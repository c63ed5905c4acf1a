use std::fmt;

use crate::span::{Pos, Span};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LiteralKind {
    Hex,
    Bin,
    Dec,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// `name:`
    Label,
    Lit(LiteralKind),
    OpenBracket,
    CloseBracket,
    /// Bare identifier, either an instruction or a label reference
    Mnemonic,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Label => "label",
            TokenKind::Lit(LiteralKind::Hex) => "hex literal",
            TokenKind::Lit(LiteralKind::Bin) => "binary literal",
            TokenKind::Lit(LiteralKind::Dec) => "decimal literal",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::Mnemonic => "identifier",
        };
        f.write_str(name)
    }
}

/// Represents a single "word" of source code.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    /// Label or mnemonic name (lowercase), or the digits of a literal without prefix
    pub text: String,
    pub span: Span,
    pub pos: Pos,
}

impl Token {
    /// Build a token from the lexeme it was matched on.
    pub fn new(kind: TokenKind, lexeme: &str, span: Span, pos: Pos) -> Self {
        let text = match kind {
            TokenKind::Label => lexeme.trim_end_matches(':').to_ascii_lowercase(),
            TokenKind::Mnemonic => lexeme.to_ascii_lowercase(),
            TokenKind::Lit(LiteralKind::Hex | LiteralKind::Bin) => lexeme[2..].to_owned(),
            TokenKind::Lit(LiteralKind::Dec) => lexeme.to_owned(),
            TokenKind::OpenBracket | TokenKind::CloseBracket => String::new(),
        };
        Token {
            kind,
            text,
            span,
            pos,
        }
    }
}
