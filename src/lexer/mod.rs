use miette::Result;

use crate::error;
use crate::lexer::cursor::Cursor;
use crate::span::{Pos, Span, SrcOffset};
use crate::token::{LiteralKind, Token, TokenKind};

pub mod cursor;

/// A 'light' token that only carries basic and easily derivable info
#[derive(Debug)]
pub struct LToken {
    pub kind: LTokenKind,
    pub len: u32,
}

impl LToken {
    pub fn new(kind: LTokenKind, len: u32) -> Self {
        LToken { kind, len }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LTokenKind {
    Label,
    Lit(LiteralKind),
    OpenBracket,
    CloseBracket,
    Ident,
    Comment,
    Whitespace,
    Unknown,
    Eof,
}

/// Turn a whole source file into tokens, one line at a time.
///
/// Whitespace and comments are dropped. Any character that starts no known token is an error.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut toks = Vec::new();
    let mut line_offs = 0;
    for (idx, line) in src.split_inclusive('\n').enumerate() {
        tokenize_line(line, idx as u32 + 1, line_offs, &mut toks)?;
        line_offs += line.len();
    }
    Ok(toks)
}

fn tokenize_line(line: &str, line_num: u32, line_offs: usize, toks: &mut Vec<Token>) -> Result<()> {
    let mut cur = Cursor::new(line);
    let mut start = 0;
    loop {
        let ltok = cur.advance_token();
        let end = start + ltok.len as usize;
        let span = Span::new(SrcOffset(line_offs + start), end - start);
        let pos = Pos::new(line_num, start as u32 + 1);
        let kind = match ltok.kind {
            LTokenKind::Eof => break,
            LTokenKind::Whitespace | LTokenKind::Comment => {
                start = end;
                continue;
            }
            LTokenKind::Unknown => return Err(error::lex_unknown(span, pos, &line[start..end])),
            LTokenKind::Label => TokenKind::Label,
            LTokenKind::Lit(lit) => TokenKind::Lit(lit),
            LTokenKind::OpenBracket => TokenKind::OpenBracket,
            LTokenKind::CloseBracket => TokenKind::CloseBracket,
            LTokenKind::Ident => TokenKind::Mnemonic,
        };
        toks.push(Token::new(kind, &line[start..end], span, pos));
        start = end;
    }
    Ok(())
}

/// Test if a character is considered to be whitespace. Includes line terminators.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C')
}

pub(crate) fn is_bin_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

impl Cursor<'_> {
    pub fn advance_token(&mut self) -> LToken {
        let first_char = match self.bump() {
            Some(c) => c,
            None => return LToken::new(LTokenKind::Eof, 0),
        };
        let token_kind = match first_char {
            c if is_whitespace(c) => {
                self.take_while(is_whitespace);
                LTokenKind::Whitespace
            }
            ';' => {
                self.take_while(|c| c != '\n');
                LTokenKind::Comment
            }
            // Prefixed literals need at least one digit, otherwise `0` is a decimal on its own
            '0' if matches!(self.first(), 'x' | 'X') && self.second().is_ascii_hexdigit() => {
                self.bump();
                self.take_while(|c| c.is_ascii_hexdigit());
                LTokenKind::Lit(LiteralKind::Hex)
            }
            '0' if matches!(self.first(), 'b' | 'B') && is_bin_digit(self.second()) => {
                self.bump();
                self.take_while(is_bin_digit);
                LTokenKind::Lit(LiteralKind::Bin)
            }
            c if c.is_ascii_digit() => {
                self.take_while(|c| c.is_ascii_digit());
                LTokenKind::Lit(LiteralKind::Dec)
            }
            '[' => LTokenKind::OpenBracket,
            ']' => LTokenKind::CloseBracket,
            c if c.is_ascii_alphabetic() => {
                self.take_while(|c| c.is_ascii_alphanumeric());
                if self.first() == ':' {
                    self.bump();
                    LTokenKind::Label
                } else {
                    LTokenKind::Ident
                }
            }
            _ => LTokenKind::Unknown,
        };
        let res = LToken::new(token_kind, self.pos_in_token());
        self.reset_pos();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|tok| tok.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        tokenize(src).unwrap().into_iter().map(|tok| tok.text).collect()
    }

    #[test]
    fn lex_instruction_with_pointer() {
        assert_eq!(
            kinds("lda [0x0F]"),
            vec![
                TokenKind::Mnemonic,
                TokenKind::OpenBracket,
                TokenKind::Lit(LiteralKind::Hex),
                TokenKind::CloseBracket,
            ]
        );
        assert_eq!(texts("lda [0x0F]"), vec!["lda", "", "0F", ""]);
    }

    #[test]
    fn lex_literal_prefixes() {
        assert_eq!(
            kinds("0xff 0B101 42"),
            vec![
                TokenKind::Lit(LiteralKind::Hex),
                TokenKind::Lit(LiteralKind::Bin),
                TokenKind::Lit(LiteralKind::Dec),
            ]
        );
        assert_eq!(texts("0xff 0B101 42"), vec!["ff", "101", "42"]);
    }

    #[test]
    fn lex_prefix_without_digits() {
        // `0x` alone is a decimal zero followed by an identifier
        assert_eq!(kinds("0x"), vec![TokenKind::Lit(LiteralKind::Dec), TokenKind::Mnemonic]);
        assert_eq!(
            kinds("0b2"),
            vec![
                TokenKind::Lit(LiteralKind::Dec),
                TokenKind::Mnemonic,
            ]
        );
    }

    #[test]
    fn lex_label_is_case_folded() {
        let toks = tokenize("Loop2: JMP Loop2").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Label);
        assert_eq!(toks[0].text, "loop2");
        assert_eq!(toks[1].text, "jmp");
        assert_eq!(toks[2].kind, TokenKind::Mnemonic);
        assert_eq!(toks[2].text, "loop2");
    }

    #[test]
    fn lex_label_needs_adjacent_colon() {
        assert_eq!(kinds("end:"), vec![TokenKind::Label]);
        assert!(tokenize("end :").is_err());
    }

    #[test]
    fn lex_comments_and_blank_lines() {
        let src = "; header\n\n  nop ; trailing\r\n\thlt\n";
        assert_eq!(texts(src), vec!["nop", "hlt"]);
    }

    #[test]
    fn lex_form_feed_and_vertical_tab() {
        assert_eq!(texts("nop\x0Chlt\x0B\tout"), vec!["nop", "hlt", "out"]);
    }

    #[test]
    fn lex_positions() {
        let toks = tokenize("start:\n  add [5]\n").unwrap();
        assert_eq!(toks[0].pos, Pos::new(1, 1));
        assert_eq!(toks[1].pos, Pos::new(2, 3));
        assert_eq!(toks[2].pos, Pos::new(2, 7));
        assert_eq!(toks[3].pos, Pos::new(2, 8));
        assert_eq!(toks[4].pos, Pos::new(2, 9));
        // Spans index into the whole source
        assert_eq!(toks[1].span, Span::new(SrcOffset(9), 3));
        assert_eq!(toks[0].span, Span::new(SrcOffset(0), 6));
    }

    #[test]
    fn lex_unknown_fails() {
        let err = tokenize("nop\nlda #5").unwrap_err();
        assert_eq!(err.code().unwrap().to_string(), "lex::unknown");
        assert!(err.to_string().contains("line 2, column 5"));
    }

    #[test]
    fn lex_unknown_non_ascii() {
        assert!(tokenize("nop é").is_err());
    }
}
