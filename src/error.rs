use miette::{miette, LabeledSpan, Report, Severity};

use crate::air::LabelRef;
use crate::span::{Pos, Span};
use crate::symbol::Label;
use crate::token::Token;

// Lexer errors

pub fn lex_unknown(span: Span, pos: Pos, found: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::unknown",
        help = "allowed are labels (`name:`), mnemonics, brackets, and 0x/0b/decimal literals",
        labels = vec![LabeledSpan::at(span, "unknown token")],
        "Encountered an unknown token `{found}` at {pos}",
    )
}

// Literal errors

pub fn lit_range(tok: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lit::range",
        help = "operands are single bytes, from 0 to 255 (0xff, 0b11111111)",
        labels = vec![LabeledSpan::at(tok.span, "out-of-range literal")],
        "Invalid number (>0xff) given at {}",
        tok.pos
    )
}

pub fn label_range(name: &str, span: Span, pos: Pos, offset: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lit::range",
        help = "labels can only be referenced within the first 256 bytes of output",
        labels = vec![LabeledSpan::at(span, "label offset does not fit a byte")],
        "Label `{name}` resolves to offset {offset}, which does not fit a byte, at {pos}",
    )
}

// Encoder errors

pub fn encode_type(bracket: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "encode::type",
        help = "`sta` takes the target address directly, like `sta 0x0f`",
        labels = vec![LabeledSpan::at(bracket.span, "pointer operand")],
        "Invalid type (pointer given for memory address) at {}",
        bracket.pos
    )
}

pub fn encode_duplicate_label(tok: &Token, first: &Label) -> Report {
    miette!(
        severity = Severity::Error,
        code = "encode::duplicate_label",
        help = "labels are only allowed once per file",
        labels = vec![
            LabeledSpan::at(tok.span, "duplicate label"),
            LabeledSpan::at(first.span, "first declared here"),
        ],
        "Duplicate label `{}` at {}",
        tok.text,
        tok.pos
    )
}

pub fn encode_reserved_label(tok: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "encode::reserved_label",
        help = format!("instruction names cannot be used as labels, try another name like `{}_`", tok.text),
        labels = vec![LabeledSpan::at(tok.span, "reserved name")],
        "Label `{}` uses the name of an instruction at {}",
        tok.text,
        tok.pos
    )
}

pub fn encode_unknown_instr(tok: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "encode::unknown_instruction",
        help = "known instructions are nop, lda, sta, add, sub, out, jmp, jc, jz, and hlt",
        labels = vec![LabeledSpan::at(tok.span, "unknown instruction")],
        "Invalid identifier `{}` at {}",
        tok.text,
        tok.pos
    )
}

pub fn encode_unexpected(tok: &Token, expected: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "encode::unexpected_token",
        help = "check the operands for this instruction",
        labels = vec![LabeledSpan::at(tok.span, "unexpected token")],
        "Expected {expected}, found {} at {}",
        tok.kind,
        tok.pos
    )
}

pub fn encode_eof(last: &Token) -> Report {
    miette!(
        severity = Severity::Error,
        code = "encode::unexpected_eof",
        help = "you may be missing operands in your last statement",
        labels = vec![LabeledSpan::at(last.span, "input ends after this token")],
        "Unexpected end of file after {}",
        last.pos
    )
}

// Resolver errors

pub fn resolve_undefined_label(label: &LabelRef) -> Report {
    miette!(
        severity = Severity::Error,
        code = "resolve::undefined_label",
        help = format!("declare the label somewhere in the file, like `{}:`", label.name),
        labels = vec![LabeledSpan::at(label.span, "undefined label")],
        "Reference to undefined label `{}` at {}",
        label.name,
        label.pos
    )
}
