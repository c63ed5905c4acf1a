use miette::Result;

use crate::air::{Air, LabelRef};
use crate::error;
use crate::literal;
use crate::symbol::{Instr, InstrKind, Label, OperandRule};
use crate::token::{Token, TokenKind};

/// Operand addressing form, picks between the two opcodes of an instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Mode {
    Immediate,
    Pointer,
}

#[derive(Clone, Copy, Debug)]
enum Value<'a> {
    Byte(u8),
    Label(&'a Token),
}

#[derive(Clone, Copy, Debug)]
struct Operand<'a> {
    mode: Mode,
    value: Value<'a>,
}

/// Transforms a token stream into AIR in a single left-to-right scan.
///
/// Labels are recorded at the current byte count as they are met. References to labels that
/// are already known are resolved on the spot, the rest stay pending for [`Air::backpatch`].
pub struct Encoder<'a> {
    toks: &'a [Token],
    /// Index of the next unconsumed token
    next: usize,
    air: Air,
}

impl<'a> Encoder<'a> {
    pub fn new(toks: &'a [Token]) -> Self {
        Encoder {
            toks,
            next: 0,
            air: Air::new(),
        }
    }

    /// Create AIR out of token stream
    pub fn encode(mut self) -> Result<Air> {
        while let Some(tok) = self.bump() {
            match tok.kind {
                TokenKind::Label => self.declare_label(tok)?,
                TokenKind::Mnemonic => self.encode_instr(tok)?,
                // Statements only start with labels or instructions
                TokenKind::Lit(_) | TokenKind::OpenBracket | TokenKind::CloseBracket => {
                    return Err(error::encode_unexpected(tok, "label or instruction"))
                }
            }
        }
        // Consume self to return AIR
        Ok(self.air)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let tok = self.toks.get(self.next)?;
        self.next += 1;
        Some(tok)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.toks.get(self.next)
    }

    fn declare_label(&mut self, tok: &Token) -> Result<()> {
        // Operands naming an instruction are never label references, so such a label is unusable
        if tok.text.parse::<InstrKind>().is_ok() {
            return Err(error::encode_reserved_label(tok));
        }
        let label = Label {
            offset: self.air.len(),
            span: tok.span,
            pos: tok.pos,
        };
        self.air
            .labels
            .insert(&tok.text, label)
            .map_err(|first| error::encode_duplicate_label(tok, &first))
    }

    fn encode_instr(&mut self, tok: &'a Token) -> Result<()> {
        let kind: InstrKind = tok
            .text
            .parse()
            .map_err(|_| error::encode_unknown_instr(tok))?;
        let instr = kind.descriptor();
        match instr.rule {
            OperandRule::Bare => self.air.push_byte(instr.imm),
            OperandRule::Store => {
                if let Some(bracket) = self.peek().filter(|next| next.kind == TokenKind::OpenBracket) {
                    return Err(error::encode_type(bracket));
                }
                let operand = self.expect_operand(tok)?;
                self.emit(instr, operand)?;
            }
            OperandRule::Value => {
                let operand = self.expect_operand(tok)?;
                self.emit(instr, operand)?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, instr: Instr, operand: Operand<'a>) -> Result<()> {
        let opcode = match operand.mode {
            Mode::Immediate => instr.imm,
            Mode::Pointer => instr.ptr,
        };
        self.air.push_byte(opcode);
        match operand.value {
            Value::Byte(byte) => self.air.push_byte(byte),
            Value::Label(tok) => match self.air.labels.offset(&tok.text) {
                Some(offset) => {
                    let byte = u8::try_from(offset)
                        .map_err(|_| error::label_range(&tok.text, tok.span, tok.pos, offset))?;
                    self.air.push_byte(byte);
                }
                None => self.air.push_pending(LabelRef::from(tok)),
            },
        }
        Ok(())
    }

    /// Consume either `value` or `[ value ]` following the instruction token.
    fn expect_operand(&mut self, instr: &'a Token) -> Result<Operand<'a>> {
        let tok = self.expect_any(instr)?;
        if tok.kind != TokenKind::OpenBracket {
            return Ok(Operand {
                mode: Mode::Immediate,
                value: self.value(tok)?,
            });
        }
        let inner = self.expect_any(tok)?;
        let value = self.value(inner)?;
        match self.expect_any(inner)? {
            close if close.kind == TokenKind::CloseBracket => Ok(Operand {
                mode: Mode::Pointer,
                value,
            }),
            unexpected => Err(error::encode_unexpected(unexpected, "`]`")),
        }
    }

    fn value(&self, tok: &'a Token) -> Result<Value<'a>> {
        match tok.kind {
            TokenKind::Lit(_) => Ok(Value::Byte(literal::evaluate(tok)?)),
            // Instruction names are never label references, that is a missing operand
            TokenKind::Mnemonic if tok.text.parse::<InstrKind>().is_err() => Ok(Value::Label(tok)),
            _ => Err(error::encode_unexpected(tok, "numeric literal or label")),
        }
    }

    fn expect_any(&mut self, last: &Token) -> Result<&'a Token> {
        self.bump().ok_or_else(|| error::encode_eof(last))
    }
}
