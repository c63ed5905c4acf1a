use std::io::Write;

use miette::Result;

use crate::error;
use crate::output;
use crate::span::{Pos, Span};
use crate::symbol::LabelTable;
use crate::token::Token;

/// Reference to a label that was not declared yet when it was encoded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LabelRef {
    pub name: String,
    pub span: Span,
    pub pos: Pos,
}

impl From<&Token> for LabelRef {
    fn from(tok: &Token) -> Self {
        LabelRef {
            name: tok.text.clone(),
            span: tok.span,
            pos: tok.pos,
        }
    }
}

/// One cell of the output stream.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Unit {
    Resolved(u8),
    /// Filled in with the label offset by [`Air::backpatch`]
    Pending(LabelRef),
}

/// Assembly intermediate representation: the output stream with forward references still
/// unresolved, plus every label found while encoding.
#[derive(Clone, Default, Debug)]
pub struct Air {
    pub(crate) units: Vec<Unit>,
    pub(crate) labels: LabelTable,
}

impl Air {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes emitted so far, which is also the offset of the next byte.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.units.push(Unit::Resolved(byte))
    }

    pub fn push_pending(&mut self, label: LabelRef) {
        self.units.push(Unit::Pending(label))
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Number of references still waiting for their label.
    pub fn pending(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit, Unit::Pending(_)))
            .count()
    }

    /// Use labels filled during encoding to resolve pending references.
    pub fn backpatch(&self) -> Result<Vec<u8>> {
        self.units
            .iter()
            .map(|unit| match unit {
                Unit::Resolved(byte) => Ok(*byte),
                Unit::Pending(label) => self.resolve(label),
            })
            .collect()
    }

    fn resolve(&self, label: &LabelRef) -> Result<u8> {
        let Some(offset) = self.labels.offset(&label.name) else {
            return Err(error::resolve_undefined_label(label));
        };
        u8::try_from(offset)
            .map_err(|_| error::label_range(&label.name, label.span, label.pos, offset))
    }

    /// Resolve every unit, then write the listing to `dest`. Nothing is written on failure.
    pub fn resolve_and_write(&self, dest: impl Write) -> Result<()> {
        let bytes = self.backpatch()?;
        output::write_bytes(&bytes, dest)
    }
}
