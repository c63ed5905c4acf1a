use std::str::FromStr;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::span::{Pos, Span};

// Label name -> declaration, kept in declaration order
type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InstrKind {
    Nop,
    Lda,
    Sta,
    Add,
    Sub,
    Out,
    Jmp,
    Jc,
    Jz,
    Hlt,
}

/// How many operand tokens an instruction consumes, and which forms are allowed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandRule {
    /// No operand, a single opcode byte
    Bare,
    /// Address operand, pointer form is a type error
    Store,
    /// Immediate value or `[pointer]`
    Value,
}

/// Static instruction table entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Instr {
    /// Opcode for immediate operands, or the only opcode of bare instructions
    pub imm: u8,
    /// Opcode for `[pointer]` operands, 0 when the form is not available
    pub ptr: u8,
    pub rule: OperandRule,
}

impl Instr {
    const fn bare(opcode: u8) -> Self {
        Instr { imm: opcode, ptr: 0, rule: OperandRule::Bare }
    }

    /// Pointer opcode is the base, immediate is the one after it.
    const fn value(base: u8) -> Self {
        Instr { imm: base + 1, ptr: base, rule: OperandRule::Value }
    }
}

impl InstrKind {
    pub const ALL: [InstrKind; 10] = [
        InstrKind::Nop,
        InstrKind::Lda,
        InstrKind::Sta,
        InstrKind::Add,
        InstrKind::Sub,
        InstrKind::Out,
        InstrKind::Jmp,
        InstrKind::Jc,
        InstrKind::Jz,
        InstrKind::Hlt,
    ];

    pub fn descriptor(self) -> Instr {
        match self {
            InstrKind::Nop => Instr::bare(0),
            InstrKind::Lda => Instr::value(1),
            InstrKind::Sta => Instr { imm: 3, ptr: 0, rule: OperandRule::Store },
            InstrKind::Add => Instr::value(5),
            InstrKind::Sub => Instr::value(7),
            InstrKind::Out => Instr::bare(9),
            InstrKind::Jmp => Instr::value(10),
            InstrKind::Jc => Instr::value(12),
            InstrKind::Jz => Instr::value(14),
            InstrKind::Hlt => Instr::bare(16),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InstrKind::Nop => "nop",
            InstrKind::Lda => "lda",
            InstrKind::Sta => "sta",
            InstrKind::Add => "add",
            InstrKind::Sub => "sub",
            InstrKind::Out => "out",
            InstrKind::Jmp => "jmp",
            InstrKind::Jc => "jc",
            InstrKind::Jz => "jz",
            InstrKind::Hlt => "hlt",
        }
    }
}

impl FromStr for InstrKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstrKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Declared label, bound to the byte offset of the next emitted instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Label {
    pub offset: usize,
    pub span: Span,
    pub pos: Pos,
}

/// Symbol table of label name -> output offset, owned by one assembly run.
#[derive(Clone, Default, Debug)]
pub struct LabelTable {
    table: FxMap<String, Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new label. Returns the earlier declaration if the name is already taken.
    pub fn insert(&mut self, name: &str, label: Label) -> Result<(), Label> {
        if let Some(first) = self.table.get(name) {
            return Err(*first);
        }
        self.table.insert(name.to_owned(), label);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.table.get(name)
    }

    pub fn offset(&self, name: &str) -> Option<usize> {
        self.get(name).map(|label| label.offset)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Label)> {
        self.table.iter().map(|(name, label)| (name.as_str(), label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SrcOffset;

    fn label(offset: usize) -> Label {
        Label {
            offset,
            span: Span::new(SrcOffset(0), 1),
            pos: Pos::new(1, 1),
        }
    }

    #[test]
    fn instr_from_str() {
        assert_eq!("lda".parse::<InstrKind>(), Ok(InstrKind::Lda));
        assert_eq!("JZ".parse::<InstrKind>(), Ok(InstrKind::Jz));
        assert_eq!("start".parse::<InstrKind>(), Err(()));
    }

    #[test]
    fn opcode_table() {
        let opcodes: Vec<(u8, u8)> = InstrKind::ALL
            .iter()
            .map(|kind| (kind.descriptor().imm, kind.descriptor().ptr))
            .collect();
        assert_eq!(
            opcodes,
            vec![(0, 0), (2, 1), (3, 0), (6, 5), (8, 7), (9, 0), (11, 10), (13, 12), (15, 14), (16, 0)]
        );
    }

    #[test]
    fn bare_instructions() {
        for kind in [InstrKind::Nop, InstrKind::Out, InstrKind::Hlt] {
            assert_eq!(kind.descriptor().rule, OperandRule::Bare);
        }
        assert_eq!(InstrKind::Sta.descriptor().rule, OperandRule::Store);
    }

    #[test]
    fn label_table_rejects_duplicates() {
        let mut labels = LabelTable::new();
        assert!(labels.insert("loop", label(4)).is_ok());
        assert_eq!(labels.insert("loop", label(9)), Err(label(4)));
        assert_eq!(labels.offset("loop"), Some(4));
        assert_eq!(labels.offset("end"), None);
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn label_table_keeps_declaration_order() {
        let mut labels = LabelTable::new();
        labels.insert("zeta", label(0)).unwrap();
        labels.insert("alpha", label(2)).unwrap();
        let names: Vec<&str> = labels.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
