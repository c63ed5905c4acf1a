use miette::{Report, Result};

// Lexing
mod lexer;
pub use lexer::tokenize;
mod token;
pub use token::{LiteralKind, Token, TokenKind};
pub mod literal;

// Encoding
mod encoder;
pub use encoder::Encoder;
mod symbol;
pub use symbol::{Instr, InstrKind, Label, LabelTable, OperandRule};
mod air;
pub use air::{Air, LabelRef, Unit};
pub mod output;

mod error;
mod source;
pub use source::SourceFile;
mod span;
pub use span::{Pos, Span, SrcOffset};

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;

/// Default file the byte listing is written to.
pub const DEFAULT_OUTPUT: &str = "out.txt";

/// Lex and encode a source file into AIR. Forward references may still be pending.
pub fn assemble(src: &SourceFile) -> Result<Air> {
    let attach = |e: Report| e.with_source_code(src.named());
    let toks = tokenize(src.text()).map_err(attach)?;
    Encoder::new(&toks).encode().map_err(attach)
}

/// Resolve every pending reference in AIR produced from `src`.
pub fn resolve(src: &SourceFile, air: &Air) -> Result<Vec<u8>> {
    air.backpatch().map_err(|e| e.with_source_code(src.named()))
}

/// Run the whole pipeline, returning the final byte stream.
pub fn assemble_bytes(src: &SourceFile) -> Result<Vec<u8>> {
    let air = assemble(src)?;
    resolve(src, &air)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_program() {
        let src = SourceFile::new(
            "count.asm",
            "; count down from three\n\
             start:  lda 3\n\
             loop:   sub 1\n\
                     out\n\
                     jz end\n\
                     jmp loop\n\
             end:    hlt\n",
        );
        assert_eq!(
            assemble_bytes(&src).unwrap(),
            vec![2, 3, 8, 1, 9, 15, 9, 11, 2, 16]
        );
    }

    #[test]
    fn errors_carry_source() {
        let src = SourceFile::new("bad.asm", "jmp missing");
        let err = assemble_bytes(&src).unwrap_err();
        assert!(err.source_code().is_some());
        assert_eq!(err.code().unwrap().to_string(), "resolve::undefined_label");

        let src = SourceFile::new("bad.asm", "lda 300");
        let err = assemble(&src).unwrap_err();
        assert!(err.source_code().is_some());
    }

    #[test]
    fn empty_source() {
        let src = SourceFile::new("empty.asm", "");
        assert!(assemble_bytes(&src).unwrap().is_empty());
    }
}
